use std::time::Duration;

use serde::Serialize;
use signet::AccountApi;

/// How long the logout page waits before sending the browser home
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogoutDelays {
    /// The delay after the session was ended
    pub success: Duration,
    /// The delay after the session could not be ended
    pub error: Duration,
}

impl Default for LogoutDelays {
    fn default() -> Self {
        Self {
            success: Duration::from_secs(1),
            error: Duration::from_secs(2),
        }
    }
}

/// The state of the logout page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogoutState {
    /// The session has not been ended yet
    #[default]
    Loading,
    /// The session was ended
    Success,
    /// The session could not be ended
    Error,
}

impl LogoutState {
    /// Ends the active session
    ///
    /// Failures are logged and select [`Error`][Self::Error]; they are never
    /// propagated.
    pub async fn end<A: AccountApi + ?Sized>(self, account: &A) -> Self {
        if self != Self::Loading {
            return self;
        }

        match account.end_session().await {
            Ok(()) => {
                tracing::info!("session ended");
                Self::Success
            }
            Err(error) => {
                let error: &dyn std::error::Error = &error;
                tracing::error!(error, "unable to end session");
                Self::Error
            }
        }
    }

    /// How long to wait before sending the browser home, if at all
    pub fn redirect_delay(self, delays: &LogoutDelays) -> Option<Duration> {
        match self {
            Self::Loading => None,
            Self::Success => Some(delays.success),
            Self::Error => Some(delays.error),
        }
    }

    /// The message shown to the caller
    pub fn message(self) -> &'static str {
        match self {
            Self::Loading => "Signing you out...",
            Self::Success => "You have been signed out. Redirecting to the home page...",
            Self::Error => "We could not sign you out. Redirecting to the home page...",
        }
    }

    /// The rendering of this state
    pub fn view(self, delays: &LogoutDelays) -> LogoutView {
        LogoutView {
            state: match self {
                Self::Loading => "loading",
                Self::Success => "success",
                Self::Error => "error",
            },
            message: self.message(),
            redirect_after: self.redirect_delay(delays).map(|d| d.as_secs()),
        }
    }
}

/// What the logout page shows
#[derive(Clone, Debug, Serialize)]
pub struct LogoutView {
    /// `loading`, `success` or `error`
    pub state: &'static str,
    /// The message shown to the caller
    pub message: &'static str,
    /// Seconds until the browser is sent home
    pub redirect_after: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::mock::{Call, MockAccount};

    #[tokio::test]
    async fn ending_a_session_succeeds() {
        let account = MockAccount::default();

        let state = LogoutState::default().end(&account).await;

        assert_eq!(state, LogoutState::Success);
        assert_eq!(account.calls(), vec![Call::EndSession]);
        assert_eq!(
            state.redirect_delay(&LogoutDelays::default()),
            Some(Duration::from_secs(1))
        );
    }

    #[tokio::test]
    async fn a_failure_is_not_propagated() {
        let account = MockAccount {
            end_session_fails: true,
            ..MockAccount::default()
        };

        let state = LogoutState::default().end(&account).await;

        assert_eq!(state, LogoutState::Error);
        assert_eq!(account.calls(), vec![Call::EndSession]);
        assert_eq!(
            state.redirect_delay(&LogoutDelays::default()),
            Some(Duration::from_secs(2))
        );
    }

    #[tokio::test]
    async fn terminal_states_do_not_end_the_session_again() {
        let account = MockAccount::default();

        let state = LogoutState::Error.end(&account).await;

        assert_eq!(state, LogoutState::Error);
        assert!(account.calls().is_empty());
    }

    #[test]
    fn messages_differ_between_outcomes() {
        assert_ne!(LogoutState::Success.message(), LogoutState::Error.message());
    }

    #[test]
    fn view_carries_the_configured_delay() {
        let delays = LogoutDelays {
            success: Duration::from_secs(5),
            error: Duration::from_secs(7),
        };

        assert_eq!(LogoutState::Success.view(&delays).redirect_after, Some(5));
        assert_eq!(LogoutState::Error.view(&delays).redirect_after, Some(7));
        assert_eq!(LogoutState::Loading.view(&delays).redirect_after, None);
    }
}
