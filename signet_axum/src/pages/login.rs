use serde::{Deserialize, Serialize};
use signet::{AccountApi, OAuthProvider};
use url::Url;

/// Query parameters accepted by the login page
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// Present when the browser returns from a failed sign-in
    #[serde(default)]
    pub error: Option<String>,
}

/// Where the authentication service sends the browser once a sign-in completes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnUrls {
    /// The destination after a successful sign-in
    pub success: Url,
    /// The destination after a failed sign-in
    pub failure: Url,
}

impl ReturnUrls {
    /// Computes the return URLs for a site served from `origin`
    pub fn for_origin(origin: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            success: origin.join("/")?,
            failure: origin.join("/login?error=1")?,
        })
    }
}

/// The state of the login page
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginState {
    /// Waiting for the caller to choose a provider
    Idle {
        /// Whether the previous sign-in attempt failed
        failed: bool,
    },
    /// The browser is being handed off to the authentication service
    Redirecting {
        /// Where to send the browser
        location: Url,
    },
}

impl Default for LoginState {
    fn default() -> Self {
        Self::Idle { failed: false }
    }
}

impl LoginState {
    /// The initial state for a request carrying `query`
    ///
    /// Any non-empty `error` value marks a failed sign-in.
    pub fn from_query(query: &LoginQuery) -> Self {
        Self::Idle {
            failed: query.error.as_deref().is_some_and(|e| !e.is_empty()),
        }
    }

    /// Starts a sign-in with `provider`
    ///
    /// Only an idle page transitions. If the flow cannot be started the page
    /// stays idle and shows the failure notice.
    pub async fn sign_in<A: AccountApi + ?Sized>(
        self,
        account: &A,
        provider: OAuthProvider,
        urls: &ReturnUrls,
    ) -> Self {
        if let Self::Redirecting { .. } = self {
            return self;
        }

        match account
            .start_oauth_session(provider, &urls.success, &urls.failure)
            .await
        {
            Ok(redirect) => {
                tracing::info!(%provider, "handing off to authentication service");
                Self::Redirecting {
                    location: redirect.location,
                }
            }
            Err(error) => {
                let error: &dyn std::error::Error = &error;
                tracing::error!(error, %provider, "unable to start sign-in");
                Self::Idle { failed: true }
            }
        }
    }

    /// The rendering of this state
    pub fn view(&self) -> LoginView {
        LoginView {
            failed: matches!(self, Self::Idle { failed: true }),
            providers: [OAuthProvider::Google, OAuthProvider::Github]
                .into_iter()
                .map(ProviderView::from)
                .collect(),
        }
    }
}

/// What the login page shows
#[derive(Clone, Debug, Serialize)]
pub struct LoginView {
    /// Whether to show the failure notice
    pub failed: bool,
    /// The providers offered
    pub providers: Vec<ProviderView>,
}

/// A sign-in button
#[derive(Clone, Debug, Serialize)]
pub struct ProviderView {
    /// The path segment identifying the provider
    pub name: &'static str,
    /// The button label
    pub label: &'static str,
}

impl From<OAuthProvider> for ProviderView {
    fn from(provider: OAuthProvider) -> Self {
        Self {
            name: provider.as_str(),
            label: provider.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::mock::{Call, MockAccount};

    fn origin() -> Url {
        Url::parse("https://demo.example.com").unwrap()
    }

    #[test]
    fn return_urls_are_relative_to_the_origin() {
        let urls = ReturnUrls::for_origin(&origin()).unwrap();

        assert_eq!(urls.success.as_str(), "https://demo.example.com/");
        assert_eq!(
            urls.failure.as_str(),
            "https://demo.example.com/login?error=1"
        );
    }

    #[test]
    fn return_urls_ignore_any_path_on_the_origin() {
        let origin = Url::parse("http://localhost:3000/login").unwrap();
        let urls = ReturnUrls::for_origin(&origin).unwrap();

        assert_eq!(urls.success.as_str(), "http://localhost:3000/");
    }

    mod when_the_query_is {
        use super::*;

        #[test]
        fn empty_the_page_is_idle() {
            let state = LoginState::from_query(&LoginQuery::default());
            assert_eq!(state, LoginState::Idle { failed: false });
            assert!(!state.view().failed);
        }

        #[test]
        fn an_empty_error_the_page_is_idle() {
            let query = LoginQuery {
                error: Some(String::new()),
            };
            assert_eq!(
                LoginState::from_query(&query),
                LoginState::Idle { failed: false }
            );
        }

        #[test]
        fn an_error_the_failure_notice_is_shown() {
            let query = LoginQuery {
                error: Some("1".to_owned()),
            };
            let state = LoginState::from_query(&query);
            assert_eq!(state, LoginState::Idle { failed: true });
            assert!(state.view().failed);
        }
    }

    mod when_signing_in {
        use super::*;

        #[tokio::test]
        async fn the_flow_is_started_once_with_the_return_urls() {
            let account = MockAccount::default();
            let urls = ReturnUrls::for_origin(&origin()).unwrap();

            let state = LoginState::default()
                .sign_in(&account, OAuthProvider::Google, &urls)
                .await;

            assert_eq!(
                state,
                LoginState::Redirecting {
                    location: Url::parse(
                        "https://auth.example.com/v1/account/sessions/oauth2/google"
                    )
                    .unwrap()
                }
            );
            assert_eq!(
                account.calls(),
                vec![Call::StartOAuthSession {
                    provider: OAuthProvider::Google,
                    success_url: "https://demo.example.com/".to_owned(),
                    failure_url: "https://demo.example.com/login?error=1".to_owned(),
                }]
            );
        }

        #[tokio::test]
        async fn a_failure_leaves_the_page_idle_with_a_notice() {
            let account = MockAccount {
                oauth_fails: true,
                ..MockAccount::default()
            };
            let urls = ReturnUrls::for_origin(&origin()).unwrap();

            let state = LoginState::default()
                .sign_in(&account, OAuthProvider::Github, &urls)
                .await;

            assert_eq!(state, LoginState::Idle { failed: true });
            assert_eq!(account.calls().len(), 1);
        }

        #[tokio::test]
        async fn a_redirecting_page_does_not_start_another_flow() {
            let account = MockAccount::default();
            let urls = ReturnUrls::for_origin(&origin()).unwrap();
            let location = Url::parse("https://auth.example.com/").unwrap();

            let state = LoginState::Redirecting {
                location: location.clone(),
            }
            .sign_in(&account, OAuthProvider::Google, &urls)
            .await;

            assert_eq!(state, LoginState::Redirecting { location });
            assert!(account.calls().is_empty());
        }
    }

    #[test]
    fn the_page_offers_google_and_github() {
        let names: Vec<_> = LoginState::default()
            .view()
            .providers
            .iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, ["google", "github"]);
    }
}
