use serde::Serialize;
use signet::{
    dto::{Session, User},
    AccountApi, FailureKind,
};
use time::{format_description::FormatItem, macros::format_description};

const DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DATE_TIME: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

/// The state of the home page
#[derive(Clone, Debug, Default, PartialEq)]
pub enum HomeState {
    /// The current user has not been fetched yet
    #[default]
    Loading,
    /// The caller is signed in
    Authenticated {
        /// The signed-in user
        user: User,
        /// Details of the session, if available
        session: Option<Session>,
    },
    /// The caller is signed out
    Unauthenticated,
}

impl HomeState {
    /// Fetches the current user and settles into a terminal state
    ///
    /// Only [`Loading`][Self::Loading] transitions; terminal states are
    /// returned unchanged.
    pub async fn load<A: AccountApi + ?Sized>(self, account: &A) -> Self {
        if !matches!(self, Self::Loading) {
            return self;
        }

        let user = match account.get_current_user().await {
            Ok(user) => user,
            Err(error) => {
                match error.kind() {
                    FailureKind::NotAuthenticated => {
                        tracing::debug!("caller is signed out")
                    }
                    kind => {
                        let error: &dyn std::error::Error = &error;
                        tracing::warn!(
                            error,
                            ?kind,
                            "unable to fetch current user; treating caller as signed out"
                        )
                    }
                }
                return Self::Unauthenticated;
            }
        };

        let session = match account.get_current_session().await {
            Ok(session) => Some(session),
            Err(error) => {
                tracing::debug!(kind = ?error.kind(), %error, "session details unavailable");
                None
            }
        };

        tracing::debug!(user.id = %user.id, has_session = session.is_some(), "caller is signed in");

        Self::Authenticated { user, session }
    }

    /// The rendering of this state
    pub fn view(&self) -> HomeView {
        match self {
            Self::Loading => HomeView {
                state: "loading",
                user: None,
                session: None,
            },
            Self::Authenticated { user, session } => HomeView {
                state: "authenticated",
                user: Some(UserView::from(user)),
                session: session.as_ref().map(|s| SessionView::new(s, user)),
            },
            Self::Unauthenticated => HomeView {
                state: "unauthenticated",
                user: None,
                session: None,
            },
        }
    }
}

/// What the home page shows
#[derive(Clone, Debug, Serialize)]
pub struct HomeView {
    /// `loading`, `authenticated` or `unauthenticated`
    pub state: &'static str,
    /// The signed-in user
    pub user: Option<UserView>,
    /// The session details
    pub session: Option<SessionView>,
}

/// What the home page shows about a user
#[derive(Clone, Debug, Serialize)]
pub struct UserView {
    /// The full user identifier
    pub id: String,
    /// The name, email or identifier, whichever is available first
    pub display_name: String,
    /// The email address
    pub email: Option<String>,
    /// The avatar initial
    pub initial: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            display_name: user.display_name().to_owned(),
            email: user.email.clone(),
            initial: user.initial(),
        }
    }
}

/// What the home page shows about a session
#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    /// The provider, capitalised
    pub provider: String,
    /// A shortened form of the user identifier
    pub user_id: String,
    /// When the session was created
    pub created: String,
    /// When the provider's access token expires, if known
    pub token_expiry: Option<String>,
}

impl SessionView {
    fn new(session: &Session, user: &User) -> Self {
        let created = session
            .created()
            .and_then(|at| at.format(DATE).ok())
            .unwrap_or_else(|| session.created_at.clone());

        let token_expiry = session
            .provider_access_token_expires()
            .and_then(|at| at.to_offset(time::UtcOffset::UTC).format(DATE_TIME).ok());

        Self {
            provider: capitalize(&session.provider),
            user_id: format!("{}...", user.id.as_str().chars().take(16).collect::<String>()),
            created,
            token_expiry,
        }
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
