//! Account and session operations against the authentication service

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::HeaderValue, Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    dto::{ServiceError, Session, User},
    AccountError, Connection, SessionSecret, SessionSecretRef,
};

const PROJECT_HEADER: &str = "x-appwrite-project";
const SESSION_HEADER: &str = "x-appwrite-session";

/// An OAuth provider supported by the authentication service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    /// Google
    Google,
    /// GitHub
    Github,
    /// Microsoft
    Microsoft,
    /// Discord
    Discord,
    /// Apple
    Apple,
}

impl OAuthProvider {
    /// All supported providers
    pub const ALL: [Self; 5] = [
        Self::Google,
        Self::Github,
        Self::Microsoft,
        Self::Discord,
        Self::Apple,
    ];

    /// The name of the provider as understood by the service
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Microsoft => "microsoft",
            Self::Discord => "discord",
            Self::Apple => "apple",
        }
    }

    /// A human-readable label for the provider
    pub const fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
            Self::Microsoft => "Microsoft",
            Self::Discord => "Discord",
            Self::Apple => "Apple",
        }
    }

    /// Looks up a provider by its service name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instruction to hand browser navigation off to an external location
///
/// Nothing is learned locally about the outcome. The browser later returns to
/// one of the continuation URLs given when the redirect was created.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Redirect {
    /// Where to send the browser
    pub location: Url,
}

/// Operations on the account of the active session
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Gets the user of the active session
    ///
    /// Fails with [`AccountError::NotAuthenticated`] when there is no active session.
    async fn get_current_user(&self) -> Result<User, AccountError>;

    /// Gets details of the active session
    ///
    /// Fails with [`AccountError::NoSessionInfo`] when the details are unavailable.
    async fn get_current_session(&self) -> Result<Session, AccountError>;

    /// Starts a redirect-based OAuth flow with `provider`
    ///
    /// The browser is expected to follow the returned redirect and will come
    /// back to `success_url` or `failure_url` on a later request.
    async fn start_oauth_session(
        &self,
        provider: OAuthProvider,
        success_url: &Url,
        failure_url: &Url,
    ) -> Result<Redirect, AccountError>;

    /// Ends the active session
    async fn end_session(&self) -> Result<(), AccountError>;
}

/// A handle to the account surface of the authentication service
///
/// Obtain one from [`ClientFactory::account`][crate::ClientFactory::account],
/// then scope it to a caller with [`for_session`][Self::for_session].
#[derive(Debug, Clone)]
pub struct Account {
    connection: Connection,
}

impl Account {
    pub(crate) fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// The connection this account handle is bound to
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// The name of the cookie in which the service stores the session secret
    pub fn session_cookie_name(&self) -> String {
        format!("a_session_{}", self.connection.project())
    }

    /// Scopes the account operations to the session identified by `secret`
    ///
    /// A `None` secret represents a caller with no session.
    pub fn for_session(&self, secret: Option<SessionSecret>) -> SessionAccount<'_> {
        SessionAccount {
            account: self,
            secret,
        }
    }

    fn url(&self, path: &str) -> Result<Url, AccountError> {
        Ok(self.connection.endpoint().join(path)?)
    }

    #[tracing::instrument(
        err,
        skip_all,
        fields(
            http.method = %method,
            http.url = %url,
            service.project = %self.connection.project(),
        ),
    )]
    async fn send(
        &self,
        method: Method,
        url: Url,
        secret: &SessionSecretRef,
    ) -> Result<Option<Bytes>, AccountError> {
        tracing::trace!("sending request to service");

        let mut session =
            HeaderValue::from_str(secret.as_str()).map_err(|_| AccountError::NotAuthenticated)?;
        session.set_sensitive(true);

        let resp = self
            .connection
            .client()
            .request(method, url)
            .header(PROJECT_HEADER, self.connection.project().as_str())
            .header(SESSION_HEADER, session)
            .send()
            .await
            .map_err(AccountError::RequestSend)?;

        let status = resp.status();
        tracing::debug!(
            response.status = status.as_u16(),
            "received response from service"
        );

        if let Err(error) = resp.error_for_status_ref() {
            let body = resp.text().await.map_err(AccountError::BodyRead)?;
            return Err(service_error(status, &error, body));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = resp.bytes().await.map_err(AccountError::BodyRead)?;
        Ok(Some(body))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        secret: &SessionSecretRef,
    ) -> Result<T, AccountError> {
        let url = self.url(path)?;
        let body = self.send(Method::GET, url, secret).await?.unwrap_or_default();
        Ok(serde_json::from_slice(&body)?)
    }
}

fn service_error(status: StatusCode, error: &reqwest::Error, body: String) -> AccountError {
    let (kind, message) = match serde_json::from_str::<ServiceError>(&body) {
        Ok(parsed) => (parsed.kind, parsed.message),
        Err(_) => (None, body),
    };

    let err: &dyn std::error::Error = error;
    tracing::debug!(
        error = err,
        service.error_type = kind.as_deref().unwrap_or(""),
        "service rejected request"
    );

    AccountError::Service {
        status: status.as_u16(),
        kind,
        message,
    }
}

/// The account operations scoped to a single caller's session
#[derive(Debug, Clone)]
pub struct SessionAccount<'a> {
    account: &'a Account,
    secret: Option<SessionSecret>,
}

impl SessionAccount<'_> {
    /// The session secret presented by the caller
    pub fn secret(&self) -> Option<&SessionSecretRef> {
        self.secret.as_deref()
    }
}

fn is_status(error: &AccountError, statuses: &[StatusCode]) -> bool {
    matches!(error, AccountError::Service { status, .. } if statuses.iter().any(|s| s.as_u16() == *status))
}

#[async_trait]
impl AccountApi for SessionAccount<'_> {
    async fn get_current_user(&self) -> Result<User, AccountError> {
        let Some(secret) = self.secret() else {
            tracing::debug!("no session presented; caller is signed out");
            return Err(AccountError::NotAuthenticated);
        };

        self.account
            .fetch("account", secret)
            .await
            .map_err(|error| {
                if is_status(&error, &[StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN]) {
                    AccountError::NotAuthenticated
                } else {
                    error
                }
            })
    }

    async fn get_current_session(&self) -> Result<Session, AccountError> {
        let Some(secret) = self.secret() else {
            return Err(AccountError::NoSessionInfo);
        };

        self.account
            .fetch("account/sessions/current", secret)
            .await
            .map_err(|error| {
                if is_status(
                    &error,
                    &[
                        StatusCode::UNAUTHORIZED,
                        StatusCode::FORBIDDEN,
                        StatusCode::NOT_FOUND,
                    ],
                ) {
                    AccountError::NoSessionInfo
                } else {
                    error
                }
            })
    }

    #[tracing::instrument(skip(self, success_url, failure_url), fields(%success_url, %failure_url))]
    async fn start_oauth_session(
        &self,
        provider: OAuthProvider,
        success_url: &Url,
        failure_url: &Url,
    ) -> Result<Redirect, AccountError> {
        let mut location = self
            .account
            .url(&format!("account/sessions/oauth2/{}", provider.as_str()))?;

        location
            .query_pairs_mut()
            .append_pair("project", self.account.connection.project().as_str())
            .append_pair("success", success_url.as_str())
            .append_pair("failure", failure_url.as_str());

        tracing::info!(%provider, "handing off to OAuth provider");

        Ok(Redirect { location })
    }

    async fn end_session(&self) -> Result<(), AccountError> {
        let Some(secret) = self.secret() else {
            tracing::debug!("no session presented; nothing to end");
            return Ok(());
        };

        let url = self.account.url("account/sessions/current")?;
        self.account.send(Method::DELETE, url, secret).await?;

        tracing::info!("session ended");
        Ok(())
    }
}
