use std::{fmt, sync::Arc};

use once_cell::sync::OnceCell;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware};
use url::Url;

use crate::{Account, ConfigSource, Configuration, ConfigurationError, Environment, ProjectIdRef};

#[derive(Debug)]
struct Inner {
    config: Configuration,
    client: ClientWithMiddleware,
}

/// A configured link to the authentication service
///
/// Cloning a connection is cheap; clones share the same underlying client.
#[derive(Debug, Clone)]
#[must_use]
pub struct Connection {
    inner: Arc<Inner>,
}

impl Connection {
    fn new(
        config: Configuration,
        middleware: &[Arc<dyn Middleware>],
    ) -> Result<Self, ConfigurationError> {
        let client = Client::builder()
            .user_agent(concat!("signet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let client = middleware
            .iter()
            .fold(ClientBuilder::new(client), |builder, m| {
                builder.with_arc(Arc::clone(m))
            })
            .build();

        tracing::info!(
            service.endpoint = %config.endpoint,
            service.project = %config.project,
            "service connection configured"
        );

        Ok(Self {
            inner: Arc::new(Inner { config, client }),
        })
    }

    /// The base URL of the service API
    pub fn endpoint(&self) -> &Url {
        &self.inner.config.endpoint
    }

    /// The project this connection acts on behalf of
    pub fn project(&self) -> &ProjectIdRef {
        &self.inner.config.project
    }

    pub(crate) fn client(&self) -> &ClientWithMiddleware {
        &self.inner.client
    }

    /// Whether two connections share the same underlying link
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

/// Owns the process-scoped connection and account handles
///
/// Each handle is constructed at most once, on first request, and reused for
/// the life of the factory. Configuration is only read when the connection is
/// first needed; if that fails, the slot stays empty and the error is returned
/// to the caller.
pub struct ClientFactory {
    source: Box<dyn ConfigSource>,
    middleware: Vec<Arc<dyn Middleware>>,
    connection: OnceCell<Connection>,
    account: OnceCell<Account>,
}

impl ClientFactory {
    /// Constructs a factory which reads configuration from the process environment
    pub fn from_env() -> Self {
        Self::with_source(Environment)
    }

    /// Constructs a factory which reads configuration from `source`
    pub fn with_source(source: impl ConfigSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            middleware: Vec::new(),
            connection: OnceCell::new(),
            account: OnceCell::new(),
        }
    }

    /// Adds a middleware to the stack of the HTTP client used by the connection
    ///
    /// Has no effect on a connection that has already been constructed.
    pub fn with_middleware(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Gets the connection, constructing it on first use
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is missing or invalid.
    pub fn connection(&self) -> Result<&Connection, ConfigurationError> {
        self.connection.get_or_try_init(|| {
            tracing::debug!("constructing service connection");
            let config = Configuration::from_source(&*self.source).map_err(|error| {
                tracing::error!(%error, "service connection is not configured");
                error
            })?;
            Connection::new(config, &self.middleware)
        })
    }

    /// Gets the account handle, constructing it on first use
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be constructed.
    pub fn account(&self) -> Result<&Account, ConfigurationError> {
        self.account.get_or_try_init(|| {
            let connection = self.connection()?;
            tracing::debug!("constructing account handle");
            Ok(Account::new(connection.clone()))
        })
    }
}

impl fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ClientFactory")
            .field("middleware", &self.middleware.len())
            .field("connection", &self.connection.get())
            .field("account", &self.account.get())
            .finish()
    }
}
