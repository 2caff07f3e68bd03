use thiserror::Error;

/// An error indicating that the connection to the service cannot be configured
///
/// This error is fatal. It will recur until the process is given a correct
/// configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A required variable is absent or empty
    #[error("missing {variable} environment variable")]
    Missing {
        /// The name of the absent variable
        variable: &'static str,
    },
    /// The service endpoint is not an absolute URL
    #[error("service endpoint `{value}` is not a valid URL")]
    InvalidEndpoint {
        /// The rejected value
        value: String,
        /// The underlying parse error
        source: url::ParseError,
    },
    /// The HTTP client could not be constructed
    #[error("unable to construct HTTP client")]
    HttpClient(#[from] reqwest::Error),
}

impl ConfigurationError {
    /// The name of the missing variable, if that is the cause of this error
    pub fn missing_variable(&self) -> Option<&'static str> {
        match self {
            Self::Missing { variable } => Some(variable),
            _ => None,
        }
    }
}

/// An error returned by an account operation
#[derive(Debug, Error)]
pub enum AccountError {
    /// There is no active session for the caller
    #[error("no active session")]
    NotAuthenticated,
    /// Details of the active session are not available
    #[error("session details unavailable")]
    NoSessionInfo,
    /// The service rejected the request
    #[error("service rejected request with status {status}: {message}")]
    Service {
        /// The HTTP status returned by the service
        status: u16,
        /// The service's error type, if provided
        kind: Option<String>,
        /// The service's error message, or the raw body
        message: String,
    },
    /// Unable to send a request to the service
    #[error("error sending request to service")]
    RequestSend(#[source] reqwest_middleware::Error),
    /// Unable to read the response
    #[error("error reading response body")]
    BodyRead(#[source] reqwest::Error),
    /// Unable to deserialize the response body
    #[error("error deserializing response body")]
    Body(#[from] serde_json::Error),
    /// Unable to construct a request URL
    #[error("unable to construct request URL")]
    Url(#[from] url::ParseError),
}

/// A coarse classification of account failures
///
/// Page controllers branch on this rather than on individual errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The caller is signed out
    NotAuthenticated,
    /// The caller is signed in, but session details are unavailable
    NoSessionInfo,
    /// Any other failure to complete the operation
    OperationFailure,
}

impl AccountError {
    /// Classifies the error
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotAuthenticated => FailureKind::NotAuthenticated,
            Self::NoSessionInfo => FailureKind::NoSessionInfo,
            _ => FailureKind::OperationFailure,
        }
    }
}
