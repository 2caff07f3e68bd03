//! Configuration of the connection to the authentication service

use std::fmt;

use url::Url;

use crate::{ConfigurationError, ProjectId};

/// The variable holding the service endpoint URL
pub const SERVICE_ENDPOINT_VAR: &str = "SERVICE_ENDPOINT";

/// The variable holding the project identifier
pub const PROJECT_ID_VAR: &str = "PROJECT_ID";

/// A source of named configuration values
pub trait ConfigSource: Send + Sync {
    /// Looks up the value of the named variable
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads configuration from the process environment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Environment;

impl ConfigSource for Environment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> ConfigSource for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// The validated configuration of a connection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    /// The base URL of the service API, always ending in `/`
    pub endpoint: Url,
    /// The project to act on behalf of
    pub project: ProjectId,
}

impl Configuration {
    /// Reads and validates the configuration from `source`
    ///
    /// The endpoint is checked before the project identifier. Empty values are
    /// treated as missing.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigurationError> {
        let endpoint = required(source, SERVICE_ENDPOINT_VAR)?;
        let project = required(source, PROJECT_ID_VAR)?;

        let mut endpoint =
            Url::parse(&endpoint).map_err(|source| ConfigurationError::InvalidEndpoint {
                value: endpoint.clone(),
                source,
            })?;

        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        Ok(Self {
            endpoint,
            project: ProjectId::new(project),
        })
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (project {})", self.endpoint, self.project)
    }
}

fn required(source: &dyn ConfigSource, variable: &'static str) -> Result<String, ConfigurationError> {
    match source.var(variable) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigurationError::Missing { variable }),
    }
}
