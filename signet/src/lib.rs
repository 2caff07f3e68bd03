//! Client and account handles for a hosted authentication service
//!
//! The hard parts of OAuth (the authorization-code exchange, token validation
//! and session storage) are performed by an external backend-as-a-service. This
//! crate provides the thin, lazily configured surface used to talk to it:
//!
//! * a [`ClientFactory`] which owns the process-scoped [`Connection`] and
//!   [`Account`] handles, constructing each at most once on first use, and
//! * the [`AccountApi`] operations used by a front-end to query the current
//!   user and session, start an OAuth redirect and end a session.
//!
//! Configuration is read from the environment the first time a handle is
//! requested, not at start-up. A missing value surfaces as a
//! [`ConfigurationError`] naming the variable.
//!
//! ```
//! use signet::{AccountApi, ClientFactory, SessionSecret};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let factory = ClientFactory::with_source(|name: &str| match name {
//!     "SERVICE_ENDPOINT" => Some("https://auth.example.com/v1".to_owned()),
//!     "PROJECT_ID" => Some("demo".to_owned()),
//!     _ => None,
//! });
//!
//! let account = factory.account()?;
//! let scoped = account.for_session(Some(SessionSecret::from_static("secret")));
//! # async move {
//! let user = scoped.get_current_user().await?;
//! tracing::info!(user.id = %user.id, "signed in");
//! # Ok::<_, signet::AccountError>(())
//! # };
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! * `test-util`: Provides [`testing::CannedResponses`], a terminating reqwest
//!   middleware which answers requests from a fixed table. Useful for exercising
//!   the account operations without a live service.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    trivial_numeric_casts,
    unsafe_code,
    unused_must_use
)]

mod account;
mod braids;
mod client;
mod config;
pub mod dto;
mod error;
#[cfg(any(test, feature = "test-util"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
pub mod testing;

pub use account::{Account, AccountApi, OAuthProvider, Redirect, SessionAccount};
pub use braids::*;
pub use client::{ClientFactory, Connection};
pub use config::{ConfigSource, Configuration, Environment, PROJECT_ID_VAR, SERVICE_ENDPOINT_VAR};
pub use error::{AccountError, ConfigurationError, FailureKind};
