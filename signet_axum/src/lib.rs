//! An axum front-end demonstrating OAuth sign-in through a hosted
//! authentication service.
//!
//! The site has four pages:
//!
//! * `/` shows who is signed in, along with details of their session,
//! * `/login` offers a choice of OAuth providers and hands the browser off to
//!   the authentication service (`POST /login/{provider}`),
//! * `/logout` ends the session and sends the browser back home, and
//! * anything else renders a not-found page.
//!
//! Each page is driven by a small state machine in [`pages`]. The machines
//! only depend on [`signet::AccountApi`], so they can be exercised without a
//! live service.
//!
//! ```no_run
//! use signet::ClientFactory;
//! use signet_axum::{router, AppState, SiteConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(ClientFactory::from_env(), SiteConfig::default())?;
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, router(state)).await?;
//!
//!     Ok(())
//! }
//! ```

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

mod error;
pub mod extract;
pub mod pages;
mod render;
mod routes;
pub mod util;

pub use error::PageError;
pub use render::Templates;
pub use routes::{router, AppState, SiteConfig};
