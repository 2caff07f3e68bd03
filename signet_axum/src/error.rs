use axum::response::{Html, IntoResponse, Response};
use http::StatusCode;
use minijinja::{context, AutoEscape, Environment, HtmlEscape};
use once_cell::sync::Lazy;
use signet::ConfigurationError;
use thiserror::Error;

const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

static ERROR_PAGES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env
});

/// A failure to produce a page
///
/// Account failures never surface here; pages turn those into states. What
/// remains is fatal for the request.
#[derive(Debug, Error)]
pub enum PageError {
    /// The connection to the authentication service is not configured
    #[error("authentication service is not configured")]
    Configuration(#[from] ConfigurationError),
    /// A template failed to render
    #[error("unable to render page")]
    Render(#[from] minijinja::Error),
    /// The continuation URLs for a sign-in could not be constructed
    #[error("unable to construct return URL")]
    ReturnUrl(#[from] url::ParseError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let error: &dyn std::error::Error = &self;
        let message = self.to_string();
        let cause = std::error::Error::source(&self)
            .map(ToString::to_string)
            .unwrap_or_default();
        tracing::error!(error, %cause, "unable to serve page");

        let body = match render_error_page(&message, &cause) {
            Ok(body) => body,
            Err(error) => {
                tracing::error!(%error, "unable to render error page");
                format!(
                    "<!DOCTYPE html>\n<h1>Something went wrong</h1><p>{}</p>\n",
                    HtmlEscape(&message)
                )
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

fn render_error_page(message: &str, cause: &str) -> Result<String, minijinja::Error> {
    ERROR_PAGES.render_str(ERROR_TEMPLATE, context! { message, cause })
}
