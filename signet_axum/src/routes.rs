use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use http::{header, HeaderValue, StatusCode};
use minijinja::context;
use signet::{ClientFactory, OAuthProvider};
use tower_http::trace::TraceLayer;
use url::Url;

use crate::{
    error::PageError,
    extract::{RequestOrigin, SessionCookie},
    pages::{HomeState, LoginQuery, LoginState, LogoutDelays, LogoutState, NotFound, ReturnUrls},
    render::Templates,
    util,
};

const STYLESHEET: &str = include_str!("../static/site.css");

/// Site-level settings that do not concern the authentication service
#[derive(Clone, Debug, Default)]
pub struct SiteConfig {
    /// The origin the site is served from, overriding the `Host` header
    pub public_origin: Option<Url>,
    /// How long the logout page waits before sending the browser home
    pub logout_delays: LogoutDelays,
}

/// Shared state for every request
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    factory: ClientFactory,
    templates: Templates,
    site: SiteConfig,
}

impl AppState {
    /// Constructs the shared state
    ///
    /// The factory is not touched here; the service configuration is read on
    /// the first request that needs it.
    pub fn new(factory: ClientFactory, site: SiteConfig) -> Result<Self, minijinja::Error> {
        Ok(Self {
            inner: Arc::new(Inner {
                factory,
                templates: Templates::new()?,
                site,
            }),
        })
    }

    /// The factory providing the account handle
    pub fn factory(&self) -> &ClientFactory {
        &self.inner.factory
    }

    /// The page templates
    pub fn templates(&self) -> &Templates {
        &self.inner.templates
    }

    /// The site settings
    pub fn site(&self) -> &SiteConfig {
        &self.inner.site
    }
}

/// Builds the site's router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login))
        .route("/login/:provider", post(start_login))
        .route("/logout", get(logout))
        .route("/static/site.css", get(stylesheet))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home(State(state): State<AppState>, jar: CookieJar) -> Result<Html<String>, PageError> {
    let account = state.factory().account()?;
    let account = account.for_session(jar.session_secret(account));

    let page = HomeState::default().load(&account).await;

    let html = state
        .templates()
        .render("home.html", context! { page => page.view() })?;
    Ok(Html(html))
}

async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Html<String>, PageError> {
    let page = LoginState::from_query(&query);
    render_login(&state, &page)
}

async fn start_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    origin: RequestOrigin,
) -> Result<Response, PageError> {
    let Some(provider) = OAuthProvider::from_name(&provider) else {
        tracing::debug!(%provider, "unknown provider");
        return render_not_found(&state);
    };

    let urls = ReturnUrls::for_origin(&origin.0)?;
    let account = state.factory().account()?.for_session(None);

    match LoginState::default()
        .sign_in(&account, provider, &urls)
        .await
    {
        LoginState::Redirecting { location } => Ok(util::see_other(&location)),
        page => Ok(render_login(&state, &page)?.into_response()),
    }
}

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), PageError> {
    let account = state.factory().account()?;
    let page = LogoutState::default()
        .end(&account.for_session(jar.session_secret(account)))
        .await;

    let delays = &state.site().logout_delays;
    let html = state
        .templates()
        .render("logout.html", context! { page => page.view(delays) })?;

    let mut resp = match page.redirect_delay(delays) {
        Some(delay) => util::delayed_redirect(Body::from(html), delay, "/"),
        None => Response::new(Body::from(html)),
    };

    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    Ok((jar.expire_session(account), resp))
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

async fn not_found(State(state): State<AppState>) -> Result<Response, PageError> {
    render_not_found(&state)
}

fn render_login(state: &AppState, page: &LoginState) -> Result<Html<String>, PageError> {
    let html = state
        .templates()
        .render("login.html", context! { page => page.view() })?;
    Ok(Html(html))
}

fn render_not_found(state: &AppState) -> Result<Response, PageError> {
    let html = state
        .templates()
        .render("not_found.html", context! { page => NotFound::new() })?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}
