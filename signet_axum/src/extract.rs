//! Request extractors

use std::fmt;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use http::{header, StatusCode};
use signet::{Account, SessionSecret};
use url::Url;

use crate::AppState;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Access to the authentication service's session cookie
///
/// The cookie is named after the project (see
/// [`Account::session_cookie_name`]).
pub trait SessionCookie: Sized {
    /// The session secret the browser holds for `account`, if any
    fn session_secret(&self, account: &Account) -> Option<SessionSecret>;

    /// Instructs the browser to discard its session cookie for `account`
    ///
    /// Nothing is emitted if the browser did not present the cookie.
    fn expire_session(self, account: &Account) -> Self;
}

impl SessionCookie for CookieJar {
    fn session_secret(&self, account: &Account) -> Option<SessionSecret> {
        self.get(&account.session_cookie_name())
            .map(Cookie::value)
            .filter(|v| !v.is_empty())
            .map(|v| SessionSecret::new(v.to_owned()))
    }

    fn expire_session(self, account: &Account) -> Self {
        self.remove(Cookie::build((account.session_cookie_name(), "")).path("/"))
    }
}

/// The origin the browser used to reach the site
///
/// Sign-in return URLs are built from this.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOrigin(pub Url);

impl RequestOrigin {
    /// Determines the origin of a request
    ///
    /// A configured `public_origin` takes precedence. Otherwise the `Host`
    /// header is used, with the scheme taken from `X-Forwarded-Proto` and
    /// defaulting to `http`.
    pub fn resolve(parts: &Parts, public_origin: Option<&Url>) -> Result<Self, OriginRejection> {
        if let Some(origin) = public_origin {
            return Ok(Self(origin.clone()));
        }

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| parts.uri.authority().map(|a| a.as_str()))
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(OriginRejection::MissingHost)?;

        let scheme = parts
            .headers
            .get(FORWARDED_PROTO)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.split(',').next())
            .map(str::trim)
            .filter(|s| matches!(*s, "http" | "https"))
            .unwrap_or("http");

        Url::parse(&format!("{scheme}://{host}/"))
            .map(Self)
            .map_err(OriginRejection::InvalidHost)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestOrigin
where
    AppState: FromRef<S>,
    S: Sync,
{
    type Rejection = OriginRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Self::resolve(parts, state.site().public_origin.as_ref())
    }
}

/// The origin of a request could not be determined
#[derive(Debug)]
pub enum OriginRejection {
    /// The request named no host
    MissingHost,
    /// The host named by the request is not valid
    InvalidHost(url::ParseError),
}

impl fmt::Display for OriginRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHost => f.write_str("request has no host"),
            Self::InvalidHost(_) => f.write_str("request host is invalid"),
        }
    }
}

impl std::error::Error for OriginRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingHost => None,
            Self::InvalidHost(err) => Some(err),
        }
    }
}

impl IntoResponse for OriginRejection {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "rejecting request");
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut req = Request::builder().uri("/login/google");
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        req.body(()).unwrap().into_parts().0
    }

    mod session_cookie {
        use signet::{ClientFactory, PROJECT_ID_VAR, SERVICE_ENDPOINT_VAR};

        use super::*;

        fn factory() -> ClientFactory {
            ClientFactory::with_source(|name: &str| match name {
                SERVICE_ENDPOINT_VAR => Some("https://auth.example.com/v1".to_owned()),
                PROJECT_ID_VAR => Some("demo".to_owned()),
                _ => None,
            })
        }

        fn removals(jar: CookieJar) -> Vec<String> {
            (jar, ())
                .into_response()
                .headers()
                .get_all(header::SET_COOKIE)
                .iter()
                .map(|v| v.to_str().unwrap().to_owned())
                .collect()
        }

        #[tokio::test]
        async fn the_secret_is_found_across_headers() {
            let factory = factory();
            let account = factory.account().unwrap();
            let mut parts = parts(&[
                ("cookie", "theme=dark"),
                ("cookie", "lang=eo; a_session_demo=s3cr3t"),
            ]);

            let jar = CookieJar::from_request_parts(&mut parts, &()).await.unwrap();

            assert_eq!(
                jar.session_secret(account).as_deref().map(|s| s.as_str()),
                Some("s3cr3t")
            );
        }

        #[test]
        fn malformed_pairs_are_skipped() {
            let factory = factory();
            let account = factory.account().unwrap();

            let jar = CookieJar::from_headers(
                &parts(&[("cookie", "junk; a_session_demo=s3cr3t;;")]).headers,
            );

            assert!(jar.get("junk").is_none());
            assert!(jar.session_secret(account).is_some());
        }

        #[test]
        fn other_projects_sessions_are_ignored() {
            let factory = factory();
            let account = factory.account().unwrap();

            let jar = CookieJar::from_headers(&parts(&[("cookie", "a_session_other=s3cr3t")]).headers);

            assert!(jar.session_secret(account).is_none());
        }

        #[test]
        fn an_empty_secret_is_no_session() {
            let factory = factory();
            let account = factory.account().unwrap();

            let jar = CookieJar::from_headers(&parts(&[("cookie", "a_session_demo=")]).headers);

            assert!(jar.session_secret(account).is_none());
        }

        #[test]
        fn a_presented_session_is_expired() {
            let factory = factory();
            let account = factory.account().unwrap();
            let jar = CookieJar::from_headers(&parts(&[("cookie", "a_session_demo=s3cr3t")]).headers);

            let removals = removals(jar.expire_session(account));

            assert_eq!(removals.len(), 1);
            assert!(removals[0].starts_with("a_session_demo=;"));
            assert!(removals[0].contains("Path=/"));
            assert!(removals[0].contains("Max-Age=0"));
        }

        #[test]
        fn nothing_is_expired_without_a_session() {
            let factory = factory();
            let account = factory.account().unwrap();

            let removals = removals(CookieJar::new().expire_session(account));

            assert!(removals.is_empty());
        }
    }

    mod origin {
        use super::*;

        #[test]
        fn configured_origin_takes_precedence() {
            let configured = Url::parse("https://public.example.com/").unwrap();

            let origin =
                RequestOrigin::resolve(&parts(&[("host", "internal:3000")]), Some(&configured))
                    .unwrap();

            assert_eq!(origin, RequestOrigin(configured));
        }

        #[test]
        fn host_defaults_to_http() {
            let origin = RequestOrigin::resolve(&parts(&[("host", "localhost:3000")]), None).unwrap();

            assert_eq!(origin.0.as_str(), "http://localhost:3000/");
        }

        #[test]
        fn forwarded_proto_sets_the_scheme() {
            let origin = RequestOrigin::resolve(
                &parts(&[
                    ("host", "demo.example.com"),
                    ("x-forwarded-proto", "https, http"),
                ]),
                None,
            )
            .unwrap();

            assert_eq!(origin.0.as_str(), "https://demo.example.com/");
        }

        #[test]
        fn unrecognised_forwarded_proto_is_ignored() {
            let origin = RequestOrigin::resolve(
                &parts(&[("host", "demo.example.com"), ("x-forwarded-proto", "gopher")]),
                None,
            )
            .unwrap();

            assert_eq!(origin.0.scheme(), "http");
        }

        #[test]
        fn missing_host_is_rejected() {
            match RequestOrigin::resolve(&parts(&[]), None) {
                Err(OriginRejection::MissingHost) => {}
                other => panic!("expected missing host, got {other:?}"),
            }
        }

        #[test]
        fn invalid_host_is_rejected() {
            match RequestOrigin::resolve(&parts(&[("host", "bad host")]), None) {
                Err(OriginRejection::InvalidHost(_)) => {}
                other => panic!("expected invalid host, got {other:?}"),
            }
        }

        #[test]
        fn rejections_are_bad_requests() {
            let resp = OriginRejection::MissingHost.into_response();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }
}
