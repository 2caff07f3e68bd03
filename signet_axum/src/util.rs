//! Utilities for generating redirect responses

use std::time::Duration;

use http::{header, HeaderValue, Response, StatusCode};
use url::Url;

/// Build a `303 See Other` response handing the browser off to `location`
///
/// The prepared response will have the form:
///
/// ```http
/// HTTP/1.1 303 See Other
/// location: {location}
/// ```
pub fn see_other<Body: Default>(location: &Url) -> Response<Body> {
    let mut resp = Response::new(Body::default());
    *resp.status_mut() = StatusCode::SEE_OTHER;
    resp.headers_mut().insert(
        header::LOCATION,
        HeaderValue::try_from(location.as_str())
            .expect("a serialized URL is always a valid header value"),
    );
    resp
}

/// Build a `200 OK` response that sends the browser to `path` after `delay`
///
/// The delay is expressed in whole seconds and the path is escaped to keep it
/// header-friendly.
///
/// ```http
/// HTTP/1.1 200 OK
/// refresh: {delay}; url={path}
/// ```
pub fn delayed_redirect<Body>(body: Body, delay: Duration, path: &str) -> Response<Body> {
    let mut resp = Response::new(body);
    resp.headers_mut()
        .insert(header::REFRESH, refresh(delay, path));
    resp
}

fn refresh(delay: Duration, path: &str) -> HeaderValue {
    HeaderValue::try_from(format!(
        "{}; url={}",
        delay.as_secs(),
        path.escape_default()
    ))
    .expect("escaped path is a valid header value")
}
