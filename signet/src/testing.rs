//! Test utilities for exercising account operations without a live service

use std::sync::{Arc, Mutex, MutexGuard};

use reqwest::{header::HeaderMap, Method, Request, Response};
use reqwest_middleware::{Middleware, Next, Result};
use url::Url;

#[derive(Debug, Clone)]
struct Canned {
    method: Method,
    path: String,
    status: u16,
    body: String,
}

/// A request observed by [`CannedResponses`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The request method
    pub method: Method,
    /// The request URL
    pub url: Url,
    /// The request headers
    pub headers: HeaderMap,
}

#[derive(Debug, Default)]
struct State {
    canned: Vec<Canned>,
    requests: Vec<RecordedRequest>,
}

/// A terminating middleware which answers requests from a fixed table
///
/// Requests are matched on method and exact URL path. Unmatched requests
/// receive a `404` with a service-style error body. Every request is recorded.
/// Clones share the same table and record.
#[derive(Debug, Clone, Default)]
pub struct CannedResponses {
    state: Arc<Mutex<State>>,
}

impl CannedResponses {
    /// Constructs an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a canned response
    pub fn respond(self, method: Method, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.lock().canned.push(Canned {
            method,
            path: path.to_owned(),
            status,
            body: body.into(),
        });
        self
    }

    /// The requests observed so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("canned response table poisoned")
    }
}

#[async_trait::async_trait]
impl Middleware for CannedResponses {
    async fn handle(
        &self,
        req: Request,
        _: &mut http::Extensions,
        _: Next<'_>,
    ) -> Result<Response> {
        let (status, body) = {
            let mut state = self.lock();
            state.requests.push(RecordedRequest {
                method: req.method().clone(),
                url: req.url().clone(),
                headers: req.headers().clone(),
            });

            state
                .canned
                .iter()
                .find(|c| c.method == req.method() && c.path == req.url().path())
                .map(|c| (c.status, c.body.clone()))
                .unwrap_or_else(|| {
                    (
                        404,
                        r#"{"message":"Route not found.","code":404,"type":"general_route_not_found"}"#
                            .to_owned(),
                    )
                })
        };

        let resp = http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("canned response is well-formed");

        Ok(resp.into())
    }
}
