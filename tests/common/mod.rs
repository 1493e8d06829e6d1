// Canned transport for integration tests: responses are registered per
// (method, url) and every request is recorded for later inspection.
#![allow(dead_code)]

use benchling_cli::{Benchling, Method, RawResponse, Request, Result, Transport};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

pub const BASE_URL: &str = "https://api.benchling.com/v1/";

pub fn url(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}

#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<RawResponse>>>,
    requests: RefCell<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response for an API path. Several responses on the same
    /// route are served in order; the last one repeats.
    pub fn on(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.on_url(method, &url(path), status, &body.to_string())
    }

    pub fn on_url(self, method: Method, url: &str, status: u16, body: &str) -> Self {
        self.routes
            .borrow_mut()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(RawResponse::new(status, body));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &Request) -> Result<RawResponse> {
        self.requests.borrow_mut().push(request.clone());
        let mut routes = self.routes.borrow_mut();
        let response = match routes.get_mut(&(request.method, request.url.clone())) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| RawResponse::new(404, r#"{"error": "no route"}"#)))
    }
}

pub fn client(mock: MockTransport) -> Benchling<MockTransport> {
    Benchling::with_transport(mock, BASE_URL)
}
