// API client module: a small blocking HTTP client that talks to the
// Benchling v1 REST API. Requests go through the `Transport` trait so the
// resource accessors can run against a canned transport in tests.

use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::config::Config;
use crate::error::{BenchlingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Status codes each verb treats as success.
    pub fn accepts(self, status: u16) -> bool {
        match self {
            Method::Get | Method::Delete => status == 200,
            Method::Post => matches!(status, 200 | 201 | 202),
            Method::Patch => matches!(status, 200 | 201),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        write!(f, "{}", s)
    }
}

/// A fully resolved request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    /// Share-link pages are public and are fetched without the API key.
    pub authenticated: bool,
}

/// Status code and body text, before any status check or JSON parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }
}

/// Sends one request and returns the raw response. Implementations only
/// fail on transport problems; status handling is left to the client.
pub trait Transport {
    fn execute(&self, request: &Request) -> Result<RawResponse>;
}

/// `reqwest` blocking transport. The API key is sent as the basic-auth
/// user name with an empty password.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(HttpTransport {
            client,
            api_key: config.api_key.clone(),
        })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> Result<RawResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Patch => self.client.patch(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        if request.authenticated {
            builder = builder.basic_auth(&self.api_key, Some(""));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let res = builder.send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        Ok(RawResponse { status, body })
    }
}

/// Entry point of the library: a transport plus the API root it talks to.
#[derive(Debug, Clone)]
pub struct Benchling<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
}

impl Benchling<HttpTransport> {
    /// Connect with an API key against the public Benchling API.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::from_config(&Config::new(api_key))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(transport, config.base_url.clone()))
    }

    /// Build a client from the environment or `~/.benchling/config.json`.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&Config::resolve(None, None)?)
    }
}

impl<T: Transport> Benchling<T> {
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        Benchling {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let value = self.call(Method::Get, path, None)?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let value = self.call(Method::Post, path, Some(serde_json::to_value(body)?))?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) fn patch<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let value = self.call(Method::Patch, path, Some(serde_json::to_value(body)?))?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<Value> {
        self.call(Method::Delete, path, None)
    }

    /// Issue an authenticated API call and parse the JSON body. An empty
    /// body parses as `null`.
    pub fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let request = Request {
            method,
            url: self.endpoint(path),
            body,
            authenticated: true,
        };
        debug!("{} {}", request.method, request.url);
        let res = self.transport.execute(&request)?;
        check_status(method, &res)?;
        if res.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&res.body)?)
    }

    /// Fetch a public page (share links) as text, without credentials.
    pub fn fetch_page(&self, url: &str) -> Result<String> {
        let request = Request {
            method: Method::Get,
            url: url.to_string(),
            body: None,
            authenticated: false,
        };
        debug!("GET {} (public)", url);
        let res = self.transport.execute(&request)?;
        check_status(Method::Get, &res)?;
        Ok(res.body)
    }
}

fn check_status(method: Method, res: &RawResponse) -> Result<()> {
    if method.accepts(res.status) {
        Ok(())
    } else {
        Err(BenchlingError::status(res.status, res.body.clone()))
    }
}

/// Reject empty identifiers before building a URL from them.
pub(crate) fn require_id<'a>(what: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        Err(BenchlingError::InvalidInput(format!("{} id is required", what)))
    } else {
        Ok(id)
    }
}
