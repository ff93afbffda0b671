//! HTTP access to the votes API and the Legislative Observatory.
//!
//! Everything upstream of the renderer goes through the [`Fetcher`] trait so
//! the pipeline can run against [`HttpFetcher`] in production and against
//! canned responses from [`MemoryFetcher`] in tests.

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Blocking GET access to JSON, HTML and binary resources
pub trait Fetcher {
    /// GET `url` with query parameters and decode the body as JSON
    fn query(&self, url: &str, params: &[(&str, String)]) -> Result<Value>;

    /// GET `url` and return the body as text
    fn fetch_text(&self, url: &str) -> Result<String>;

    /// GET `url` and return the raw body
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Query a JSON endpoint and decode it into a typed record.
/// Shape errors surface as [`Error::SchemaMismatch`] naming the request.
pub fn query_as<T, F>(fetcher: &F, url: &str, params: &[(&str, String)]) -> Result<T>
where
    T: DeserializeOwned,
    F: Fetcher + ?Sized,
{
    let value = fetcher.query(url, params)?;
    serde_json::from_value(value).map_err(|source| Error::SchemaMismatch {
        url: request_key(url, params),
        source,
    })
}

/// Canonical `url?k=v&k=v` form of a request, used in errors and as fixture key
pub fn request_key(url: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}?{}", url, query.join("&"))
}

/// Production fetcher backed by `reqwest::blocking`
pub struct HttpFetcher {
    client: Client,
    retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            retries: config.retries,
        })
    }

    /// Send a request, retrying transport failures and 5xx responses up to
    /// `retries` extra times. Non-success statuses become [`Error::Status`].
    fn send(&self, url: &str, build: impl Fn() -> RequestBuilder) -> Result<Response> {
        let mut attempt = 0;
        loop {
            match build().send() {
                Ok(resp) if resp.status().is_server_error() && attempt < self.retries => {
                    warn!(url, status = resp.status().as_u16(), attempt, "server error, retrying");
                }
                Ok(resp) if !resp.status().is_success() => {
                    return Err(Error::Status {
                        url: url.to_string(),
                        status: resp.status().as_u16(),
                    });
                }
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < self.retries && !e.is_builder() => {
                    warn!(url, error = %e, attempt, "request failed, retrying");
                }
                Err(e) => return Err(e.into()),
            }
            attempt += 1;
            std::thread::sleep(RETRY_DELAY * attempt);
        }
    }
}

impl Fetcher for HttpFetcher {
    fn query(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        let key = request_key(url, params);
        debug!(url = %key, "GET json");
        let resp = self.send(&key, || {
            self.client
                .get(url)
                .query(params)
                .header(ACCEPT, "application/json")
        })?;
        let body = resp.text()?;
        serde_json::from_str(&body).map_err(|source| Error::InvalidJson { url: key, source })
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(url, "GET text");
        let resp = self.send(url, || self.client.get(url))?;
        Ok(resp.text()?)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET bytes");
        let resp = self.send(url, || self.client.get(url))?;
        Ok(resp.bytes()?.to_vec())
    }
}

#[derive(Debug, Clone)]
enum Fixture {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

/// In-memory fetcher serving canned responses keyed by [`request_key`].
/// Every request is recorded, hit or miss.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Fixture>,
    requests: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, key: impl Into<String>, value: Value) -> Self {
        self.responses.insert(key.into(), Fixture::Json(value));
        self
    }

    pub fn with_text(mut self, key: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(key.into(), Fixture::Text(body.into()));
        self
    }

    pub fn with_bytes(mut self, key: impl Into<String>, body: Vec<u8>) -> Self {
        self.responses.insert(key.into(), Fixture::Bytes(body));
        self
    }

    /// Requests made so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn lookup(&self, key: String) -> Result<Fixture> {
        self.requests.borrow_mut().push(key.clone());
        self.responses
            .get(&key)
            .cloned()
            .ok_or(Error::MissingFixture(key))
    }
}

impl Fetcher for MemoryFetcher {
    fn query(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        let key = request_key(url, params);
        match self.lookup(key.clone())? {
            Fixture::Json(value) => Ok(value),
            Fixture::Text(body) => serde_json::from_str(&body)
                .map_err(|source| Error::InvalidJson { url: key, source }),
            Fixture::Bytes(body) => serde_json::from_slice(&body)
                .map_err(|source| Error::InvalidJson { url: key, source }),
        }
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        match self.lookup(url.to_string())? {
            Fixture::Json(value) => Ok(value.to_string()),
            Fixture::Text(body) => Ok(body),
            Fixture::Bytes(body) => Ok(String::from_utf8_lossy(&body).into_owned()),
        }
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        match self.lookup(url.to_string())? {
            Fixture::Json(value) => Ok(value.to_string().into_bytes()),
            Fixture::Text(body) => Ok(body.into_bytes()),
            Fixture::Bytes(body) => Ok(body),
        }
    }
}
