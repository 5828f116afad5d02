//! HTTP access to App Store Connect.
//!
//! [`Transport`] is the seam the fetcher and uploader talk to; [`ApiClient`]
//! is the blocking `reqwest` implementation.

use reqwest::{
    blocking::{Client, Response},
    header::{ACCEPT, AUTHORIZATION},
};
use serde_json::Value;
use tracing::{debug, error};

use crate::{auth::TokenSource, error::Error};

/// Raw status and body of an API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON. A body that is not JSON is kept as a string
    /// value so it can still be stored.
    pub fn json(&self) -> Value {
        if self.body.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    /// Turns a non-2xx response into [`Error::Api`].
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Api {
                status: self.status,
                body: self.body,
            })
        }
    }

    fn from_response(response: Response) -> Result<Self, Error> {
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(ApiResponse { status, body })
    }
}

/// Minimal request surface used by ascloc.
///
/// Implementations return `Ok` for any HTTP response, including non-2xx ones;
/// `Err` is reserved for failures to get a response at all.
pub trait Transport {
    fn get(&self, path: &str) -> Result<ApiResponse, Error>;

    fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse, Error>;
}

/// Blocking App Store Connect client.
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Box<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Box<dyn TokenSource>) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(concat!("ascloc/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url, tokens))
    }

    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        tokens: Box<dyn TokenSource>,
    ) -> Self {
        ApiClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for ApiClient {
    fn get(&self, path: &str) -> Result<ApiResponse, Error> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .header(AUTHORIZATION, self.tokens.bearer()?)
            .header(ACCEPT, "application/json")
            .send()
            .inspect_err(|e| error!(path, error = %e, "GET failed"))?;
        ApiResponse::from_response(response)
    }

    fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse, Error> {
        debug!(path, "PATCH");
        let response = self
            .http
            .patch(self.url(path))
            .header(AUTHORIZATION, self.tokens.bearer()?)
            .json(body)
            .send()
            .inspect_err(|e| error!(path, error = %e, "PATCH failed"))?;
        ApiResponse::from_response(response)
    }
}
