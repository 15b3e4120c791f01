//! HTTP transport seam.
//!
//! The pipeline speaks to the network through [`Transport`] so tests can
//! substitute a programmable fake. The transport reports every received
//! response, 2xx or not; only the absence of a response is an error.

use async_trait::async_trait;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use medtrack_core::config::api::ApiConfig;
use medtrack_core::{AppError, AppResult};

/// An outbound request descriptor.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path joined onto the configured base URL.
    pub path: String,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
    /// JSON body, when present.
    pub body: Option<Value>,
    /// Whether this is the token refresh call itself.
    pub is_refresh: bool,
    /// Whether this request is a replay after a refresh. At most one
    /// retry happens per original request.
    pub retried: bool,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            is_refresh: false,
            retried: false,
        }
    }

    /// Build a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Build a POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(Method::POST, path);
        request.body = Some(body);
        request
    }

    /// Build a PUT request with a JSON body.
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(Method::PUT, path);
        request.body = Some(body);
        request
    }

    /// Build a PATCH request with a JSON body.
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(Method::PATCH, path);
        request.body = Some(body);
        request
    }

    /// Build a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Mark this request as the refresh call, exempting it from the
    /// refresh path.
    pub fn refresh_call(mut self) -> Self {
        self.is_refresh = true;
        self
    }

    pub(crate) fn into_retry(mut self) -> Self {
        self.retried = true;
        self
    }
}

/// A received response: status plus parsed JSON body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed body; `Value::Null` when the body was empty.
    pub body: Value,
}

impl ApiResponse {
    /// Deserialize the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// The server's error message, when the body carries one.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Trait for the HTTP layer beneath the pipeline.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Execute one request, attaching `bearer` as the Authorization
    /// header when present. Returns `Err` only when no response was
    /// received (connection, timeout, protocol failures).
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> AppResult<ApiResponse>;
}

/// Production transport over reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build the transport from configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> AppResult<ApiResponse> {
        let url = self.url_for(&request.path);
        trace!(method = %request.method, %url, "Sending request");

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::with_source(
                medtrack_core::error::ErrorKind::Network,
                format!("Request to {url} failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            AppError::with_source(
                medtrack_core::error::ErrorKind::Network,
                format!("Failed to read response from {url}: {e}"),
                e,
            )
        })?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        trace!(%status, "Received response");
        Ok(ApiResponse { status, body })
    }
}
