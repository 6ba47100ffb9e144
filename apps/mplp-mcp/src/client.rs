//! # MPLP HTTP Client
//!
//! Wrapper around the MPLP catalog REST API for use by the MCP server.

use serde_json::Value;
use thiserror::Error;

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cannot reach the MPLP server, or its URL is malformed.
    #[error("Cannot connect to MPLP at {0}")]
    ConnectionFailed(String),
    /// 401 Unauthorized - invalid or missing API key.
    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,
    /// 429 Too Many Requests.
    #[error("Rate limited: too many requests")]
    RateLimited,
    /// 404 with the server's error message.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Server returned a 5xx error.
    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),
    /// Failed to parse response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// HTTP client that wraps calls to the MPLP REST API.
#[derive(Clone)]
pub struct MplpClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MplpClient {
    /// Create a new client pointing at the given MPLP server URL.
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// URL of `segments` under the base URL, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, ClientError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::ConnectionFailed(format!("{}: not a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `segments` with optional Bearer auth and decode the JSON body.
    async fn get(&self, segments: &[&str]) -> Result<Value, ClientError> {
        let mut req = self.http.get(self.url(segments)?);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))?;
        handle_response(resp).await
    }

    /// GET /modules → every module with status and schema `$id`.
    pub async fn modules(&self) -> Result<Value, ClientError> {
        self.get(&["modules"]).await
    }

    /// GET /status/{name} → tier status of any name.
    pub async fn status(&self, name: &str) -> Result<Value, ClientError> {
        self.get(&["status", name]).await
    }

    /// GET /modules/{name}/schema → raw schema document.
    pub async fn schema(&self, module: &str) -> Result<Value, ClientError> {
        self.get(&["modules", module, "schema"]).await
    }

    /// GET /modules/{name} → status plus schema summary.
    pub async fn summary(&self, module: &str) -> Result<Value, ClientError> {
        self.get(&["modules", module]).await
    }

    /// GET /check → catalog lint report.
    pub async fn check(&self) -> Result<Value, ClientError> {
        self.get(&["check"]).await
    }
}

/// Check status codes and parse the JSON body.
async fn handle_response(resp: reqwest::Response) -> Result<Value, ClientError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ClientError::RateLimited);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        let body = resp.json::<Value>().await.unwrap_or_default();
        return Err(ClientError::NotFound(error_message(&body)));
    }
    if status.is_server_error() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::ServerError(status.as_u16(), body));
    }
    resp.json::<Value>()
        .await
        .map_err(|e| ClientError::ParseError(e.to_string()))
}

/// `error` field of an error body, or a generic message.
fn error_message(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .unwrap_or("resource does not exist")
        .to_string()
}
