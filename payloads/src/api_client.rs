use crate::responses;
use reqwest::{Method, StatusCode};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

/// A single request against the backend, before it is bound to a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative to the client's address unless it is already absolute.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Whether the caller supplied its own `Accept` header.
    fn overrides_accept(&self) -> bool {
        self.headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("accept"))
    }
}

/// Status and body text of a completed exchange. Interpretation is left to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Failure to complete an exchange at all (no HTTP status was received).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("Network error. Please check your connection.")]
    Unreachable(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Unreachable(error.to_string())
        }
    }
}

/// Something that can carry an [`ApiRequest`] to the backend.
///
/// Dropping the returned future aborts the request.
pub trait Transport: Send + Sync + 'static {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// An API client for interfacing with the backend.
#[derive(Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

/// Join `path` onto `base`, leaving absolute URLs untouched.
pub fn resolve_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
        }
    }

    fn format_url(&self, path: &str) -> String {
        resolve_url(&self.address, path)
    }

    async fn empty_get(
        &self,
        path: &str,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.inner_client
            .get(self.format_url(path))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
    }
}

impl Transport for APIClient {
    async fn execute(
        &self,
        request: ApiRequest,
    ) -> Result<RawResponse, TransportError> {
        let url = self.format_url(&request.path);
        let mut builder = self.inner_client.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.overrides_accept() {
            builder =
                builder.header(reqwest::header::ACCEPT, "application/json");
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        // `json` also sets the Content-Type header
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::trace!(%url, %status, "response received");
        Ok(RawResponse { status, body })
    }
}

/// Methods on the backend API
impl APIClient {
    /// Warehouse spaces with their utilization.
    pub async fn spaces(
        &self,
    ) -> Result<responses::SpacesResponse, ClientError> {
        let response = self.empty_get("/api/spaces").await?;
        ok_body(response).await
    }

    /// Current cash balance.
    pub async fn bank_statement(
        &self,
    ) -> Result<responses::BankStatement, ClientError> {
        let response = self.empty_get("/api/get-bank-statement").await?;
        ok_body(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing the extracted detail.
    #[error("Error {}: {}", .0.as_u16(), .1)]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

/// Diagnostic text for a failed response.
///
/// Prefers a JSON `detail` field, then the raw body, then the canonical
/// reason phrase of the status.
pub fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) =
        serde_json::from_str::<serde_json::Value>(body)
        && let Some(detail) = map.get("detail")
    {
        return match detail {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(ClientError::APIError(status, error_detail(status, &body)));
    }
    Ok(response.json::<T>().await?)
}
