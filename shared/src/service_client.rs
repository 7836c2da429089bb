//! HTTP client for the dating API

use crate::{
    error::ApiError,
    types::{PaginatedResult, Pagination, PAGINATION_HEADER},
    config::ApiConfig,
    Result,
};
use parking_lot::RwLock;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// FAILURE CLASSIFICATION
// ============================================================================

/// Shape of a failed response body
#[derive(Debug, Clone, PartialEq)]
pub enum FailureBody {
    Empty,
    /// `{"errors": {field: [messages...]}}`, fields kept in body order
    FieldErrors(Vec<(String, Vec<String>)>),
    /// A JSON string or a non-JSON text body
    Text(String),
    Json(serde_json::Value),
}

impl FailureBody {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return FailureBody::Empty;
        }

        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::String(text)) => FailureBody::Text(text),
            Ok(serde_json::Value::Object(map)) => match map.get("errors") {
                Some(serde_json::Value::Object(errors)) => {
                    let fields = errors
                        .iter()
                        .filter_map(|(field, messages)| {
                            let messages = match messages {
                                serde_json::Value::Array(items) => items
                                    .iter()
                                    .map(|item| match item {
                                        serde_json::Value::String(s) => s.clone(),
                                        other => other.to_string(),
                                    })
                                    .collect(),
                                serde_json::Value::String(s) if !s.is_empty() => vec![s.clone()],
                                _ => return None,
                            };
                            Some((field.clone(), messages))
                        })
                        .collect();
                    FailureBody::FieldErrors(fields)
                }
                _ => FailureBody::Json(serde_json::Value::Object(map)),
            },
            Ok(other) => FailureBody::Json(other),
            Err(_) => FailureBody::Text(raw.to_string()),
        }
    }

    /// All field messages in one ordered sequence.
    pub fn flattened_errors(&self) -> Option<Vec<String>> {
        match self {
            FailureBody::FieldErrors(fields) => Some(
                fields
                    .iter()
                    .flat_map(|(_, messages)| messages.iter().cloned())
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        match self {
            FailureBody::Empty => serde_json::Value::Null,
            FailureBody::FieldErrors(fields) => {
                let errors: serde_json::Map<String, serde_json::Value> = fields
                    .iter()
                    .map(|(field, messages)| (field.clone(), serde_json::json!(messages)))
                    .collect();
                serde_json::json!({ "errors": errors })
            }
            FailureBody::Text(text) => serde_json::Value::String(text.clone()),
            FailureBody::Json(value) => value.clone(),
        }
    }
}

/// A request that did not produce a 2xx response
#[derive(Debug)]
pub enum RequestFailure {
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: FailureBody,
    },
    Transport {
        method: Method,
        url: String,
        source: reqwest::Error,
    },
}

impl RequestFailure {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestFailure::Status { status, .. } => Some(*status),
            RequestFailure::Transport { source, .. } => source.status(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            RequestFailure::Status { url, .. } | RequestFailure::Transport { url, .. } => url,
        }
    }

    /// Error propagated to the caller once any side effects have run.
    pub fn into_error(self) -> ApiError {
        match self {
            RequestFailure::Transport { source, .. } => ApiError::Transport(source),
            RequestFailure::Status { url, status, body, .. } => match status.as_u16() {
                code @ (400 | 401) => match body {
                    FailureBody::FieldErrors(_) => {
                        ApiError::validation(body.flattened_errors().unwrap_or_default())
                    }
                    FailureBody::Text(text) => ApiError::rejected(code, text),
                    _ => ApiError::rejected(code, status_text(status)),
                },
                404 => ApiError::not_found(url),
                500 => ApiError::server(body.to_value()),
                code => ApiError::http(code, status_text(status)),
            },
        }
    }
}

/// Canonical reason phrase for a status code.
pub fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

/// Hook run on every failed request before the error reaches the caller
pub trait FailureHandler: Send + Sync {
    fn handle(&self, failure: RequestFailure) -> ApiError;
}

/// Converts failures to errors without side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl FailureHandler for PassThrough {
    fn handle(&self, failure: RequestFailure) -> ApiError {
        failure.into_error()
    }
}

// ============================================================================
// ENDPOINT PATHS
// ============================================================================

/// Bytes escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Relative endpoint built from path segments. Each segment is escaped so a
/// value like a username can never add segments, a query or a fragment.
/// Empty and dot segments have no escaped form and are refused.
pub fn endpoint_path(segments: &[&str]) -> Result<String> {
    let mut escaped = Vec::with_capacity(segments.len());
    for segment in segments {
        if matches!(*segment, "" | "." | "..") {
            return Err(ApiError::validation(vec![format!(
                "Invalid path segment: {:?}",
                segment
            )]));
        }
        escaped.push(utf8_percent_encode(segment, PATH_SEGMENT).to_string());
    }
    Ok(escaped.join("/"))
}

// ============================================================================
// API CLIENT
// ============================================================================

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
    failures: Arc<dyn FailureHandler>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.read().is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: Arc::new(RwLock::new(None)),
            failures: Arc::new(PassThrough),
        })
    }

    pub fn with_failure_handler(mut self, handler: Arc<dyn FailureHandler>) -> Self {
        self.failures = handler;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Bearer token sent with every request; `None` clears it.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Make a GET request
    pub async fn get<T>(&self, endpoint: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        let response = self.send(Method::GET, &url, self.client.get(&url)).await?;
        Self::decode(response).await
    }

    /// GET with query parameters, keeping the `Pagination` header next to the body
    pub async fn get_paginated<T>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<PaginatedResult<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        let response = self
            .send(Method::GET, &url, self.client.get(&url).query(params))
            .await?;

        let pagination = match response.headers().get(PAGINATION_HEADER) {
            Some(header) => Some(serde_json::from_slice::<Pagination>(header.as_bytes())?),
            None => None,
        };
        let result = Self::decode(response).await?;

        debug!(url = %url, paginated = pagination.is_some(), "Fetched page");
        Ok(PaginatedResult::new(result, pagination))
    }

    /// Make a PUT request, ignoring the response body
    pub async fn put<B>(&self, endpoint: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(endpoint);
        self.send(Method::PUT, &url, self.client.put(&url).json(body))
            .await?;
        Ok(())
    }

    /// Make a POST request
    pub async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        let response = self
            .send(Method::POST, &url, self.client.post(&url).json(body))
            .await?;
        Self::decode(response).await
    }

    /// POST without a body, ignoring the response body
    pub async fn post_empty(&self, endpoint: &str) -> Result<()> {
        let url = self.url(endpoint);
        self.send(Method::POST, &url, self.client.post(&url)).await?;
        Ok(())
    }

    /// Make a DELETE request, ignoring the response body
    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        let url = self.url(endpoint);
        self.send(Method::DELETE, &url, self.client.delete(&url))
            .await?;
        Ok(())
    }

    async fn send(&self, method: Method, url: &str, request: RequestBuilder) -> Result<Response> {
        let token = self.token.read().clone();
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                return Err(self.failures.handle(RequestFailure::Transport {
                    method,
                    url: url.to_string(),
                    source,
                }))
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response
            .text()
            .await
            .unwrap_or_else(|_| String::new());

        Err(self.failures.handle(RequestFailure::Status {
            method,
            url: url.to_string(),
            status,
            body: FailureBody::parse(&raw),
        }))
    }

    async fn decode<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_failure(code: u16, raw: &str) -> RequestFailure {
        RequestFailure::Status {
            method: Method::GET,
            url: "http://localhost/api/users".to_string(),
            status: StatusCode::from_u16(code).unwrap(),
            body: FailureBody::parse(raw),
        }
    }

    #[test]
    fn test_field_errors_keep_body_order() {
        let body = FailureBody::parse(
            r#"{"errors":{"Username":["taken"],"Password":["too short","needs digit"]}}"#,
        );
        assert_eq!(
            body.flattened_errors(),
            Some(vec!["taken".to_string(), "too short".to_string(), "needs digit".to_string()])
        );
    }

    #[test]
    fn test_null_field_entries_are_skipped() {
        let body = FailureBody::parse(r#"{"errors":{"a":null,"b":["bad"]}}"#);
        assert_eq!(body.flattened_errors(), Some(vec!["bad".to_string()]));
    }

    #[test]
    fn test_body_shapes() {
        assert_eq!(FailureBody::parse(""), FailureBody::Empty);
        assert_eq!(FailureBody::parse("\"Invalid password\""), FailureBody::Text("Invalid password".into()));
        assert_eq!(FailureBody::parse("plain failure"), FailureBody::Text("plain failure".into()));
        assert_eq!(
            FailureBody::parse(r#"{"detail":"boom"}"#),
            FailureBody::Json(serde_json::json!({"detail": "boom"}))
        );
    }

    #[test]
    fn test_pass_through_mapping() {
        let err = PassThrough.handle(status_failure(400, r#"{"errors":{"password":["too short"]}}"#));
        assert!(matches!(err, ApiError::Validation { ref errors } if errors == &vec!["too short".to_string()]));

        let err = PassThrough.handle(status_failure(401, ""));
        assert!(matches!(err, ApiError::Rejected { status: 401, ref message } if message == "Unauthorized"));

        let err = PassThrough.handle(status_failure(404, ""));
        assert!(matches!(err, ApiError::NotFound { .. }));

        let err = PassThrough.handle(status_failure(503, ""));
        assert!(matches!(err, ApiError::Http { status: 503, .. }));
    }

    #[test]
    fn test_url_joins_endpoint_once() {
        let config = ApiConfig {
            base_url: "http://localhost:5001/api/".to_string(),
            timeout_seconds: 5,
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("users"), "http://localhost:5001/api/users");
        assert_eq!(client.url("/likes/bob"), "http://localhost:5001/api/likes/bob");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_endpoint_path_escapes_each_segment() {
        assert_eq!(endpoint_path(&["users", "lisa"]).unwrap(), "users/lisa");
        assert_eq!(
            endpoint_path(&["users", "ann marie/x?y#z"]).unwrap(),
            "users/ann%20marie%2Fx%3Fy%23z"
        );
        assert_eq!(endpoint_path(&["users", "50%"]).unwrap(), "users/50%25");
        assert!(matches!(
            endpoint_path(&["likes", ".."]),
            Err(ApiError::Validation { .. })
        ));
        assert!(endpoint_path(&["users", ""]).is_err());
    }
}
