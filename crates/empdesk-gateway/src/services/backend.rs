use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Every outbound call is bounded by this
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const REGISTER_PATH: &str = "register/";
pub const TOKEN_PATH: &str = "token/";
pub const EMPLOYEES_PATH: &str = "employees/";

pub fn employee_path(id: u64) -> String {
    format!("{EMPLOYEES_PATH}{id}/")
}

/// One call against the backend, relative to its base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer_token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer_token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> serde_json::Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }
}

/// A response that actually came back from the backend, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    /// Status classification is left to the caller
    Responded(ApiResponse),
    /// The backend could not be reached
    ConnectionFailed,
    /// Any other transport fault, timeouts included
    RequestFailed(String),
}

/// Outbound seam to the employee REST backend
#[async_trait]
pub trait Backend: Send + Sync {
    async fn call(&self, request: ApiRequest) -> ApiOutcome;
}

/// reqwest-backed [`Backend`]
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("empdesk-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn call(&self, request: ApiRequest) -> ApiOutcome {
        let url = self.url_for(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return classify_transport_error(&request, e),
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => {
                tracing::debug!(
                    method = %request.method,
                    path = %request.path,
                    %status,
                    "Backend responded"
                );
                ApiOutcome::Responded(ApiResponse { status, body })
            }
            Err(e) => classify_transport_error(&request, e),
        }
    }
}

fn classify_transport_error(request: &ApiRequest, e: reqwest::Error) -> ApiOutcome {
    if e.is_timeout() {
        tracing::warn!(method = %request.method, path = %request.path, "Backend call timed out");
        return ApiOutcome::RequestFailed(e.to_string());
    }

    if e.is_connect() {
        tracing::warn!(
            method = %request.method,
            path = %request.path,
            "Backend unreachable: {}",
            e
        );
        return ApiOutcome::ConnectionFailed;
    }

    tracing::warn!(method = %request.method, path = %request.path, "Backend request failed: {}", e);
    ApiOutcome::RequestFailed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Json,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Router,
    };
    use serde_json::json;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });
        format!("http://{}/api", addr)
    }

    #[test]
    fn base_url_is_normalized_with_trailing_slash() {
        let client = ApiClient::new("http://127.0.0.1:8001/api").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8001/api/");
        assert_eq!(
            client.url_for("employees/3/"),
            "http://127.0.0.1:8001/api/employees/3/"
        );
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("ftp://example.com/api/"),
            Err(AppError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn employee_paths() {
        assert_eq!(employee_path(42), "employees/42/");
    }

    #[tokio::test]
    async fn sends_bearer_and_json_and_returns_any_status() {
        let router = Router::new().route(
            "/api/employees/",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let content_type = headers
                    .get("content-type")
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                (
                    AxumStatus::BAD_REQUEST,
                    Json(json!({ "auth": auth, "content_type": content_type, "echo": body })),
                )
            }),
        );
        let client = ApiClient::new(&spawn_backend(router).await).unwrap();

        let outcome = client
            .call(
                ApiRequest::post(EMPLOYEES_PATH)
                    .bearer("A")
                    .json(&json!({ "employee_id": "E-1" }))
                    .unwrap(),
            )
            .await;

        let ApiOutcome::Responded(response) = outcome else {
            panic!("expected a response, got {:?}", outcome);
        };
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["auth"], "Bearer A");
        assert_eq!(body["content_type"], "application/json");
        assert_eq!(body["echo"]["employee_id"], "E-1");
    }

    #[tokio::test]
    async fn omits_authorization_without_token() {
        let router = Router::new().route(
            "/api/employees/",
            get(|headers: HeaderMap| async move {
                if headers.contains_key("authorization") {
                    AxumStatus::IM_A_TEAPOT
                } else {
                    AxumStatus::OK
                }
            }),
        );
        let client = ApiClient::new(&spawn_backend(router).await).unwrap();

        let outcome = client.call(ApiRequest::get(EMPLOYEES_PATH)).await;
        assert!(matches!(
            outcome,
            ApiOutcome::Responded(ApiResponse { status, .. }) if status == StatusCode::OK
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_connection_failure() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{}/api/", addr)).unwrap();
        let outcome = client.call(ApiRequest::get(EMPLOYEES_PATH)).await;
        assert_eq!(outcome, ApiOutcome::ConnectionFailed);
    }

    #[tokio::test]
    async fn slow_backend_is_a_request_failure() {
        let router = Router::new().route(
            "/api/employees/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        );
        let base = spawn_backend(router).await;
        let client = ApiClient::with_timeout(&base, Duration::from_millis(100)).unwrap();

        let outcome = client.call(ApiRequest::get(EMPLOYEES_PATH)).await;
        assert!(matches!(outcome, ApiOutcome::RequestFailed(_)));
    }
}
