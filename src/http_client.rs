use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Method, Request, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ApiError, UNKNOWN_ERROR};
use crate::session::SessionManager;

/// Raw body of a binary endpoint
#[derive(Debug, Clone)]
pub struct BinaryBody {
    pub content_type: Option<String>,
    /// Filename suggested by `Content-Disposition`, if any
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Shared HTTP client for the back office API
///
/// Every call goes through two stages: the bearer token from the session is
/// attached before sending, and responses are normalised afterwards
/// (`success: false` envelopes become errors, 401/403 end the session).
/// One attempt per call.
pub struct ApiHttpClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// API root, e.g. `http://localhost:8080/api/v1`
    base_url: Url,

    /// Credentials and the session-expiry sequence
    session: Arc<SessionManager>,
}

impl ApiHttpClient {
    /// Create a new HTTP client
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        session: Arc<SessionManager>,
    ) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.request_timeout(), session)
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a path below the API root; segments are percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn get(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::GET, segments)
    }

    pub fn post(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::POST, segments)
    }

    pub fn patch(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::PATCH, segments)
    }

    pub fn delete(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::DELETE, segments)
    }

    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client.request(method, self.endpoint(segments))
    }

    /// Send a JSON request and decode the payload
    ///
    /// An envelope with `success: false` is rejected with its `error` message.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        let url = response.url().clone();

        if let Some(content_type) = content_type(&response) {
            if content_type.contains("text/html") {
                tracing::error!(url = %url, content_type = %content_type, "Received HTML from a JSON endpoint");
                return Err(ApiError::UnexpectedContent(format!(
                    "Received HTML response from {}; check the API base URL or dev proxy",
                    url
                )));
            }
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Failed to read response body");
            ApiError::Network(format!("Failed to read response body: {}", e))
        })?;

        let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&body).map_err(|e| {
                tracing::error!(url = %url, error = %e, "Response is not valid JSON");
                ApiError::Decode(format!("Invalid JSON from {}: {}", url, e))
            })?
        };

        reject_failed_envelope(&value, &url)?;

        serde_json::from_value(value).map_err(|e| {
            tracing::error!(url = %url, error = %e, "Response has unexpected shape");
            ApiError::Decode(format!("Unexpected response from {}: {}", url, e))
        })
    }

    /// Send a request whose successful response is binary (no envelope)
    pub async fn send_binary(&self, builder: RequestBuilder) -> Result<BinaryBody, ApiError> {
        let response = self.execute(builder).await?;
        let content_type = content_type(&response);
        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name);

        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read binary response body");
            ApiError::Network(format!("Failed to read response body: {}", e))
        })?;

        tracing::debug!(size = bytes.len(), content_type = ?content_type, "Received binary response");

        Ok(BinaryBody {
            content_type,
            file_name,
            bytes,
        })
    }

    /// Build, authorize and send one request; classify the outcome
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut request = builder.build().map_err(|e| {
            tracing::error!(error = %e, "Failed to build request");
            ApiError::Request(e.to_string())
        })?;

        self.authorize(&mut request);

        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(method = %method, url = %url, "Sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(status = %status, "Received HTTP response");

                if status.is_success() {
                    return Ok(response);
                }

                let error_text = response.text().await.unwrap_or_default();
                let message = error_message(&error_text)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());

                tracing::error!(
                    status = status.as_u16(),
                    method = %method,
                    url = %url,
                    response_body = %error_text,
                    "HTTP request failed with error response"
                );

                match status.as_u16() {
                    code @ (401 | 403) => {
                        self.session.handle_auth_failure(code);
                        Err(ApiError::Unauthorized {
                            status: code,
                            message,
                        })
                    }
                    code => Err(ApiError::Status {
                        status: code,
                        message,
                    }),
                }
            }

            Err(e) => {
                let error_kind = if e.is_builder() {
                    "request_error"
                } else if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connection_failed"
                } else if e.is_body() {
                    "body_error"
                } else if e.is_decode() {
                    "decode_error"
                } else {
                    "unknown"
                };

                tracing::error!(
                    error_kind = error_kind,
                    error = %e,
                    method = %method,
                    url = %url,
                    "HTTP request error"
                );

                if e.is_builder() {
                    Err(ApiError::Request(e.to_string()))
                } else {
                    Err(ApiError::Network(format!("{} (kind: {})", e, error_kind)))
                }
            }
        }
    }

    /// Attach the stored access token as a bearer credential, if there is one
    fn authorize(&self, request: &mut Request) {
        let Some(token) = self.session.access_token() else {
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("Stored access token is not a valid header value, sending without it");
            }
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw)
        .map_err(|e| ApiError::Config(format!("Invalid base URL {:?}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiError::Config(format!(
            "Base URL must be an http(s) URL: {}",
            raw
        )));
    }
    Ok(url)
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_ascii_lowercase())
}

/// Turn a 2xx `{success: false}` envelope into a business error
fn reject_failed_envelope(value: &Value, url: &Url) -> Result<(), ApiError> {
    if value.get("success").and_then(Value::as_bool) != Some(false) {
        return Ok(());
    }

    let message = value
        .get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_ERROR)
        .to_string();

    tracing::warn!(url = %url, message = %message, "API reported business failure");
    Err(ApiError::Business { message })
}

/// Best-effort message from an error body: envelope `error`, then `message`, then raw text
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let field = ["error", "message"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str));
        if let Some(text) = field {
            return Some(text.to_string());
        }
    }

    Some(trimmed.to_string())
}

/// Extract `filename` from a Content-Disposition header value
///
/// Only the final path component is kept, so the name is always safe to join
/// onto a local directory.
fn disposition_file_name(header: &str) -> Option<String> {
    let raw = header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?
        .trim_matches('"');

    let name = raw.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        tracing::warn!(file_name = %raw, "Ignoring unusable filename from Content-Disposition");
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{Router, RouterNavigator};
    use serde_json::json;

    fn test_client(base: &str) -> ApiHttpClient {
        let navigator = Arc::new(RouterNavigator::new(Router::standard(), "/inventory"));
        let session = Arc::new(SessionManager::new_for_testing(navigator));
        ApiHttpClient::new(base, Duration::from_secs(5), session).unwrap()
    }

    #[test]
    fn test_endpoint_joins_and_encodes_segments() {
        let client = test_client("http://localhost:8080/api/v1");
        assert_eq!(
            client.endpoint(&["users", "kim lee"]).as_str(),
            "http://localhost:8080/api/v1/users/kim%20lee"
        );

        let client = test_client("http://localhost:8080/api/v1/");
        assert_eq!(
            client.endpoint(&["inventory"]).as_str(),
            "http://localhost:8080/api/v1/inventory"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let navigator = Arc::new(RouterNavigator::new(Router::standard(), "/"));
        let session = Arc::new(SessionManager::new_for_testing(navigator));
        assert!(matches!(
            ApiHttpClient::new("not a url", Duration::from_secs(5), session.clone()),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            ApiHttpClient::new("mailto:ops@example.com", Duration::from_secs(5), session),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_reject_failed_envelope() {
        let url = Url::parse("http://localhost/api").unwrap();
        assert!(reject_failed_envelope(&json!({"success": true, "data": 1}), &url).is_ok());
        assert!(reject_failed_envelope(&json!([1, 2, 3]), &url).is_ok());
        assert!(reject_failed_envelope(&json!({"orderCount": 1}), &url).is_ok());

        match reject_failed_envelope(&json!({"success": false, "error": "Sold out"}), &url) {
            Err(ApiError::Business { message }) => assert_eq!(message, "Sold out"),
            other => panic!("unexpected: {:?}", other),
        }
        match reject_failed_envelope(&json!({"success": false, "error": null}), &url) {
            Err(ApiError::Business { message }) => assert_eq!(message, UNKNOWN_ERROR),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"success":false,"data":null,"error":"Not your store"}"#),
            Some("Not your store".to_string())
        );
        assert_eq!(
            error_message(r#"{"message":"Bad date"}"#),
            Some("Bad date".to_string())
        );
        assert_eq!(error_message("gateway down"), Some("gateway down".to_string()));
        assert_eq!(error_message("   "), None);
    }

    #[test]
    fn test_disposition_file_name() {
        assert_eq!(
            disposition_file_name("attachment; filename=settlement_2026-01.pdf"),
            Some("settlement_2026-01.pdf".to_string())
        );
        assert_eq!(
            disposition_file_name(r#"attachment; filename="a b.pdf""#),
            Some("a b.pdf".to_string())
        );
        assert_eq!(disposition_file_name("inline"), None);
    }

    #[test]
    fn test_disposition_file_name_strips_directories() {
        assert_eq!(
            disposition_file_name(r#"attachment; filename="/etc/x""#),
            Some("x".to_string())
        );
        assert_eq!(
            disposition_file_name(r#"attachment; filename="../../x.pdf""#),
            Some("x.pdf".to_string())
        );
        assert_eq!(
            disposition_file_name(r#"attachment; filename="..\\..\\x.pdf""#),
            Some("x.pdf".to_string())
        );
        assert_eq!(disposition_file_name(r#"attachment; filename="..""#), None);
        assert_eq!(disposition_file_name(r#"attachment; filename="reports/""#), None);
        assert_eq!(disposition_file_name("attachment; filename=."), None);
    }
}
