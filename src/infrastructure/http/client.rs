use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// HTTP verbs used by the backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Status and decoded body of a completed request.
///
/// Empty bodies decode to `Value::Null`, non-JSON bodies to `Value::String`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// Send a request. Only transport failures are errors; any status is returned.
    async fn send_json(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: Option<&Value>,
    ) -> Result<HttpResponse, DomainError>;

    /// POST a JSON body and fail on non-2xx
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<Value, DomainError> {
        let response = self
            .send_json(HttpMethod::Post, url, headers, Some(body))
            .await?;

        if !response.is_success() {
            return Err(DomainError::provider(
                "http",
                format!("HTTP {}: {}", response.status, response.body),
            ));
        }

        Ok(response.body)
    }
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn send_json(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: Option<&Value>,
    ) -> Result<HttpResponse, DomainError> {
        let mut request = self.client.request(method.as_reqwest(), url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to read response: {}", e)))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(HttpResponse::new(status, body))
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockHttpClient;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_post_json_returns_body_on_success() {
        let client = MockHttpClient::new().with_response("http://x/ok", json!({"ok": true}));
        let body = client.post_json("http://x/ok", vec![], &json!({})).await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_post_json_fails_on_error_status() {
        let client =
            MockHttpClient::new().with_status("http://x/bad", 429, json!({"error": "slow down"}));
        let err = client
            .post_json("http://x/bad", vec![], &json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_response_status_helpers() {
        assert!(HttpResponse::new(204, Value::Null).is_success());
        assert!(HttpResponse::new(404, Value::Null).is_not_found());
        assert!(!HttpResponse::new(500, Value::Null).is_success());
    }
}
