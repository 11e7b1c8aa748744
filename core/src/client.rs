use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::DorkConfig;
use crate::errors::{DorkError, DorkResult};
use crate::types::*;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// The external generative-AI endpoint the controller talks to
#[async_trait]
pub trait AiBoundary: Send + Sync {
    /// Sends the request and returns the text of the first candidate
    async fn generate_text(&self, request: GenerateContentRequest) -> DorkResult<String>;
}

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: &DorkConfig) -> DorkResult<Self> {
        let api_key = config.credential().ok_or_else(|| {
            DorkError::ConfigError(
                "API key is required to initialize the Gemini client".to_string(),
            )
        })?;

        let timeout = config.request_timeout();
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            DorkError::ConfigError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            timeout,
        })
    }

    /// Per-request deadline; an expired call surfaces as a boundary error
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Point the client at a different host (proxies, local test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> DorkResult<GenerateContentResponse> {
        debug!(model = %request.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .json(request)
            .send()
            .await
            .map_err(|e| DorkError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                DorkError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(DorkError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| DorkError::ResponseError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl AiBoundary for GeminiClient {
    async fn generate_text(&self, request: GenerateContentRequest) -> DorkResult<String> {
        let response = self.generate_content(&request).await?;
        extract_text_from_response(&response)
    }
}

/// Pulls the first candidate's first text part out of a response
pub fn extract_text_from_response(response: &GenerateContentResponse) -> DorkResult<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| DorkError::ResponseError("No candidates in response".to_string()))?;

    let content = candidate
        .content
        .as_ref()
        .ok_or_else(|| DorkError::ResponseError("No content in candidate".to_string()))?;

    let part = content
        .parts
        .first()
        .ok_or_else(|| DorkError::ResponseError("No parts in content".to_string()))?;

    part.text
        .clone()
        .ok_or_else(|| DorkError::ResponseError("No text in part".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_credential() {
        let err = GeminiClient::new(&DorkConfig::default()).unwrap_err();
        assert!(matches!(err, DorkError::ConfigError(_)));
    }

    #[test]
    fn test_endpoint_includes_model_and_key() {
        let config = DorkConfig {
            api_key: Some("secret".to_string()),
            ..DorkConfig::default()
        };
        let client = GeminiClient::new(&config)
            .unwrap()
            .with_base_url("http://localhost:9000/");

        assert_eq!(
            client.endpoint("gemini-2.0-flash"),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn test_client_uses_configured_timeout() {
        let config = DorkConfig {
            api_key: Some("secret".to_string()),
            request_timeout_secs: Some(5),
            ..DorkConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));

        let config = DorkConfig {
            api_key: Some("secret".to_string()),
            ..DorkConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_extract_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"site:.edu"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_from_response(&response).unwrap(), "site:.edu");
    }

    #[test]
    fn test_extract_text_errors_on_empty_envelopes() {
        let no_candidates: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text_from_response(&no_candidates),
            Err(DorkError::ResponseError(_))
        ));

        let no_text: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#).unwrap();
        assert!(matches!(
            extract_text_from_response(&no_text),
            Err(DorkError::ResponseError(_))
        ));
    }
}
