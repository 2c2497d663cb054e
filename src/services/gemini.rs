use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the generative-text provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Provider did not answer within {0:?}")]
    Timeout(Duration),
}

/// Text-in, text-out generative model
///
/// The gateway owns prompts and response cleanup; implementations only move
/// text to and from the provider.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.model),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!("Calling Gemini model {} ({} prompt chars)", self.model, prompt.len());

        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(UpstreamError::Status { status, body });
        }

        let json: Value = response.json().await?;
        extract_text(&json).ok_or(UpstreamError::EmptyResponse)
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(json: &Value) -> Option<String> {
    let parts = json
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> GeminiClient {
        GeminiClient::new(
            server.url(),
            "test_key".to_string(),
            "gemini-2.0-flash".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_encodes_key() {
        let client = GeminiClient::new(
            "https://example.test/v1beta/".to_string(),
            "a b&c".to_string(),
            "gemini-2.0-flash".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent?key=a%20b%26c"
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "[{" }, { "text": "}]" }] } }]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("[{}]"));
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
    }

    #[tokio::test]
    async fn test_generate_returns_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "test_key".into()))
            .match_body(mockito::Matcher::PartialJson(json!({
                "contents": [{ "parts": [{ "text": "hello" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "candidates": [{ "content": { "parts": [{ "text": "world" }] } }] })
                    .to_string(),
            )
            .create_async()
            .await;

        let text = client_for(&server).generate("hello").await.unwrap();

        assert_eq!(text, "world");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_maps_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let err = client_for(&server).generate("hello").await.unwrap_err();

        assert!(matches!(err, UpstreamError::Status { status: 429, .. }));
    }
}
