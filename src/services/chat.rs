use crate::core::prompt::chat_prompt;
use crate::models::{ChatReply, ChatRequest};
use crate::services::gemini::{GenerativeClient, UpstreamError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Phrases in an assistant reply that warrant an emergency alert
const EMERGENCY_KEYWORDS: [&str; 5] = ["emergency", "immediate", "911", "urgent care", "hospital"];

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Whether a reply tells the user to seek emergency care
pub fn mentions_emergency(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    EMERGENCY_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Conversational medical assistant
///
/// Stateless: the caller sends the conversation so far with every turn.
#[derive(Clone)]
pub struct ChatAssistant {
    client: Arc<dyn GenerativeClient>,
    timeout: Duration,
}

impl ChatAssistant {
    pub fn new(client: Arc<dyn GenerativeClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn respond(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        request
            .validate()
            .map_err(|e| ChatError::InvalidInput(e.to_string()))?;

        let message = request.message.trim();
        if message.is_empty() {
            return Err(ChatError::InvalidInput("message must not be empty".to_string()));
        }

        let prompt = chat_prompt(&request.history, message);

        let text = tokio::time::timeout(self.timeout, self.client.generate(&prompt))
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout))??;

        let reply = text.trim().to_string();
        let emergency = mentions_emergency(&reply);
        if emergency {
            tracing::info!("Chat reply flagged as emergency");
        }

        Ok(ChatReply { reply, emergency })
    }
}
