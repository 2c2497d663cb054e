use crate::core::{parser::{parse_object, ParseError}, prompt::analysis_prompt};
use crate::models::{AnalysisReport, AnalysisRequest};
use crate::services::gemini::{GenerativeClient, UpstreamError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur while analyzing symptoms
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Failed to parse analysis: {0}")]
    Parse(#[from] ParseError),
}

/// Symptom analysis backed by the generative-text provider
///
/// There is no fallback here: an assessment that could not be produced is
/// reported to the caller.
#[derive(Clone)]
pub struct SymptomAnalyzer {
    client: Arc<dyn GenerativeClient>,
    timeout: Duration,
}

impl SymptomAnalyzer {
    pub fn new(client: Arc<dyn GenerativeClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        request
            .validate()
            .map_err(|e| AnalysisError::InvalidInput(e.to_string()))?;

        if request.symptoms.iter().all(|s| s.trim().is_empty()) {
            return Err(AnalysisError::InvalidInput("at least one symptom is required".to_string()));
        }

        let prompt = analysis_prompt(request);

        let text = tokio::time::timeout(self.timeout, self.client.generate(&prompt))
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout))??;

        let report: AnalysisReport = parse_object(&text)?;

        tracing::debug!(
            "Analysis produced {} conditions, urgency {:?}",
            report.conditions.len(),
            report.urgency_level.level
        );

        Ok(report)
    }
}
