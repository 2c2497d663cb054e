use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{ChatMessage, Lifestyle, MedicalHistory, SearchFilters};

/// Request to search for nearby healthcare facilities
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchFacilitiesRequest {
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(default)]
    #[validate(nested)]
    pub filters: SearchFilters,
}

/// Request to analyze a patient's symptoms
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[validate(length(min = 1))]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub medical_history: MedicalHistory,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[serde(default)]
    pub recent_changes: String,
    #[serde(default)]
    pub family_history: Vec<String>,
}

/// Request for the next assistant turn in a chat
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}
