// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AnalysisReport, ChatMessage, ChatReply, ChatRole, Coordinates, HealthcareFacility, Lifestyle,
    LifestyleImpact, MedicalHistory, MedicationConsideration, PossibleCondition, Probability,
    ResultSource, SearchFilters, SearchResult, Urgency, UrgencyLevel,
};
pub use requests::{AnalysisRequest, ChatRequest, SearchFacilitiesRequest};
pub use responses::{ErrorResponse, HealthResponse};
