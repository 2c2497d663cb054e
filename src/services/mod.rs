// Service exports
pub mod cache;
pub mod chat;
pub mod clock;
pub mod gateway;
pub mod gemini;
pub mod symptoms;

pub use cache::{CacheKey, CacheStats, FacilityCache};
pub use chat::{ChatAssistant, ChatError};
pub use clock::{Clock, ManualClock, TokioClock};
pub use gateway::{FacilitySearchGateway, GatewayConfig, GatewayError};
pub use gemini::{GeminiClient, GenerativeClient, UpstreamError};
pub use symptoms::{AnalysisError, SymptomAnalyzer};
