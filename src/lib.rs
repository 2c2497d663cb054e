//! HealNav gateway - healthcare facility search and symptom analysis
//!
//! The centerpiece is [`FacilitySearchGateway`], which turns a location and a
//! set of filters into a list of nearby facilities. Searches are cached,
//! debounced, bounded by a timeout and degrade to filtered static data when
//! the generative-text provider is unavailable or answers with garbage.
//! [`services::SymptomAnalyzer`] and [`services::ChatAssistant`] share the
//! same provider client.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{clean_response, fallback_facilities, parse_facilities};
pub use models::{HealthcareFacility, ResultSource, SearchFilters, SearchResult};
pub use services::{FacilitySearchGateway, GatewayConfig, GatewayError, GenerativeClient};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let facilities = fallback_facilities("40.7128,-74.0060", &SearchFilters::default(), 5);
        assert!(!facilities.is_empty());
    }
}
