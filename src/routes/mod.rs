// Route exports
pub mod chat;
pub mod facilities;
pub mod symptoms;

use actix_web::web;
use crate::services::{ChatAssistant, FacilitySearchGateway, SymptomAnalyzer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: FacilitySearchGateway,
    pub analyzer: SymptomAnalyzer,
    pub assistant: ChatAssistant,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(facilities::configure)
            .configure(symptoms::configure)
            .configure(chat::configure),
    );
}
