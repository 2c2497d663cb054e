use actix_web::{web, HttpResponse, Responder};
use crate::models::{AnalysisRequest, ErrorResponse};
use crate::routes::AppState;
use crate::services::{AnalysisError, UpstreamError};

/// Configure symptom analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/symptoms/analyze", web::post().to(analyze_symptoms));
}

/// Analyze symptoms endpoint
///
/// POST /api/v1/symptoms/analyze
///
/// Request body:
/// ```json
/// {
///   "symptoms": ["headache", "fever"],
///   "severity": "moderate",
///   "duration": "3 days",
///   "medicalHistory": { "conditions": [], "medications": [], "allergies": [], "surgeries": [] },
///   "lifestyle": { "smoking": false, "alcohol": "occasional", "exercise": "weekly",
///                  "diet": "balanced", "stress": "high", "sleep": "6 hours" },
///   "recentChanges": "",
///   "familyHistory": []
/// }
/// ```
async fn analyze_symptoms(
    state: web::Data<AppState>,
    req: web::Json<AnalysisRequest>,
) -> impl Responder {
    tracing::info!("Analyzing {} reported symptoms", req.symptoms.len());

    match state.analyzer.analyze(&req).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            let (status, error) = match &e {
                AnalysisError::InvalidInput(_) => (400, "Validation failed"),
                AnalysisError::Upstream(UpstreamError::Timeout(_)) => (504, "Analysis timed out"),
                AnalysisError::Upstream(_) => (502, "Analysis provider unavailable"),
                AnalysisError::Parse(_) => (502, "Failed to parse AI response"),
            };

            if status >= 500 {
                tracing::error!("Symptom analysis failed: {}", e);
            } else {
                tracing::info!("Symptom analysis rejected: {}", e);
            }

            let body = ErrorResponse {
                error: error.to_string(),
                message: e.to_string(),
                status_code: status,
            };

            match status {
                400 => HttpResponse::BadRequest().json(body),
                504 => HttpResponse::GatewayTimeout().json(body),
                _ => HttpResponse::BadGateway().json(body),
            }
        }
    }
}
