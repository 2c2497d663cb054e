use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, HealthResponse, SearchFacilitiesRequest};
use crate::routes::AppState;
use crate::services::gateway::ANONYMOUS_CALLER;
use crate::services::GatewayError;

/// Header a browser session sends to scope search debouncing to itself
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Configure facility and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/facilities/search", web::post().to(search_facilities));
}

/// Identify the requester: client id header first, then the peer address
fn caller_id(req: &HttpRequest) -> String {
    let header = req
        .headers()
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match header {
        Some(id) => format!("client:{}", id),
        None => req
            .connection_info()
            .realip_remote_addr()
            .map(|addr| format!("addr:{}", addr))
            .unwrap_or_else(|| ANONYMOUS_CALLER.to_string()),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let stats = state.gateway.cache_stats();
    tracing::debug!("Health check, cache entries: {}, hit rate: {:.2}", stats.entries, stats.hit_rate);

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search facilities endpoint
///
/// POST /api/v1/facilities/search
///
/// Request body:
/// ```json
/// {
///   "location": "40.7128,-74.0060",
///   "filters": { "type": "hospital", "emergencyOnly": true, "minRating": 4 }
/// }
/// ```
///
/// Always answers 200 with data for a valid request; `source` tells live
/// results from fallback ones. Send `X-Client-Id` to debounce per browser
/// session rather than per peer address.
async fn search_facilities(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<SearchFacilitiesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for facility search: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request_id = uuid::Uuid::new_v4();
    let caller = caller_id(&http_req);
    let SearchFacilitiesRequest { location, filters } = req.into_inner();

    tracing::info!("[{}] Searching facilities near {} for {}", request_id, location, caller);

    match state.gateway.search_for(&caller, &location, filters).await {
        Ok(result) => {
            tracing::info!(
                "[{}] Returning {} facilities (source: {:?}, cached: {})",
                request_id,
                result.facilities.len(),
                result.source,
                result.cached
            );
            HttpResponse::Ok().json(result)
        }
        Err(GatewayError::InvalidInput(message)) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid input".to_string(),
            message,
            status_code: 400,
        }),
    }
}
