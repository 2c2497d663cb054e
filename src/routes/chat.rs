use actix_web::{web, HttpResponse, Responder};
use crate::models::{ChatRequest, ErrorResponse};
use crate::routes::AppState;
use crate::services::{ChatError, UpstreamError};

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(chat));
}

/// Chat endpoint
///
/// POST /api/v1/chat
///
/// Request body:
/// ```json
/// {
///   "history": [{ "role": "user", "content": "I have a headache" },
///               { "role": "assistant", "content": "How long has it lasted?" }],
///   "message": "Two days, and now a stiff neck"
/// }
/// ```
///
/// Response: `{ "reply": "...", "emergency": true }`
async fn chat(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    tracing::info!("Chat turn with {} prior messages", req.history.len());

    match state.assistant.respond(&req).await {
        Ok(reply) => HttpResponse::Ok().json(reply),
        Err(ChatError::InvalidInput(message)) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message,
            status_code: 400,
        }),
        Err(ChatError::Upstream(e)) => {
            tracing::error!("Chat reply failed: {}", e);

            let timed_out = matches!(e, UpstreamError::Timeout(_));
            let body = ErrorResponse {
                error: if timed_out { "Chat timed out" } else { "Chat provider unavailable" }.to_string(),
                message: e.to_string(),
                status_code: if timed_out { 504 } else { 502 },
            };

            if timed_out {
                HttpResponse::GatewayTimeout().json(body)
            } else {
                HttpResponse::BadGateway().json(body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatReply;
    use crate::services::{
        ChatAssistant, FacilityCache, FacilitySearchGateway, GatewayConfig, GenerativeClient,
        SymptomAnalyzer, TokioClock,
    };
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    enum Reply {
        Text(&'static str),
        Down,
    }

    struct ScriptedClient(Reply);

    #[async_trait]
    impl GenerativeClient for ScriptedClient {
        async fn generate(&self, _prompt: &str) -> Result<String, UpstreamError> {
            match self.0 {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Down => Err(UpstreamError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                }),
            }
        }
    }

    fn app_state(reply: Reply) -> AppState {
        let client: Arc<dyn GenerativeClient> = Arc::new(ScriptedClient(reply));
        let cache = FacilityCache::new(10, Duration::from_secs(300), Arc::new(TokioClock));

        AppState {
            gateway: FacilitySearchGateway::new(client.clone(), cache, GatewayConfig::default()),
            analyzer: SymptomAnalyzer::new(client.clone(), Duration::from_secs(1)),
            assistant: ChatAssistant::new(client, Duration::from_secs(1)),
        }
    }

    #[actix_web::test]
    async fn test_chat_returns_reply_with_emergency_flag() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(Reply::Text("Call 911 right away."))))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({
                "history": [{ "role": "bot", "content": "How can I help?" }],
                "message": "Crushing chest pain"
            }))
            .to_request();
        let body: ChatReply = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.reply, "Call 911 right away.");
        assert!(body.emergency);
    }

    #[actix_web::test]
    async fn test_chat_rejects_empty_message() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(Reply::Text("unused"))))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_chat_maps_provider_failure_to_bad_gateway() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(Reply::Down)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "Hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
