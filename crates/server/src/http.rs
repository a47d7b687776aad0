//! HTTP endpoints
//!
//! REST API for the sales chatbot decision core.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use lead_agent_core::{LeadProfile, ModelTier, QualificationStatus};

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins);

    Router::new()
        // Chat endpoint: one workflow turn per call
        .route("/api/chat", post(chat))
        // Session endpoints
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id", delete(delete_session))
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins; empty means localhost only.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    tracing::info!(count = parsed.len(), "CORS configured");
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Chat request (wire shape matches the frontend client)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    user_id: String,
    session_id: String,
    user_message: String,
    #[serde(default)]
    language: Option<String>,
}

/// Chat response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponse {
    reply: String,
    lead_profile: LeadProfile,
    qualification_status: QualificationStatus,
    lead_score: i32,
    model_tier: ModelTier,
}

/// Run one qualification turn for the session.
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    if request.session_id.is_empty() || request.user_message.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let session = state
        .sessions
        .get_or_create(&request.session_id, &request.user_id)
        .map_err(|e| {
            tracing::error!(error = %e, "Session creation failed");
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    session.touch();

    // Holding the session lock for the whole turn serializes overlapping
    // requests for one session id
    let mut conversation = session.state.lock().await;
    let result = state
        .workflow
        .run_turn(
            &mut conversation,
            &request.user_message,
            request.language.as_deref().unwrap_or("en"),
        )
        .await;
    drop(conversation);

    Ok(Json(ChatResponse {
        reply: result.reply,
        lead_profile: result.profile,
        qualification_status: result.status,
        lead_score: result.score,
        model_tier: result.tier,
    }))
}

/// Get session info
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let conversation = session.state.lock().await;

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "status": conversation.status,
        "lead_score": conversation.profile.lead_score,
        "turn_count": conversation.turn_count(),
        "attempts": conversation.attempts,
        "language": conversation.language,
    })))
}

/// Delete session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.sessions.remove(&id);
    StatusCode::NO_CONTENT
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Liveness check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.count(),
    }))
}

/// Readiness check with local LLM backend connectivity
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let llm_url = format!("{}/api/tags", state.config.llm.local_endpoint);

    let llm_status =
        match tokio::time::timeout(std::time::Duration::from_secs(2), reqwest::get(&llm_url)).await
        {
            Ok(Ok(resp)) if resp.status().is_success() => "ok",
            Ok(Ok(_)) => "error",
            Ok(Err(_)) => "unreachable",
            Err(_) => "timeout",
        };

    let ready = llm_status == "ok";
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "checks": {
                "llm_backend": { "status": llm_status, "url": llm_url },
                "sessions": { "status": "ok", "count": state.sessions.count() },
            }
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_agent_config::Settings;

    #[test]
    fn test_router_creation() {
        let state = AppState::from_settings(Settings::default()).unwrap();
        let _ = create_router(state);
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let json = r#"{
            "userId": "u1",
            "sessionId": "s1",
            "userMessage": "hello",
            "language": "en"
        }"#;
        let request: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.user_id, "u1");
        assert_eq!(request.session_id, "s1");
        assert_eq!(request.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_chat_response_wire_shape() {
        let response = ChatResponse {
            reply: "hi".to_string(),
            lead_profile: LeadProfile::default(),
            qualification_status: QualificationStatus::Discovery,
            lead_score: 50,
            model_tier: ModelTier::Local,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["reply"], "hi");
        assert_eq!(json["qualificationStatus"], "DISCOVERY");
        assert_eq!(json["leadScore"], 50);
        assert_eq!(json["modelTier"], "local");
        assert_eq!(json["leadProfile"]["language_preference"], "en");
    }
}
