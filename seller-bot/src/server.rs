use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::Json,
    routing::{get, post},
};
use dialog_flow::ConversationSession;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::{
    dispatcher::{IntentDispatcher, TurnOutcome},
    intent::{Intent, Recognition},
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

fn internal_error(message: &str, details: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<IntentDispatcher>,
}

/// An utterance together with what the classifier made of it
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub conversation_id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub entities: HashMap<String, Vec<String>>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/messages", post(handle_message))
        .route("/session/{id}", get(get_session))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(correlation_id_middleware))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> axum::response::Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handle_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<TurnOutcome> {
    let conversation_id = request
        .conversation_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let intent = request
        .intent
        .as_deref()
        .map(Intent::from_label)
        .unwrap_or(Intent::None);

    info!(
        conversation_id = %conversation_id,
        intent = ?intent,
        text_length = %request.text.len(),
        "Processing message"
    );

    let recognition = Recognition::new(intent, request.entities);
    match state
        .dispatcher
        .handle_turn(&conversation_id, &recognition, &request.text)
        .await
    {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            error!(conversation_id = %conversation_id, error = %e, "Failed to handle turn");
            Err(internal_error("Failed to handle message", &e.to_string()))
        }
    }
}

async fn get_session(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> ApiResult<ConversationSession> {
    match state.dispatcher.session(&conversation_id).await {
        Ok(Some(session)) => Ok(Json(session)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Session not found" })),
        )),
        Err(e) => {
            error!(conversation_id = %conversation_id, error = %e, "Failed to load session");
            Err(internal_error("Failed to load session", &e.to_string()))
        }
    }
}
