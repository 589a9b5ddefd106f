pub mod error;
pub mod ollama;

use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tutor_shared::{AskRequest, AskResponse};

use error::RelayError;
use ollama::OllamaClient;

pub fn app(ollama: OllamaClient) -> Router {
    let ollama = Arc::new(ollama);
    Router::new()
        .route("/", get(root))
        .route(
            "/ask",
            post({
                let ollama = ollama.clone();
                move |req| ask(req, ollama)
            }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "tutor-relay is running" }))
}

/// Relays one chat request to Ollama, draining the stream into a single
/// synchronous reply. The accumulation buffer lives in this call; nothing
/// is shared between requests.
async fn ask(
    Json(request): Json<AskRequest>,
    ollama: Arc<OllamaClient>,
) -> Result<Json<AskResponse>, RelayError> {
    if request.messages.is_empty() {
        return Err(RelayError::EmptyMessages);
    }
    info!(
        "relaying {} message(s) to model {}",
        request.messages.len(),
        request.model
    );

    let mut rx = ollama.stream_chat(request.model, request.messages).await?;

    let mut full_response = String::new();
    while let Some(chunk) = rx.recv().await {
        let chunk = chunk?;
        if let Some(message) = chunk.message {
            full_response.push_str(&message.content);
        }
        if chunk.done {
            break;
        }
    }

    Ok(Json(AskResponse {
        response: format_math_response(&full_response),
    }))
}

/// Post-processing stage for model output. Identity for now; math
/// notation normalization will land here.
pub fn format_math_response(response: &str) -> String {
    response.to_string()
}
