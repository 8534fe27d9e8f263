// http server mode - the same pipeline behind POST /api/chat

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::core::{Outcome, Pipeline};
use crate::Error;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
}

#[derive(Deserialize)]
struct ChatRequest {
    prompt: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// HTTP front end over a shared [`Pipeline`].
pub struct Server;

impl Server {
    /// Routes for the chat api; anything else is looked up in `public_dir`.
    pub fn router(pipeline: Arc<Pipeline>, public_dir: &Path) -> Router {
        let state = AppState { pipeline };

        Router::new()
            .route("/health", get(health))
            .route("/api/chat", post(chat))
            .fallback_service(ServeDir::new(public_dir))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub async fn run(pipeline: Pipeline, public_dir: &Path, host: &str, port: u16) -> Result<(), Error> {
        let app = Self::router(Arc::new(pipeline), public_dir);

        let addr = format!("{host}:{port}");
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        info!(public_dir = %public_dir.display(), "server running at http://{addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

fn reply(status: StatusCode, response: impl Into<String>) -> (StatusCode, Json<ChatResponse>) {
    (
        status,
        Json(ChatResponse {
            response: response.into(),
        }),
    )
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            warn!(error = %e, "unreadable chat request");
            return reply(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e.body_text()));
        }
    };

    info!(prompt = %req.prompt, "incoming prompt");

    match state.pipeline.run(&req.prompt).await {
        Ok(Outcome::Empty) => reply(StatusCode::BAD_REQUEST, "Prompt must not be empty."),
        // a blocked prompt is a normal answer, not an error status
        Ok(Outcome::Rejected { reason }) => reply(
            StatusCode::OK,
            format!("Your input violated the moderation policy. Reason: {reason}"),
        ),
        Ok(Outcome::Answered { text, redacted }) => {
            if redacted {
                info!("reply redacted before sending");
            }
            reply(StatusCode::OK, text)
        }
        Err(e) => {
            error!(error = %e, "completion call failed");
            reply(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
        }
    }
}
