// Thin HTTP facade over the suggestion pipeline. The UI posts the inbound
// context JSON and always gets back three options plus a source flag; it
// never sees a bare exception from the pipeline.
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::context::SessionContext;
use crate::error::AppError;
use crate::providers::{OptionsGateway, OptionsResponse};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<OptionsGateway>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/next-options", post(next_options))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

async fn next_options(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<OptionsResponse>, (StatusCode, Json<Value>)> {
    let context = SessionContext::normalize(body).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
    })?;

    Ok(Json(state.gateway.next_options(&context).await))
}

pub async fn serve(state: AppState, port: u16) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("Campaign Copilot API listening on http://localhost:{port}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
