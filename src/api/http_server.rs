// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};

use crate::api::detect::detect_handler;
use crate::detection::DetectionService;
use crate::vision::model_manager::DetectionModelInfo;
use crate::vision::MAX_UPLOAD_SIZE;

// Slack for multipart framing on top of the upload ceiling
const BODY_LIMIT: usize = MAX_UPLOAD_SIZE + 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub detection: Arc<DetectionService>,
    pub models: Vec<DetectionModelInfo>,
}

impl AppState {
    pub fn new(detection: Arc<DetectionService>, models: Vec<DetectionModelInfo>) -> Self {
        Self { detection, models }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub models: serde_json::Value,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Detection endpoint
        .route("/api/v1/detect", post(detect_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port).parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: crate::version::VERSION_NUMBER.to_string(),
        models: serde_json::json!(state.models),
    };
    axum::response::Json(health)
}
