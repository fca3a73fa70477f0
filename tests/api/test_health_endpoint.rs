// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Health endpoint tests for GET /health

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use fabstir_deepfake_node::vision::DetectionModelInfo;
use fabstir_deepfake_node::{build_router, AppState, DetectionService, Scorer};

struct NeutralScorer;

#[async_trait]
impl Scorer for NeutralScorer {
    fn name(&self) -> &str {
        "chatgpt"
    }

    async fn predict(&self, _image: &[u8]) -> Result<(bool, f32)> {
        Ok((false, 0.5))
    }
}

fn state_with_models(models: Vec<DetectionModelInfo>) -> AppState {
    let service = DetectionService::from_parts(None, None, Arc::new(NeutralScorer));
    AppState::new(Arc::new(service), models)
}

#[tokio::test]
async fn test_health_returns_ok_and_version() {
    let app = build_router(state_with_models(vec![]));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_lists_scorer_availability() {
    let models = vec![
        DetectionModelInfo {
            name: "sbi".to_string(),
            model_type: "classifier".to_string(),
            available: false,
        },
        DetectionModelInfo {
            name: "distildire".to_string(),
            model_type: "classifier".to_string(),
            available: true,
        },
        DetectionModelInfo {
            name: "chatgpt".to_string(),
            model_type: "verifier".to_string(),
            available: true,
        },
    ];
    let app = build_router(state_with_models(models));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let models = json["models"].as_array().unwrap();
    assert_eq!(models.len(), 3);
    assert_eq!(models[0]["name"], "sbi");
    assert_eq!(models[0]["available"], false);
    assert_eq!(models[2]["name"], "chatgpt");
    assert_eq!(models[2]["available"], true);
}
