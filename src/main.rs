// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::{env, sync::Arc};

use anyhow::Result;
use fabstir_deepfake_node::{
    api::{start_server, AppState},
    config::Settings,
    detection::{DetectionService, Scorer},
    vision::{ChatGptVerifier, DetectionModelConfig, DetectionModelManager},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Fabstir Deepfake Node...\n");
    println!(
        "📦 BUILD VERSION: {}",
        fabstir_deepfake_node::version::VERSION
    );
    println!(
        "📅 Build Date: {}",
        fabstir_deepfake_node::version::BUILD_DATE
    );
    println!();

    let settings = Settings::from_env();

    // Load the local classifiers; failures fall back to placeholder mode
    println!("🧠 Loading deepfake classifiers...");
    let manager = DetectionModelManager::new(DetectionModelConfig {
        sbi_model_dir: Some(settings.sbi_model_dir.clone()),
        distildire_model_dir: Some(settings.distildire_model_dir.clone()),
    })
    .await;

    let availability = manager.availability();
    println!(
        "   SBI: {}",
        if availability.sbi { "active" } else { "placeholder" }
    );
    println!(
        "   DistilDIRE: {}",
        if availability.distildire {
            "active"
        } else {
            "placeholder"
        }
    );
    println!(
        "   Ensemble mode: {}_models_active",
        availability.active_count()
    );

    if settings.openai_api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; verifier calls will fail and degrade");
    }

    let verifier = ChatGptVerifier::new(
        &settings.openai_api_base,
        &settings.openai_api_key,
        &settings.openai_vision_model,
    )?;

    let service = DetectionService::new(&manager, Arc::new(verifier) as Arc<dyn Scorer>);
    let state = AppState::new(Arc::new(service), manager.list_models());

    start_server(state, settings.api_port)
        .await
        .map_err(|e| anyhow::anyhow!("API server failed: {}", e))?;

    Ok(())
}
