// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod detection;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{build_router, start_server, ApiError, AppState, DetectionResponse};
pub use config::Settings;
pub use detection::{
    ensemble_weights, fuse, DetectionService, EnsembleResult, EnsembleWeights, ModelAvailability,
    ScoreResult, Scorer, ScorerStatus,
};
pub use vision::{
    ChatGptVerifier, DetectionModelConfig, DetectionModelManager, DistilDireModel, SbiModel,
};
