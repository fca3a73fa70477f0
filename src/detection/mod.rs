// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deepfake detection core: scorer interface, orchestration and ensemble fusion

pub mod ensemble;
pub mod scorer;
pub mod service;

pub use ensemble::{
    ensemble_weights, fuse, EnsembleResult, EnsembleWeights, ModelAvailability, ScoreResult,
    ScorerStatus,
};
pub use scorer::Scorer;
pub use service::DetectionService;
