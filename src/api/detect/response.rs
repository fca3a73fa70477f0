// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoint response types

use serde::{Deserialize, Serialize};

use crate::detection::ensemble::{EnsembleResult, ScoreResult, ScorerStatus};

/// One scorer's entry in the response breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelScore {
    pub is_fake: bool,
    pub confidence: f32,
    pub status: ScorerStatus,
}

impl From<ScoreResult> for ModelScore {
    fn from(result: ScoreResult) -> Self {
        Self {
            is_fake: result.is_fake,
            confidence: result.confidence,
            status: result.status,
        }
    }
}

/// Per-scorer breakdown keyed by scorer name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBreakdown {
    pub sbi: ModelScore,
    pub distildire: ModelScore,
    pub chatgpt: ModelScore,
}

/// Response for POST /api/v1/detect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    /// Final ensemble verdict
    pub is_fake: bool,
    /// Final fake-probability in [0, 1]
    pub confidence: f32,
    /// How many scorers were structurally available ("<n>_models_active")
    pub ensemble_mode: String,
    /// Full per-scorer breakdown for observability
    pub models: ModelBreakdown,
}

impl From<EnsembleResult> for DetectionResponse {
    fn from(result: EnsembleResult) -> Self {
        Self {
            is_fake: result.is_fake,
            confidence: result.confidence,
            ensemble_mode: result.ensemble_mode,
            models: ModelBreakdown {
                sbi: result.sbi.into(),
                distildire: result.distildire.into(),
                chatgpt: result.chatgpt.into(),
            },
        }
    }
}
