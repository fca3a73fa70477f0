// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Weighted-ensemble fusion for deepfake scorer outputs
//!
//! The ensemble is table-driven: a fixed weight row is selected from which
//! scorers were structurally available at startup, and the per-scorer
//! fake-probabilities are folded into one verdict. There is no learned
//! meta-model and no per-request adaptation.

use serde::{Deserialize, Serialize};

/// Outcome class of a single scorer invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerStatus {
    /// The scorer ran and produced a real prediction
    Active,
    /// The scorer was unavailable and a fixed neutral score was injected
    Placeholder,
    /// The scorer was invoked but its own pipeline failed
    Error,
}

/// One scorer's contribution to a request.
///
/// `confidence` is always the probability of the *fake* class, regardless of
/// which label the scorer natively reports first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub is_fake: bool,
    pub confidence: f32,
    pub status: ScorerStatus,
}

impl ScoreResult {
    /// A real prediction from a loaded scorer
    pub fn active(is_fake: bool, confidence: f32) -> Self {
        Self {
            is_fake,
            confidence,
            status: ScorerStatus::Active,
        }
    }

    /// Neutral score injected when a scorer never loaded
    pub fn placeholder() -> Self {
        Self {
            is_fake: false,
            confidence: 0.5,
            status: ScorerStatus::Placeholder,
        }
    }

    /// Fallback score when a scorer's own call failed.
    ///
    /// Local classifiers fall back to the neutral 0.5; the external verifier
    /// falls back to the conservative 0.0.
    pub fn error(confidence: f32) -> Self {
        Self {
            is_fake: false,
            confidence,
            status: ScorerStatus::Error,
        }
    }
}

/// Which local classifiers loaded at process start.
///
/// Fixed until restart; the external verifier is always structurally
/// available and is not tracked here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelAvailability {
    pub sbi: bool,
    pub distildire: bool,
}

impl ModelAvailability {
    /// Number of structurally active scorers, verifier included
    pub fn active_count(&self) -> usize {
        1 + usize::from(self.sbi) + usize::from(self.distildire)
    }
}

/// One row of the static weight table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleWeights {
    pub sbi: f32,
    pub distildire: f32,
    pub chatgpt: f32,
}

/// The full weight table, keyed on structural availability.
///
/// Exactly five combinations carry weights; rows always sum to 1.0. The
/// sbi+distildire row exists in the policy even though it cannot be selected
/// while the verifier is always available.
pub fn ensemble_weights(sbi: bool, distildire: bool, chatgpt: bool) -> Option<EnsembleWeights> {
    match (sbi, distildire, chatgpt) {
        (true, true, true) => Some(EnsembleWeights {
            sbi: 0.30,
            distildire: 0.35,
            chatgpt: 0.35,
        }),
        (true, true, false) => Some(EnsembleWeights {
            sbi: 0.40,
            distildire: 0.60,
            chatgpt: 0.0,
        }),
        (true, false, true) => Some(EnsembleWeights {
            sbi: 0.40,
            distildire: 0.0,
            chatgpt: 0.60,
        }),
        (false, true, true) => Some(EnsembleWeights {
            sbi: 0.0,
            distildire: 0.50,
            chatgpt: 0.50,
        }),
        (false, false, true) => Some(EnsembleWeights {
            sbi: 0.0,
            distildire: 0.0,
            chatgpt: 1.0,
        }),
        _ => None,
    }
}

const VERIFIER_ONLY: EnsembleWeights = EnsembleWeights {
    sbi: 0.0,
    distildire: 0.0,
    chatgpt: 1.0,
};

/// Final fused verdict plus the per-scorer breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleResult {
    pub is_fake: bool,
    pub confidence: f32,
    pub ensemble_mode: String,
    pub sbi: ScoreResult,
    pub distildire: ScoreResult,
    pub chatgpt: ScoreResult,
}

/// Fold three scorer results into the final verdict.
///
/// The weight row is chosen from startup availability only. A call-time
/// `error` result keeps its assigned weight and contributes its fallback
/// confidence to the sum; errors are never excluded from the formula.
pub fn fuse(
    availability: ModelAvailability,
    sbi: ScoreResult,
    distildire: ScoreResult,
    chatgpt: ScoreResult,
) -> EnsembleResult {
    // Verifier rows cover every (sbi, distildire) combination
    let weights = ensemble_weights(availability.sbi, availability.distildire, true)
        .unwrap_or(VERIFIER_ONLY);

    let confidence = weights.sbi * sbi.confidence
        + weights.distildire * distildire.confidence
        + weights.chatgpt * chatgpt.confidence;

    EnsembleResult {
        is_fake: confidence > 0.5,
        confidence,
        ensemble_mode: format!("{}_models_active", availability.active_count()),
        sbi,
        distildire,
        chatgpt,
    }
}
