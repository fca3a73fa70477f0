// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection orchestration
//!
//! Invokes each scorer sequentially for a request and folds the results
//! through the ensemble weight table. Partial failure of any one scorer
//! degrades ensemble quality but never fails the request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::detection::ensemble::{fuse, EnsembleResult, ModelAvailability, ScoreResult};
use crate::detection::scorer::Scorer;
use crate::vision::model_manager::DetectionModelManager;

/// Per-request deepfake detection over the scorer ensemble.
///
/// Scorers are constructed once at startup and treated as read-only for the
/// lifetime of the process. The two local classifiers are optional; the
/// external verifier is always present.
pub struct DetectionService {
    sbi: Option<Arc<dyn Scorer>>,
    distildire: Option<Arc<dyn Scorer>>,
    chatgpt: Arc<dyn Scorer>,
}

impl DetectionService {
    /// Wire the service from the startup model manager plus the verifier
    pub fn new(manager: &DetectionModelManager, chatgpt: Arc<dyn Scorer>) -> Self {
        Self {
            sbi: manager.get_sbi_model().map(|m| m as Arc<dyn Scorer>),
            distildire: manager.get_distildire_model().map(|m| m as Arc<dyn Scorer>),
            chatgpt,
        }
    }

    /// Assemble the service from explicit scorers (used by tests)
    pub fn from_parts(
        sbi: Option<Arc<dyn Scorer>>,
        distildire: Option<Arc<dyn Scorer>>,
        chatgpt: Arc<dyn Scorer>,
    ) -> Self {
        Self {
            sbi,
            distildire,
            chatgpt,
        }
    }

    /// Structural availability, fixed at construction
    pub fn availability(&self) -> ModelAvailability {
        ModelAvailability {
            sbi: self.sbi.is_some(),
            distildire: self.distildire.is_some(),
        }
    }

    /// Run all scorers against the image and fuse their outputs.
    ///
    /// Invocations are sequential on the calling task. An unavailable
    /// classifier contributes its fixed placeholder score without being
    /// called; a failing call contributes its fallback score under the same
    /// weight it would have carried.
    pub async fn detect(&self, image: &[u8]) -> EnsembleResult {
        let availability = self.availability();

        let sbi = self.invoke_local(self.sbi.as_deref(), image).await;
        let distildire = self.invoke_local(self.distildire.as_deref(), image).await;
        let chatgpt = self.invoke_verifier(image).await;

        let result = fuse(availability, sbi, distildire, chatgpt);
        info!(
            "Detection complete: is_fake={}, confidence={:.4}, mode={}",
            result.is_fake, result.confidence, result.ensemble_mode
        );
        result
    }

    async fn invoke_local(&self, scorer: Option<&dyn Scorer>, image: &[u8]) -> ScoreResult {
        let Some(scorer) = scorer else {
            return ScoreResult::placeholder();
        };

        match scorer.predict(image).await {
            Ok((is_fake, confidence)) => {
                debug!(
                    "{} prediction: is_fake={}, confidence={:.4}",
                    scorer.name(),
                    is_fake,
                    confidence
                );
                ScoreResult::active(is_fake, confidence)
            }
            Err(e) => {
                warn!("{} prediction failed: {}", scorer.name(), e);
                ScoreResult::error(0.5)
            }
        }
    }

    async fn invoke_verifier(&self, image: &[u8]) -> ScoreResult {
        match self.chatgpt.predict(image).await {
            Ok((is_fake, confidence)) => {
                debug!(
                    "{} verdict: is_fake={}, confidence={:.4}",
                    self.chatgpt.name(),
                    is_fake,
                    confidence
                );
                ScoreResult::active(is_fake, confidence)
            }
            Err(e) => {
                warn!("{} verification failed: {}", self.chatgpt.name(), e);
                ScoreResult::error(0.0)
            }
        }
    }
}
