// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Detection orchestration tests with stub scorers
//!
//! The service is exercised entirely through the `Scorer` seam, so these
//! tests pin the degrade-and-continue policy without any model files or
//! network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use fabstir_deepfake_node::{DetectionService, Scorer, ScorerStatus};

/// Scorer returning a fixed prediction and counting its invocations
struct FixedScorer {
    name: &'static str,
    result: (bool, f32),
    calls: Arc<AtomicUsize>,
}

impl FixedScorer {
    fn new(name: &'static str, result: (bool, f32)) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Arc::new(Self {
                name,
                result,
                calls: calls.clone(),
            }),
            calls,
        )
    }
}

#[async_trait]
impl Scorer for FixedScorer {
    fn name(&self) -> &str {
        self.name
    }

    async fn predict(&self, _image: &[u8]) -> Result<(bool, f32)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result)
    }
}

/// Scorer whose pipeline always fails
struct FailingScorer {
    name: &'static str,
}

#[async_trait]
impl Scorer for FailingScorer {
    fn name(&self) -> &str {
        self.name
    }

    async fn predict(&self, _image: &[u8]) -> Result<(bool, f32)> {
        anyhow::bail!("{} pipeline exploded", self.name)
    }
}

const IMAGE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

#[tokio::test]
async fn test_all_three_scorers_fused() {
    let (sbi, _) = FixedScorer::new("sbi", (false, 0.2));
    let (distildire, _) = FixedScorer::new("distildire", (true, 0.7));
    let (chatgpt, _) = FixedScorer::new("chatgpt", (true, 0.6));

    let service = DetectionService::from_parts(Some(sbi), Some(distildire), chatgpt);
    let result = service.detect(IMAGE).await;

    assert!((result.confidence - 0.515).abs() < 1e-6);
    assert!(result.is_fake);
    assert_eq!(result.ensemble_mode, "3_models_active");
    assert_eq!(result.sbi.status, ScorerStatus::Active);
    assert_eq!(result.distildire.status, ScorerStatus::Active);
    assert_eq!(result.chatgpt.status, ScorerStatus::Active);
}

#[tokio::test]
async fn test_each_scorer_called_exactly_once() {
    let (sbi, sbi_calls) = FixedScorer::new("sbi", (false, 0.4));
    let (distildire, distildire_calls) = FixedScorer::new("distildire", (false, 0.4));
    let (chatgpt, chatgpt_calls) = FixedScorer::new("chatgpt", (false, 0.4));

    let service = DetectionService::from_parts(Some(sbi), Some(distildire), chatgpt);
    service.detect(IMAGE).await;

    assert_eq!(sbi_calls.load(Ordering::SeqCst), 1);
    assert_eq!(distildire_calls.load(Ordering::SeqCst), 1);
    assert_eq!(chatgpt_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unavailable_sbi_uses_two_model_row() {
    // SBI never loaded; the distildire+verifier row applies
    let (distildire, _) = FixedScorer::new("distildire", (true, 0.9));
    let (chatgpt, _) = FixedScorer::new("chatgpt", (false, 0.3));

    let service = DetectionService::from_parts(None, Some(distildire), chatgpt);
    let result = service.detect(IMAGE).await;

    // 0.50*0.9 + 0.50*0.3 = 0.6
    assert!((result.confidence - 0.6).abs() < 1e-6);
    assert_eq!(result.ensemble_mode, "2_models_active");
    assert_eq!(result.sbi.status, ScorerStatus::Placeholder);
    assert!(!result.sbi.is_fake);
    assert_eq!(result.sbi.confidence, 0.5);
}

#[tokio::test]
async fn test_verifier_only_mode() {
    let (chatgpt, _) = FixedScorer::new("chatgpt", (true, 0.8));

    let service = DetectionService::from_parts(None, None, chatgpt);
    let result = service.detect(IMAGE).await;

    assert!((result.confidence - 0.8).abs() < 1e-6);
    assert!(result.is_fake);
    assert_eq!(result.ensemble_mode, "1_models_active");
    assert!(!service.availability().sbi);
    assert!(!service.availability().distildire);
}

#[tokio::test]
async fn test_failing_verifier_degrades_to_conservative_zero() {
    let (sbi, _) = FixedScorer::new("sbi", (true, 0.9));
    let (distildire, _) = FixedScorer::new("distildire", (true, 0.9));
    let chatgpt = Arc::new(FailingScorer { name: "chatgpt" });

    let service = DetectionService::from_parts(Some(sbi), Some(distildire), chatgpt);
    let result = service.detect(IMAGE).await;

    // 0.30*0.9 + 0.35*0.9 + 0.35*0.0 = 0.585; error is weighted, not excluded
    assert!((result.confidence - 0.585).abs() < 1e-6);
    assert!(result.is_fake);
    assert_eq!(result.chatgpt.status, ScorerStatus::Error);
    assert!(!result.chatgpt.is_fake);
    assert_eq!(result.chatgpt.confidence, 0.0);
    // The row is still the three-model row
    assert_eq!(result.ensemble_mode, "3_models_active");
}

#[tokio::test]
async fn test_failing_local_classifier_degrades_to_neutral_half() {
    let sbi = Arc::new(FailingScorer { name: "sbi" });
    let (distildire, _) = FixedScorer::new("distildire", (true, 0.8));
    let (chatgpt, _) = FixedScorer::new("chatgpt", (true, 0.8));

    let service = DetectionService::from_parts(Some(sbi), Some(distildire), chatgpt);
    let result = service.detect(IMAGE).await;

    assert_eq!(result.sbi.status, ScorerStatus::Error);
    assert_eq!(result.sbi.confidence, 0.5);
    // 0.30*0.5 + 0.35*0.8 + 0.35*0.8 = 0.71
    assert!((result.confidence - 0.71).abs() < 1e-6);
}

#[tokio::test]
async fn test_all_scorers_failing_never_fails_the_request() {
    let sbi = Arc::new(FailingScorer { name: "sbi" });
    let distildire = Arc::new(FailingScorer { name: "distildire" });
    let chatgpt = Arc::new(FailingScorer { name: "chatgpt" });

    let service = DetectionService::from_parts(Some(sbi), Some(distildire), chatgpt);
    let result = service.detect(IMAGE).await;

    // 0.30*0.5 + 0.35*0.5 + 0.35*0.0 = 0.325
    assert!((result.confidence - 0.325).abs() < 1e-6);
    assert!(!result.is_fake);
    assert_eq!(result.sbi.status, ScorerStatus::Error);
    assert_eq!(result.distildire.status, ScorerStatus::Error);
    assert_eq!(result.chatgpt.status, ScorerStatus::Error);
}
