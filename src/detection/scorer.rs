// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Capability interface for deepfake scorers

use anyhow::Result;
use async_trait::async_trait;

/// A component that produces a fake-probability for an image.
///
/// Implementations hide their own environment-dependent side effects (model
/// loading, device selection, network clients) behind this boundary so the
/// fusion logic can run against stub scorers in tests.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Stable name used in the response breakdown ("sbi", "distildire", "chatgpt")
    fn name(&self) -> &str;

    /// Score raw image bytes.
    ///
    /// Returns `(is_fake, fake_probability)` with the probability in [0, 1].
    /// Errors are caught by the orchestrator and converted to the scorer's
    /// fallback score; they never fail the request.
    async fn predict(&self, image: &[u8]) -> Result<(bool, f32)>;
}
