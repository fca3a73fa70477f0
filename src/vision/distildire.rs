// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! DistilDIRE v2 deepfake classifier
//!
//! Wraps the ConvNeXt-base (CLIP-LAION2B pretrained) ONNX export:
//! - Trained on Deepfake-Eval-2024
//! - Input: 224x224 RGB, ImageNet mean/std normalization, graph input
//!   name "input"
//! - Output: `[1, 1]` logit, sigmoid = fake probability

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::detection::scorer::Scorer;
use crate::vision::image_utils::decode_image_bytes;
use crate::vision::preprocessing::{
    to_model_tensor, DISTILDIRE_INPUT_SIZE, IMAGENET_MEAN, IMAGENET_STD,
};

/// Checkpoint file the model directory must contain
const MODEL_FILE: &str = "model.onnx";

/// ONNX-backed DistilDIRE classifier
#[derive(Clone)]
pub struct DistilDireModel {
    session: Arc<Mutex<Session>>,
    model_dir: String,
}

impl std::fmt::Debug for DistilDireModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistilDireModel")
            .field("model_dir", &self.model_dir)
            .finish_non_exhaustive()
    }
}

impl DistilDireModel {
    /// Load the DistilDIRE classifier from a model directory.
    ///
    /// # Errors
    /// Returns error if:
    /// - `model.onnx` is missing from the directory
    /// - ONNX Runtime session construction fails
    /// - The graph does not output a single `[1, 1]` logit
    pub async fn new(model_dir: &str) -> Result<Self> {
        let model_path = Path::new(model_dir).join(MODEL_FILE);
        if !model_path.exists() {
            anyhow::bail!(
                "DistilDIRE model checkpoint not found at {}",
                model_path.display()
            );
        }

        let session = build_session(&model_path)?;

        // Validate the graph shape with a throwaway inference
        {
            let tensor = to_model_tensor(
                &image::DynamicImage::new_rgb8(DISTILDIRE_INPUT_SIZE, DISTILDIRE_INPUT_SIZE),
                DISTILDIRE_INPUT_SIZE,
                Some((IMAGENET_MEAN, IMAGENET_STD)),
            );
            let mut session_ref = session.lock().unwrap();
            let outputs = session_ref.run(ort::inputs![
                "input" => Value::from_array(tensor)?
            ])?;
            let output = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract DistilDIRE validation output")?;
            if output.shape() != [1, 1] {
                anyhow::bail!(
                    "DistilDIRE model outputs unexpected dimensions: {:?} (expected [1, 1])",
                    output.shape()
                );
            }
        }

        info!("✅ DistilDIRE model loaded from {}", model_dir);

        Ok(Self {
            session,
            model_dir: model_dir.to_string(),
        })
    }

    /// Predict whether the image is a deepfake.
    ///
    /// Returns `(is_fake, fake_probability)`; the probability is the
    /// sigmoid over the single output logit.
    pub fn predict_bytes(&self, image: &[u8]) -> Result<(bool, f32)> {
        let (img, _info) = decode_image_bytes(image)?;
        let tensor = to_model_tensor(
            &img,
            DISTILDIRE_INPUT_SIZE,
            Some((IMAGENET_MEAN, IMAGENET_STD)),
        );

        let mut session_guard = self.session.lock().unwrap();
        let outputs = session_guard.run(ort::inputs![
            "input" => Value::from_array(tensor)?
        ])?;

        // Extract by index; export pipelines are inconsistent about output names
        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract DistilDIRE output tensor")?;

        let fake_prob = sigmoid(output[[0, 0]]);
        Ok((fake_prob > 0.5, fake_prob))
    }
}

fn sigmoid(logit: f32) -> f32 {
    1.0 / (1.0 + (-logit).exp())
}

fn build_session(model_path: &Path) -> Result<Arc<Mutex<Session>>> {
    // Try CUDA first, fall back to CPU if unavailable
    let cuda_result = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .context("Failed to set CUDA execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .commit_from_file(model_path);

    let session = match cuda_result {
        Ok(s) => s,
        Err(e) => {
            warn!("⚠️ CUDA execution provider failed: {}", e);
            warn!("   Falling back to CPU execution provider");
            Session::builder()
                .context("Failed to create session builder")?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .context("Failed to set CPU execution provider")?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .context("Failed to set optimization level")?
                .commit_from_file(model_path)
                .context(format!(
                    "Failed to load ONNX model from {}",
                    model_path.display()
                ))?
        }
    };

    Ok(Arc::new(Mutex::new(session)))
}

#[async_trait]
impl Scorer for DistilDireModel {
    fn name(&self) -> &str {
        "distildire"
    }

    async fn predict(&self, image: &[u8]) -> Result<(bool, f32)> {
        self.predict_bytes(image)
    }
}
