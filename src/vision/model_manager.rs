// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model manager for loading the local deepfake classifiers

use std::sync::Arc;

use crate::detection::ensemble::ModelAvailability;
use crate::vision::distildire::DistilDireModel;
use crate::vision::sbi::SbiModel;

/// Configuration for loading the local classifiers
#[derive(Debug, Clone)]
pub struct DetectionModelConfig {
    /// Path to the SBI model directory (optional)
    pub sbi_model_dir: Option<String>,
    /// Path to the DistilDIRE model directory (optional)
    pub distildire_model_dir: Option<String>,
}

impl Default for DetectionModelConfig {
    fn default() -> Self {
        Self {
            sbi_model_dir: Some("./models/sbi-onnx".to_string()),
            distildire_model_dir: Some("./models/distildire-onnx".to_string()),
        }
    }
}

/// Information about a scorer, as reported by the health endpoint
#[derive(Debug, Clone, serde::Serialize)]
pub struct DetectionModelInfo {
    /// Scorer name
    pub name: String,
    /// Scorer type (classifier, verifier)
    pub model_type: String,
    /// Whether the scorer is structurally available
    pub available: bool,
}

/// Manager for the local deepfake classifiers.
///
/// Classifiers whose checkpoint is missing or fails to load are left out;
/// the service falls back to placeholder scores for them. Availability is
/// resolved once here and never changes for the process lifetime.
pub struct DetectionModelManager {
    sbi_model: Option<Arc<SbiModel>>,
    distildire_model: Option<Arc<DistilDireModel>>,
}

impl DetectionModelManager {
    /// Create a new DetectionModelManager with the given configuration.
    ///
    /// Construction failures are logged and tolerated; they never crash
    /// the process.
    pub async fn new(config: DetectionModelConfig) -> Self {
        let sbi_model = if let Some(ref dir) = config.sbi_model_dir {
            match SbiModel::new(dir).await {
                Ok(model) => Some(Arc::new(model)),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Failed to load SBI model from {}: {} (placeholder mode)",
                        dir,
                        e
                    );
                    None
                }
            }
        } else {
            None
        };

        let distildire_model = if let Some(ref dir) = config.distildire_model_dir {
            match DistilDireModel::new(dir).await {
                Ok(model) => Some(Arc::new(model)),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Failed to load DistilDIRE model from {}: {} (placeholder mode)",
                        dir,
                        e
                    );
                    None
                }
            }
        } else {
            None
        };

        Self {
            sbi_model,
            distildire_model,
        }
    }

    /// Get the SBI classifier if available
    pub fn get_sbi_model(&self) -> Option<Arc<SbiModel>> {
        self.sbi_model.clone()
    }

    /// Get the DistilDIRE classifier if available
    pub fn get_distildire_model(&self) -> Option<Arc<DistilDireModel>> {
        self.distildire_model.clone()
    }

    /// Structural availability pair, fixed until restart
    pub fn availability(&self) -> ModelAvailability {
        ModelAvailability {
            sbi: self.sbi_model.is_some(),
            distildire: self.distildire_model.is_some(),
        }
    }

    /// List all scorers with their availability (verifier included)
    pub fn list_models(&self) -> Vec<DetectionModelInfo> {
        vec![
            DetectionModelInfo {
                name: "sbi".to_string(),
                model_type: "classifier".to_string(),
                available: self.sbi_model.is_some(),
            },
            DetectionModelInfo {
                name: "distildire".to_string(),
                model_type: "classifier".to_string(),
                available: self.distildire_model.is_some(),
            },
            DetectionModelInfo {
                name: "chatgpt".to_string(),
                model_type: "verifier".to_string(),
                available: true,
            },
        ]
    }
}
