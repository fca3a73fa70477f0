// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for deepfake scoring
//!
//! This module provides:
//! - Image decoding, validation and recompression for uploads
//! - The SBI and DistilDIRE ONNX classifiers
//! - The ChatGPT vision verifier client
//! - Startup model loading and availability resolution

pub mod distildire;
pub mod image_utils;
pub mod model_manager;
pub mod preprocessing;
pub mod sbi;
pub mod verifier;

pub use distildire::DistilDireModel;
pub use image_utils::{
    compress_to_target, decode_image_bytes, detect_format, ImageError, ImageInfo,
    COMPRESSION_TARGET, MAX_UPLOAD_SIZE,
};
pub use model_manager::{DetectionModelConfig, DetectionModelInfo, DetectionModelManager};
pub use sbi::SbiModel;
pub use verifier::{ChatGptVerifier, VerifierVerdict};
