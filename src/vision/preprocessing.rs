// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the deepfake classifiers

use image::DynamicImage;
use ndarray::Array4;

/// Input size for the SBI classifier (EfficientNet-B4 export)
pub const SBI_INPUT_SIZE: u32 = 380;

/// Input size for the DistilDIRE classifier (ConvNeXt-base export)
pub const DISTILDIRE_INPUT_SIZE: u32 = 224;

/// ImageNet normalization mean values
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet normalization std values
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Convert an image to an NCHW float tensor for classifier inference.
///
/// Steps:
/// 1. Resize to `input_size` x `input_size` (exact, matching the training
///    transforms, which stretch rather than crop)
/// 2. Convert to RGB
/// 3. Scale pixels to [0, 1]; when `normalization` is given, additionally
///    apply `(pixel - mean) / std` per channel
/// 4. Fill a `[1, 3, H, W]` tensor
pub fn to_model_tensor(
    image: &DynamicImage,
    input_size: u32,
    normalization: Option<([f32; 3], [f32; 3])>,
) -> Array4<f32> {
    let resized = image.resize_exact(
        input_size,
        input_size,
        image::imageops::FilterType::Lanczos3,
    );
    let rgb = resized.to_rgb8();

    let size = input_size as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for y in 0..size {
        for x in 0..size {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            for c in 0..3 {
                let scaled = pixel[c] as f32 / 255.0;
                tensor[[0, c, y, x]] = match normalization {
                    Some((mean, std)) => (scaled - mean[c]) / std[c],
                    None => scaled,
                };
            }
        }
    }

    tensor
}
