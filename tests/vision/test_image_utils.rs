// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Image utility tests: decoding, sniffing and upload recompression

use std::io::Cursor;

use fabstir_deepfake_node::vision::{
    compress_to_target, decode_image_bytes, detect_format, ImageError, COMPRESSION_TARGET,
    MAX_UPLOAD_SIZE,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Encode deterministic noise as PNG. Noise is incompressible losslessly,
/// so the lossy JPEG recompression path always has room to win.
fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let mut v = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
        v ^= v >> 13;
        v = v.wrapping_mul(0xC2B2_AE3D);
        *pixel = Rgb([(v & 0xFF) as u8, ((v >> 8) & 0xFF) as u8, ((v >> 16) & 0xFF) as u8]);
    }
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(image::codecs::png::PngEncoder::new(Cursor::new(&mut bytes)))
        .unwrap();
    bytes
}

#[test]
fn test_decode_roundtrip_png() {
    let bytes = noise_png(32, 32);
    let (img, info) = decode_image_bytes(&bytes).unwrap();
    assert_eq!(info.format, ImageFormat::Png);
    assert_eq!((img.width(), img.height()), (32, 32));
    assert_eq!(info.size_bytes, bytes.len());
}

#[test]
fn test_decode_rejects_oversized_payload() {
    let huge = vec![0u8; MAX_UPLOAD_SIZE + 1];
    assert!(matches!(
        decode_image_bytes(&huge).unwrap_err(),
        ImageError::TooLarge(_, _)
    ));
}

#[test]
fn test_detect_format_from_encoded_bytes() {
    let bytes = noise_png(8, 8);
    assert_eq!(detect_format(&bytes).unwrap(), ImageFormat::Png);
}

#[test]
fn test_recompression_reaches_target() {
    let bytes = noise_png(256, 256);
    let target = bytes.len() / 2;
    let out = compress_to_target(&bytes, target).unwrap();

    assert!(out.len() <= target);
    // Recompressed payload is a decodable JPEG
    let (_img, info) = decode_image_bytes(&out).unwrap();
    assert_eq!(info.format, ImageFormat::Jpeg);
}

#[test]
fn test_recompression_preserves_dimensions() {
    let bytes = noise_png(128, 96);
    let out = compress_to_target(&bytes, bytes.len() / 2).unwrap();
    let (img, _info) = decode_image_bytes(&out).unwrap();
    assert_eq!((img.width(), img.height()), (128, 96));
}

#[test]
fn test_recompression_skips_payloads_under_target() {
    let bytes = noise_png(16, 16);
    assert!(bytes.len() < COMPRESSION_TARGET);
    let out = compress_to_target(&bytes, COMPRESSION_TARGET).unwrap();
    assert_eq!(out, bytes);
}

#[test]
fn test_recompression_floor_is_best_effort() {
    let bytes = noise_png(64, 64);
    // Unreachable target; the quality floor result is returned as-is
    let out = compress_to_target(&bytes, 1).unwrap();
    assert!(decode_image_bytes(&out).is_ok());
}
