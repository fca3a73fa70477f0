// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detect endpoint handler

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::Multipart;
use tracing::{debug, warn};

use super::response::DetectionResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::image_utils::{compress_to_target, COMPRESSION_TARGET, MAX_UPLOAD_SIZE};

/// POST /api/v1/detect - Classify an uploaded image as authentic or deepfake
///
/// Accepts a multipart upload with the image in the `file` field and runs
/// the scorer ensemble over it.
///
/// # Errors
/// - 400 Bad Request: missing `file` field, non-image content type, or
///   upload above the size ceiling
/// - 500 Internal Server Error: recompression or orchestration failure
pub async fn detect_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DetectionResponse>, (StatusCode, String)> {
    // 1. Pull the `file` field out of the multipart stream
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read upload: {}", e)))?;
            upload = Some((content_type, data.to_vec()));
            break;
        }
    }

    let Some((content_type, data)) = upload else {
        let err = ApiError::ValidationError {
            field: "file".to_string(),
            message: "file field is required".to_string(),
        };
        warn!("Detect validation failed: {}", err);
        return Err((StatusCode::BAD_REQUEST, err.to_string()));
    };

    // 2. Validate before any image work; oversized uploads never reach
    //    the detection component
    if let Err(e) = validate_upload(content_type.as_deref(), data.len()) {
        warn!("Detect validation failed: {}", e);
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    debug!(
        "Detect request: content_type={:?}, {} bytes",
        content_type,
        data.len()
    );

    // 3. Recompress oversized payloads toward the working target
    let data = if data.len() > COMPRESSION_TARGET {
        compress_to_target(&data, COMPRESSION_TARGET).map_err(|e| {
            warn!("Upload recompression failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to compress image: {}", e),
            )
        })?
    } else {
        data
    };

    // 4. Run the ensemble
    let result = state.detection.detect(&data).await;

    Ok(Json(DetectionResponse::from(result)))
}

/// Validate the upload's declared content type and size
pub(crate) fn validate_upload(content_type: Option<&str>, size: usize) -> Result<(), ApiError> {
    match content_type {
        Some(ct) if ct.starts_with("image/") => {}
        Some(ct) => {
            return Err(ApiError::InvalidRequest(format!(
                "File must be an image, got content type '{}'",
                ct
            )));
        }
        None => {
            return Err(ApiError::InvalidRequest(
                "File must be an image (no content type provided)".to_string(),
            ));
        }
    }

    if size == 0 {
        return Err(ApiError::ValidationError {
            field: "file".to_string(),
            message: "uploaded file is empty".to_string(),
        });
    }

    if size > MAX_UPLOAD_SIZE {
        return Err(ApiError::InvalidRequest(format!(
            "File too large: {} bytes (max: {} bytes)",
            size, MAX_UPLOAD_SIZE
        )));
    }

    Ok(())
}
