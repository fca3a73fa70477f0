// Version information for the Fabstir Deepfake Node

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-hybrid-ensemble-2025-08-04";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-04";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "sbi-classifier",
    "distildire-classifier",
    "chatgpt-vision-verifier",
    "weighted-ensemble",
    "upload-recompression",
    "placeholder-fallback",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Deepfake Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
