// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment-sourced node configuration

use std::env;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Node settings, read once at startup.
///
/// Values come from the environment (a `.env` file is loaded first when
/// present). Every key has a default so a bare node starts in
/// placeholder-plus-verifier mode.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP listen port
    pub api_port: u16,
    /// API key for the vision verifier
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible API
    pub openai_api_base: String,
    /// Vision model queried by the verifier
    pub openai_vision_model: String,
    /// Directory holding the SBI `model.onnx`
    pub sbi_model_dir: String,
    /// Directory holding the DistilDIRE `model.onnx`
    pub distildire_model_dir: String,
}

impl Settings {
    /// Read settings from the environment
    pub fn from_env() -> Self {
        let api_port = env_or("API_PORT", "8000").parse::<u16>().unwrap_or(8000);

        Self {
            api_port,
            openai_api_key: env_or("OPENAI_API_KEY", ""),
            openai_api_base: env_or("OPENAI_API_BASE", "https://api.openai.com"),
            openai_vision_model: env_or("OPENAI_VISION_MODEL", "gpt-4o"),
            sbi_model_dir: env_or("MODEL_SBI_PATH", "./models/sbi-onnx"),
            distildire_model_dir: env_or("MODEL_DISTILDIRE_PATH", "./models/distildire-onnx"),
        }
    }
}
