// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ChatGPT vision verifier via OpenAI-compatible API

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::detection::scorer::Scorer;
use crate::vision::image_utils::{detect_format, format_to_extension};

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Structured judgment demanded from the vision model
#[derive(Debug, serde::Deserialize)]
pub struct VerifierVerdict {
    pub is_fake: bool,
    pub confidence: f32,
    #[serde(default)]
    pub reasoning: String,
}

const DETECT_PROMPT: &str = "Analyze this image for evidence of synthetic generation or manipulation: GAN or diffusion artifacts, blending boundaries, inconsistent lighting or shadows, anatomical errors, texture irregularities. Respond with only a JSON object of the form {\"is_fake\": <true|false>, \"confidence\": <number between 0 and 1>, \"reasoning\": \"<one sentence>\"} where confidence is your certainty in the stated verdict. Do not wrap the JSON in markdown.";

/// Client for deepfake verification through a vision-reasoning API.
///
/// The verifier is always structurally available; per-call failures are
/// reported to the orchestrator as errors and degrade that request only.
pub struct ChatGptVerifier {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl ChatGptVerifier {
    /// Create a new verifier client
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        let api_base = api_base.trim_end_matches('/').to_string();
        info!(
            "ChatGPT verifier configured: api_base={}, model={}",
            api_base, model
        );

        Ok(Self {
            client,
            api_base,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Ask the vision model for a fake/real judgment on the image.
    ///
    /// Returns `(is_fake, fake_probability)`. The model's self-reported
    /// verdict is converted into a fake-probability and the label is
    /// recomputed from the conversion, so an inconsistent reply (claims
    /// fake at confidence 0.3) resolves to the probability, not the claim.
    pub async fn verify(&self, image: &[u8]) -> Result<(bool, f32)> {
        let format = detect_format(image)
            .map(format_to_extension)
            .unwrap_or("jpeg");
        let data_url = format!("data:image/{};base64,{}", format, STANDARD.encode(image));

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: serde_json::json!([
                    {"type": "text", "text": DETECT_PROMPT},
                    {"type": "image_url", "image_url": {"url": data_url}}
                ]),
            }],
            max_tokens: 300,
            temperature: 0.1,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let chat_response: ChatResponse = response.json().await?;
        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .context("Verifier reply had no choices")?;

        let verdict = parse_verdict(content)?;
        debug!(
            "Verifier verdict: is_fake={}, confidence={:.2}, reasoning={}",
            verdict.is_fake, verdict.confidence, verdict.reasoning
        );

        Ok(to_fake_probability(&verdict))
    }
}

/// Parse the model's free-text reply into a structured verdict
pub fn parse_verdict(content: &str) -> Result<VerifierVerdict> {
    let json = strip_code_fences(content);
    serde_json::from_str(json).context("Failed to parse verifier reply as JSON")
}

/// Strip markdown code-fence wrapping from a model reply, if present
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            let rest = rest.strip_suffix("```").unwrap_or(rest);
            rest.trim()
        }
        None => trimmed,
    }
}

/// Convert a verdict into `(is_fake, fake_probability)`.
///
/// If the model claims fake, the fake-probability is its stated confidence;
/// if it claims real, the fake-probability is `1 - confidence`. The label is
/// recomputed from the converted probability.
pub fn to_fake_probability(verdict: &VerifierVerdict) -> (bool, f32) {
    let confidence = verdict.confidence.clamp(0.0, 1.0);
    let fake_prob = if verdict.is_fake {
        confidence
    } else {
        1.0 - confidence
    };
    (fake_prob > 0.5, fake_prob)
}

#[async_trait]
impl Scorer for ChatGptVerifier {
    fn name(&self) -> &str {
        "chatgpt"
    }

    async fn predict(&self, image: &[u8]) -> Result<(bool, f32)> {
        self.verify(image).await
    }
}
