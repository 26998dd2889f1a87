use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::{
    error::{Result, SpeechError},
    http_client::http_client,
};

use super::{SynthesisRequest, Synthesizer};

/// Voice model hosted by an inference sidecar
///
/// The sidecar receives the full parameter set as JSON on `/synthesize` and
/// answers with the WAV bytes.
pub(crate) struct SidecarSynthesizer {
    client: Client,
    endpoint: String,
}

impl SidecarSynthesizer {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let client = http_client(timeout).map_err(|e| SpeechError::Config(format!("failed to build HTTP client: {e}")))?;
        let endpoint = format!("{}/synthesize", base_url.as_str().trim_end_matches('/'));

        Ok(Self { client, endpoint })
    }
}

#[derive(serde::Serialize)]
struct SidecarRequest<'a> {
    text: &'a str,
    speaker_wav: std::borrow::Cow<'a, str>,
    language: &'a str,
    model: &'a str,
    half_precision: bool,
    speed: f64,
    temperature: f64,
    repetition_penalty: f64,
    top_k: u32,
    top_p: f64,
}

/// Pull `detail` out of a JSON error body, falling back to the raw text
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl Synthesizer for SidecarSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest<'_>, output: &Path) -> Result<()> {
        tracing::debug!(
            endpoint = %self.endpoint,
            language = request.language,
            text_len = request.text.len(),
            "sidecar synthesis request"
        );

        let body = SidecarRequest {
            text: request.text,
            speaker_wav: request.speaker_wav.to_string_lossy(),
            language: request.language,
            model: request.model,
            half_precision: request.half_precision,
            speed: request.generation.speed,
            temperature: request.generation.temperature,
            repetition_penalty: request.generation.repetition_penalty,
            top_k: request.generation.top_k,
            top_p: request.generation.top_p,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await.map_err(|e| {
            tracing::error!("sidecar request failed: {e}");
            SpeechError::Connection(format!("failed to reach {}: {e}", self.endpoint))
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            let detail = error_detail(&error_text);

            tracing::error!("sidecar error ({status}): {detail}");

            return Err(SpeechError::Synthesis(detail));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Connection(format!("failed to read sidecar response: {e}")))?;

        if audio.is_empty() {
            return Err(SpeechError::Synthesis("sidecar returned no audio".to_string()));
        }

        tokio::fs::write(output, &audio).await?;

        tracing::debug!(bytes = audio.len(), "sidecar synthesis complete");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "sidecar"
    }
}
