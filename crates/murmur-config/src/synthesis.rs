use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use url::Url;

/// Voice model configuration
///
/// These values are fixed per deployment. Callers of `/generate` can only
/// supply the text.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Model identifier passed through to the backend
    #[serde(default = "default_model")]
    pub model: String,
    /// Reference voice sample used for cloning
    #[serde(default = "default_reference_wav")]
    pub reference_wav: PathBuf,
    /// Target language code
    #[serde(default = "default_language")]
    pub language: String,
    /// Ask the backend to run the model in half precision
    #[serde(default = "default_true")]
    pub half_precision: bool,
    /// Directory for per-request waveform files, system temp dir when unset
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    /// Upper bound on simultaneous backend invocations, unbounded when unset
    #[serde(default)]
    pub max_concurrency: Option<usize>,
    /// Sampling parameters
    #[serde(default)]
    pub generation: GenerationConfig,
    /// How the model is reached
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            reference_wav: default_reference_wav(),
            language: default_language(),
            half_precision: true,
            temp_dir: None,
            max_concurrency: None,
            generation: GenerationConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

/// Sampling parameters forwarded to the voice model
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Speaking rate multiplier
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Higher is more expressive, lower is more stable
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Penalty against repeated tokens
    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f64,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            temperature: default_temperature(),
            repetition_penalty: default_repetition_penalty(),
            top_k: default_top_k(),
            top_p: default_top_p(),
        }
    }
}

/// Synthesis backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum BackendConfig {
    /// Inference sidecar reached over HTTP
    Http {
        #[serde(default = "default_base_url")]
        base_url: Url,
        #[serde(default = "default_timeout")]
        timeout: String,
    },
    /// Synthesizer program spawned once per request
    Command {
        program: String,
        #[serde(default = "default_command_args")]
        args: Vec<String>,
        #[serde(default = "default_timeout")]
        timeout: String,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Http {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl BackendConfig {
    /// Per-request timeout for the backend
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a valid duration
    pub fn timeout(&self) -> Result<Duration, String> {
        let raw = match self {
            Self::Http { timeout, .. } | Self::Command { timeout, .. } => timeout,
        };

        duration_str::parse(raw).map_err(|e| format!("invalid backend timeout '{raw}': {e}"))
    }
}

fn default_model() -> String {
    "tts_models/multilingual/multi-dataset/xtts_v2".to_string()
}

fn default_reference_wav() -> PathBuf {
    PathBuf::from("/app/reference_voice.wav")
}

fn default_language() -> String {
    "en".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_speed() -> f64 {
    0.98
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature() -> f64 {
    0.65
}

#[allow(clippy::missing_const_for_fn)]
fn default_repetition_penalty() -> f64 {
    12.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_top_k() -> u32 {
    50
}

#[allow(clippy::missing_const_for_fn)]
fn default_top_p() -> f64 {
    0.90
}

fn default_base_url() -> Url {
    Url::parse("http://127.0.0.1:8020").expect("must be a valid URL")
}

fn default_timeout() -> String {
    "120s".to_string()
}

/// Argument template for the Coqui `tts` command line
fn default_command_args() -> Vec<String> {
    [
        "--model_name",
        "{model}",
        "--text",
        "{text}",
        "--speaker_wav",
        "{speaker_wav}",
        "--language_idx",
        "{language}",
        "--out_path",
        "{out_path}",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
