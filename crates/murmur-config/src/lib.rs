#![allow(clippy::must_use_candidate)]

pub mod effects;
mod env;
pub mod health;
mod loader;
pub mod output;
pub mod server;
pub mod synthesis;
pub mod telemetry;

use serde::Deserialize;

pub use effects::*;
pub use health::*;
pub use output::*;
pub use server::*;
pub use synthesis::*;
pub use telemetry::{ExportProtocol, LogFormat, OtlpConfig, TelemetryConfig};

/// Top-level murmur configuration
///
/// Every section defaults to the deployment constants, so an empty file
/// (or no file at all) yields a working configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Voice model and backend configuration
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    /// Post-processing chain configuration
    #[serde(default)]
    pub effects: EffectsConfig,
    /// Output encoding configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
