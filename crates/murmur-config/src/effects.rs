use serde::Deserialize;

/// Post-processing chain parameters
///
/// The order of the chain is fixed. Only the constants are configurable.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectsConfig {
    /// Skip every effect when false
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub compressor: CompressorConfig,
    /// Headroom subtracted after the 0 dBFS peak normalization
    #[serde(default = "default_peak_headroom_db")]
    pub peak_headroom_db: f64,
    /// De-essing cutoff
    #[serde(default = "default_low_pass_hz")]
    pub low_pass_hz: f64,
    /// Rumble cutoff
    #[serde(default = "default_high_pass_hz")]
    pub high_pass_hz: f64,
    /// Headroom left by the final normalization
    #[serde(default = "default_final_headroom_db")]
    pub final_headroom_db: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            compressor: CompressorConfig::default(),
            peak_headroom_db: default_peak_headroom_db(),
            low_pass_hz: default_low_pass_hz(),
            high_pass_hz: default_high_pass_hz(),
            final_headroom_db: default_final_headroom_db(),
        }
    }
}

/// Dynamic range compressor settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompressorConfig {
    #[serde(default = "default_threshold_db")]
    pub threshold_db: f64,
    #[serde(default = "default_ratio")]
    pub ratio: f64,
    #[serde(default = "default_attack_ms")]
    pub attack_ms: f64,
    #[serde(default = "default_release_ms")]
    pub release_ms: f64,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            threshold_db: default_threshold_db(),
            ratio: default_ratio(),
            attack_ms: default_attack_ms(),
            release_ms: default_release_ms(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_peak_headroom_db() -> f64 {
    0.5
}

#[allow(clippy::missing_const_for_fn)]
fn default_low_pass_hz() -> f64 {
    8000.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_high_pass_hz() -> f64 {
    100.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_final_headroom_db() -> f64 {
    1.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_threshold_db() -> f64 {
    -20.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_ratio() -> f64 {
    4.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_attack_ms() -> f64 {
    5.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_release_ms() -> f64 {
    50.0
}
