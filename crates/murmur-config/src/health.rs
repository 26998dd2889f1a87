use serde::Deserialize;

/// Liveness probe exposed next to `/generate`
///
/// The probe does not touch the voice backend, so it stays green while the
/// sidecar is still loading the model.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Route for the probe, `/health` by default
    #[serde(default = "health_path")]
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: enabled_by_default(),
            path: health_path(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn enabled_by_default() -> bool {
    true
}

fn health_path() -> String {
    "/health".to_string()
}
