use std::path::Path;

use crate::{BackendConfig, Config, OutputFormat};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Load from `path` when given, otherwise use the built-in defaults
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`]
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Parse configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_synthesis()?;
        self.validate_effects()?;
        self.validate_output()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_synthesis(&self) -> anyhow::Result<()> {
        let synthesis = &self.synthesis;
        let generation = &synthesis.generation;

        if synthesis.language.trim().is_empty() {
            anyhow::bail!("synthesis.language must not be empty");
        }

        if generation.speed <= 0.0 {
            anyhow::bail!("synthesis.generation.speed must be greater than 0");
        }

        if generation.top_k == 0 {
            anyhow::bail!("synthesis.generation.top_k must be at least 1");
        }

        if !(generation.top_p > 0.0 && generation.top_p <= 1.0) {
            anyhow::bail!("synthesis.generation.top_p must be in (0, 1]");
        }

        if synthesis.max_concurrency == Some(0) {
            anyhow::bail!("synthesis.max_concurrency must be at least 1");
        }

        if let BackendConfig::Command { program, .. } = &synthesis.backend
            && program.trim().is_empty()
        {
            anyhow::bail!("synthesis.backend.program must not be empty");
        }

        synthesis.backend.timeout().map_err(|e| anyhow::anyhow!(e))?;

        Ok(())
    }

    fn validate_effects(&self) -> anyhow::Result<()> {
        let effects = &self.effects;

        if effects.compressor.ratio < 1.0 {
            anyhow::bail!("effects.compressor.ratio must be at least 1.0");
        }

        if effects.compressor.attack_ms <= 0.0 || effects.compressor.release_ms <= 0.0 {
            anyhow::bail!("effects.compressor attack and release must be greater than 0");
        }

        if effects.low_pass_hz <= 0.0 || effects.high_pass_hz <= 0.0 {
            anyhow::bail!("effects filter cutoffs must be greater than 0");
        }

        if effects.peak_headroom_db < 0.0 || effects.final_headroom_db < 0.0 {
            anyhow::bail!("effects headroom values must not be negative");
        }

        Ok(())
    }

    fn validate_output(&self) -> anyhow::Result<()> {
        if self.output.format == OutputFormat::Mp3 && self.output.bitrate.trim().is_empty() {
            anyhow::bail!("output.bitrate must not be empty for mp3 output");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(otlp) = self.telemetry.as_ref().and_then(|t| t.otlp.as_ref()) else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&otlp.sampling_rate) {
            anyhow::bail!("telemetry.otlp.sampling_rate must be between 0.0 and 1.0");
        }

        otlp.export_interval().map_err(|e| anyhow::anyhow!("telemetry.otlp: {e}"))?;

        Ok(())
    }
}
