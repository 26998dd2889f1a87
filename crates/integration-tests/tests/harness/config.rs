//! Programmatic configuration builder for integration tests

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use murmur_config::{BackendConfig, Config, OutputFormat};
use tempfile::TempDir;

use super::wav;

/// Builder for test configurations rooted in a private temp directory
///
/// The directory holds the reference voice and the scratch directory used
/// for intermediate waveforms.
pub struct ConfigBuilder {
    root: TempDir,
    config: Config,
}

impl ConfigBuilder {
    /// Defaults plus a reference voice on disk and WAV output
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let reference = root.path().join("reference_voice.wav");
        std::fs::write(&reference, wav::tone(220.0, 0.5, 0.25)).unwrap();

        let mut config = Config::default();
        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 0)));
        config.synthesis.reference_wav = reference;
        config.synthesis.temp_dir = Some(root.path().join("scratch"));
        config.output.format = OutputFormat::Wav;

        Self { root, config }
    }

    /// Point the HTTP backend at a mock sidecar
    pub fn with_sidecar(mut self, base_url: &str) -> Self {
        self.config.synthesis.backend = BackendConfig::Http {
            base_url: base_url.parse().expect("valid URL"),
            timeout: "10s".to_owned(),
        };
        self
    }

    /// Run a command per request instead of calling a sidecar
    pub fn with_command(mut self, program: &str, args: &[&str], timeout: Duration) -> Self {
        self.config.synthesis.backend = BackendConfig::Command {
            program: program.to_owned(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
            timeout: format!("{}ms", timeout.as_millis()),
        };
        self
    }

    pub fn with_reference(mut self, path: PathBuf) -> Self {
        self.config.synthesis.reference_wav = path;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn without_effects(mut self) -> Self {
        self.config.effects.enabled = false;
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Build the final config, keeping the temp directory alive
    pub fn build(self) -> (TempDir, Config) {
        (self.root, self.config)
    }
}

/// Number of entries left in the scratch directory
pub fn scratch_entries(config: &Config) -> usize {
    let dir = config.synthesis.temp_dir.as_ref().expect("scratch dir configured");
    std::fs::read_dir(dir).map_or(0, Iterator::count)
}
