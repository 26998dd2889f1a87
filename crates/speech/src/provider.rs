pub mod command;
pub mod sidecar;

use std::path::Path;

use async_trait::async_trait;
use murmur_config::GenerationConfig;

/// Everything the voice model needs for one utterance
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    pub text: &'a str,
    /// Reference sample of the voice to clone
    pub speaker_wav: &'a Path,
    pub language: &'a str,
    pub model: &'a str,
    pub half_precision: bool,
    pub generation: &'a GenerationConfig,
}

/// A way of running the voice model
///
/// Implementations must leave a WAV file at `output` when they succeed.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest<'_>, output: &Path) -> crate::error::Result<()>;

    /// Short backend name for logs and metrics
    fn name(&self) -> &'static str;
}
