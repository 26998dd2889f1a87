use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use murmur_audio::{AudioSegment, EffectChain, Encoder};
use murmur_config::{BackendConfig, GenerationConfig};
use murmur_telemetry::GenerateMetrics;
use tokio::sync::Semaphore;

use crate::{
    error::{Result, SpeechError},
    provider::{SynthesisRequest, Synthesizer, command::CommandSynthesizer, sidecar::SidecarSynthesizer},
    scratch::Scratch,
    types::{GenerateRequest, GenerateResponse},
};

/// Deployment-fixed voice settings
struct Voice {
    model: String,
    reference_wav: PathBuf,
    language: String,
    half_precision: bool,
    generation: GenerationConfig,
}

/// Text-to-audio pipeline behind `/generate`
pub struct Server {
    synthesizer: Box<dyn Synthesizer>,
    voice: Voice,
    effects: Arc<EffectChain>,
    encoder: Encoder,
    scratch: Scratch,
    limiter: Option<Semaphore>,
    metrics: GenerateMetrics,
}

impl Server {
    /// Synthesize, post-process and encode one utterance
    ///
    /// The text is validated before anything else runs. The intermediate
    /// waveform lives in a uniquely named temp file that is removed on every
    /// exit path.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let text = request.validated_text()?;

        if !tokio::fs::try_exists(&self.voice.reference_wav).await? {
            return Err(SpeechError::ReferenceMissing(self.voice.reference_wav.clone()));
        }

        let waveform = self.scratch.waveform()?;

        let synthesis = SynthesisRequest {
            text,
            speaker_wav: &self.voice.reference_wav,
            language: &self.voice.language,
            model: &self.voice.model,
            half_precision: self.voice.half_precision,
            generation: &self.voice.generation,
        };

        self.run_backend(&synthesis, &waveform).await?;

        let effects = Arc::clone(&self.effects);

        // The waveform moves into the worker and is deleted when it finishes
        let wav = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let segment = AudioSegment::from_wav_file(&waveform)?;
            drop(waveform);

            if segment.frame_count() == 0 {
                return Err(SpeechError::Synthesis("backend produced an empty waveform".to_string()));
            }

            let processed = effects.apply(segment);

            tracing::debug!(
                duration_ms = processed.duration().as_millis(),
                max_dbfs = processed.max_dbfs(),
                "post-processing complete"
            );

            Ok(processed.to_wav_bytes()?)
        })
        .await
        .map_err(|e| SpeechError::Internal(format!("audio worker failed: {e}")))??;

        let audio = self.encoder.encode(wav).await?;

        Ok(GenerateResponse {
            audio,
            content_type: self.encoder.media_type(),
        })
    }

    /// Invoke the backend, holding a concurrency permit only for the call
    async fn run_backend(&self, request: &SynthesisRequest<'_>, output: &Path) -> Result<()> {
        let _permit = match &self.limiter {
            Some(limiter) => Some(
                limiter
                    .acquire()
                    .await
                    .map_err(|e| SpeechError::Internal(format!("concurrency limiter closed: {e}")))?,
            ),
            None => None,
        };

        let started = Instant::now();
        self.synthesizer.synthesize(request, output).await?;
        self.metrics.record_synthesis(started, self.synthesizer.name());

        tracing::debug!(
            backend = self.synthesizer.name(),
            elapsed_ms = started.elapsed().as_millis(),
            "synthesis complete"
        );

        Ok(())
    }

    pub(crate) const fn metrics(&self) -> &GenerateMetrics {
        &self.metrics
    }
}

/// Builder for constructing the generate pipeline from configuration
pub struct SpeechServerBuilder<'a> {
    config: &'a murmur_config::Config,
    synthesizer: Option<Box<dyn Synthesizer>>,
}

impl<'a> SpeechServerBuilder<'a> {
    pub const fn new(config: &'a murmur_config::Config) -> Self {
        Self {
            config,
            synthesizer: None,
        }
    }

    /// Use a custom backend instead of the configured one
    #[must_use]
    pub fn synthesizer(mut self, synthesizer: Box<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn build(self) -> Result<Server> {
        let synthesis = &self.config.synthesis;

        let synthesizer = match self.synthesizer {
            Some(synthesizer) => synthesizer,
            None => build_synthesizer(&synthesis.backend)?,
        };

        let scratch = Scratch::new(synthesis.temp_dir.clone())?;

        if !synthesis.reference_wav.exists() {
            tracing::warn!(
                path = %synthesis.reference_wav.display(),
                "reference voice not found, requests will fail until it exists"
            );
        }

        let effects = EffectChain::from_config(&self.config.effects);
        let encoder = Encoder::from_config(&self.config.output);

        tracing::debug!(
            backend = synthesizer.name(),
            effects = effects.effects().len(),
            format = encoder.media_type(),
            scratch = %scratch.dir().display(),
            "generate pipeline initialized"
        );

        Ok(Server {
            synthesizer,
            voice: Voice {
                model: synthesis.model.clone(),
                reference_wav: synthesis.reference_wav.clone(),
                language: synthesis.language.clone(),
                half_precision: synthesis.half_precision,
                generation: synthesis.generation.clone(),
            },
            effects: Arc::new(effects),
            encoder,
            scratch,
            limiter: synthesis.max_concurrency.map(Semaphore::new),
            metrics: GenerateMetrics::new(),
        })
    }
}

fn build_synthesizer(config: &BackendConfig) -> Result<Box<dyn Synthesizer>> {
    let timeout = config.timeout().map_err(SpeechError::Config)?;

    Ok(match config {
        BackendConfig::Http { base_url, .. } => Box::new(SidecarSynthesizer::new(base_url, timeout)?),
        BackendConfig::Command { program, args, .. } => {
            Box::new(CommandSynthesizer::new(program.clone(), args.clone(), timeout))
        }
    })
}
