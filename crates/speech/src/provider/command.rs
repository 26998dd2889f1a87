use std::{path::Path, process::Stdio, sync::OnceLock, time::Duration};

use async_trait::async_trait;
use regex::{Captures, Regex};
use tokio::process::Command;

use crate::error::{Result, SpeechError};

use super::{SynthesisRequest, Synthesizer};

/// Voice model run as a child process per request
///
/// Arguments are rendered from a template once per request. Placeholders
/// are substituted in a single pass so user text containing `{out_path}`
/// is passed through literally.
pub(crate) struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSynthesizer {
    pub const fn new(program: String, args: Vec<String>, timeout: Duration) -> Self {
        Self { program, args, timeout }
    }

    fn render_args(&self, request: &SynthesisRequest<'_>, output: &Path) -> Vec<String> {
        fn placeholder() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("must be valid regex"))
        }

        let generation = request.generation;

        let lookup = |name: &str| -> Option<String> {
            Some(match name {
                "text" => request.text.to_string(),
                "speaker_wav" => request.speaker_wav.display().to_string(),
                "language" => request.language.to_string(),
                "model" => request.model.to_string(),
                "out_path" => output.display().to_string(),
                "half_precision" => request.half_precision.to_string(),
                "speed" => generation.speed.to_string(),
                "temperature" => generation.temperature.to_string(),
                "repetition_penalty" => generation.repetition_penalty.to_string(),
                "top_k" => generation.top_k.to_string(),
                "top_p" => generation.top_p.to_string(),
                _ => return None,
            })
        };

        self.args
            .iter()
            .map(|arg| {
                placeholder()
                    .replace_all(arg, |captures: &Captures<'_>| {
                        lookup(&captures[1]).unwrap_or_else(|| captures[0].to_string())
                    })
                    .into_owned()
            })
            .collect()
    }
}

#[async_trait]
impl Synthesizer for CommandSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest<'_>, output: &Path) -> Result<()> {
        let args = self.render_args(request, output);

        tracing::debug!(program = %self.program, text_len = request.text.len(), "spawning synthesizer");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Synthesis(format!("failed to start {}: {e}", self.program)))?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SpeechError::Synthesis(format!("{} timed out after {:?}", self.program, self.timeout)))?
            .map_err(|e| SpeechError::Synthesis(format!("failed to wait for {}: {e}", self.program)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::error!(program = %self.program, status = %result.status, "synthesizer failed: {}", stderr.trim());

            return Err(SpeechError::Synthesis(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "command"
    }
}
