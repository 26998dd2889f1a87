use std::process::Stdio;

use murmur_config::{OutputConfig, OutputFormat};
use tokio::{io::AsyncWriteExt, process::Command};

use crate::error::{AudioError, Result};

/// Turns processed WAV data into the configured delivery format
///
/// WAV passes through untouched. MP3 is produced by piping the WAV through
/// `ffmpeg` with the LAME encoder.
#[derive(Debug, Clone)]
pub struct Encoder {
    format: OutputFormat,
    bitrate: String,
    ffmpeg_path: String,
}

impl Encoder {
    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            format: config.format,
            bitrate: config.bitrate.clone(),
            ffmpeg_path: config.ffmpeg_path.clone(),
        }
    }

    pub const fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    /// Encode a complete WAV file into the output format
    pub async fn encode(&self, wav: Vec<u8>) -> Result<Vec<u8>> {
        match self.format {
            OutputFormat::Wav => Ok(wav),
            OutputFormat::Mp3 => self.ffmpeg_mp3(wav).await,
        }
    }

    async fn ffmpeg_mp3(&self, wav: Vec<u8>) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-loglevel", "error", "-f", "wav", "-i", "pipe:0"])
            .args(["-codec:a", "libmp3lame", "-b:a", self.bitrate.as_str(), "-f", "mp3", "pipe:1"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AudioError::Encoder(format!("failed to run {}: {e}", self.ffmpeg_path)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AudioError::Encoder("ffmpeg stdin unavailable".to_string()))?;

        // stdin is fed concurrently so a full stdout pipe cannot stall ffmpeg
        let feeder = tokio::spawn(async move {
            stdin.write_all(&wav).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AudioError::Encoder(format!("failed to wait for ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AudioError::Encoder(format!("ffmpeg failed ({}): {}", output.status, stderr.trim())));
        }

        match feeder.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(AudioError::Encoder(format!("failed to write to ffmpeg: {e}"))),
            Err(e) => return Err(AudioError::Encoder(format!("ffmpeg writer task failed: {e}"))),
        }

        if output.stdout.is_empty() {
            return Err(AudioError::Encoder("ffmpeg produced no output".to_string()));
        }

        tracing::debug!(bytes = output.stdout.len(), bitrate = %self.bitrate, "encoded mp3");

        Ok(output.stdout)
    }
}
