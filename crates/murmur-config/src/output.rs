use serde::Deserialize;

/// Output encoding configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Encoder bitrate, only used for MP3
    #[serde(default = "default_bitrate")]
    pub bitrate: String,
    /// ffmpeg binary used for MP3 encoding
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            bitrate: default_bitrate(),
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

/// Supported output containers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Mp3,
    Wav,
}

impl OutputFormat {
    /// Media type sent in the `Content-Type` header
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }
}

fn default_bitrate() -> String {
    "128k".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}
