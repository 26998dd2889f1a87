use thiserror::Error;

pub type Result<T> = std::result::Result<T, AudioError>;

/// Errors raised while decoding, processing or encoding audio
#[derive(Debug, Error)]
pub enum AudioError {
    /// The WAV data could not be read or written
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// The audio layout is not supported
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// The external encoder failed
    #[error("Encoding failed: {0}")]
    Encoder(String),
}
