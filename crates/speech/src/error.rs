use std::path::PathBuf;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use murmur_audio::AudioError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpeechError>;

/// Errors raised while serving `/generate`
///
/// Everything except `InvalidRequest` is a processing failure and is
/// reported as a 500 carrying the error text.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The request was rejected before reaching the model
    #[error("{0}")]
    InvalidRequest(String),

    /// The reference voice sample is not on disk
    #[error("reference voice not found: {}", .0.display())]
    ReferenceMissing(PathBuf),

    /// The synthesis backend ran but failed
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// The synthesis backend could not be reached
    #[error("synthesis backend unreachable: {0}")]
    Connection(String),

    /// Decoding, processing or encoding the waveform failed
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Temp file handling failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl SpeechError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::ReferenceMissing(_) => "reference_missing",
            Self::Synthesis(_) | Self::Connection(_) => "synthesis_error",
            Self::Audio(_) => "audio_error",
            Self::Io(_) | Self::Config(_) | Self::Internal(_) => "internal_error",
        }
    }

    /// Message returned to the caller
    pub fn client_message(&self) -> String {
        self.to_string()
    }
}

/// Error body, `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for SpeechError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
