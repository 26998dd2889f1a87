use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::{Result, SpeechError};

/// Body of `POST /generate`
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Text to speak
    pub text: String,
}

impl GenerateRequest {
    /// Text with surrounding whitespace removed
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when nothing is left to speak
    pub fn validated_text(&self) -> Result<&str> {
        let text = self.text.trim();

        if text.is_empty() {
            return Err(SpeechError::InvalidRequest("text must not be empty".to_string()));
        }

        Ok(text)
    }
}

/// Encoded audio ready to send back
#[derive(Debug)]
pub struct GenerateResponse {
    pub audio: Vec<u8>,
    /// e.g. `audio/mpeg`
    pub content_type: &'static str,
}

impl IntoResponse for GenerateResponse {
    fn into_response(self) -> Response {
        (
            [(http::header::CONTENT_TYPE, self.content_type)],
            axum::body::Body::from(self.audio),
        )
            .into_response()
    }
}
