#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod http_client;
mod provider;
mod request;
mod scratch;
mod server;
mod types;

use std::{sync::Arc, time::Instant};

use axum::{Router, extract::State, response::IntoResponse, routing::post};

pub use error::{Result, SpeechError};
pub use provider::{SynthesisRequest, Synthesizer};
pub use request::JsonPayload;
pub use server::{Server, SpeechServerBuilder};
pub use types::{GenerateRequest, GenerateResponse};

/// Build the generate pipeline from configuration
pub fn build_server(config: &murmur_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        SpeechServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for speech generation
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/generate", post(generate))
}

/// Handle speech generation requests
async fn generate(
    State(server): State<Arc<Server>>,
    JsonPayload(request): JsonPayload<GenerateRequest>,
) -> Result<axum::response::Response> {
    let started = Instant::now();

    tracing::debug!(text_len = request.text.len(), "generate handler called");

    match server.generate(request).await {
        Ok(response) => {
            server.metrics().record_request(started, "success");
            tracing::info!(
                bytes = response.audio.len(),
                elapsed_ms = started.elapsed().as_millis(),
                "speech generated"
            );
            Ok(response.into_response())
        }
        Err(e) => {
            server.metrics().record_request(started, "error");
            if e.status_code().is_server_error() {
                tracing::error!(error_type = e.error_type(), "speech generation failed: {e}");
            } else {
                tracing::debug!(error_type = e.error_type(), "generate request rejected: {e}");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn router() -> (tempfile::TempDir, Router) {
        let root = tempfile::tempdir().unwrap();
        let mut config = murmur_config::Config::default();
        config.synthesis.reference_wav = root.path().join("missing.wav");
        config.synthesis.temp_dir = Some(root.path().join("scratch"));

        let server = build_server(&config).unwrap();
        (root, endpoint_router().with_state(server))
    }

    async fn detail(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        value["detail"].as_str().unwrap().to_string()
    }

    fn post_json(body: &'static str) -> Request<Body> {
        Request::post("/generate")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn empty_text_is_unprocessable() {
        let (_root, router) = router();

        let response = router.oneshot(post_json(r#"{"text": "  "}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail(response).await, "text must not be empty");
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable() {
        let (_root, router) = router();

        let response = router.oneshot(post_json(r#"{"words": "hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(detail(response).await.contains("text"));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (_root, router) = router();

        let response = router.oneshot(post_json(r#"{"text": "#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let (_root, router) = router();

        let body = format!(r#"{{"text": "{}"}}"#, "a".repeat(2 << 20));
        let request = Request::post("/generate")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(detail(response).await.contains("too large"));
    }

    #[tokio::test]
    async fn non_json_is_unsupported() {
        let (_root, router) = router();

        let request = Request::post("/generate")
            .header(http::header::CONTENT_TYPE, "text/plain")
            .body(Body::from("hello"))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn missing_reference_is_server_error() {
        let (_root, router) = router();

        let response = router.oneshot(post_json(r#"{"text": "Hello"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(detail(response).await.starts_with("reference voice not found"));
    }
}
