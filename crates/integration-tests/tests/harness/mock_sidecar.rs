//! Mock inference sidecar for integration tests
//!
//! Answers `POST /synthesize` with a fixed tone, or with a 500 carrying a
//! `detail` message when started in failing mode.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing,
};
use tokio_util::sync::CancellationToken;

use super::wav;

pub struct MockSidecar {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockSidecarState>,
}

struct MockSidecarState {
    request_count: AtomicU32,
    last_request: Mutex<Option<serde_json::Value>>,
    failure: Option<String>,
    audio: Vec<u8>,
}

impl MockSidecar {
    /// Start a sidecar that answers with half a second of loud 440 Hz tone
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(None, wav::tone(440.0, 0.9, 0.5)).await
    }

    /// Start a sidecar that fails every request with `detail`
    pub async fn start_failing(detail: &str) -> anyhow::Result<Self> {
        Self::start_inner(Some(detail.to_owned()), Vec::new()).await
    }

    /// Start a sidecar that answers with the given bytes
    pub async fn start_with_audio(audio: Vec<u8>) -> anyhow::Result<Self> {
        Self::start_inner(None, audio).await
    }

    async fn start_inner(failure: Option<String>, audio: Vec<u8>) -> anyhow::Result<Self> {
        let state = Arc::new(MockSidecarState {
            request_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
            failure,
            audio,
        });

        let app = Router::new()
            .route("/synthesize", routing::post(handle_synthesize))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Body of the most recent synthesis request
    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.state.last_request.lock().unwrap().clone()
    }
}

impl Drop for MockSidecar {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_synthesize(
    State(state): State<Arc<MockSidecarState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    *state.last_request.lock().unwrap() = Some(body);

    if let Some(detail) = &state.failure {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": detail })),
        )
            .into_response();
    }

    ([(axum::http::header::CONTENT_TYPE, "audio/wav")], state.audio.clone()).into_response()
}
