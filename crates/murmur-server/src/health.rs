use axum::response::IntoResponse;
use http::StatusCode;

/// Liveness probe, independent of the voice backend
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
