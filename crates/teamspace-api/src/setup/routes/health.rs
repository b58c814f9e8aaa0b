//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Debug, Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // A lookup that round-trips to the record backend
    let database = run_check(
        CHECK_TIMEOUT,
        async { state.backend.users.get_user(Uuid::nil()).await.map(|_| ()) },
        "error",
    )
    .await;
    let storage = run_check(
        CHECK_TIMEOUT,
        async { state.storage.exists("health").await.map(|_| ()) },
        "error",
    )
    .await;

    let healthy = database == "healthy" && storage == "healthy";
    let status = if healthy {
        StatusCode::OK
    } else {
        tracing::warn!(database = %database, storage = %storage, "Health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthCheckResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            database,
            storage,
        }),
    )
}
