//! Route setup and middleware configuration.

mod health;

use crate::api_doc::get_openapi_spec;
use crate::auth::auth_middleware;
use crate::constants::{API_PREFIX, MEDIA_PREFIX, OPENAPI_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use teamspace_core::Config;
use teamspace_infra::{request_id_middleware, security_headers_middleware};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

/// Room for the text fields and part headers around an image upload
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let protected =
        protected_routes().layer(axum::middleware::from_fn_with_state(state.clone(), auth_middleware));

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = public_routes()
        .merge(protected)
        .nest_service(MEDIA_PREFIX, ServeDir::new(&config.local_storage_path))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(
            config.max_image_size_bytes + FORM_OVERHEAD_BYTES,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(OPENAPI_PATH, get(|| async { Json(get_openapi_spec()) }))
        .route(
            &format!("{}/auth/register", API_PREFIX),
            post(handlers::auth::register),
        )
        .route(
            &format!("{}/auth/login", API_PREFIX),
            post(handlers::auth::login),
        )
        .route(
            &format!("{}/auth/current", API_PREFIX),
            get(handlers::auth::current_user),
        )
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/auth/logout", API_PREFIX),
            post(handlers::auth::logout),
        )
        .route(
            &format!("{}/workspaces", API_PREFIX),
            get(handlers::workspaces::list_workspaces).post(handlers::workspaces::create_workspace),
        )
        .route(
            &format!("{}/workspaces/{{workspace_id}}", API_PREFIX),
            get(handlers::workspaces::get_workspace)
                .patch(handlers::workspaces::update_workspace)
                .delete(handlers::workspaces::delete_workspace),
        )
        .route(
            &format!("{}/workspaces/{{workspace_id}}/info", API_PREFIX),
            get(handlers::workspaces::get_workspace_info),
        )
        .route(
            &format!("{}/workspaces/{{workspace_id}}/reset-invite-code", API_PREFIX),
            post(handlers::workspaces::reset_invite_code),
        )
        .route(
            &format!("{}/workspaces/{{workspace_id}}/join", API_PREFIX),
            post(handlers::workspaces::join_workspace),
        )
        .route(
            &format!("{}/members", API_PREFIX),
            get(handlers::members::list_members),
        )
        .route(
            &format!("{}/projects", API_PREFIX),
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            &format!("{}/projects/{{project_id}}", API_PREFIX),
            get(handlers::projects::get_project)
                .patch(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            &format!("{}/tasks", API_PREFIX),
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            &format!("{}/tasks/{{task_id}}", API_PREFIX),
            get(handlers::tasks::get_task)
                .patch(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        // Cookies need an explicit origin list
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
            .allow_credentials(true)
    };
    Ok(cors)
}
