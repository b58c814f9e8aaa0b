use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use teamspace_core::AppError;

use super::cookies::extract_session_token;
use super::models::CurrentUser;
use super::session::hash_session_token;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Resolve the session carried by the request headers.
///
/// `Ok(None)` covers every "not signed in" case: no token, unknown token,
/// expired session, deleted user. Backend failures are errors.
pub async fn resolve_current_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<CurrentUser>, AppError> {
    let Some(token) = extract_session_token(headers, &state.config.session_cookie_name) else {
        return Ok(None);
    };

    let token_hash = hash_session_token(&token);
    let Some(session) = state.backend.sessions.find_session(&token_hash).await? else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        tracing::debug!(session_id = %session.id, "Session expired");
        if let Err(e) = state.backend.sessions.delete_session(&token_hash).await {
            tracing::warn!(error = %e, session_id = %session.id, "Failed to delete expired session");
        }
        return Ok(None);
    }

    let Some(user) = state.backend.users.get_user(session.user_id).await? else {
        return Ok(None);
    };

    Ok(Some(CurrentUser {
        user,
        session_token_hash: token_hash,
    }))
}

/// Guards protected routes; rejects requests without a valid session with 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let resolved = resolve_current_user(&state, request.headers()).await;
    match resolved {
        Ok(Some(current)) => {
            tracing::debug!(user_id = %current.id(), "Session resolved");
            request.extensions_mut().insert(current);
            next.run(request).await
        }
        Ok(None) => {
            HttpAppError(AppError::Unauthenticated("Unauthorized".to_string())).into_response()
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}
