//! Registration, login, logout and the current-user lookup.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    Json,
};
use teamspace_core::models::{DataResponse, NewUser, User};
use teamspace_core::AppError;
use validator::Validate;

use crate::auth::cookies::{clear_session_cookie, session_cookie};
use crate::auth::models::{LoginRequest, RegisterRequest, SessionResponse, SuccessResponse};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::open_session;
use crate::auth::{CurrentUser, MaybeCurrentUser};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

fn invalid_credentials() -> AppError {
    AppError::Unauthenticated("Invalid email or password".to_string())
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered and signed in", body = DataResponse<SessionResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "register"))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let password_hash = hash_password(&request.password)?;
    let user = state
        .backend
        .users
        .create_user(NewUser {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            password_hash,
        })
        .await?;

    let issued = open_session(
        state.backend.sessions.as_ref(),
        user.id,
        state.config.session_ttl_hours,
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    let cookie = session_cookie(&state.config, &issued.token);
    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(DataResponse::new(SessionResponse {
            user,
            token: issued.token,
            expires_at: issued.session.expires_at,
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = DataResponse<SessionResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Wrong email or password", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "login"))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let credentials = state
        .backend
        .users
        .find_credentials_by_email(request.email.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&request.password, &credentials.password_hash)? {
        tracing::debug!(user_id = %credentials.id, "Password mismatch");
        return Err(invalid_credentials().into());
    }

    let user = User::from(credentials);
    let issued = open_session(
        state.backend.sessions.as_ref(),
        user.id,
        state.config.session_ttl_hours,
    )
    .await?;

    let cookie = session_cookie(&state.config, &issued.token);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(DataResponse::new(SessionResponse {
            user,
            token: issued.token,
            expires_at: issued.session.expires_at,
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session ended", body = DataResponse<SuccessResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .backend
        .sessions
        .delete_session(&current.session_token_hash)
        .await?;

    Ok((
        [(SET_COOKIE, clear_session_cookie(&state.config))],
        Json(DataResponse::new(SuccessResponse { success: true })),
    ))
}

/// Current user, or `null` without a valid session
#[utoipa::path(
    get,
    path = "/api/auth/current",
    tag = "auth",
    responses(
        (status = 200, description = "Current user, data is null when signed out", body = DataResponse<User>)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn current_user(
    MaybeCurrentUser(current): MaybeCurrentUser,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(DataResponse::new(current.map(|c| c.user))))
}
