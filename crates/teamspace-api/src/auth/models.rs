use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamspace_core::models::User;
use teamspace_core::AppError;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions by the session middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Hash of the session token the request authenticated with
    pub session_token_hash: String,
}

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

// Extracted from parts so it can be combined with Multipart
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthenticated("Unauthorized".to_string()))
            })
    }
}

/// Caller on a public route: `None` when there is no valid session.
#[derive(Debug, Clone)]
pub struct MaybeCurrentUser(pub Option<CurrentUser>);

impl FromRequestParts<Arc<AppState>> for MaybeCurrentUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(MaybeCurrentUser(Some(current.clone())));
        }
        let current = super::resolve_current_user(state, &parts.headers).await?;
        Ok(MaybeCurrentUser(current))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 256, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 256, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 256, message = "Password is required"))]
    pub password: String,
}

/// Returned by register and login. The token is also set as the session cookie.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_validation() {
        let ok = RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..ok.clone()
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..ok
        };
        assert!(bad_email.validate().is_err());
    }
}
