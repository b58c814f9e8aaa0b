use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{ImageChange, ImageRef};

/// Workspace entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    /// Creating user
    pub user_id: Uuid,
    pub image_url: Option<String>,
    #[serde(skip)]
    pub image_key: Option<String>,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWorkspace {
    pub name: String,
    pub user_id: Uuid,
    pub image: Option<ImageRef>,
    pub invite_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceChanges {
    pub name: Option<String>,
    pub image: ImageChange,
}

/// Public view of a workspace for the join page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkspaceInfo {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct JoinWorkspaceRequest {
    #[validate(length(min = 1, max = 64, message = "Invite code is required"))]
    pub code: String,
}
