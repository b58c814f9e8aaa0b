//! HTTP handlers. Every JSON body is wrapped as `{ "data": ... }`.

pub mod auth;
pub mod members;
pub mod projects;
pub mod tasks;
pub mod workspaces;

use serde::Serialize;
use teamspace_core::AppError;
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 256;

/// Identifier of a deleted record
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub id: Uuid,
}

/// Trimmed, non-empty name from a multipart form.
pub(crate) fn require_name(name: Option<String>, label: &str) -> Result<String, AppError> {
    match name {
        Some(name) => check_name(name, label),
        None => Err(AppError::InvalidInput(format!("{} name is required", label))),
    }
}

/// Optional rename: absent stays `None`, present must be non-empty.
pub(crate) fn optional_name(name: Option<String>, label: &str) -> Result<Option<String>, AppError> {
    name.map(|name| check_name(name, label)).transpose()
}

fn check_name(name: String, label: &str) -> Result<String, AppError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::InvalidInput(format!("{} name is required", label)));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "{} name must be at most {} characters",
            label, MAX_NAME_LEN
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(
            require_name(Some("  Acme ".to_string()), "Workspace").unwrap(),
            "Acme"
        );
        assert!(require_name(Some("   ".to_string()), "Workspace").is_err());
        assert!(require_name(None, "Workspace").is_err());
        assert_eq!(optional_name(None, "Project").unwrap(), None);
        assert!(optional_name(Some(String::new()), "Project").is_err());
    }
}
