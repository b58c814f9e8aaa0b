//! Shared key generation for storage backends.

use uuid::Uuid;

/// Which kind of record an image belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageScope {
    /// Workspace avatar. The id is the uploading user on create, since the
    /// workspace id does not exist yet, and the workspace on update.
    Workspace(Uuid),
    /// Project avatar, grouped by owning workspace
    Project(Uuid),
}

impl ImageScope {
    fn prefix(&self) -> String {
        match self {
            ImageScope::Workspace(id) => format!("workspaces/{}", id),
            ImageScope::Project(workspace_id) => format!("projects/{}", workspace_id),
        }
    }
}

/// Generate a storage key for the given scope and filename. All backends must
/// use this format.
pub fn generate_storage_key(scope: ImageScope, filename: &str) -> String {
    format!("{}/{}", scope.prefix(), filename)
}

/// Stored file name: random id plus the normalized extension.
pub fn generate_filename(extension: &str) -> String {
    let ext = extension.trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", Uuid::new_v4(), ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed_by_scope() {
        let id = Uuid::nil();
        assert_eq!(
            generate_storage_key(ImageScope::Workspace(id), "a.png"),
            format!("workspaces/{}/a.png", id)
        );
        assert_eq!(
            generate_storage_key(ImageScope::Project(id), "b.jpg"),
            format!("projects/{}/b.jpg", id)
        );
    }

    #[test]
    fn filename_keeps_lowercase_extension() {
        let name = generate_filename(".PNG");
        assert!(name.ends_with(".png"));
        assert!(!name.contains('/'));
    }
}
