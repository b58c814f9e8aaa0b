//! Teamspace Storage Library
//!
//! Image storage for workspace and project avatars. The `Storage` trait hides
//! the backend; the local filesystem backend is the one shipped.
//!
//! # Storage key format
//!
//! Keys are scoped by owner kind and workspace:
//!
//! - **Workspace images**: `workspaces/{workspace_scope}/{filename}`
//! - **Project images**: `projects/{workspace_id}/{filename}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in
//! the `keys` module.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::ImageScope;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
