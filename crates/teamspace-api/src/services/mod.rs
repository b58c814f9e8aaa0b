//! Business logic between the handlers and the record/image backends.

pub mod images;
pub mod membership;
pub mod projects;
pub mod tasks;
pub mod workspaces;
