//! Teamspace Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! membership/authorization model shared across all Teamspace components.

pub mod config;
pub mod error;
pub mod invite_code;
pub mod membership;
pub mod models;
pub mod policy;

// Re-export commonly used types
pub use config::{Config, DatabaseBackend, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use invite_code::{generate_invite_code, invite_code_matches, INVITE_CODE_LENGTH};
pub use membership::MembershipLookup;
pub use policy::{evaluate, Action, Decision, DenyReason, Resource, Subject};
