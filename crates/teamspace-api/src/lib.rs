//! Teamspace API Library
//!
//! HTTP handlers, session authentication, services and application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod services;
pub mod setup;

pub mod auth;
pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
