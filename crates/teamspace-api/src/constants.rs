//! Route prefixes shared by the router, handlers and OpenAPI annotations.

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Path under which locally stored images are served
pub const MEDIA_PREFIX: &str = "/media";

/// Served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";
