//! API constants

/// Versioned path prefix for every image route
pub const API_PREFIX: &str = "/api/v0";

/// Multipart field carrying the image title
pub const TITLE_FIELD: &str = "title";

/// Multipart field carrying the image bytes
pub const FILE_FIELD: &str = "file";
