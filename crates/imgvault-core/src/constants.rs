//! Shared constants.

/// Content types accepted by the upload processor. Compared by exact string equality.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/gif", "image/png"];

/// Length of a hex-encoded SHA-1 content hash.
pub const CONTENT_HASH_HEX_LEN: usize = 40;
