//! Content hashing.

use sha1::{Digest, Sha1};

/// Lowercase hex SHA-1 digest of `data`.
///
/// Depends on nothing but the bytes, so identical payloads always produce the
/// same identifier whatever their title, filename or upload time.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
