//! Shared key generation for storage backends.
//!
//! Key format: `images/{hash[0..2]}/{hash}` for the payload, with a `.json` suffix for
//! the metadata.

use imgvault_core::constants::CONTENT_HASH_HEX_LEN;

use crate::traits::{StorageError, StorageResult};

const KEY_PREFIX: &str = "images";

/// Reject anything that is not a lowercase hex SHA-1 digest. Keys are derived from
/// hashes supplied by clients, so this is also the path traversal guard.
pub fn validate_hash(hash: &str) -> StorageResult<()> {
    if hash.len() != CONTENT_HASH_HEX_LEN
        || !hash.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return Err(StorageError::InvalidKey(hash.to_string()));
    }
    Ok(())
}

/// Storage key of the raw payload for a content hash.
pub fn content_key(hash: &str) -> StorageResult<String> {
    validate_hash(hash)?;
    Ok(format!("{}/{}/{}", KEY_PREFIX, &hash[..2], hash))
}

/// Storage key of the metadata document for a content hash.
pub fn metadata_key(hash: &str) -> StorageResult<String> {
    Ok(format!("{}.json", content_key(hash)?))
}
