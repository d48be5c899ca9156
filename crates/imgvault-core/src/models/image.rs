use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded image that passed every validation gate, together with its payload.
///
/// A record only exists between validation and persistence: the store takes it by
/// value in `save` and the payload is not retained anywhere else afterwards.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub title: String,
    /// Filename reported by the uploading client. Advisory only, never sanitized.
    pub original_filename: String,
    pub width: u32,
    pub height: u32,
    /// Lowercase hex SHA-1 of `content`.
    pub hash: String,
    pub created: DateTime<Utc>,
    content: Vec<u8>,
}

impl ImageRecord {
    pub fn new(
        title: String,
        original_filename: String,
        width: u32,
        height: u32,
        hash: String,
        created: DateTime<Utc>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            title,
            original_filename,
            width,
            height,
            hash,
            created,
            content,
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    /// Split the record into its persisted fields and the raw payload.
    pub fn into_parts(self) -> (StoredImage, Vec<u8>) {
        let stored = StoredImage {
            size_bytes: self.content.len() as u64,
            title: self.title,
            original_filename: self.original_filename,
            width: self.width,
            height: self.height,
            hash: self.hash,
            created: self.created,
        };
        (stored, self.content)
    }
}

/// Persisted projection of an [`ImageRecord`] without the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub title: String,
    pub original_filename: String,
    pub width: u32,
    pub height: u32,
    pub hash: String,
    pub created: DateTime<Utc>,
    pub size_bytes: u64,
}
