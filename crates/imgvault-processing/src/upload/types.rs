//! Types for the upload pipeline.

/// Metadata the client declared alongside the uploaded bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadMetadata {
    /// Filename as sent by the client. Stored as-is.
    pub filename: String,
    /// Every value of the part's `Content-Type` header, in the order received.
    pub declared_content_types: Vec<String>,
}

impl UploadMetadata {
    pub fn new(filename: impl Into<String>, declared_content_types: Vec<String>) -> Self {
        Self {
            filename: filename.into(),
            declared_content_types,
        }
    }
}
