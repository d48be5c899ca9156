use imgvault_core::constants::ALLOWED_CONTENT_TYPES;

/// Client-supplied upload metadata that fails validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title missing")]
    TitleMissing,

    #[error("invalid content-type")]
    InvalidContentType { declared: Vec<String> },
}

/// Upload metadata validator
///
/// Checks only what the client declared. The content-type check trusts the declared
/// values and never inspects the payload's magic bytes. That is a known weak spot:
/// a PNG declared as `image/gif` passes, and the decode step is what finally rejects
/// payloads that are not images at all.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    allowed_content_types: Vec<String>,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect())
    }
}

impl UploadValidator {
    pub fn new(allowed_content_types: Vec<String>) -> Self {
        Self {
            allowed_content_types,
        }
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }

    /// The title must be non-empty. Whitespace counts as content; nothing is trimmed.
    pub fn validate_title(&self, title: &str) -> Result<(), ValidationError> {
        if title.is_empty() {
            return Err(ValidationError::TitleMissing);
        }
        Ok(())
    }

    /// Accept if any declared value equals an allowed type exactly. No case folding and
    /// no parameter stripping.
    pub fn validate_content_types(&self, declared: &[String]) -> Result<(), ValidationError> {
        let accepted = declared
            .iter()
            .any(|ct| self.allowed_content_types.iter().any(|allowed| allowed == ct));

        if !accepted {
            return Err(ValidationError::InvalidContentType {
                declared: declared.to_vec(),
            });
        }
        Ok(())
    }

    /// Validate title then content types, in that order.
    pub fn validate_all(&self, title: &str, declared: &[String]) -> Result<(), ValidationError> {
        self.validate_title(title)?;
        self.validate_content_types(declared)?;
        Ok(())
    }
}
