//! imgvault processing library
//!
//! The upload pipeline: validate the declared metadata, buffer the stream, hash the
//! bytes, decode them to learn the image's extent, then hand a record to the store.

pub mod error;
pub mod hash;
pub mod image;
pub mod upload;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::UploadError;
pub use hash::content_hash;
pub use crate::image::{DecodeError, DecodedImage, DecoderRegistry, ImageFormat};
pub use upload::{UploadMetadata, UploadProcessor};
pub use validator::{UploadValidator, ValidationError};
