//! Image module
//!
//! Format detection and decoding for the accepted upload formats.

pub mod decoder;

pub use decoder::{DecodeError, DecodedImage, DecoderEntry, DecoderRegistry, ImageFormat};
