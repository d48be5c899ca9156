//! Format detection and decoding
//!
//! Decoders are listed explicitly in a [`DecoderRegistry`] and tried in a fixed order.
//! Each entry pairs a signature check with a decode function; the first entry whose
//! signature matches owns the payload, and a failed decode is not retried with the
//! remaining entries.
//!
//! Decoding runs under explicit [`Limits`]. The registry default raises the
//! allocation cap well above the `image` crate's 512 MiB default so large but valid
//! images decode, while a payload that claims absurd dimensions is still refused
//! before anything is allocated.

use std::fmt;
use std::io::Cursor;

use ::image::error::{DecodingError, ImageFormatHint};
use ::image::{DynamicImage, ImageError, ImageReader, ImageResult, Limits};

/// Largest decoded buffer the standard registry will allocate (4 GiB).
pub const DEFAULT_MAX_DECODE_ALLOC: u64 = 4 * 1024 * 1024 * 1024;

/// Formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Gif,
    Png,
}

impl ImageFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image: unknown format")]
    UnknownFormat,

    #[error("malformed {format} image: {source}")]
    Malformed {
        format: ImageFormat,
        #[source]
        source: ImageError,
    },

    /// The payload is well formed but decoding it would exceed the decode limits.
    #[error("{format} image exceeds decode limits: {source}")]
    LimitExceeded {
        format: ImageFormat,
        #[source]
        source: ImageError,
    },
}

/// Result of a successful decode. Only the extent is kept; pixel data is dropped as
/// soon as it has been measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// One registered decoder
#[derive(Clone, Copy)]
pub struct DecoderEntry {
    pub format: ImageFormat,
    pub sniff: fn(&[u8]) -> bool,
    pub decode: fn(&[u8], Limits) -> ImageResult<DynamicImage>,
}

impl fmt::Debug for DecoderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderEntry")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8] = b"\xff\xd8";

fn sniff_jpeg(data: &[u8]) -> bool {
    data.starts_with(JPEG_SIGNATURE)
}

/// `GIF8?a`: any version byte is accepted.
fn sniff_gif(data: &[u8]) -> bool {
    data.len() >= 6 && data.starts_with(b"GIF8") && data[5] == b'a'
}

fn sniff_png(data: &[u8]) -> bool {
    data.starts_with(PNG_SIGNATURE)
}

fn decode_with_format(
    data: &[u8],
    format: ::image::ImageFormat,
    limits: Limits,
) -> ImageResult<DynamicImage> {
    let mut reader = ImageReader::with_format(Cursor::new(data), format);
    reader.limits(limits);
    reader.decode()
}

/// The JPEG backend fills in missing scan data instead of failing, so completeness
/// is checked up front.
fn decode_jpeg(data: &[u8], limits: Limits) -> ImageResult<DynamicImage> {
    if !jpeg_is_complete(data) {
        return Err(ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Exact(::image::ImageFormat::Jpeg),
            "unexpected end of data",
        )));
    }
    decode_with_format(data, ::image::ImageFormat::Jpeg, limits)
}

fn decode_gif(data: &[u8], limits: Limits) -> ImageResult<DynamicImage> {
    decode_with_format(data, ::image::ImageFormat::Gif, limits)
}

fn decode_png(data: &[u8], limits: Limits) -> ImageResult<DynamicImage> {
    decode_with_format(data, ::image::ImageFormat::Png, limits)
}

/// Walk the JPEG marker segments from SOI and report whether an EOI marker is
/// reached without running out of data.
fn jpeg_is_complete(data: &[u8]) -> bool {
    if !data.starts_with(JPEG_SIGNATURE) {
        return false;
    }

    let mut pos = JPEG_SIGNATURE.len();
    loop {
        if data.get(pos) != Some(&0xFF) {
            return false;
        }
        // Fill bytes before a marker.
        while data.get(pos + 1) == Some(&0xFF) {
            pos += 1;
        }
        let marker = match data.get(pos + 1) {
            Some(&m) => m,
            None => return false,
        };

        match marker {
            0xD9 => return true,
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            _ => {}
        }

        let len = match data.get(pos + 2..pos + 4) {
            Some(&[hi, lo]) => u16::from_be_bytes([hi, lo]) as usize,
            _ => return false,
        };
        let segment_end = pos + 2 + len;
        if len < 2 || segment_end > data.len() {
            return false;
        }

        if marker != 0xDA {
            pos = segment_end;
            continue;
        }

        // Entropy-coded data after SOS runs until the next marker that is neither a
        // stuffed zero nor a restart marker.
        let mut i = segment_end;
        loop {
            match data.get(i..i + 2) {
                Some(&[0xFF, 0x00]) | Some(&[0xFF, 0xD0..=0xD7]) => i += 2,
                Some(&[0xFF, 0xFF]) => i += 1,
                Some(&[0xFF, _]) => break,
                Some(_) => i += 1,
                None => return false,
            }
        }
        pos = i;
    }
}

/// Ordered list of decoders consulted for format auto-detection
#[derive(Debug, Clone)]
pub struct DecoderRegistry {
    entries: Vec<DecoderEntry>,
    limits: Limits,
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl DecoderRegistry {
    /// JPEG, GIF and PNG, in that order.
    pub fn standard() -> Self {
        Self::new(vec![
            DecoderEntry {
                format: ImageFormat::Jpeg,
                sniff: sniff_jpeg,
                decode: decode_jpeg,
            },
            DecoderEntry {
                format: ImageFormat::Gif,
                sniff: sniff_gif,
                decode: decode_gif,
            },
            DecoderEntry {
                format: ImageFormat::Png,
                sniff: sniff_png,
                decode: decode_png,
            },
        ])
    }

    pub fn new(entries: Vec<DecoderEntry>) -> Self {
        let mut limits = Limits::no_limits();
        limits.max_alloc = Some(DEFAULT_MAX_DECODE_ALLOC);
        Self { entries, limits }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn formats(&self) -> impl Iterator<Item = ImageFormat> + '_ {
        self.entries.iter().map(|e| e.format)
    }

    /// Format of the first entry whose signature matches
    pub fn detect(&self, data: &[u8]) -> Option<ImageFormat> {
        self.find(data).map(|e| e.format)
    }

    /// Decode `data` with the first matching entry and report its extent.
    pub fn decode(&self, data: &[u8]) -> Result<DecodedImage, DecodeError> {
        let entry = self.find(data).ok_or(DecodeError::UnknownFormat)?;

        let format = entry.format;
        let img = (entry.decode)(data, self.limits.clone()).map_err(|source| match source {
            ImageError::Limits(_) => DecodeError::LimitExceeded { format, source },
            source => DecodeError::Malformed { format, source },
        })?;

        Ok(DecodedImage {
            format: entry.format,
            width: img.width(),
            height: img.height(),
        })
    }

    fn find(&self, data: &[u8]) -> Option<&DecoderEntry> {
        self.entries.iter().find(|e| (e.sniff)(data))
    }
}
