//! Fixture images encoded on the fly.

use std::io::Cursor;

use ::image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::image::ImageFormat;

/// Encode a solid-colour image of the given size.
pub fn encode_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let (img, target) = match format {
        ImageFormat::Png => (
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 0, 0]))),
            ::image::ImageFormat::Png,
        ),
        ImageFormat::Jpeg => (
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 128, 255]))),
            ::image::ImageFormat::Jpeg,
        ),
        ImageFormat::Gif => (
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 255, 0, 255]))),
            ::image::ImageFormat::Gif,
        ),
    };

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), target)
        .expect("fixture image encodes");
    buffer
}
