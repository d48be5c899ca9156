//! Test fixtures: images encoded on the fly and multipart forms.

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Solid-colour image of the given size, encoded in `format`.
pub fn create_test_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 20, 30])));
    let img = match format {
        ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => img,
    };

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("encode test image");
    buffer
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    create_test_image(ImageFormat::Png, width, height)
}

/// File part with the given name and declared content type.
pub fn file_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string())
}

/// `title` then `file`, the order a browser form sends them in.
pub fn upload_form(title: &str, data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title.to_string())
        .add_part("file", file_part(data, file_name, mime_type))
}
