//! Upload fixtures generated in-process.

use coursemedia_core::UploadFile;
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;

/// A valid PNG with a gradient so JPEG/WebP encoders have real content.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode fixture png");
    buf
}

pub fn png_upload(name: &str, width: u32, height: u32) -> UploadFile {
    UploadFile::new(png_bytes(width, height), name, "image/png")
}

pub fn file_upload(name: &str, content_type: &str, size: usize) -> UploadFile {
    UploadFile::new(vec![0x42; size], name, content_type)
}
