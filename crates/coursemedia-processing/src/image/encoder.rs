//! Derivative encoding: decode once, resize to planned bounds, encode JPEG/WebP.

use anyhow::Result;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

use crate::image::geometry::Dimensions;

/// Stateless encode/resize operations shared by the image pipeline.
pub struct DerivativeEncoder;

impl DerivativeEncoder {
    /// Decode source bytes, guessing the format from content.
    pub fn decode(data: &[u8]) -> Result<DynamicImage> {
        let cursor = Cursor::new(data);
        let img = ImageReader::new(cursor).with_guessed_format()?.decode()?;
        Ok(img)
    }

    /// Resize to fit inside `target`, never enlarging beyond the source.
    ///
    /// Targets are clamped to the source dimensions before resizing, so an
    /// inflated target coming from a caller cannot produce an upscaled variant.
    pub fn fit_within(img: &DynamicImage, target: Dimensions) -> DynamicImage {
        let (src_width, src_height) = img.dimensions();
        let width = target.width.min(src_width);
        let height = target.height.min(src_height);

        if width == src_width && height == src_height {
            return img.clone();
        }

        let filter = Self::select_filter(src_width, src_height, width, height);
        img.resize_exact(width, height, filter)
    }

    /// Select a resampling filter based on the downscale ratio: cheaper filters
    /// for heavy downscales, Lanczos3 for near-1:1 work.
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Encode to JPEG at the given quality (1-100).
    pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let rgb = img.to_rgb8();
        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        encoder.encode_image(&rgb)?;
        Ok(Bytes::from(buffer))
    }

    /// Encode to WebP at the given quality (1-100).
    pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        let encoder = webp::Encoder::from_rgba(&rgba, width, height);
        let webp_data = encoder.encode(quality as f32);
        Ok(Bytes::copy_from_slice(&webp_data))
    }
}
