//! Raster access layer.
//!
//! Decodes source bytes into RGBA buffers, re-encodes buffers as PNG and
//! provides the cover-fit crop used for fixed-size exports (banner, album
//! cover, chat icon).

use image::{imageops, RgbaImage};
use std::io::Cursor;

use crate::error::{Result, StickerError};

/// Banner export size (width, height).
pub const BANNER_SIZE: (u32, u32) = (750, 400);
/// Sticker album cover size.
pub const COVER_SIZE: (u32, u32) = (230, 230);
/// Chat panel icon size.
pub const ICON_SIZE: (u32, u32) = (50, 50);

/// Decode image bytes into an RGBA raster.
///
/// Any undecodable input is a fatal error for the operation; no partial
/// raster is ever returned.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}

/// Encode a raster as PNG bytes (for packaging/transfer without file I/O).
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| StickerError::Processing(format!("Failed to encode PNG: {}", e)))?;
    Ok(buffer.into_inner())
}

/// Cover-fit crop: scale the source uniformly until it fills the target
/// box, then center-crop the overflow. Aspect ratio is never distorted.
pub fn crop_to_size(img: &RgbaImage, target_w: u32, target_h: u32) -> RgbaImage {
    let (width, height) = img.dimensions();
    if target_w == 0 || target_h == 0 || width == 0 || height == 0 {
        return RgbaImage::new(target_w, target_h);
    }

    let scale = (target_w as f32 / width as f32).max(target_h as f32 / height as f32);
    // Rounding must never undershoot the target box
    let scaled_w = ((width as f32 * scale).round() as u32).max(target_w);
    let scaled_h = ((height as f32 * scale).round() as u32).max(target_h);

    let scaled = imageops::resize(img, scaled_w, scaled_h, imageops::FilterType::Lanczos3);

    let crop_x = (scaled_w - target_w) / 2;
    let crop_y = (scaled_h - target_h) / 2;
    imageops::crop_imm(&scaled, crop_x, crop_y, target_w, target_h).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"definitely not an image").is_err());
    }

    #[test]
    fn test_png_roundtrip() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let bytes = encode_png(&img).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_cover_fit_banner() {
        // 1000x500 -> 750x400: scale max(0.75, 0.8) = 0.8, draw 800x400,
        // clip 25px off each side
        let img = RgbaImage::from_pixel(1000, 500, Rgba([5, 5, 5, 255]));
        let cropped = crop_to_size(&img, 750, 400);
        assert_eq!(cropped.dimensions(), (750, 400));
    }

    #[test]
    fn test_cover_fit_upscales_small_source() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([80, 90, 100, 255]));
        let cropped = crop_to_size(&img, 50, 50);
        assert_eq!(cropped.dimensions(), (50, 50));
        assert_eq!(cropped.get_pixel(25, 25)[3], 255);
    }

    #[test]
    fn test_cover_fit_zero_target() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let cropped = crop_to_size(&img, 0, 40);
        assert_eq!(cropped.dimensions(), (0, 40));
    }
}
