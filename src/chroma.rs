//! Chroma-key background removal.
//!
//! AI-generated sheets arrive on a flat background color. The key color is
//! auto-detected from the top-left pixel; every pixel within a tolerance
//! distance of it becomes fully transparent.

use image::{Rgba, RgbaImage};

/// Maps the user tolerance range [0, 50] onto an RGB Euclidean distance
/// threshold. Max possible distance is ~441; 3.5 gives the slider a usable
/// 0-175 working range.
pub const TOLERANCE_SCALE: f32 = 3.5;

/// Remove the background color from a raster.
///
/// The key color is sampled from pixel (0, 0). Every pixel within
/// `tolerance * TOLERANCE_SCALE` Euclidean RGB distance of the key is
/// cleared to transparent black; zeroing the color channels as well avoids
/// fringing when the result is composited over a new background.
///
/// A raster whose key pixel is already fully transparent is returned
/// unchanged, so re-applying with the same tolerance is a no-op.
pub fn remove_background(img: &RgbaImage, tolerance: f32) -> RgbaImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return RgbaImage::new(width, height);
    }

    let key = img.get_pixel(0, 0);
    if key[3] == 0 {
        return img.clone();
    }

    let (key_r, key_g, key_b) = (key[0] as f32, key[1] as f32, key[2] as f32);
    let threshold = tolerance * TOLERANCE_SCALE;

    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        let dr = pixel[0] as f32 - key_r;
        let dg = pixel[1] as f32 - key_g;
        let db = pixel[2] as f32 - key_b;
        let dist = (dr * dr + dg * dg + db * db).sqrt();

        if dist < threshold {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_square() -> RgbaImage {
        // White background, solid red 4x4 square at (2,2)
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        for y in 2..6 {
            for x in 2..6 {
                img.put_pixel(x, y, Rgba([200, 10, 10, 255]));
            }
        }
        img
    }

    #[test]
    fn test_removes_flat_background() {
        let keyed = remove_background(&sheet_with_square(), 15.0);
        assert_eq!(keyed.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(keyed.get_pixel(7, 7), &Rgba([0, 0, 0, 0]));
        // Content survives untouched
        assert_eq!(keyed.get_pixel(3, 3), &Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn test_reapply_is_noop() {
        let keyed = remove_background(&sheet_with_square(), 15.0);
        let again = remove_background(&keyed, 15.0);
        assert_eq!(keyed.as_raw(), again.as_raw());
    }

    #[test]
    fn test_zero_tolerance_removes_nothing() {
        let img = sheet_with_square();
        let keyed = remove_background(&img, 0.0);
        assert_eq!(img.as_raw(), keyed.as_raw());
    }

    #[test]
    fn test_near_background_within_tolerance() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([240, 240, 240, 255]));
        // Slightly off-white pixel, distance ~17 < 10 * 3.5
        img.put_pixel(2, 2, Rgba([230, 230, 230, 255]));
        let keyed = remove_background(&img, 10.0);
        assert_eq!(keyed.get_pixel(2, 2), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_empty_raster() {
        let img = RgbaImage::new(0, 0);
        let keyed = remove_background(&img, 25.0);
        assert_eq!(keyed.dimensions(), (0, 0));
    }
}
