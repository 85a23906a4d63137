//! Content bounding and centering.
//!
//! Generated frames are not pixel-registered to each other; centering each
//! one by its content bounding box is what keeps the assembled animation
//! from jittering.

use image::RgbaImage;

/// Alpha level above which a pixel counts as content when measuring
/// bounding boxes. Generated cutouts carry low-alpha noise around edges.
pub const ALPHA_NOISE_CUTOFF: u8 = 20;

/// Tight bounding box of content pixels, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Bounds {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// Tight bounding box of non-transparent content, or `None` when no pixel
/// rises above the noise cutoff.
pub fn content_bounds(img: &RgbaImage) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] > ALPHA_NOISE_CUTOFF {
            match &mut bounds {
                Some(b) => {
                    b.min_x = b.min_x.min(x);
                    b.min_y = b.min_y.min(y);
                    b.max_x = b.max_x.max(x);
                    b.max_y = b.max_y.max(y);
                }
                None => {
                    bounds = Some(Bounds {
                        min_x: x,
                        min_y: y,
                        max_x: x,
                        max_y: y,
                    })
                }
            }
        }
    }

    bounds
}

/// Translate the raster so its content bounding box is centered on the
/// canvas. Dimensions are unchanged; pixels shifted off the canvas are
/// clipped and the exposed area stays transparent. A raster with no
/// content passes through unchanged.
pub fn center_content(img: &RgbaImage) -> RgbaImage {
    let Some(bounds) = content_bounds(img) else {
        log::debug!("no content above alpha cutoff, centering skipped");
        return img.clone();
    };

    let (width, height) = img.dimensions();
    let content_cx = (bounds.min_x + bounds.max_x) as f32 / 2.0;
    let content_cy = (bounds.min_y + bounds.max_y) as f32 / 2.0;
    let dx = (width as f32 / 2.0 - content_cx).round() as i64;
    let dy = (height as f32 / 2.0 - content_cy).round() as i64;

    if dx == 0 && dy == 0 {
        return img.clone();
    }

    let mut out = RgbaImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels() {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx >= 0 && ny >= 0 && (nx as u32) < width && (ny as u32) < height {
            out.put_pixel(nx as u32, ny as u32, *pixel);
        }
    }

    out
}
