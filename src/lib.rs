//! Sticker toolkit: turns one AI-generated sprite sheet into usable
//! sticker assets.
//!
//! The processing chain chroma-keys the shared background off the sheet
//! and slices it into grid cells; the cells are then either packaged as a
//! zip of transparent PNGs (stickers path) or centered, quantized and
//! encoded as a looping animated GIF (animation path). Fixed-size
//! cover-fit crops (banner, album cover, icon) come from the raster layer.
//!
//! Interactive callers drive [`pipeline::StickerPipeline`], which debounces
//! parameter edits and discards superseded recomputes; batch callers can
//! use [`process_sheet`] and the module functions directly.

pub mod center;
pub mod chroma;
pub mod encoder;
pub mod error;
pub mod packager;
pub mod palette;
pub mod pipeline;
pub mod raster;
pub mod slicer;

pub use center::{center_content, content_bounds, Bounds};
pub use chroma::remove_background;
pub use encoder::{encode_gif, synthesize_animation, AnimationSettings, GifFrame};
pub use error::{Result, StickerError};
pub use packager::{package_slices, PackageSettings};
pub use palette::FramePalette;
pub use pipeline::StickerPipeline;
pub use raster::{crop_to_size, decode, encode_png};
pub use slicer::{slice_to_grid, GridConfig, Slice};

/// One-shot stickers path: decode a sheet, key out its background and
/// slice it into grid cells.
pub fn process_sheet(bytes: &[u8], config: &GridConfig) -> Result<Vec<Slice>> {
    let sheet = raster::decode(bytes)?;
    let keyed = chroma::remove_background(&sheet, config.tolerance);
    slicer::slice_to_grid(&keyed, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_process_sheet_end_to_end() {
        let mut sheet = RgbaImage::from_pixel(12, 8, Rgba([240, 240, 240, 255]));
        for y in 1..4 {
            for x in 1..4 {
                sheet.put_pixel(x, y, Rgba([20, 120, 200, 255]));
            }
        }
        let bytes = raster::encode_png(&sheet).unwrap();

        let config = GridConfig {
            rows: 2,
            cols: 3,
            padding: 0.0,
            tolerance: 10.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let slices = process_sheet(&bytes, &config).unwrap();
        assert_eq!(slices.len(), 6);
        // Background keyed out, content preserved
        assert_eq!(slices[0].image.get_pixel(0, 0)[3], 0);
        assert_eq!(slices[0].image.get_pixel(2, 2), &Rgba([20, 120, 200, 255]));
    }

    #[test]
    fn test_process_sheet_rejects_bad_bytes() {
        assert!(process_sheet(b"not an image", &GridConfig::default()).is_err());
    }
}
