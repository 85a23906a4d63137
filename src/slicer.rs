//! Grid slicing.
//!
//! Partitions a keyed sheet into rows x cols independent cell rasters.
//! Cell geometry is computed in fractional pixel space; rounding happens
//! only at the final pixel copy.

use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
    /// Padding per side, percent of cell dimension [0, 100).
    pub padding: f32,
    /// Background removal tolerance [0, 50].
    pub tolerance: f32,
    /// Crop box shift, percent of cell width [-50, 50].
    pub offset_x: f32,
    /// Crop box shift, percent of cell height [-50, 50].
    pub offset_y: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 6,
            padding: 5.0,
            tolerance: 15.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(StickerError::InvalidParameter(format!(
                "Grid must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        if !(0.0..100.0).contains(&self.padding) {
            return Err(StickerError::InvalidParameter(format!(
                "Padding must be in [0, 100), got {}",
                self.padding
            )));
        }
        if !(0.0..=50.0).contains(&self.tolerance) {
            return Err(StickerError::InvalidParameter(format!(
                "Tolerance must be in [0, 50], got {}",
                self.tolerance
            )));
        }
        if !(-50.0..=50.0).contains(&self.offset_x) || !(-50.0..=50.0).contains(&self.offset_y) {
            return Err(StickerError::InvalidParameter(format!(
                "Offsets must be in [-50, 50], got ({}, {})",
                self.offset_x, self.offset_y
            )));
        }
        Ok(())
    }
}

/// One extracted grid cell.
#[derive(Debug, Clone)]
pub struct Slice {
    /// Canonical id, `sticker_{row}_{col}`.
    pub id: String,
    pub row: u32,
    pub col: u32,
    pub image: RgbaImage,
}

/// Slice a raster into a rows x cols grid of independent cell images,
/// returned in row-major order.
///
/// Padding shrinks each cell's crop box symmetrically; offsets shift it
/// within the cell. A padding large enough to collapse the content box
/// yields no slices rather than an error, so callers must tolerate fewer
/// than `rows * cols` results.
pub fn slice_to_grid(img: &RgbaImage, config: &GridConfig) -> Result<Vec<Slice>> {
    config.validate()?;

    let (width, height) = img.dimensions();
    let cell_w = width as f32 / config.cols as f32;
    let cell_h = height as f32 / config.rows as f32;

    let pad_x = cell_w * config.padding / 100.0;
    let pad_y = cell_h * config.padding / 100.0;
    let shift_x = cell_w * config.offset_x / 100.0;
    let shift_y = cell_h * config.offset_y / 100.0;

    let content_w = (cell_w - pad_x * 2.0).floor() as i64;
    let content_h = (cell_h - pad_y * 2.0).floor() as i64;

    if content_w <= 0 || content_h <= 0 {
        log::debug!(
            "padding {}% collapses {}x{} cells to {}x{}, no slices",
            config.padding,
            cell_w,
            cell_h,
            content_w,
            content_h
        );
        return Ok(Vec::new());
    }

    let cells: Vec<(u32, u32)> = (0..config.rows)
        .flat_map(|r| (0..config.cols).map(move |c| (r, c)))
        .collect();

    // Each cell copy reads a disjoint region of the shared source and
    // writes its own buffer; rayon's collect preserves input order, so the
    // result is row-major without a reorder pass.
    let slices = cells
        .into_par_iter()
        .map(|(row, col)| {
            let src_x = col as f32 * cell_w + pad_x + shift_x;
            let src_y = row as f32 * cell_h + pad_y + shift_y;
            Slice {
                id: format!("sticker_{}_{}", row, col),
                row,
                col,
                image: copy_region(img, src_x, src_y, content_w as u32, content_h as u32),
            }
        })
        .collect();

    Ok(slices)
}

/// Direct region copy, no resampling. Source coordinates outside the raster
/// read as fully transparent, so offset crop boxes degrade gracefully at
/// the sheet edges.
fn copy_region(src: &RgbaImage, origin_x: f32, origin_y: f32, w: u32, h: u32) -> RgbaImage {
    let (src_w, src_h) = src.dimensions();
    let mut out = RgbaImage::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let sx = (origin_x + x as f32).floor();
            let sy = (origin_y + y as f32).floor();
            if sx >= 0.0 && sy >= 0.0 && (sx as u32) < src_w && (sy as u32) < src_h {
                out.put_pixel(x, y, *src.get_pixel(sx as u32, sy as u32));
            }
        }
    }

    out
}
