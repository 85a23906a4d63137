//! Shared-palette color quantization for animation frames.
//!
//! One palette is built across all frames so colors stay consistent for
//! the whole animation. Of the 256 GIF palette entries, 255 hold real
//! quantized colors and one slot is reserved for transparency; the
//! reserved slot is only ever assigned directly from a pixel's alpha,
//! never by nearest-color search.

use color_quant::NeuQuant;
use image::RgbaImage;

/// Hard cap on pixels sampled across all frames when training the
/// quantizer; the stride grows with input size to stay under it.
pub const SAMPLE_CAP: usize = 40_000;
/// Alpha at or above which a pixel may contribute to palette sampling.
/// Mostly transparent pixels must never bias the palette.
pub const OPAQUE_SAMPLE_CUTOFF: u8 = 128;
/// Alpha below which a mapped pixel is assigned the transparent index
/// outright, bypassing nearest-color search.
pub const OPACITY_CUTOFF: u8 = 128;
/// Real (non-transparent) palette entries; one of the 256 GIF slots stays
/// reserved for transparency.
pub const MAX_REAL_COLORS: usize = 255;

/// NeuQuant sampling quality factor (1 = best quality, 30 = fastest).
const QUANT_SAMPLE_FAC: i32 = 10;

pub struct FramePalette {
    colors: Vec<[u8; 3]>,
    quantizer: Option<NeuQuant>,
}

impl FramePalette {
    /// Build a shared palette from every frame's opaque pixels.
    ///
    /// Falls back to a degenerate single-color palette when no frame has
    /// any opaque pixel, so a fully transparent animation still encodes.
    pub fn build(frames: &[RgbaImage]) -> Self {
        let total: usize = frames
            .iter()
            .map(|f| (f.width() * f.height()) as usize)
            .sum();
        let stride = (total / SAMPLE_CAP).max(1);

        let mut samples: Vec<u8> = Vec::new();
        let mut seen = 0usize;
        for frame in frames {
            for pixel in frame.pixels() {
                seen += 1;
                if (seen - 1) % stride != 0 {
                    continue;
                }
                if pixel[3] < OPAQUE_SAMPLE_CUTOFF {
                    continue;
                }
                samples.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]);
            }
        }

        if samples.is_empty() {
            log::warn!("no opaque pixels sampled, using degenerate single-color palette");
            return Self {
                colors: vec![[0, 0, 0]],
                quantizer: None,
            };
        }

        let quantizer = NeuQuant::new(QUANT_SAMPLE_FAC, MAX_REAL_COLORS, &samples);
        let colors = (0..MAX_REAL_COLORS)
            .filter_map(|i| quantizer.lookup(i))
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self {
            colors,
            quantizer: Some(quantizer),
        }
    }

    /// Number of real colors (excludes the transparent slot).
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Index of the reserved transparent slot, always the entry after the
    /// last real color.
    pub fn transparent_index(&self) -> u8 {
        self.colors.len() as u8
    }

    /// Real color at a palette index, if it is not the transparent slot.
    pub fn color(&self, index: u8) -> Option<[u8; 3]> {
        self.colors.get(index as usize).copied()
    }

    /// Palette bytes for the GIF container: real colors followed by a
    /// black placeholder in the transparent slot.
    pub fn to_gif_palette(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.colors.len() + 1) * 3);
        for color in &self.colors {
            bytes.extend_from_slice(color);
        }
        bytes.extend_from_slice(&[0, 0, 0]);
        bytes
    }

    /// Map a raster to palette indices. Pixels below the opacity cutoff map
    /// straight to the transparent index and never to a real color.
    pub fn map_indices(&self, img: &RgbaImage) -> Vec<u8> {
        let transparent = self.transparent_index();
        img.pixels()
            .map(|pixel| {
                if pixel[3] < OPACITY_CUTOFF {
                    transparent
                } else {
                    match &self.quantizer {
                        Some(nq) => nq.index_of(&[pixel[0], pixel[1], pixel[2], 255]) as u8,
                        None => 0,
                    }
                }
            })
            .collect()
    }
}
