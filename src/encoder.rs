//! Animated GIF assembly.
//!
//! Every frame shares one global palette and its reserved transparent
//! index; frames dispose to background so differing silhouettes never
//! ghost, and the container loops forever.

use std::borrow::Cow;

use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::center;
use crate::error::{Result, StickerError};
use crate::palette::FramePalette;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSettings {
    /// Playback rate, frames per second (typical range 1-24).
    pub fps: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self { fps: 8.0 }
    }
}

impl AnimationSettings {
    /// Per-frame delay in GIF centiseconds, clamped to the format minimum.
    pub fn delay_cs(&self) -> u16 {
        ((100.0 / self.fps).round() as u16).max(1)
    }
}

/// One indexed-color animation frame.
#[derive(Debug, Clone)]
pub struct GifFrame {
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
    /// Display duration in centiseconds.
    pub delay_cs: u16,
}

/// Encode indexed frames into a complete animated GIF byte stream.
///
/// Frames are written in submission order. Any frame whose buffer does not
/// match `width * height` is a fatal construction error, rejected before a
/// single byte is written.
pub fn encode_gif(
    frames: &[GifFrame],
    palette: &FramePalette,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    if frames.is_empty() {
        return Err(StickerError::Encoding("No frames to encode".to_string()));
    }
    if width == 0 || height == 0 || width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(StickerError::Encoding(format!(
            "Frame dimensions {}x{} outside the GIF limit of 65535x65535",
            width, height
        )));
    }

    let expected = (width * height) as usize;
    for (i, frame) in frames.iter().enumerate() {
        if frame.indices.len() != expected {
            return Err(StickerError::Encoding(format!(
                "Frame {} has {} pixels, expected {} ({}x{})",
                i,
                frame.indices.len(),
                expected,
                width,
                height
            )));
        }
    }

    let mut output = Vec::new();
    {
        let mut encoder = Encoder::new(
            &mut output,
            width as u16,
            height as u16,
            &palette.to_gif_palette(),
        )
        .map_err(|e| StickerError::Encoding(format!("GIF encoder init error: {}", e)))?;

        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| StickerError::Encoding(format!("GIF set repeat error: {}", e)))?;

        for frame in frames {
            let gif_frame = Frame {
                width: width as u16,
                height: height as u16,
                delay: frame.delay_cs,
                transparent: Some(palette.transparent_index()),
                dispose: DisposalMethod::Background,
                buffer: Cow::Borrowed(&frame.indices),
                ..Frame::default()
            };
            encoder
                .write_frame(&gif_frame)
                .map_err(|e| StickerError::Encoding(format!("GIF frame write error: {}", e)))?;
        }
    }

    Ok(output)
}

/// Full animation path: center each frame on its canvas, build one shared
/// palette, map every frame to indices and encode.
///
/// All frames must share the first frame's dimensions.
pub fn synthesize_animation(frames: &[RgbaImage], settings: &AnimationSettings) -> Result<Vec<u8>> {
    if frames.is_empty() {
        return Err(StickerError::Encoding("No frames to encode".to_string()));
    }
    if !(settings.fps > 0.0) {
        return Err(StickerError::InvalidParameter(format!(
            "fps must be positive, got {}",
            settings.fps
        )));
    }

    let (width, height) = frames[0].dimensions();
    for (i, frame) in frames.iter().enumerate() {
        if frame.dimensions() != (width, height) {
            return Err(StickerError::Encoding(format!(
                "Frame {} is {}x{}, expected {}x{}",
                i,
                frame.width(),
                frame.height(),
                width,
                height
            )));
        }
    }

    let centered: Vec<RgbaImage> = frames.iter().map(center::center_content).collect();
    let palette = FramePalette::build(&centered);
    log::debug!(
        "animation palette: {} colors + transparent slot, {} frames at {} fps",
        palette.color_count(),
        frames.len(),
        settings.fps
    );

    let delay_cs = settings.delay_cs();
    let indexed: Vec<GifFrame> = centered
        .iter()
        .map(|frame| GifFrame {
            indices: palette.map_indices(frame),
            delay_cs,
        })
        .collect();

    encode_gif(&indexed, &palette, width, height)
}
