//! Pipeline orchestration.
//!
//! One `StickerPipeline` owns a source sheet and the latest preview
//! results. Preview recomputes are debounced and last-writer-wins: a new
//! request supersedes an in-flight one and stale results are discarded
//! rather than surfaced. GIF synthesis is a manual, comparatively
//! expensive step; the pipeline only tracks an advisory outdated flag for
//! it, nothing is locked.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::RgbaImage;

use crate::chroma;
use crate::encoder::{self, AnimationSettings};
use crate::error::{Result, StickerError};
use crate::packager::{self, PackageSettings};
use crate::raster;
use crate::slicer::{self, GridConfig, Slice};

/// Quiescence window before a preview recompute starts. Parameter edits
/// inside this window collapse into one pass.
pub const DEBOUNCE_MS: u64 = 200;

pub struct StickerPipeline {
    source: Arc<RgbaImage>,
    generation: AtomicU64,
    slices: Mutex<Vec<Slice>>,
    animation_outdated: AtomicBool,
}

impl StickerPipeline {
    pub fn new(source: RgbaImage) -> Self {
        Self {
            source: Arc::new(source),
            generation: AtomicU64::new(0),
            slices: Mutex::new(Vec::new()),
            animation_outdated: AtomicBool::new(false),
        }
    }

    /// Decode source bytes and build a pipeline around them.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(raster::decode(bytes)?))
    }

    pub fn source(&self) -> &RgbaImage {
        &self.source
    }

    /// Latest published slices, cloned out of the shared state.
    pub fn slices(&self) -> Vec<Slice> {
        self.slices.lock().unwrap().clone()
    }

    /// Whether a frame-affecting parameter changed since the last
    /// successful GIF synthesis. Advisory only.
    pub fn animation_outdated(&self) -> bool {
        self.animation_outdated.load(Ordering::SeqCst)
    }

    /// Debounced full preview pass: chroma-key the sheet, slice it, and
    /// publish the result if this request is still the latest.
    ///
    /// Returns `Ok(None)` when a newer request superseded this one, either
    /// during the debounce window or while slicing.
    pub async fn preview(&self, config: GridConfig) -> Result<Option<Vec<Slice>>> {
        config.validate()?;

        let my_gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS)).await;
        if self.generation.load(Ordering::SeqCst) != my_gen {
            log::debug!("preview generation {} superseded during debounce", my_gen);
            return Ok(None);
        }

        let source = Arc::clone(&self.source);
        let cfg = config.clone();
        let slices = tokio::task::spawn_blocking(move || -> Result<Vec<Slice>> {
            let keyed = chroma::remove_background(&source, cfg.tolerance);
            slicer::slice_to_grid(&keyed, &cfg)
        })
        .await
        .map_err(|e| StickerError::Processing(format!("Task join error: {}", e)))??;

        let mut latest = self.slices.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != my_gen {
            log::debug!("preview generation {} superseded during compute", my_gen);
            return Ok(None);
        }

        *latest = slices.clone();
        self.animation_outdated.store(true, Ordering::SeqCst);
        log::info!(
            "preview generation {} published {} slices",
            my_gen,
            slices.len()
        );
        Ok(Some(slices))
    }

    /// Synthesize the animated GIF from the current slices. Manual
    /// trigger; clears the outdated flag on success.
    pub async fn synthesize_gif(&self, settings: AnimationSettings) -> Result<Vec<u8>> {
        let frames: Vec<RgbaImage> = {
            let slices = self.slices.lock().unwrap();
            slices.iter().map(|s| s.image.clone()).collect()
        };
        if frames.is_empty() {
            return Err(StickerError::Processing(
                "No slices available; run a preview first".to_string(),
            ));
        }

        let bytes = tokio::task::spawn_blocking(move || {
            encoder::synthesize_animation(&frames, &settings)
        })
        .await
        .map_err(|e| StickerError::Processing(format!("Task join error: {}", e)))??;

        self.animation_outdated.store(false, Ordering::SeqCst);
        Ok(bytes)
    }

    /// Package the current slices into a zip blob.
    pub async fn export_archive(&self, settings: PackageSettings) -> Result<Vec<u8>> {
        let slices = self.slices();
        if slices.is_empty() {
            return Err(StickerError::Processing(
                "No slices available; run a preview first".to_string(),
            ));
        }

        tokio::task::spawn_blocking(move || packager::package_slices(&slices, &settings))
            .await
            .map_err(|e| StickerError::Processing(format!("Task join error: {}", e)))?
    }
}
