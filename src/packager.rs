//! Sticker archive packaging.
//!
//! Bundles exported slices into one downloadable zip blob, one PNG per
//! slice plus an optional JSON manifest describing every entry.

use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::raster;
use crate::slicer::Slice;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSettings {
    /// Folder name inside the archive.
    pub folder: String,
    /// Also write a manifest.json describing every entry.
    pub export_manifest: bool,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            folder: "stickers".to_string(),
            export_manifest: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ManifestEntry {
    file: String,
    id: String,
    row: u32,
    col: u32,
    width: u32,
    height: u32,
}

/// Package slices into a single zip blob.
///
/// Entries are written in slice order (row-major) as
/// `{folder}/sticker_{n}.png` with a 1-based sequential index; the
/// manifest preserves each slice's grid coordinates.
pub fn package_slices(slices: &[Slice], settings: &PackageSettings) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut manifest: Vec<ManifestEntry> = Vec::with_capacity(slices.len());

    for (index, slice) in slices.iter().enumerate() {
        let file = format!("sticker_{}.png", index + 1);
        let png = raster::encode_png(&slice.image)?;

        zip.start_file(format!("{}/{}", settings.folder, file), options)?;
        zip.write_all(&png)?;

        manifest.push(ManifestEntry {
            file,
            id: slice.id.clone(),
            row: slice.row,
            col: slice.col,
            width: slice.image.width(),
            height: slice.image.height(),
        });
    }

    if settings.export_manifest {
        zip.start_file(format!("{}/manifest.json", settings.folder), options)?;
        zip.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;
    }

    log::debug!("packaged {} slices into archive", slices.len());
    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Read;

    fn sample_slices() -> Vec<Slice> {
        vec![
            Slice {
                id: "sticker_0_0".to_string(),
                row: 0,
                col: 0,
                image: RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])),
            },
            Slice {
                id: "sticker_0_1".to_string(),
                row: 0,
                col: 1,
                image: RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255])),
            },
        ]
    }

    #[test]
    fn test_archive_layout_and_order() {
        let blob = package_slices(&sample_slices(), &PackageSettings::default()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(blob)).unwrap();
        assert_eq!(archive.len(), 3);
        assert_eq!(archive.by_index(0).unwrap().name(), "stickers/sticker_1.png");
        assert_eq!(archive.by_index(1).unwrap().name(), "stickers/sticker_2.png");
        assert_eq!(archive.by_index(2).unwrap().name(), "stickers/manifest.json");
    }

    #[test]
    fn test_entries_roundtrip_exactly() {
        let slices = sample_slices();
        let blob = package_slices(&slices, &PackageSettings::default()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(blob)).unwrap();

        for (i, slice) in slices.iter().enumerate() {
            let mut entry = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            assert_eq!(bytes, raster::encode_png(&slice.image).unwrap());
        }
    }

    #[test]
    fn test_manifest_describes_slices() {
        let blob = package_slices(&sample_slices(), &PackageSettings::default()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(blob)).unwrap();

        let mut json = String::new();
        archive
            .by_name("stickers/manifest.json")
            .unwrap()
            .read_to_string(&mut json)
            .unwrap();

        let entries: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["id"], "sticker_0_0");
        assert_eq!(entries[1]["col"], 1);
        assert_eq!(entries[0]["width"], 4);
    }

    #[test]
    fn test_manifest_can_be_disabled() {
        let settings = PackageSettings {
            export_manifest: false,
            ..PackageSettings::default()
        };
        let blob = package_slices(&sample_slices(), &settings).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(blob)).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_empty_slice_list_yields_valid_archive() {
        let blob = package_slices(&[], &PackageSettings::default()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(blob)).unwrap();
        assert_eq!(archive.len(), 1); // manifest only
    }
}
