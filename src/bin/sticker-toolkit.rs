use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use sticker_toolkit::{
    package_slices, process_sheet, raster, synthesize_animation, AnimationSettings, GridConfig,
    PackageSettings,
};

/// Slice an AI-generated sprite sheet into sticker packs and animated GIFs.
#[derive(Parser, Debug)]
#[command(name = "sticker-toolkit", version)]
struct Args {
    /// Source sprite sheet image.
    input: PathBuf,

    /// Grid rows.
    #[arg(long, default_value_t = 4)]
    rows: u32,

    /// Grid columns.
    #[arg(long, default_value_t = 6)]
    cols: u32,

    /// Per-side cell padding, percent of cell size.
    #[arg(long, default_value_t = 5.0)]
    padding: f32,

    /// Background removal tolerance (0-50).
    #[arg(long, default_value_t = 15.0)]
    tolerance: f32,

    /// Horizontal crop box shift, percent of cell width (-50 to 50).
    #[arg(long, default_value_t = 0.0)]
    offset_x: f32,

    /// Vertical crop box shift, percent of cell height (-50 to 50).
    #[arg(long, default_value_t = 0.0)]
    offset_y: f32,

    /// Write the sticker zip bundle here.
    #[arg(long)]
    zip: Option<PathBuf>,

    /// Write the animated GIF here.
    #[arg(long)]
    gif: Option<PathBuf>,

    /// GIF playback rate in frames per second.
    #[arg(long, default_value_t = 8.0)]
    fps: f32,

    /// Write a 750x400 cover-fit banner crop here.
    #[arg(long)]
    banner: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.zip.is_none() && args.gif.is_none() && args.banner.is_none() {
        bail!("nothing to do: pass at least one of --zip, --gif, --banner");
    }

    let bytes = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    if let Some(path) = &args.banner {
        let sheet = raster::decode(&bytes)?;
        let (w, h) = raster::BANNER_SIZE;
        let banner = raster::crop_to_size(&sheet, w, h);
        fs::write(path, raster::encode_png(&banner)?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("banner ({}x{}): {}", w, h, path.display());
    }

    if args.zip.is_some() || args.gif.is_some() {
        let config = GridConfig {
            rows: args.rows,
            cols: args.cols,
            padding: args.padding,
            tolerance: args.tolerance,
            offset_x: args.offset_x,
            offset_y: args.offset_y,
        };

        let slices = process_sheet(&bytes, &config)?;
        println!(
            "{} slices from a {}x{} grid",
            slices.len(),
            args.rows,
            args.cols
        );

        if let Some(path) = &args.zip {
            let blob = package_slices(&slices, &PackageSettings::default())?;
            fs::write(path, blob).with_context(|| format!("writing {}", path.display()))?;
            println!("sticker bundle: {}", path.display());
        }

        if let Some(path) = &args.gif {
            let frames: Vec<_> = slices.iter().map(|s| s.image.clone()).collect();
            let gif = synthesize_animation(&frames, &AnimationSettings { fps: args.fps })?;
            fs::write(path, gif).with_context(|| format!("writing {}", path.display()))?;
            println!("animation ({} fps): {}", args.fps, path.display());
        }
    }

    Ok(())
}
