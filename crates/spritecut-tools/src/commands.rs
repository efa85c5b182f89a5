//! Command implementations. Each returns the text to print.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use spritecut_atlas::{auto_generate, detect_region, Atlas, AutoGenOptions};
use spritecut_common::{DetectError, PixelCoord, Region, UvRect};
use tracing::info;

use crate::config::SpritecutConfig;
use crate::texture::load_alpha_mask;

/// Options for `spritecut detect`.
#[derive(Debug, Clone)]
pub struct DetectArgs {
    /// Image to read
    pub image: PathBuf,
    /// Pick column
    pub x: i32,
    /// Pick row (or editor-space Y when `screen_y` is set)
    pub y: i32,
    /// Alpha cut in effect
    pub alpha_cut: u8,
    /// Treat `y` and the printed region as editor space (Y up, top edge at 0)
    pub screen_y: bool,
}

/// Detects the region under one pixel.
pub fn detect(args: &DetectArgs) -> Result<String> {
    let mask = load_alpha_mask(&args.image)
        .with_context(|| format!("loading {}", args.image.display()))?;

    let row = if args.screen_y { args.y.checked_neg() } else { Some(args.y) };
    let Some(row) = row else {
        let reason = DetectError::OutOfBounds {
            x: args.x,
            y: args.y,
            width: mask.width(),
            height: mask.height(),
        };
        return Ok(format!("No region: {reason}"));
    };

    Ok(match detect_region(&mask, PixelCoord::new(args.x, row), args.alpha_cut) {
        Ok(region) => {
            let region = if args.screen_y { region.flip_y() } else { region };
            format!("{region} ({}x{})", region.width(), region.height())
        },
        Err(reason) => format!("No region: {reason}"),
    })
}

/// Options for `spritecut autogen`.
#[derive(Debug, Clone)]
pub struct AutogenArgs {
    /// Image to read
    pub image: PathBuf,
    /// Base name for cells
    pub name: String,
    /// Detection and sort parameters
    pub options: AutoGenOptions,
    /// Also build a clip of every cell in index order
    pub clip: Option<String>,
    /// Playback rate for that clip
    pub clip_fps: u32,
    /// Print the atlas as JSON instead of a table
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CellReport<'a> {
    name: &'a str,
    index: usize,
    rect: Region,
    uv: UvRect,
    origin: [i32; 2],
}

#[derive(Debug, Serialize)]
struct ClipReport<'a> {
    name: &'a str,
    fps: u32,
    frames: &'a [String],
}

#[derive(Debug, Serialize)]
struct AtlasReport<'a> {
    name: &'a str,
    width: u32,
    height: u32,
    textures: &'a [String],
    cells: Vec<CellReport<'a>>,
    clips: Vec<ClipReport<'a>>,
}

fn report(atlas: &Atlas) -> AtlasReport<'_> {
    AtlasReport {
        name: atlas.name(),
        width: atlas.width(),
        height: atlas.height(),
        textures: atlas.textures(),
        cells: atlas
            .linear_cells()
            .into_iter()
            .map(|(name, cell)| CellReport {
                name,
                index: cell.index,
                rect: cell.rect,
                uv: cell.uv,
                origin: cell.origin.to_array(),
            })
            .collect(),
        clips: atlas
            .clip_names()
            .into_iter()
            .filter_map(|name| {
                atlas.clip(name).map(|clip| ClipReport {
                    name,
                    fps: clip.fps(),
                    frames: &clip.frames,
                })
            })
            .collect(),
    }
}

/// Segments a whole texture into sorted, named cells.
pub fn autogen(args: &AutogenArgs) -> Result<String> {
    let mask = load_alpha_mask(&args.image)
        .with_context(|| format!("loading {}", args.image.display()))?;

    let mut atlas = Atlas::new(args.name.clone(), mask.width(), mask.height());
    if let Some(texture) = args.image.file_name() {
        atlas.link_texture(texture.to_string_lossy());
    }
    let count = auto_generate(&mut atlas, &mask, &args.options);
    info!("Generated {count} cells from {}", args.image.display());

    if let Some(base) = &args.clip {
        let clip = atlas.add_clip(base, args.clip_fps);
        let frames: Vec<String> = atlas
            .linear_cells()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();
        for frame in &frames {
            atlas.add_frame(&clip, frame)?;
        }
    }

    if args.json {
        return serde_json::to_string_pretty(&report(&atlas)).context("serializing atlas");
    }

    let report = report(&atlas);
    let mut out = String::new();
    for cell in &report.cells {
        writeln!(
            out,
            "{:>4}  {:<16} {}  uv=({:.4}, {:.4}, {:.4}, {:.4})",
            cell.index,
            cell.name,
            cell.rect,
            cell.uv.uv_left,
            cell.uv.uv_up,
            cell.uv.uv_right,
            cell.uv.uv_down
        )?;
    }
    for clip in &report.clips {
        writeln!(out, "clip {}: {} frames @ {} fps", clip.name, clip.frames.len(), clip.fps)?;
    }
    write!(out, "{count} cells")?;
    Ok(out)
}

/// Prints the effective config, or writes it to `write` when given.
pub fn config(config: &SpritecutConfig, write: Option<&Path>) -> Result<String> {
    match write {
        Some(path) => {
            config
                .save_to(path)
                .with_context(|| format!("writing {}", path.display()))?;
            Ok(format!("Wrote {}", path.display()))
        },
        None => Ok(config.to_toml()?),
    }
}
