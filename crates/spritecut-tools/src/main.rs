//! # Spritecut
//!
//! Command-line front end for the sprite atlas cutter.
//!
//! - `detect`: find the sprite under one pixel
//! - `autogen`: cut a whole sheet into sorted, named cells
//! - `config`: show or write the tool configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod commands;
mod config;
mod texture;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spritecut_atlas::SortOrder;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::{AutogenArgs, DetectArgs};
use crate::config::SpritecutConfig;

#[derive(Parser, Debug)]
#[command(name = "spritecut", version, about = "Sprite atlas cutting tools")]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the sprite bounding box under a pixel
    Detect {
        image: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(long)]
        alpha_cut: Option<u8>,
        /// Y grows upward from the top edge; the region is printed the same way
        #[arg(long)]
        screen_y: bool,
    },
    /// Cut every sprite in an image into sorted, named cells
    Autogen {
        image: PathBuf,
        /// Base cell name
        #[arg(long)]
        name: Option<String>,
        /// rows or columns
        #[arg(long)]
        sort: Option<SortOrder>,
        /// Pixel tolerance for sharing a row/column
        #[arg(long)]
        margin: Option<u32>,
        #[arg(long)]
        alpha_cut: Option<u8>,
        /// Also build a clip of every cell in order
        #[arg(long)]
        clip: Option<String>,
        /// Playback rate for --clip
        #[arg(long)]
        fps: Option<u32>,
        /// Print the atlas as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config {
        /// Write it to this path instead
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SpritecutConfig::load_from(path),
        None => SpritecutConfig::load(),
    };

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("spritecut=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    debug!("Spritecut {}", env!("CARGO_PKG_VERSION"));

    let output = match cli.cmd {
        Command::Detect {
            image,
            x,
            y,
            alpha_cut,
            screen_y,
        } => commands::detect(&DetectArgs {
            image,
            x,
            y,
            alpha_cut: alpha_cut.unwrap_or(config.alpha_cut),
            screen_y,
        })?,
        Command::Autogen {
            image,
            name,
            sort,
            margin,
            alpha_cut,
            clip,
            fps,
            json,
        } => {
            let mut options = config.autogen_options();
            if let Some(sort) = sort {
                options.sort_order = sort;
            }
            if let Some(margin) = margin {
                options.margin = margin;
            }
            if let Some(alpha_cut) = alpha_cut {
                options.alpha_cut = alpha_cut;
            }
            commands::autogen(&AutogenArgs {
                image,
                name: name.unwrap_or_else(|| config.atlas_name.clone()),
                options,
                clip,
                clip_fps: fps.unwrap_or(config.clip_fps),
                json,
            })?
        },
        Command::Config { write } => {
            if write.is_none() {
                info!("Config path: {}", SpritecutConfig::config_path().display());
            }
            commands::config(&config, write.as_deref())?
        },
    };

    println!("{output}");
    Ok(())
}
