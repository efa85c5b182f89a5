//! # Spritecut Atlas
//!
//! Toolkit-independent core of the sprite atlas editor.
//!
//! This crate provides:
//! - Alpha masks read back from a texture's alpha channel
//! - Auto-cell detection (4-connected flood fill to a bounding box)
//! - Margin-tolerant grid sorting of cells
//! - The atlas model: named cells, pivots, linked textures and clips
//! - Whole-texture auto-generation
//!
//! ## Coordinates
//!
//! Regions are in image rows: row 0 is the first row of the texture and
//! `bottom` is the smallest row a region covers. UVs have V growing upward,
//! so `uv_up` is largest for cells near the top of the image.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod atlas;
pub mod autogen;
pub mod clip;
pub mod detect;
pub mod mask;
pub mod sort;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::atlas::*;
    pub use crate::autogen::*;
    pub use crate::clip::*;
    pub use crate::detect::*;
    pub use crate::mask::*;
    pub use crate::sort::*;
    pub use spritecut_common::prelude::*;
}

pub use prelude::*;
