//! # Spritecut Common
//!
//! Types shared by the spritecut crates:
//! - Pixel coordinates, pixel regions and UV rectangles
//! - Error types for detection, masks and atlas editing
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;
