//! Error types for spritecut.

use thiserror::Error;

/// Reasons the auto-cell detector produces no region.
///
/// Both are non-fatal: the caller's cell model stays untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DetectError {
    /// Start pixel lies outside the mask
    #[error("Start pixel ({x}, {y}) is outside the {width}x{height} mask")]
    OutOfBounds {
        /// Requested column
        x: i32,
        /// Requested row
        y: i32,
        /// Mask width
        width: u32,
        /// Mask height
        height: u32,
    },

    /// Start pixel alpha does not exceed the cut
    #[error("Start pixel alpha {alpha} is not above the alpha cut {alpha_cut}")]
    BelowThreshold {
        /// Alpha sample at the start pixel
        alpha: u8,
        /// Threshold in effect
        alpha_cut: u8,
    },
}

/// Alpha mask construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MaskError {
    /// Sample buffer does not match the declared dimensions
    #[error("Expected {expected} samples for a {width}x{height} mask, got {actual}")]
    SizeMismatch {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Required sample count
        expected: usize,
        /// Provided sample count
        actual: usize,
    },
}

/// Atlas editing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    /// No cell with this name
    #[error("Cell not found: {0}")]
    CellNotFound(String),

    /// Name already used by another cell or clip
    #[error("Name already taken: {0}")]
    NameTaken(String),

    /// No clip with this name
    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    /// Clip has no frame at this position
    #[error("Frame {index} is out of range for a clip of {len} frames")]
    FrameOutOfRange {
        /// Requested frame position
        index: usize,
        /// Frames in the clip
        len: usize,
    },

    /// Operation needs more cells than were given
    #[error("Need at least {required} cells, got {actual}")]
    NotEnoughCells {
        /// Minimum cell count
        required: usize,
        /// Cells supplied
        actual: usize,
    },
}
