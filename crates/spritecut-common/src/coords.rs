//! Pixel and UV geometry for texture cells.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Pixel coordinate in image space (row 0 is the first row of the image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct PixelCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl PixelCoord {
    /// Creates a new pixel coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts to a linear `y * width + x` index.
    ///
    /// Returns `None` when the coordinate lies outside `[0, width) × [0, height)`.
    #[must_use]
    pub fn to_index(self, width: u32, height: u32) -> Option<usize> {
        if self.x < 0 || self.y < 0 {
            return None;
        }
        let (x, y) = (self.x as u32, self.y as u32);
        if x >= width || y >= height {
            return None;
        }
        Some(y as usize * width as usize + x as usize)
    }

    /// Creates from a linear index.
    #[must_use]
    pub const fn from_index(index: usize, width: u32) -> Self {
        let size = width as usize;
        Self {
            x: (index % size) as i32,
            y: (index / size) as i32,
        }
    }
}

/// Axis-aligned integer box in pixel units.
///
/// `left`/`bottom` are inclusive, `right`/`top` exclusive. In image space
/// `bottom` is the smallest row index, so a region covering rows 1 and 2
/// has `bottom = 1, top = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Region {
    /// First column
    pub left: i32,
    /// First row
    pub bottom: i32,
    /// One past the last column
    pub right: i32,
    /// One past the last row
    pub top: i32,
}

impl Region {
    /// Creates a region from its four edges.
    #[must_use]
    pub const fn new(left: i32, bottom: i32, right: i32, top: i32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// A 1×1 region covering a single pixel.
    #[must_use]
    pub const fn from_pixel(pixel: PixelCoord) -> Self {
        Self::new(pixel.x, pixel.y, pixel.x + 1, pixel.y + 1)
    }

    /// Width in pixels (negative for an inverted region).
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels (negative for an inverted region).
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.top - self.bottom
    }

    /// True when the region covers no pixel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Checks if the region contains a pixel.
    #[must_use]
    pub const fn contains(&self, pixel: PixelCoord) -> bool {
        pixel.x >= self.left && pixel.x < self.right && pixel.y >= self.bottom && pixel.y < self.top
    }

    /// Checks if this region overlaps another.
    #[must_use]
    pub const fn intersects(&self, other: &Region) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.bottom < other.top
            && self.top > other.bottom
    }

    /// Smallest region covering both.
    #[must_use]
    pub fn union(&self, other: &Region) -> Region {
        Region {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    /// Swaps inverted edges so that `left <= right` and `bottom <= top`.
    ///
    /// Drag gestures produce regions whose end corner lies before the start corner.
    #[must_use]
    pub fn normalized(&self) -> Region {
        Region {
            left: self.left.min(self.right),
            bottom: self.bottom.min(self.top),
            right: self.left.max(self.right),
            top: self.bottom.max(self.top),
        }
    }

    /// Moves the region by a pixel offset.
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Region {
        Region {
            left: self.left + dx,
            bottom: self.bottom + dy,
            right: self.right + dx,
            top: self.top + dy,
        }
    }

    /// Mirrors the region across the image's top edge.
    ///
    /// Converts between image rows (growing downward) and editor space where
    /// Y grows upward and the texture's top edge sits at `y = 0`. Applying it
    /// twice yields the original region.
    #[must_use]
    pub const fn flip_y(&self) -> Region {
        Region {
            left: self.left,
            bottom: -self.top,
            right: self.right,
            top: -self.bottom,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}, {}, {}, {}}}",
            self.left, self.bottom, self.right, self.top
        )
    }
}

/// Cell rectangle as fractions of the texture size.
///
/// V grows upward: `uv_up` is the upper edge of the cell, so cells near the
/// top of the image have larger `uv_up` values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct UvRect {
    /// Left edge (0 = texture left)
    pub uv_left: f32,
    /// Right edge
    pub uv_right: f32,
    /// Upper edge (1 = texture top)
    pub uv_up: f32,
    /// Lower edge
    pub uv_down: f32,
}

impl UvRect {
    /// Derives UV edges from an image-space region on a `width × height` texture.
    #[must_use]
    pub fn from_region(region: &Region, width: u32, height: u32) -> Self {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        Self {
            uv_left: region.left as f32 / w,
            uv_right: region.right as f32 / w,
            uv_up: 1.0 - region.bottom as f32 / h,
            uv_down: 1.0 - region.top as f32 / h,
        }
    }
}
