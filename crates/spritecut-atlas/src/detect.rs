//! Auto-cell detection.
//!
//! Picks out the sprite under a pixel by flood-filling the 4-connected
//! component of pixels whose alpha exceeds a cut, then returning the
//! component's bounding box.
//!
//! ## Algorithm
//!
//! The membership list doubles as the BFS frontier. Each pass walks the
//! range appended by the previous pass and appends unvisited foreground
//! neighbours (up, down, left, right). The fill ends when a pass appends
//! nothing. A visited flag per pixel bounds membership to `width × height`.
//!
//! All scratch state lives in a `FloodFill` owned by the call, so repeated
//! or nested detections never observe each other's flags.

use spritecut_common::{DetectError, PixelCoord, Region};
use tracing::debug;

use crate::mask::AlphaMask;

/// Per-call flood fill scratch state over one mask.
pub(crate) struct FloodFill<'m> {
    mask: &'m AlphaMask,
    alpha_cut: u8,
    visited: Vec<bool>,
    members: Vec<usize>,
}

impl<'m> FloodFill<'m> {
    /// Creates fresh scratch buffers for `mask`.
    pub(crate) fn new(mask: &'m AlphaMask, alpha_cut: u8) -> Self {
        Self {
            mask,
            alpha_cut,
            visited: vec![false; mask.len()],
            members: Vec::new(),
        }
    }

    /// True when the pixel at `index` counts as foreground.
    #[inline]
    fn is_foreground(&self, index: usize) -> bool {
        self.mask.at(index) > self.alpha_cut
    }

    /// Number of pixels in the most recent fill.
    pub(crate) fn member_count(&self) -> usize {
        self.members.len()
    }

    #[inline]
    fn try_push(&mut self, index: usize) {
        if !self.visited[index] && self.is_foreground(index) {
            self.visited[index] = true;
            self.members.push(index);
        }
    }

    /// Fills the component containing `start` and returns its bounding box.
    ///
    /// Returns `None` when `start` is out of range, background, or already
    /// claimed by an earlier fill on this scratch.
    pub(crate) fn fill_from(&mut self, start: usize) -> Option<Region> {
        if start >= self.visited.len() || self.visited[start] || !self.is_foreground(start) {
            return None;
        }
        let width = self.mask.width() as usize;
        let height = self.mask.height() as usize;

        self.members.clear();
        self.members.push(start);
        self.visited[start] = true;

        let mut reader = 0;
        loop {
            let end = self.members.len();
            while reader < end {
                let curr = self.members[reader];
                reader += 1;

                let x = curr % width;
                let y = curr / width;
                if y > 0 {
                    self.try_push(curr - width);
                }
                if y + 1 < height {
                    self.try_push(curr + width);
                }
                if x > 0 {
                    self.try_push(curr - 1);
                }
                if x + 1 < width {
                    self.try_push(curr + 1);
                }
            }

            if end == self.members.len() {
                break;
            }
        }

        self.bounding_box()
    }

    /// Bounding box of the current membership list, `right`/`top` exclusive.
    fn bounding_box(&self) -> Option<Region> {
        let width = self.mask.width();
        let mut pixels = self
            .members
            .iter()
            .map(|&index| PixelCoord::from_index(index, width));
        let first = Region::from_pixel(pixels.next()?);
        Some(pixels.fold(first, |region, pixel| Region {
            left: region.left.min(pixel.x),
            bottom: region.bottom.min(pixel.y),
            right: region.right.max(pixel.x + 1),
            top: region.top.max(pixel.y + 1),
        }))
    }
}

/// Detects the region under `start`.
///
/// Fails with [`DetectError::OutOfBounds`] when `start` lies outside the
/// mask and [`DetectError::BelowThreshold`] when its alpha is `<= alpha_cut`.
/// Coordinates are image rows; use [`Region::flip_y`] for editor space.
pub fn detect_region(
    mask: &AlphaMask,
    start: PixelCoord,
    alpha_cut: u8,
) -> Result<Region, DetectError> {
    let Some(index) = start.to_index(mask.width(), mask.height()) else {
        debug!(x = start.x, y = start.y, "Detection start outside mask");
        return Err(DetectError::OutOfBounds {
            x: start.x,
            y: start.y,
            width: mask.width(),
            height: mask.height(),
        });
    };

    let alpha = mask.at(index);
    if alpha <= alpha_cut {
        debug!(x = start.x, y = start.y, alpha, alpha_cut, "Detection start below alpha cut");
        return Err(DetectError::BelowThreshold { alpha, alpha_cut });
    }

    let mut fill = FloodFill::new(mask, alpha_cut);
    let region = fill
        .fill_from(index)
        .ok_or(DetectError::BelowThreshold { alpha, alpha_cut })?;
    debug!(
        x = start.x,
        y = start.y,
        pixels = fill.member_count(),
        "Detected region {region}"
    );
    Ok(region)
}

/// Segments the whole mask into regions, one per foreground component.
///
/// Pixels are scanned row-major and each unclaimed foreground pixel seeds a
/// fill, so regions come back ordered by their first pixel in scan order.
/// The visited flags are shared between the seeds of this call only.
#[must_use]
pub fn detect_all_regions(mask: &AlphaMask, alpha_cut: u8) -> Vec<Region> {
    let mut fill = FloodFill::new(mask, alpha_cut);
    let mut regions = Vec::new();

    for index in 0..mask.len() {
        regions.extend(fill.fill_from(index));
    }

    debug!(
        count = regions.len(),
        width = mask.width(),
        height = mask.height(),
        "Segmented mask"
    );
    regions
}
