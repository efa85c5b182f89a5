//! Whole-texture atlas generation.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::atlas::Atlas;
use crate::detect::detect_all_regions;
use crate::mask::AlphaMask;
use crate::sort::SortOrder;

/// Alpha cut used by the editor when none is configured.
pub const DEFAULT_ALPHA_CUT: u8 = 10;

/// Parameters of the auto-generate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoGenOptions {
    /// Pixels with alpha above this are foreground
    pub alpha_cut: u8,
    /// Primary axis for ordering the generated cells
    pub sort_order: SortOrder,
    /// Pixel tolerance for treating cells as sharing a row/column
    pub margin: u32,
}

impl Default for AutoGenOptions {
    fn default() -> Self {
        Self {
            alpha_cut: DEFAULT_ALPHA_CUT,
            sort_order: SortOrder::Rows,
            margin: 4,
        }
    }
}

/// Rebuilds the atlas from every sprite found in `mask`.
///
/// Existing cells and clips are discarded. Cells are sorted on the grid and
/// renamed `{atlas}_{index}`. Returns the number of cells created.
pub fn auto_generate(atlas: &mut Atlas, mask: &AlphaMask, options: &AutoGenOptions) -> usize {
    atlas.clear();
    atlas.set_texture_size(mask.width(), mask.height());

    for region in detect_all_regions(mask, options.alpha_cut) {
        atlas.create_cell(region);
    }

    atlas.sort_cells(options.sort_order, options.margin);
    atlas.rename_all();

    info!(
        atlas = atlas.name(),
        cells = atlas.len(),
        alpha_cut = options.alpha_cut,
        order = %options.sort_order,
        margin = options.margin,
        "Auto-generated atlas"
    );
    atlas.len()
}
