//! Atlas model: named cells on one texture, linked textures and clips.
//!
//! Cells are plain records keyed by name. Every editing operation validates
//! its inputs before touching the map, so a failed call leaves the atlas
//! exactly as it was.

use ahash::AHashMap;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use spritecut_common::{AtlasError, DetectError, PixelCoord, Region, UvRect};
use tracing::{debug, info};

use crate::clip::Clip;
use crate::detect::detect_region;
use crate::mask::AlphaMask;
use crate::sort::{sort_and_index, GridCell, GridComparator, SortOrder};

/// One sprite frame: a rectangle on the texture plus its pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Pixel rectangle in image rows, always normalized
    pub rect: Region,
    /// Rectangle as texture fractions
    pub uv: UvRect,
    /// Rank assigned by the last sort (or creation order)
    pub index: usize,
    /// Pivot in pixels from the rectangle's `left`/`bottom` corner
    pub origin: IVec2,
}

impl Cell {
    /// Builds a cell from a pixel rectangle on a `width × height` texture.
    #[must_use]
    pub fn from_rect(rect: Region, width: u32, height: u32, index: usize) -> Self {
        let mut cell = Self {
            rect,
            uv: UvRect::default(),
            index,
            origin: IVec2::ZERO,
        };
        cell.mold(width, height);
        cell
    }

    /// Normalizes the rectangle and recomputes the UV edges from it.
    pub fn mold(&mut self, width: u32, height: u32) {
        self.rect = self.rect.normalized();
        self.uv = UvRect::from_region(&self.rect, width, height);
    }
}

impl GridCell for Cell {
    fn uv(&self) -> &UvRect {
        &self.uv
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

/// First free name of the form `{base}_{n}`, or `base` itself when allowed and free.
fn free_name(base: &str, bare: bool, taken: impl Fn(&str) -> bool) -> String {
    if bare && !taken(base) {
        return base.to_string();
    }
    (0usize..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

/// Cells cut from one texture, keyed by unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atlas {
    name: String,
    width: u32,
    height: u32,
    cells: AHashMap<String, Cell>,
    textures: Vec<String>,
    clips: AHashMap<String, Clip>,
}

impl Atlas {
    /// Creates an empty atlas for a `width × height` texture.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            cells: AHashMap::new(),
            textures: Vec::new(),
            clips: AHashMap::new(),
        }
    }

    /// Base name used when naming cells.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Texture width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Changes the texture size and re-molds every cell's UVs.
    pub fn set_texture_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        for cell in self.cells.values_mut() {
            cell.mold(width, height);
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the atlas has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Looks up a cell by name.
    #[must_use]
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.get(name)
    }

    fn cell_mut(&mut self, name: &str) -> Result<&mut Cell, AtlasError> {
        self.cells
            .get_mut(name)
            .ok_or_else(|| AtlasError::CellNotFound(name.to_string()))
    }

    fn ensure_cells(&self, names: &[&str]) -> Result<(), AtlasError> {
        match names.iter().find(|name| !self.cells.contains_key(**name)) {
            Some(missing) => Err(AtlasError::CellNotFound((*missing).to_string())),
            None => Ok(()),
        }
    }

    /// Cells ordered by index (name breaks ties).
    #[must_use]
    pub fn linear_cells(&self) -> Vec<(&str, &Cell)> {
        let mut cells: Vec<_> = self
            .cells
            .iter()
            .map(|(name, cell)| (name.as_str(), cell))
            .collect();
        cells.sort_by(|a, b| a.1.index.cmp(&b.1.index).then_with(|| a.0.cmp(b.0)));
        cells
    }

    /// Renumbers indices to `0..len` keeping the current order.
    fn compact_indices(&mut self) {
        let order: Vec<String> = self
            .linear_cells()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();
        for (rank, name) in order.iter().enumerate() {
            if let Some(cell) = self.cells.get_mut(name) {
                cell.index = rank;
            }
        }
    }

    /// First unused cell name derived from `base`.
    #[must_use]
    pub fn unique_cell_name(&self, base: &str) -> String {
        free_name(base, false, |name| self.cells.contains_key(name))
    }

    /// Adds a cell under the next free `{atlas}_{n}` name.
    pub fn create_cell(&mut self, rect: Region) -> String {
        let name = self.unique_cell_name(&self.name);
        let cell = Cell::from_rect(rect, self.width, self.height, self.cells.len());
        debug!(cell = %name, "Created cell {}", cell.rect);
        self.cells.insert(name.clone(), cell);
        name
    }

    /// Adds a cell under an explicit name.
    pub fn insert_cell(&mut self, name: impl Into<String>, rect: Region) -> Result<(), AtlasError> {
        let name = name.into();
        if self.cells.contains_key(&name) {
            return Err(AtlasError::NameTaken(name));
        }
        let cell = Cell::from_rect(rect, self.width, self.height, self.cells.len());
        self.cells.insert(name, cell);
        Ok(())
    }

    /// Detects the sprite under `pick` and adds it as a new cell.
    ///
    /// `mask` must be the alpha channel of this atlas's texture. When no
    /// region is found the atlas is left untouched.
    pub fn auto_create_cell(
        &mut self,
        mask: &AlphaMask,
        pick: PixelCoord,
        alpha_cut: u8,
    ) -> Result<String, DetectError> {
        let region = detect_region(mask, pick, alpha_cut)?;
        Ok(self.create_cell(region))
    }

    /// Renames a cell, resolving conflicts to the first free `{requested}_{n}`.
    ///
    /// Returns the name actually used. Clip frames follow the rename.
    pub fn rename_cell(&mut self, old: &str, requested: &str) -> Result<String, AtlasError> {
        if !self.cells.contains_key(old) {
            return Err(AtlasError::CellNotFound(old.to_string()));
        }
        if old == requested {
            return Ok(old.to_string());
        }

        let name = free_name(requested, true, |name| self.cells.contains_key(name));
        if let Some(cell) = self.cells.remove(old) {
            self.cells.insert(name.clone(), cell);
        }
        for clip in self.clips.values_mut() {
            clip.rename_cell(old, &name);
        }
        debug!(from = old, to = %name, "Renamed cell");
        Ok(name)
    }

    /// Deletes a cell and every clip frame showing it.
    pub fn remove_cell(&mut self, name: &str) -> Result<Cell, AtlasError> {
        let cell = self
            .cells
            .remove(name)
            .ok_or_else(|| AtlasError::CellNotFound(name.to_string()))?;
        for clip in self.clips.values_mut() {
            clip.remove_cell(name);
        }
        self.compact_indices();
        Ok(cell)
    }

    /// Merges cells into the first one, whose rectangle becomes the union.
    ///
    /// The first cell keeps its name, index and origin; the rest are deleted.
    pub fn combine_cells(&mut self, names: &[&str]) -> Result<String, AtlasError> {
        if names.len() < 2 {
            return Err(AtlasError::NotEnoughCells {
                required: 2,
                actual: names.len(),
            });
        }
        self.ensure_cells(names)?;

        let first = names[0];
        let mut rect = self.cells[first].rect;
        for name in &names[1..] {
            if *name == first {
                continue;
            }
            if let Some(cell) = self.cells.remove(*name) {
                rect = rect.union(&cell.rect);
            }
            for clip in self.clips.values_mut() {
                clip.remove_cell(name);
            }
        }

        let (width, height) = (self.width, self.height);
        let cell = self.cell_mut(first)?;
        cell.rect = rect;
        cell.mold(width, height);
        self.compact_indices();
        debug!(cell = first, merged = names.len(), "Combined cells into {rect}");
        Ok(first.to_string())
    }

    /// Shifts cells by a pixel offset.
    pub fn move_cells(&mut self, names: &[&str], delta: IVec2) -> Result<(), AtlasError> {
        self.ensure_cells(names)?;
        let (width, height) = (self.width, self.height);
        for name in names {
            let cell = self.cell_mut(name)?;
            cell.rect = cell.rect.translated(delta.x, delta.y);
            cell.mold(width, height);
        }
        Ok(())
    }

    /// Replaces a cell's rectangle, keeping its index.
    pub fn resize_cell(&mut self, name: &str, rect: Region) -> Result<(), AtlasError> {
        let (width, height) = (self.width, self.height);
        let cell = self.cell_mut(name)?;
        cell.rect = rect;
        cell.mold(width, height);
        Ok(())
    }

    /// Names of cells overlapping `rect`, in index order.
    #[must_use]
    pub fn cells_intersecting(&self, rect: &Region) -> Vec<String> {
        let rect = rect.normalized();
        self.linear_cells()
            .into_iter()
            .filter(|(_, cell)| cell.rect.intersects(&rect))
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Moves a cell to position `index` in the linear order.
    ///
    /// Cells in between shift by one and indices stay `0..len`. Positions past
    /// the end clamp to the last slot. Returns the index actually used.
    pub fn move_cell_to(&mut self, name: &str, index: usize) -> Result<usize, AtlasError> {
        if !self.cells.contains_key(name) {
            return Err(AtlasError::CellNotFound(name.to_string()));
        }

        let mut order: Vec<String> = self
            .linear_cells()
            .into_iter()
            .map(|(candidate, _)| candidate.to_string())
            .filter(|candidate| candidate != name)
            .collect();
        let index = index.min(order.len());
        order.insert(index, name.to_string());

        for (rank, candidate) in order.iter().enumerate() {
            if let Some(cell) = self.cells.get_mut(candidate) {
                cell.index = rank;
            }
        }
        debug!(cell = name, index, "Moved cell");
        Ok(index)
    }

    /// Orders cells on the grid and stores each rank as the cell's index.
    pub fn sort_cells(&mut self, order: SortOrder, margin: u32) {
        let comparator = GridComparator::new(order, margin, self.width, self.height);
        let mut cells: Vec<&mut Cell> = self.cells.values_mut().collect();
        cells.sort_by_key(|cell| cell.index);
        let sorted = sort_and_index(cells, &comparator);
        debug!(count = sorted.len(), %order, margin, "Sorted cells");
    }

    /// Renames every cell to `{atlas}_{index}`, discarding custom names.
    ///
    /// Destructive: only the auto-generate action should call this.
    pub fn rename_all(&mut self) {
        let order: Vec<String> = self
            .linear_cells()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();
        let mut old_cells = std::mem::take(&mut self.cells);
        let mut renames = Vec::with_capacity(order.len());

        for (rank, old) in order.into_iter().enumerate() {
            if let Some(mut cell) = old_cells.remove(&old) {
                let name = format!("{}_{rank}", self.name);
                cell.index = rank;
                self.cells.insert(name.clone(), cell);
                renames.push((old, name));
            }
        }

        let renames: AHashMap<String, String> = renames.into_iter().collect();
        for clip in self.clips.values_mut() {
            for frame in &mut clip.frames {
                if let Some(name) = renames.get(frame.as_str()) {
                    frame.clone_from(name);
                }
            }
        }
        info!(atlas = %self.name, count = self.cells.len(), "Renamed all cells");
    }

    /// Drops all cells and clips.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.clips.clear();
    }

    /// Nudges a cell's pivot. Returns the new origin.
    pub fn move_origin(&mut self, name: &str, delta: IVec2) -> Result<IVec2, AtlasError> {
        let cell = self.cell_mut(name)?;
        cell.origin += delta;
        Ok(cell.origin)
    }

    /// Name of the cell `step` places away from `name` in index order, wrapping.
    pub fn cycle_cell(&self, name: &str, step: i32) -> Result<String, AtlasError> {
        let cells = self.linear_cells();
        let position = cells
            .iter()
            .position(|(candidate, _)| *candidate == name)
            .ok_or_else(|| AtlasError::CellNotFound(name.to_string()))?;
        let target = (position as i64 + i64::from(step)).rem_euclid(cells.len() as i64) as usize;
        Ok(cells[target].0.to_string())
    }

    /// Texture names referencing this atlas.
    #[must_use]
    pub fn textures(&self) -> &[String] {
        &self.textures
    }

    /// Links a texture. Returns false if it was already linked.
    pub fn link_texture(&mut self, texture: impl Into<String>) -> bool {
        let texture = texture.into();
        if self.textures.contains(&texture) {
            return false;
        }
        self.textures.push(texture);
        true
    }

    /// Unlinks a texture. Returns false if it was not linked.
    pub fn unlink_texture(&mut self, texture: &str) -> bool {
        let before = self.textures.len();
        self.textures.retain(|t| t != texture);
        before != self.textures.len()
    }

    /// Looks up a clip.
    #[must_use]
    pub fn clip(&self, name: &str) -> Option<&Clip> {
        self.clips.get(name)
    }

    /// Clip names, sorted.
    #[must_use]
    pub fn clip_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.clips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Adds an empty clip named `base`, or `{base}_{n}` if taken. Returns the name used.
    pub fn add_clip(&mut self, base: &str, fps: u32) -> String {
        let name = free_name(base, true, |name| self.clips.contains_key(name));
        self.clips.insert(name.clone(), Clip::new(fps));
        name
    }

    /// Deletes a clip.
    pub fn remove_clip(&mut self, name: &str) -> Result<Clip, AtlasError> {
        self.clips
            .remove(name)
            .ok_or_else(|| AtlasError::ClipNotFound(name.to_string()))
    }

    /// Appends a cell to a clip.
    pub fn add_frame(&mut self, clip: &str, cell: &str) -> Result<(), AtlasError> {
        if !self.cells.contains_key(cell) {
            return Err(AtlasError::CellNotFound(cell.to_string()));
        }
        self.clips
            .get_mut(clip)
            .ok_or_else(|| AtlasError::ClipNotFound(clip.to_string()))?
            .push_frame(cell);
        Ok(())
    }

    /// Removes the frame at `index` from a clip. Returns the cell it showed.
    pub fn remove_frame(&mut self, clip: &str, index: usize) -> Result<String, AtlasError> {
        let clip = self
            .clips
            .get_mut(clip)
            .ok_or_else(|| AtlasError::ClipNotFound(clip.to_string()))?;
        let len = clip.frames.len();
        clip.remove_frame(index).ok_or(AtlasError::FrameOutOfRange { index, len })
    }

    /// Moves a clip frame from position `from` to position `to`.
    pub fn move_frame(&mut self, clip: &str, from: usize, to: usize) -> Result<(), AtlasError> {
        let clip = self
            .clips
            .get_mut(clip)
            .ok_or_else(|| AtlasError::ClipNotFound(clip.to_string()))?;
        let len = clip.frames.len();
        if clip.move_frame(from, to) {
            Ok(())
        } else {
            Err(AtlasError::FrameOutOfRange {
                index: from.max(to),
                len,
            })
        }
    }

    /// Changes a clip's playback rate.
    pub fn set_clip_fps(&mut self, clip: &str, fps: u32) -> Result<(), AtlasError> {
        self.clips
            .get_mut(clip)
            .ok_or_else(|| AtlasError::ClipNotFound(clip.to_string()))?
            .set_fps(fps);
        Ok(())
    }
}
