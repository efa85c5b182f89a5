//! Animation clips: ordered cell names played back at a fixed rate.

use serde::{Deserialize, Serialize};

/// Default playback rate for new clips.
pub const DEFAULT_FPS: u32 = 30;

/// Highest playback rate the clip editor accepts.
pub const MAX_FPS: u32 = 999;

/// Ordered sequence of cell names forming one animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    /// Cell names, one per frame
    pub frames: Vec<String>,
    fps: u32,
}

impl Default for Clip {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl Clip {
    /// Creates an empty clip.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            frames: Vec::new(),
            fps: fps.clamp(1, MAX_FPS),
        }
    }

    /// Playback rate in frames per second.
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Sets the playback rate, clamped to `1..=MAX_FPS`.
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.clamp(1, MAX_FPS);
    }

    /// Appends a frame.
    pub fn push_frame(&mut self, cell: impl Into<String>) {
        self.frames.push(cell.into());
    }

    /// Length of one loop in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 / self.fps as f32
    }

    /// Frame shown `seconds` into looping playback.
    #[must_use]
    pub fn frame_at(&self, seconds: f32) -> Option<&str> {
        if self.frames.is_empty() {
            return None;
        }
        let tick = (seconds.max(0.0) * self.fps as f32).floor() as usize;
        self.frames.get(tick % self.frames.len()).map(String::as_str)
    }

    /// Removes the frame at `index`, returning its cell name.
    pub fn remove_frame(&mut self, index: usize) -> Option<String> {
        (index < self.frames.len()).then(|| self.frames.remove(index))
    }

    /// Moves the frame at `from` so that it ends up at `to`.
    ///
    /// Frames in between shift by one. Returns false if either position is
    /// out of range.
    pub fn move_frame(&mut self, from: usize, to: usize) -> bool {
        let len = self.frames.len();
        if from >= len || to >= len {
            return false;
        }
        let frame = self.frames.remove(from);
        self.frames.insert(to, frame);
        true
    }

    /// Drops every frame showing `cell`. Returns how many were removed.
    pub fn remove_cell(&mut self, cell: &str) -> usize {
        let before = self.frames.len();
        self.frames.retain(|frame| frame != cell);
        before - self.frames.len()
    }

    /// Points frames showing `old` at `new`.
    pub fn rename_cell(&mut self, old: &str, new: &str) {
        for frame in &mut self.frames {
            if frame == old {
                *frame = new.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_is_clamped() {
        assert_eq!(Clip::new(0).fps(), 1);
        assert_eq!(Clip::new(5000).fps(), MAX_FPS);

        let mut clip = Clip::default();
        assert_eq!(clip.fps(), DEFAULT_FPS);
        clip.set_fps(12);
        assert_eq!(clip.fps(), 12);
    }

    #[test]
    fn test_frame_at_loops() {
        let mut clip = Clip::new(10);
        clip.push_frame("walk_0");
        clip.push_frame("walk_1");
        clip.push_frame("walk_2");

        assert_eq!(clip.frame_at(0.0), Some("walk_0"));
        assert_eq!(clip.frame_at(0.15), Some("walk_1"));
        assert_eq!(clip.frame_at(0.25), Some("walk_2"));
        assert_eq!(clip.frame_at(0.35), Some("walk_0"));
        assert!((clip.duration() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_empty_clip_has_no_frame() {
        assert_eq!(Clip::default().frame_at(1.0), None);
    }

    #[test]
    fn test_frame_editing() {
        let mut clip = Clip::default();
        for name in ["a", "b", "c", "d"] {
            clip.push_frame(name);
        }

        assert!(clip.move_frame(0, 2));
        assert_eq!(clip.frames, ["b", "c", "a", "d"]);
        assert!(clip.move_frame(3, 0));
        assert_eq!(clip.frames, ["d", "b", "c", "a"]);
        assert!(!clip.move_frame(4, 0));
        assert!(!clip.move_frame(0, 4));

        assert_eq!(clip.remove_frame(1), Some("b".to_string()));
        assert_eq!(clip.remove_frame(3), None);
        assert_eq!(clip.frames, ["d", "c", "a"]);
    }

    #[test]
    fn test_remove_and_rename_cell() {
        let mut clip = Clip::default();
        for name in ["a", "b", "a", "c"] {
            clip.push_frame(name);
        }

        assert_eq!(clip.remove_cell("a"), 2);
        clip.rename_cell("b", "z");
        assert_eq!(clip.frames, vec!["z".to_string(), "c".to_string()]);
    }
}
