//! Texture loading: decodes an image file and reads back its alpha channel.

use std::path::Path;

use spritecut_atlas::AlphaMask;
use spritecut_common::MaskError;
use thiserror::Error;
use tracing::debug;

/// Error type for texture loading
#[derive(Debug, Error)]
pub enum TextureError {
    /// File not found
    #[error("File not found: {0}")]
    NotFound(String),

    /// Image decode error
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// Decoded pixels did not form a valid mask
    #[error("Mask error: {0}")]
    Mask(#[from] MaskError),
}

/// Loads an image file and extracts its alpha channel.
///
/// Images without an alpha channel come back fully opaque.
pub fn load_alpha_mask<P: AsRef<Path>>(path: P) -> Result<AlphaMask, TextureError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TextureError::NotFound(path.display().to_string()));
    }

    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mask = AlphaMask::from_rgba(width, height, rgba.as_raw())?;

    debug!("Loaded {width}x{height} alpha mask from {}", path.display());
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use spritecut_common::PixelCoord;
    use tempfile::TempDir;

    #[test]
    fn test_load_alpha_mask_from_png() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("sheet.png");

        let mut img = RgbaImage::from_pixel(4, 3, Rgba([0, 0, 0, 0]));
        img.put_pixel(2, 1, Rgba([255, 0, 0, 200]));
        img.save(&path).expect("write png");

        let mask = load_alpha_mask(&path).expect("decodes");
        assert_eq!((mask.width(), mask.height()), (4, 3));
        assert_eq!(mask.get(PixelCoord::new(2, 1)), Some(200));
        assert_eq!(mask.get(PixelCoord::new(0, 0)), Some(0));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_alpha_mask("/nonexistent/sheet.png");
        assert!(matches!(result, Err(TextureError::NotFound(_))));
    }

    #[test]
    fn test_load_garbage_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").expect("write");

        assert!(matches!(load_alpha_mask(&path), Err(TextureError::Decode(_))));
    }
}
