//! Alpha-channel sample grid read back from a texture.

use spritecut_common::{MaskError, PixelCoord, Region};

/// Row-major grid of alpha samples, one byte per texture pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl AlphaMask {
    /// Wraps a sample buffer, checking it matches `width × height`.
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(MaskError::SizeMismatch {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Extracts the alpha channel from packed RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize;
        let pixels: &[[u8; 4]] = match bytemuck::try_cast_slice(rgba) {
            Ok(pixels) => pixels,
            Err(_) => {
                return Err(MaskError::SizeMismatch {
                    width,
                    height,
                    expected,
                    actual: rgba.len() / 4,
                })
            },
        };
        Self::new(width, height, pixels.iter().map(|p| p[3]).collect())
    }

    /// Creates a mask with every sample set to `alpha`.
    #[must_use]
    pub fn filled(width: u32, height: u32, alpha: u8) -> Self {
        Self {
            width,
            height,
            samples: vec![alpha; width as usize * height as usize],
        }
    }

    /// Mask width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for a zero-sized mask.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Raw samples, row-major.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Alpha at a pixel, or `None` outside the mask.
    #[must_use]
    pub fn get(&self, pixel: PixelCoord) -> Option<u8> {
        pixel
            .to_index(self.width, self.height)
            .map(|index| self.samples[index])
    }

    /// Alpha at a linear index.
    #[inline]
    pub(crate) fn at(&self, index: usize) -> u8 {
        self.samples[index]
    }

    /// Sets the alpha of one pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pixel: PixelCoord, alpha: u8) {
        if let Some(index) = pixel.to_index(self.width, self.height) {
            self.samples[index] = alpha;
        }
    }

    /// Sets every pixel inside `[left, right) × [bottom, top)` to `alpha`, clipped to the mask.
    pub fn fill_region(&mut self, region: &Region, alpha: u8) {
        for y in region.bottom.max(0)..region.top.min(self.height as i32) {
            for x in region.left.max(0)..region.right.min(self.width as i32) {
                self.set(PixelCoord::new(x, y), alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = AlphaMask::new(3, 3, vec![0; 8]).expect_err("8 samples for 3x3");
        assert_eq!(
            err,
            MaskError::SizeMismatch {
                width: 3,
                height: 3,
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_from_rgba_takes_alpha_channel() {
        let rgba = [
            255, 0, 0, 10, //
            0, 255, 0, 20, //
            0, 0, 255, 30, //
            9, 9, 9, 40,
        ];
        let mask = AlphaMask::from_rgba(2, 2, &rgba).expect("valid rgba");
        assert_eq!(mask.samples(), &[10, 20, 30, 40]);
        assert_eq!(mask.get(PixelCoord::new(1, 1)), Some(40));
    }

    #[test]
    fn test_from_rgba_rejects_partial_pixels() {
        assert!(AlphaMask::from_rgba(1, 1, &[1, 2, 3]).is_err());
        assert!(AlphaMask::from_rgba(2, 1, &[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn test_fill_region_clips_to_mask() {
        let mut mask = AlphaMask::filled(4, 4, 0);
        mask.fill_region(&Region::new(2, 2, 10, 10), 200);

        assert_eq!(mask.get(PixelCoord::new(3, 3)), Some(200));
        assert_eq!(mask.get(PixelCoord::new(1, 3)), Some(0));
        assert_eq!(mask.samples().iter().filter(|&&a| a == 200).count(), 4);
    }

    #[test]
    fn test_zero_sized_mask() {
        let mask = AlphaMask::new(0, 0, Vec::new()).expect("empty mask");
        assert!(mask.is_empty());
        assert_eq!(mask.get(PixelCoord::new(0, 0)), None);
    }
}
