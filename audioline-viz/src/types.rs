use alloc::{boxed::Box, vec, vec::Vec};

/// One frame of per-bin amplitudes (0..=255), lowest frequency first.
///
/// The length is fixed at construction and never changes; each tick overwrites
/// the contents in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmplitudeBuffer {
    bins: Box<[u8]>,
}

impl AmplitudeBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            bins: vec![0u8; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Amplitude of `bin`, or 0 past the end of the buffer.
    pub fn get(&self, bin: usize) -> u8 {
        self.bins.get(bin).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bins
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bins
    }
}

impl From<Vec<u8>> for AmplitudeBuffer {
    fn from(bins: Vec<u8>) -> Self {
        Self {
            bins: bins.into_boxed_slice(),
        }
    }
}

/// Surface dimensions in CSS-style logical pixels plus the device-pixel multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.pixel_ratio.is_finite()
            && self.width > 0.0
            && self.height > 0.0
            && self.pixel_ratio > 0.0
    }

    /// Size of the backing raster in device pixels.
    pub fn raster_size(&self) -> (u32, u32) {
        (
            libm::ceilf(self.width * self.pixel_ratio) as u32,
            libm::ceilf(self.height * self.pixel_ratio) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_past_end_reads_zero() {
        let buffer = AmplitudeBuffer::from(vec![1, 2, 3]);
        assert_eq!(buffer.get(2), 3);
        assert_eq!(buffer.get(3), 0);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_raster_size_rounds_up() {
        let viewport = Viewport::new(100.5, 50.0, 2.0);
        assert_eq!(viewport.raster_size(), (201, 100));
        assert!(viewport.is_valid());
        assert!(!Viewport::new(0.0, 50.0, 1.0).is_valid());
    }
}
