//! Pixel Buffer Management
//!
//! Provides the in-memory image type shared by the codec and the filters.
//! Samples live in one contiguous row-major allocation, three channels per
//! pixel in (red, green, blue) order.

use sha2::{Digest, Sha256};

use crate::error::{BlurError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Number of color channels per pixel
pub const CHANNELS: usize = 3;

/// Channel index of red in a stored pixel
pub const RED: usize = 0;

/// Channel index of green in a stored pixel
pub const GREEN: usize = 1;

/// Channel index of blue in a stored pixel
pub const BLUE: usize = 2;

// ============================================================================
// Helper Functions
// ============================================================================

/// Number of samples needed for a `width` x `height` image
///
/// Returns `None` if the count does not fit in `usize`.
#[inline]
pub fn sample_count(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(CHANNELS)
}

// ============================================================================
// Pixel Buffer
// ============================================================================

/// Owned width x height grid of RGB samples
///
/// A buffer is either empty (zero width or height, no storage) or fully
/// allocated: there is no partially populated state.
///
/// # Example
/// ```
/// use bmpblur::image::PixelBuffer;
///
/// let mut buffer = PixelBuffer::allocate(4, 2).unwrap();
/// buffer.set_pixel(1, 3, [255, 128, 0]).unwrap();
/// assert_eq!(buffer.pixel(1, 3).unwrap(), [255, 128, 0]);
/// assert_eq!(buffer.get(0, 0, 2).unwrap(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Create the empty buffer (no dimensions, no storage)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocate a zero-filled buffer
    ///
    /// If either dimension is zero the empty buffer is returned.
    ///
    /// # Errors
    /// * `OutOfMemory` - If the sample storage cannot be reserved
    pub fn allocate(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Ok(Self::empty());
        }

        let count = sample_count(width, height).ok_or_else(|| BlurError::OutOfMemory {
            details: format!("{}x{} image exceeds addressable memory", width, height),
        })?;

        let mut samples = Vec::new();
        samples
            .try_reserve_exact(count)
            .map_err(|e| BlurError::OutOfMemory {
                details: format!("cannot allocate {}x{} image: {}", width, height, e),
            })?;
        samples.resize(count, 0);

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a buffer from row-major RGB samples
    ///
    /// # Errors
    /// * `InvalidFormat` - If the sample count does not match the dimensions
    pub fn from_raw(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        let expected = if width == 0 || height == 0 {
            Some(0)
        } else {
            sample_count(width, height)
        };

        if expected != Some(samples.len()) {
            return Err(BlurError::InvalidFormat {
                reason: format!(
                    "{} samples do not describe a {}x{} RGB image",
                    samples.len(),
                    width,
                    height
                ),
            });
        }

        if samples.is_empty() {
            return Ok(Self::empty());
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Release all storage and return to the empty state
    ///
    /// Releasing an empty buffer does nothing.
    pub fn release(&mut self) {
        self.samples = Vec::new();
        self.width = 0;
        self.height = 0;
    }

    /// Deep copy into a freshly allocated buffer
    ///
    /// # Errors
    /// * `OutOfMemory` - If the new storage cannot be reserved
    pub fn copy(&self) -> Result<Self> {
        let mut out = Self::allocate(self.width, self.height)?;
        out.samples.copy_from_slice(&self.samples);
        Ok(out)
    }

    /// Image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if the buffer holds no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in row-major (row, col, channel) order
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.samples
    }

    /// Consume the buffer, returning its samples
    pub fn into_raw(self) -> Vec<u8> {
        self.samples
    }

    /// Get a single sample
    ///
    /// # Errors
    /// * `OutOfBounds` - If row, col or channel is outside the buffer
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Result<u8> {
        let index = self.index(row, col, channel)?;
        Ok(self.samples[index])
    }

    /// Set a single sample
    ///
    /// # Errors
    /// * `OutOfBounds` - If row, col or channel is outside the buffer
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) -> Result<()> {
        let index = self.index(row, col, channel)?;
        self.samples[index] = value;
        Ok(())
    }

    /// Get the (red, green, blue) triple of a pixel
    pub fn pixel(&self, row: usize, col: usize) -> Result<[u8; CHANNELS]> {
        let start = self.index(row, col, 0)?;
        let mut rgb = [0u8; CHANNELS];
        rgb.copy_from_slice(&self.samples[start..start + CHANNELS]);
        Ok(rgb)
    }

    /// Set the (red, green, blue) triple of a pixel
    pub fn set_pixel(&mut self, row: usize, col: usize, rgb: [u8; CHANNELS]) -> Result<()> {
        let start = self.index(row, col, 0)?;
        self.samples[start..start + CHANNELS].copy_from_slice(&rgb);
        Ok(())
    }

    /// Samples of one row, `width * 3` bytes long
    pub fn row(&self, row: usize) -> Result<&[u8]> {
        let start = self.index(row, 0, 0)?;
        Ok(&self.samples[start..start + self.row_len()])
    }

    /// Mutable samples of one row
    pub fn row_mut(&mut self, row: usize) -> Result<&mut [u8]> {
        let start = self.index(row, 0, 0)?;
        let len = self.row_len();
        Ok(&mut self.samples[start..start + len])
    }

    /// Set every pixel to the same color
    pub fn fill(&mut self, rgb: [u8; CHANNELS]) {
        for pixel in self.samples.chunks_exact_mut(CHANNELS) {
            pixel.copy_from_slice(&rgb);
        }
    }

    /// Mean value of one channel across the image
    ///
    /// Returns 0.0 for empty buffers or channels outside 0..3.
    pub fn mean_channel(&self, channel: usize) -> f64 {
        if self.is_empty() || channel >= CHANNELS {
            return 0.0;
        }

        let sum: u64 = self
            .samples
            .iter()
            .skip(channel)
            .step_by(CHANNELS)
            .map(|&s| s as u64)
            .sum();

        sum as f64 / (self.width as f64 * self.height as f64)
    }

    /// SHA-256 of the dimensions and samples, as lowercase hex
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.samples);
        format!("{:x}", hasher.finalize())
    }

    #[inline]
    fn row_len(&self) -> usize {
        self.width as usize * CHANNELS
    }

    fn index(&self, row: usize, col: usize, channel: usize) -> Result<usize> {
        if row >= self.height as usize || col >= self.width as usize || channel >= CHANNELS {
            return Err(BlurError::OutOfBounds {
                row,
                col,
                channel,
                width: self.width,
                height: self.height,
            });
        }
        Ok((row * self.width as usize + col) * CHANNELS + channel)
    }
}

#[cfg(test)]
impl PixelBuffer {
    /// Buffer reporting the given dimensions with no sample storage
    ///
    /// Only for exercising size checks that run before any sample is touched.
    pub(crate) fn unbacked(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: Vec::new(),
        }
    }
}
