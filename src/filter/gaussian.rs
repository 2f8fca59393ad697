//! Gaussian Blur Filter
//!
//! Composes kernel generation and convolution into one operation.

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::error::{BlurError, Result};
use crate::filter::convolve::convolve;
use crate::filter::kernel::Kernel;
use crate::filter::traits::{Filter, FilterParams};
use crate::image::PixelBuffer;
use crate::impl_filter_common;

// ============================================================================
// Constants
// ============================================================================

/// Default kernel side length
pub const DEFAULT_KERNEL_SIZE: usize = 7;

/// Default Gaussian spread
pub const DEFAULT_SIGMA: f64 = 1.5;

// ============================================================================
// Free function
// ============================================================================

/// Blur `input` with a normalized `size` x `size` Gaussian of spread `sigma`
///
/// # Example
/// ```
/// use bmpblur::filter::blur;
/// use bmpblur::image::generate_gradient;
///
/// let input = generate_gradient(16, 16).unwrap();
/// let output = blur(&input, 5, 1.0).unwrap();
/// assert_eq!(output.width(), 16);
/// ```
///
/// # Errors
/// * `InvalidParameter` - If `size` is even or zero, or `sigma` is not positive
/// * `OutOfMemory` - If the output buffer cannot be allocated
pub fn blur(input: &PixelBuffer, size: usize, sigma: f64) -> Result<PixelBuffer> {
    let kernel = Kernel::gaussian(size, sigma)?;
    convolve(input, &kernel)
}

// ============================================================================
// Gaussian Blur Filter
// ============================================================================

/// Gaussian blur as a configurable [`Filter`]
///
/// # Parameters
/// - `kernel_size`: odd side length of the kernel
/// - `sigma`: spread of the Gaussian
#[derive(Debug, Clone, Serialize)]
pub struct GaussianBlur {
    params: FilterParams,
    kernel_size: usize,
    sigma: f64,
    #[serde(skip)]
    kernel: Kernel,
}

impl GaussianBlur {
    /// Create a new Gaussian blur filter
    ///
    /// # Errors
    /// * `InvalidParameter` - If `kernel_size` is even or zero, or `sigma` is not positive
    pub fn new(kernel_size: usize, sigma: f64) -> Result<Self> {
        Ok(Self {
            params: FilterParams::default(),
            kernel_size,
            sigma,
            kernel: Kernel::gaussian(kernel_size, sigma)?,
        })
    }

    /// Kernel side length
    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    /// Gaussian spread
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// The precomputed kernel
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self {
            params: FilterParams::default(),
            kernel_size: DEFAULT_KERNEL_SIZE,
            sigma: DEFAULT_SIGMA,
            kernel: Kernel::gaussian(DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA)
                .unwrap_or_else(|_| Kernel::identity()),
        }
    }
}

impl Filter for GaussianBlur {
    impl_filter_common!(GaussianBlur, "gaussian_blur", "Gaussian Blur");

    fn apply(&self, input: &PixelBuffer) -> Result<PixelBuffer> {
        if !self.params.enabled {
            return input.copy();
        }

        debug!(
            "Gaussian blur {}x{} (sigma {}) on {}x{} image",
            self.kernel_size,
            self.kernel_size,
            self.sigma,
            input.width(),
            input.height()
        );
        convolve(input, &self.kernel)
    }

    fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(BlurError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::pattern::{generate_checkerboard, generate_gradient};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_blur_matches_filter() {
        let input = generate_gradient(10, 6).unwrap();
        let direct = blur(&input, 5, 1.3).unwrap();
        let filter = GaussianBlur::new(5, 1.3).unwrap();
        assert_eq!(filter.apply(&input).unwrap(), direct);
    }

    #[test]
    fn test_blur_smooths_checkerboard() {
        let input = generate_checkerboard(16, 16, 1).unwrap();
        let output = blur(&input, 3, 1.0).unwrap();

        // interior pixels move toward mid-gray
        let white = output.get(8, 8, 0).unwrap();
        let black = output.get(8, 9, 0).unwrap();
        assert!(white < 255 && white > 100, "white became {}", white);
        assert!(black > 0 && black < 155, "black became {}", black);
    }

    #[test]
    fn test_blur_rejects_bad_params() {
        let input = generate_gradient(4, 4).unwrap();
        assert!(blur(&input, 4, 1.0).is_err());
        assert!(blur(&input, 3, 0.0).is_err());
        assert!(GaussianBlur::new(0, 1.0).is_err());
    }

    #[test]
    fn test_default() {
        let filter = GaussianBlur::default();
        assert_eq!(filter.kernel_size(), DEFAULT_KERNEL_SIZE);
        assert_eq!(filter.sigma(), DEFAULT_SIGMA);
        assert_eq!(filter.kernel().size(), DEFAULT_KERNEL_SIZE);
        assert!(filter.is_enabled());
    }

    #[test]
    fn test_disabled_passthrough() {
        let input = generate_gradient(5, 5).unwrap();
        let mut filter = GaussianBlur::new(3, 1.0).unwrap();
        filter.set_enabled(false);
        assert_eq!(filter.apply(&input).unwrap(), input);
    }

    #[test]
    fn test_to_json() {
        let filter = GaussianBlur::new(5, 2.0).unwrap();
        let value = filter.to_json().unwrap();
        assert_eq!(value["kernel_size"], json!(5));
        assert_eq!(value["sigma"], json!(2.0));
        assert_eq!(value["params"]["id"], json!(filter.id()));
        assert!(value.get("kernel").is_none());
    }
}
