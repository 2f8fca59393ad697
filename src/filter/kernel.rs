//! Convolution kernels
//!
//! A kernel is a square, odd-sized matrix of `f64` weights centered on the
//! pixel being filtered. Gaussian kernels are normalized to sum to 1.0.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BlurError, Result};

/// Square matrix of convolution weights, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Generate a normalized Gaussian kernel
    ///
    /// Cell `(m, n)` gets `exp(-(x² + y²) / 2σ²)` with `x = m - size/2` and
    /// `y = n - size/2`; every weight is then divided by the total.
    ///
    /// # Arguments
    /// * `size` - Side length, odd and at least 1
    /// * `sigma` - Spread of the Gaussian, positive and finite
    ///
    /// # Errors
    /// * `InvalidParameter` - If either precondition is violated, or `size * size`
    ///   overflows `usize`
    /// * `OutOfMemory` - If the weight storage cannot be reserved
    pub fn gaussian(size: usize, sigma: f64) -> Result<Self> {
        validate_size(size)?;
        validate_sigma(sigma)?;

        let center = (size / 2) as f64;
        let denom = 2.0 * sigma * sigma;

        let cells = cell_count(size)?;
        let mut weights = Vec::new();
        weights
            .try_reserve_exact(cells)
            .map_err(|e| BlurError::OutOfMemory {
                details: format!("cannot allocate {}x{} kernel: {}", size, size, e),
            })?;
        for m in 0..size {
            for n in 0..size {
                let x = m as f64 - center;
                let y = n as f64 - center;
                weights.push((-(x * x / denom + y * y / denom)).exp());
            }
        }

        let sum: f64 = weights.iter().sum();
        for w in weights.iter_mut() {
            *w /= sum;
        }

        debug!("Generated {}x{} Gaussian kernel (sigma {})", size, size, sigma);

        Ok(Self { size, weights })
    }

    /// The 1x1 kernel of weight 1.0; convolving with it is a no-op
    pub fn identity() -> Self {
        Self {
            size: 1,
            weights: vec![1.0],
        }
    }

    /// Build a kernel from explicit row-major weights
    ///
    /// Weights are used as given, without normalization.
    ///
    /// # Errors
    /// * `InvalidParameter` - If `size` is not odd or `weights` is not `size * size` long
    pub fn from_weights(size: usize, weights: Vec<f64>) -> Result<Self> {
        validate_size(size)?;
        let cells = cell_count(size)?;
        if weights.len() != cells {
            return Err(BlurError::InvalidParameter {
                name: "weights".to_string(),
                reason: format!(
                    "expected {} weights for a {}x{} kernel, got {}",
                    cells,
                    size,
                    size,
                    weights.len()
                ),
            });
        }
        Ok(Self { size, weights })
    }

    /// Side length of the kernel
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the center cell to the edge (`size / 2`)
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at row `m`, column `n`
    ///
    /// # Panics
    /// Panics if `m` or `n` is not less than `size`
    #[inline]
    pub fn get(&self, m: usize, n: usize) -> f64 {
        assert!(m < self.size && n < self.size, "kernel index out of range");
        self.weights[m * self.size + n]
    }

    /// All weights, row-major
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterate over kernel rows
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.weights.chunks_exact(self.size)
    }

    /// Sum of all weights
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

fn cell_count(size: usize) -> Result<usize> {
    size.checked_mul(size).ok_or_else(|| BlurError::InvalidParameter {
            name: "kernel_size".to_string(),
            reason: format!("{}x{} kernel exceeds addressable memory", size, size),
    })
}

pub(crate) fn validate_size(size: usize) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(BlurError::InvalidParameter {
            name: "kernel_size".to_string(),
            reason: format!("must be odd and positive, got {}", size),
        });
    }
    Ok(())
}

pub(crate) fn validate_sigma(sigma: f64) -> Result<()> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(BlurError::InvalidParameter {
            name: "sigma".to_string(),
            reason: format!("must be positive and finite, got {}", sigma),
        });
    }
    Ok(())
}
