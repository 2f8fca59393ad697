//! 2D convolution over pixel buffers
//!
//! Pixels outside the image are treated as black (zero padding), so a blur
//! darkens the outermost `radius` rows and columns slightly. Sums are
//! accumulated in `f64` and clamped to `[0, 255]`, then rounded to the
//! nearest sample value.

use crate::error::Result;
use crate::filter::kernel::Kernel;
use crate::image::buffer::{PixelBuffer, CHANNELS};

/// Convolve `input` with `kernel`, returning a new buffer of the same size
///
/// Output sample `(i, j, k)` is
/// `Σ_m Σ_n padded[i + m][j + n][k] * kernel[m][n]`, where `padded` is the
/// input surrounded by `kernel.radius()` rows and columns of zeros. The
/// input is never modified.
///
/// # Errors
/// * `OutOfMemory` - If the output buffer cannot be allocated
pub fn convolve(input: &PixelBuffer, kernel: &Kernel) -> Result<PixelBuffer> {
    let mut output = PixelBuffer::allocate(input.width(), input.height())?;
    if input.is_empty() {
        return Ok(output);
    }

    let width = input.width() as usize;
    let height = input.height() as usize;
    let size = kernel.size();
    let radius = kernel.radius();

    let src = input.as_slice();
    let stride = width * CHANNELS;

    for i in 0..height {
        let dst_row = output.row_mut(i)?;

        for j in 0..width {
            let mut acc = [0.0f64; CHANNELS];

            for m in 0..size {
                // padded row i + m maps to input row i + m - radius
                let Some(row) = (i + m).checked_sub(radius).filter(|&r| r < height) else {
                    continue;
                };
                let row_start = row * stride;

                for (n, &weight) in kernel.weights()[m * size..(m + 1) * size]
                    .iter()
                    .enumerate()
                {
                    let Some(col) = (j + n).checked_sub(radius).filter(|&c| c < width) else {
                        continue;
                    };
                    let px = row_start + col * CHANNELS;
                    for (k, sum) in acc.iter_mut().enumerate() {
                        *sum += src[px + k] as f64 * weight;
                    }
                }
            }

            for (k, sum) in acc.into_iter().enumerate() {
                dst_row[j * CHANNELS + k] = clamp_to_u8(sum);
            }
        }
    }

    Ok(output)
}

/// Saturate to `[0, 255]` and round to the nearest integer
#[inline]
pub fn clamp_to_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round() as u8
}
