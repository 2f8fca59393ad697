//! Synthetic test images
//!
//! Deterministic patterns for exercising the codec and filters without
//! fixture files on disk.

use crate::error::Result;
use crate::image::buffer::PixelBuffer;

/// Generate a diagonal color gradient
///
/// Red ramps left to right, green ramps top to bottom and blue is their
/// complement, so every pixel and both orientations are distinguishable.
pub fn generate_gradient(width: u32, height: u32) -> Result<PixelBuffer> {
    let mut buffer = PixelBuffer::allocate(width, height)?;

    let ramp = |pos: usize, len: u32| -> u8 {
        if len <= 1 {
            0
        } else {
            (pos * 255 / (len as usize - 1)) as u8
        }
    };

    for row in 0..height as usize {
        for col in 0..width as usize {
            let r = ramp(col, width);
            let g = ramp(row, height);
            let b = 255 - ((r as u16 + g as u16) / 2) as u8;
            buffer.set_pixel(row, col, [r, g, b])?;
        }
    }

    Ok(buffer)
}

/// Generate a single-color image
pub fn generate_solid(width: u32, height: u32, rgb: [u8; 3]) -> Result<PixelBuffer> {
    let mut buffer = PixelBuffer::allocate(width, height)?;
    buffer.fill(rgb);
    Ok(buffer)
}

/// Generate a black and white checkerboard with `cell` pixel squares
pub fn generate_checkerboard(width: u32, height: u32, cell: u32) -> Result<PixelBuffer> {
    let mut buffer = PixelBuffer::allocate(width, height)?;
    let cell = cell.max(1) as usize;

    for row in 0..height as usize {
        for col in 0..width as usize {
            if (row / cell + col / cell) % 2 == 0 {
                buffer.set_pixel(row, col, [255, 255, 255])?;
            }
        }
    }

    Ok(buffer)
}
