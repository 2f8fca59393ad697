//! Image Module
//!
//! In-memory pixel storage and the BMP codec:
//! - Pixel buffer management
//! - BMP decode/encode
//! - Synthetic test patterns

pub mod bmp;
pub mod buffer;
pub mod pattern;

pub use bmp::{decode, encode, read_header, BmpHeader, DecodeOptions};
pub use buffer::{PixelBuffer, BLUE, CHANNELS, GREEN, RED};
pub use pattern::{generate_checkerboard, generate_gradient, generate_solid};
