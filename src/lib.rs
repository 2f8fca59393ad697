//! bmpblur - Gaussian blur for 24-bit BMP images
//!
//! Decodes an uncompressed 24-bit bitmap into a [`PixelBuffer`], smooths it
//! with a normalized Gaussian kernel via 2D convolution, and encodes the
//! result back to BMP.
//!
//! # Architecture
//!
//! - `image`: pixel buffer and BMP codec
//! - `filter`: kernel generation, convolution and the Gaussian blur filter
//! - `config`: blur parameters loaded from JSON
//! - `cli`: command-line front end
//!
//! # Example
//! ```no_run
//! use std::path::Path;
//! use bmpblur::filter::blur;
//! use bmpblur::image::{decode, encode, DecodeOptions};
//!
//! let input = decode(Path::new("sample1.bmp"), DecodeOptions::default())?;
//! let output = blur(&input, 7, 1.5)?;
//! encode(Path::new("output.bmp"), &output)?;
//! # Ok::<(), bmpblur::BlurError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod image;

pub use config::BlurConfig;
pub use error::{BlurError, Result};
pub use image::PixelBuffer;
