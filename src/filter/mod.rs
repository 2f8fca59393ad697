//! Image Filters
//!
//! Kernel generation, 2D convolution and the Gaussian blur built on them.
//! All filters implement the `Filter` trait for uniform processing.

mod chain;
mod convolve;
mod gaussian;
mod kernel;
mod traits;

pub use chain::FilterChain;
pub use convolve::{clamp_to_u8, convolve};
pub use gaussian::{blur, GaussianBlur, DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA};
pub use kernel::Kernel;
pub use traits::{Filter, FilterParams};

pub(crate) use kernel::{validate_sigma, validate_size};
