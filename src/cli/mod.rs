//! CLI Module
//!
//! Command-line interface for the bmpblur image processor.

pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::BlurConfig;
use crate::error::Result;

/// bmpblur - Gaussian blur for 24-bit BMP images
#[derive(Parser, Debug)]
#[command(name = "bmpblur")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Blur a single BMP file
    #[command(name = "blur")]
    Blur {
        /// Input BMP file
        input: PathBuf,

        /// Output BMP file
        output: PathBuf,

        #[command(flatten)]
        options: BlurArgs,
    },

    /// Blur every BMP file in a directory
    #[command(name = "batch")]
    Batch {
        /// Directory containing input BMP files
        input_dir: PathBuf,

        /// Directory for blurred output files
        output_dir: PathBuf,

        #[command(flatten)]
        options: BlurArgs,
    },

    /// Print header metadata and pixel statistics
    #[command(name = "info")]
    Info {
        /// BMP file to inspect
        input: PathBuf,
    },

    /// Print a normalized Gaussian kernel
    #[command(name = "kernel")]
    Kernel {
        #[command(flatten)]
        options: BlurArgs,
    },

    /// Write a synthetic test image
    #[command(name = "generate")]
    Generate {
        /// Output BMP file
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = 64)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = 64)]
        height: u32,

        /// Pattern to draw
        #[arg(short, long, value_enum, default_value_t = Pattern::Gradient)]
        pattern: Pattern,
    },
}

/// Blur parameters shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct BlurArgs {
    /// Kernel size (odd)
    #[arg(short = 'k', long = "size")]
    pub kernel_size: Option<usize>,

    /// Gaussian sigma
    #[arg(short, long)]
    pub sigma: Option<f64>,

    /// Number of times the blur is applied
    #[arg(short = 'n', long)]
    pub passes: Option<usize>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reject compressed input instead of warning
    #[arg(long)]
    pub strict: bool,
}

impl BlurArgs {
    /// Merge flags over the config file (or defaults) and validate
    pub fn resolve(&self) -> Result<BlurConfig> {
        let mut config = match &self.config {
            Some(path) => BlurConfig::load(path)?,
            None => BlurConfig::default(),
        };

        if let Some(size) = self.kernel_size {
            config.kernel_size = size;
        }
        if let Some(sigma) = self.sigma {
            config.sigma = sigma;
        }
        if let Some(passes) = self.passes {
            config.passes = passes;
        }
        config.strict |= self.strict;

        config.validate()?;
        Ok(config)
    }
}

/// Synthetic image patterns
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Gradient,
    Checkerboard,
    White,
}
