//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::cli::Pattern;
use crate::config::BlurConfig;
use crate::error::{BlurError, Result};
use crate::filter::Kernel;
use crate::image::{
    self, generate_checkerboard, generate_gradient, generate_solid, BLUE, GREEN, RED,
};

/// File extension recognized by batch mode
const BMP_EXTENSION: &str = "bmp";

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Output files written
    pub written: Vec<PathBuf>,
    /// Input files that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

/// Decode, blur and encode one image.
pub fn blur_file(input: &Path, output: &Path, config: &BlurConfig) -> Result<()> {
    info!(
        "Blurring {} -> {} (size {}, sigma {}, {} pass(es))",
        input.display(),
        output.display(),
        config.kernel_size,
        config.sigma,
        config.passes
    );

    let chain = config.filter_chain()?;
    debug!("Filter chain: {}", chain.to_json()?);

    let source = image::decode(input, config.decode_options())?;
    let blurred = chain.apply(&source)?;
    image::encode(output, &blurred)?;

    Ok(())
}

/// Blur every `.bmp` file directly inside `input_dir`.
///
/// Each image is processed independently; a failure is recorded and the
/// remaining files are still processed.
pub fn batch(input_dir: &Path, output_dir: &Path, config: &BlurConfig) -> Result<BatchSummary> {
    info!(
        "Batch blurring {} -> {}",
        input_dir.display(),
        output_dir.display()
    );

    if !input_dir.is_dir() {
        return Err(BlurError::FileNotFound {
            path: input_dir.display().to_string(),
            source: None,
        });
    }
    fs::create_dir_all(output_dir)?;

    let mut inputs: Vec<PathBuf> = WalkDir::new(input_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(BMP_EXTENSION))
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();
    inputs.sort();

    let mut summary = BatchSummary::default();
    for input in inputs {
        let Some(name) = input.file_name() else {
            continue;
        };
        let output = output_dir.join(name);

        match blur_file(&input, &output, config) {
            Ok(()) => summary.written.push(output),
            Err(e) => {
                warn!("Skipping {}: {}", input.display(), e);
                summary.failed.push((input, e.to_string()));
            }
        }
    }

    Ok(summary)
}

/// Print header metadata, checksum and channel means.
pub fn show_info(input: &Path) -> Result<()> {
    info!("Inspecting: {}", input.display());

    let header = image::read_header(input)?;
    println!("{}", serde_json::to_string_pretty(&header)?);

    let buffer = image::decode(input, Default::default())?;
    println!("Dimensions: {}x{}", buffer.width(), buffer.height());
    println!(
        "Mean RGB: {:.2} {:.2} {:.2}",
        buffer.mean_channel(RED),
        buffer.mean_channel(GREEN),
        buffer.mean_channel(BLUE)
    );
    println!("SHA-256: {}", buffer.checksum());

    Ok(())
}

/// Print a normalized Gaussian kernel.
pub fn show_kernel(config: &BlurConfig) -> Result<()> {
    let kernel = Kernel::gaussian(config.kernel_size, config.sigma)?;
    print!("{}", format_kernel(&kernel));
    Ok(())
}

/// Write a synthetic test image.
pub fn generate(output: &Path, width: u32, height: u32, pattern: Pattern) -> Result<()> {
    info!(
        "Generating {:?} {}x{} -> {}",
        pattern,
        width,
        height,
        output.display()
    );

    let buffer = match pattern {
        Pattern::Gradient => generate_gradient(width, height)?,
        Pattern::Checkerboard => generate_checkerboard(width, height, 8)?,
        Pattern::White => generate_solid(width, height, [255, 255, 255])?,
    };
    image::encode(output, &buffer)
}

/// One kernel row per line, weights to six decimals
pub fn format_kernel(kernel: &Kernel) -> String {
    let mut out = String::new();
    for row in kernel.rows() {
        let cells: Vec<String> = row.iter().map(|w| format!("{:.6}", w)).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}
