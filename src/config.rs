//! Blur configuration
//!
//! Settings can come from a JSON file, with any missing field taking its
//! default. Command-line flags override file values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BlurError, Result};
use crate::filter::{
    validate_sigma, validate_size, FilterChain, GaussianBlur, DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA,
};
use crate::image::DecodeOptions;

/// Parameters for a decode, blur, encode run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Odd side length of the Gaussian kernel
    pub kernel_size: usize,
    /// Gaussian spread
    pub sigma: f64,
    /// Number of times the blur is applied, each pass reading the previous output
    pub passes: usize,
    /// Reject compressed input instead of warning
    pub strict: bool,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            sigma: DEFAULT_SIGMA,
            passes: 1,
            strict: false,
        }
    }
}

impl BlurConfig {
    /// Load and validate a configuration file
    ///
    /// # Errors
    /// * `FileNotFound` - If the file does not exist
    /// * `Serialization` - If the file is not valid JSON for this type
    /// * `InvalidParameter` - If a value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BlurError::FileNotFound {
                path: path.display().to_string(),
                source: Some(e),
            },
            _ => BlurError::Io(e),
        })?;

        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check kernel size, sigma and pass count
    pub fn validate(&self) -> Result<()> {
        validate_size(self.kernel_size)?;
        validate_sigma(self.sigma)?;
        if self.passes == 0 {
            return Err(BlurError::InvalidParameter {
                name: "passes".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Filter chain applying the configured blur `passes` times
    ///
    /// # Errors
    /// * `InvalidParameter` - If kernel size or sigma is invalid
    pub fn filter_chain(&self) -> Result<FilterChain> {
        let mut chain = FilterChain::new();
        for _ in 0..self.passes {
            chain.add(Box::new(GaussianBlur::new(self.kernel_size, self.sigma)?));
        }
        Ok(chain)
    }

    /// Decoder options implied by this configuration
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            strict: self.strict,
        }
    }
}
