//! Error handling for bmpblur
//!
//! Every fallible operation returns [`Result`]. Errors carry enough context
//! to tell the user what went wrong and how to recover.

use thiserror::Error;

/// Result type alias for bmpblur operations
pub type Result<T> = std::result::Result<T, BlurError>;

/// Main error type for bmpblur operations
#[derive(Error, Debug)]
pub enum BlurError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid BMP file: {reason}")]
    InvalidFormat { reason: String },

    #[error("Unsupported BMP variant: {format}")]
    UnsupportedFormat { format: String },

    // Buffer Errors
    #[error(
        "Pixel access out of bounds: ({row}, {col}, {channel}) in {width}x{height} buffer"
    )]
    OutOfBounds {
        row: usize,
        col: usize,
        channel: usize,
        width: u32,
        height: u32,
    },

    #[error("Out of memory: {details}")]
    OutOfMemory { details: String },

    // Filter Errors
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Batch failed for {failed} of {total} images")]
    BatchFailed { failed: usize, total: usize },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BlurError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            BlurError::FileNotFound { .. } => "FILE_NOT_FOUND",
            BlurError::InvalidFormat { .. } => "INVALID_FORMAT",
            BlurError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            BlurError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            BlurError::OutOfMemory { .. } => "OUT_OF_MEMORY",
            BlurError::InvalidParameter { .. } => "INVALID_PARAMETER",
            BlurError::BatchFailed { .. } => "BATCH_FAILED",
            BlurError::Io(_) => "IO_ERROR",
            BlurError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable by changing inputs and retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BlurError::FileNotFound { .. }
                | BlurError::UnsupportedFormat { .. }
                | BlurError::InvalidParameter { .. }
                | BlurError::OutOfMemory { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            BlurError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            BlurError::InvalidFormat { .. } => vec![
                "Check that the file is a Windows bitmap (starts with 'BM')",
                "The file may be truncated - try re-exporting it",
            ],
            BlurError::UnsupportedFormat { .. } => vec![
                "Convert the image to an uncompressed 24-bit BMP",
                "Bottom-up row order is required",
            ],
            BlurError::InvalidParameter { .. } => vec![
                "Kernel size must be an odd positive number",
                "Sigma must be a positive finite number",
            ],
            BlurError::OutOfMemory { .. } => vec![
                "Close other applications to free memory",
                "Try a smaller image",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = BlurError::FileNotFound {
            path: "test.bmp".to_string(),
            source: None,
        };
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");

        let err = BlurError::InvalidFormat {
            reason: "bad signature".to_string(),
        };
        assert_eq!(err.error_code(), "INVALID_FORMAT");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = BlurError::InvalidParameter {
            name: "kernel_size".to_string(),
            reason: "must be odd".to_string(),
        };
        assert!(!err.recovery_suggestions().is_empty());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_out_of_bounds_message() {
        let err = BlurError::OutOfBounds {
            row: 5,
            col: 0,
            channel: 1,
            width: 4,
            height: 4,
        };
        assert_eq!(
            err.to_string(),
            "Pixel access out of bounds: (5, 0, 1) in 4x4 buffer"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: BlurError = io.into();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
