//! Filter trait definition
//!
//! Base trait for all image filters. Filters are pure: they read an input
//! buffer and return a new one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::image::PixelBuffer;

/// Parameters common to all filters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterParams {
    /// Unique identifier for this filter instance
    pub id: String,
    /// Whether the filter is enabled
    pub enabled: bool,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            enabled: true,
        }
    }
}

/// Base trait for all image filters
pub trait Filter: Send + Sync {
    /// Filter `input` into a newly allocated buffer of the same size
    fn apply(&self, input: &PixelBuffer) -> Result<PixelBuffer>;

    /// Get the filter type identifier
    fn filter_type(&self) -> &'static str;

    /// Get human-readable display name
    fn display_name(&self) -> &str;

    /// Get the unique instance ID
    fn id(&self) -> &str;

    /// Check if filter is enabled
    fn is_enabled(&self) -> bool;

    /// Enable or disable the filter
    fn set_enabled(&mut self, enabled: bool);

    /// Serialize filter state to JSON
    fn to_json(&self) -> Result<Value>;

    /// Clone the filter into a boxed trait object
    fn box_clone(&self) -> Box<dyn Filter>;
}

impl Clone for Box<dyn Filter> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Helper macro to implement common Filter trait methods
#[macro_export]
macro_rules! impl_filter_common {
    ($type:ty, $filter_type:expr, $display_name:expr) => {
        fn filter_type(&self) -> &'static str {
            $filter_type
        }

        fn display_name(&self) -> &str {
            $display_name
        }

        fn id(&self) -> &str {
            &self.params.id
        }

        fn is_enabled(&self) -> bool {
            self.params.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.params.enabled = enabled;
        }

        fn box_clone(&self) -> Box<dyn Filter> {
            Box::new(self.clone())
        }
    };
}
