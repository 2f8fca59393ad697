//! Filter Chain management
//!
//! Filters are applied in chain order (index 0 first). Each filter reads
//! the previous filter's output; disabled filters are skipped.

use log::debug;

use crate::error::Result;
use crate::filter::Filter;
use crate::image::PixelBuffer;

/// Ordered sequence of filters
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Create a new empty filter chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter to the end of the chain
    pub fn add(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    /// Run `input` through every enabled filter
    ///
    /// An empty chain returns a deep copy of `input`.
    pub fn apply(&self, input: &PixelBuffer) -> Result<PixelBuffer> {
        let mut current = input.copy()?;
        for filter in self.filters.iter().filter(|f| f.is_enabled()) {
            debug!(
                "Applying {} [{}] ({})",
                filter.display_name(),
                filter.filter_type(),
                filter.id()
            );
            current = filter.apply(&current)?;
        }
        Ok(current)
    }

    /// Get the number of filters in the chain
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Serialize chain state to JSON
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let filters: Result<Vec<serde_json::Value>> =
            self.filters.iter().map(|f| f.to_json()).collect();

        Ok(serde_json::json!({ "filters": filters? }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{blur, GaussianBlur};
    use crate::image::generate_gradient;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chain_new() {
        let chain = FilterChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_empty_chain_copies() {
        let input = generate_gradient(4, 3).unwrap();
        let output = FilterChain::new().apply(&input).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_chain_applies_in_order() {
        let input = generate_gradient(12, 12).unwrap();

        let mut chain = FilterChain::new();
        chain.add(Box::new(GaussianBlur::new(3, 1.0).unwrap()));
        chain.add(Box::new(GaussianBlur::new(5, 2.0).unwrap()));

        let expected = blur(&blur(&input, 3, 1.0).unwrap(), 5, 2.0).unwrap();
        assert_eq!(chain.apply(&input).unwrap(), expected);
    }

    #[test]
    fn test_disabled_filter_skipped() {
        let input = generate_gradient(6, 6).unwrap();
        let mut disabled = GaussianBlur::new(3, 1.0).unwrap();
        disabled.set_enabled(false);

        let mut chain = FilterChain::new();
        chain.add(Box::new(disabled));
        chain.add(Box::new(GaussianBlur::new(5, 1.5).unwrap()));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.apply(&input).unwrap(), blur(&input, 5, 1.5).unwrap());
    }

    #[test]
    fn test_cloned_chain_is_independent() {
        let mut chain = FilterChain::new();
        chain.add(Box::new(GaussianBlur::new(3, 1.0).unwrap()));
        let copy = chain.clone();
        chain.add(Box::new(GaussianBlur::new(3, 1.0).unwrap()));

        assert_eq!(copy.len(), 1);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_to_json() {
        let mut chain = FilterChain::new();
        chain.add(Box::new(GaussianBlur::new(3, 1.0).unwrap()));
        let json = chain.to_json().unwrap();
        assert_eq!(json["filters"].as_array().unwrap().len(), 1);
        assert_eq!(json["filters"][0]["kernel_size"], 3);
    }
}
