//! Configuration for the chart parser

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Configuration options for [`ChartParser`](super::ChartParser)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ParserConfig {
    /// Upper bound on the total number of chart items; `None` for no bound
    pub max_items: Option<usize>,

    /// Gather the terminals expected at the failure position
    pub collect_expected: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_items: Some(4_000_000),
            collect_expected: true,
        }
    }
}

impl ParserConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chart item limit
    #[must_use]
    pub const fn with_max_items(mut self, limit: Option<usize>) -> Self {
        self.max_items = limit;
        self
    }

    /// Enable or disable collection of expected terminals on failure
    #[must_use]
    pub const fn with_expected_collection(mut self, enabled: bool) -> Self {
        self.collect_expected = enabled;
        self
    }
}
