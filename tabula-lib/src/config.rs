//! Grid configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Defaults shared by the view pipeline, the layout manager and the rate
/// limiting helpers.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tabula_lib::GridConfig;
///
/// let config = GridConfig::default()
///     .with_page_size(50)
///     .with_min_column_width(80)
///     .with_search_debounce(Duration::from_millis(150));
/// assert_eq!(config.default_column_width, 150);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Rows per page.
    ///
    /// Default: 25
    pub page_size: usize,

    /// Smallest width a column can be resized to, in pixels.
    ///
    /// Default: 50
    pub min_column_width: u32,

    /// Width of a column with no explicit width, in pixels.
    ///
    /// Default: 150
    pub default_column_width: u32,

    /// Quiet period before a search input is applied. Read by
    /// [`Debouncer::search`](crate::rate_limit::Debouncer::search).
    ///
    /// Default: 300 ms
    #[serde(with = "millis")]
    pub search_debounce: Duration,

    /// Minimum spacing between resize updates while dragging. Read by
    /// [`Throttler::resize`](crate::rate_limit::Throttler::resize).
    ///
    /// Default: 16 ms
    #[serde(with = "millis")]
    pub resize_throttle: Duration,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            min_column_width: 50,
            default_column_width: 150,
            search_debounce: Duration::from_millis(300),
            resize_throttle: Duration::from_millis(16), // ~60 updates per second
        }
    }
}

impl GridConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the minimum column width.
    pub fn with_min_column_width(mut self, width: u32) -> Self {
        self.min_column_width = width;
        self
    }

    /// Sets the default column width.
    pub fn with_default_column_width(mut self, width: u32) -> Self {
        self.default_column_width = width;
        self
    }

    /// Sets the search debounce delay.
    pub fn with_search_debounce(mut self, wait: Duration) -> Self {
        self.search_debounce = wait;
        self
    }

    /// Sets the resize throttle window.
    pub fn with_resize_throttle(mut self, limit: Duration) -> Self {
        self.resize_throttle = limit;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
