//! Cache sizing configuration.

/// Default limit for generation and pairing counters.
pub const DEFAULT_COUNTER_LIMIT: u32 = i32::MAX as u32;

/// Configuration for [`CacheManager`][crate::manager::CacheManager].
///
/// # Example
///
/// ```
/// use bdd_opcache::config::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_cache_size(10_000)
///     .with_cache_ratio(4);
/// assert_eq!(config.cache_size, Some(10_000));
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CacheConfig {
    /// Requested number of slots per cache. `None` derives the size from the
    /// node table (`node_count / 4 + 1`).
    pub cache_size: Option<usize>,
    /// Nodes per cache slot when resizing. `0` keeps every cache at a fixed size.
    pub cache_ratio: usize,
    /// The variable-set register is cleared when its generation reaches this value.
    pub generation_limit: u32,
    /// The replace cache is cleared when pairing ids reach this value.
    pub pairing_limit: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_size: None,
            cache_ratio: 0,
            generation_limit: DEFAULT_COUNTER_LIMIT,
            pairing_limit: DEFAULT_COUNTER_LIMIT,
        }
    }
}

impl CacheConfig {
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    pub fn with_cache_ratio(mut self, ratio: usize) -> Self {
        self.cache_ratio = ratio;
        self
    }

    /// # Panics
    ///
    /// Panics if `limit < 2`: at least one generation must fit before wrapping.
    pub fn with_generation_limit(mut self, limit: u32) -> Self {
        assert!(limit >= 2, "Generation limit must be at least 2, got {}", limit);
        self.generation_limit = limit;
        self
    }

    /// # Panics
    ///
    /// Panics if `limit < 2`.
    pub fn with_pairing_limit(mut self, limit: u32) -> Self {
        assert!(limit >= 2, "Pairing limit must be at least 2, got {}", limit);
        self.pairing_limit = limit;
        self
    }

    /// Number of slots each cache starts with for a node table of `node_count` slots.
    pub fn initial_size(&self, node_count: usize) -> usize {
        match self.cache_size {
            Some(size) if size > 0 => size,
            _ => node_count / 4 + 1,
        }
    }
}
