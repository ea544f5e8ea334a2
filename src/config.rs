/// Bucket count used when no capacity is requested.
pub const DEFAULT_CAPACITY: usize = 7;

/// Smallest bucket count a table is created with.
pub const MIN_CAPACITY: usize = 3;

/// Load factor ceiling used when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// Lowest accepted load factor ceiling.
pub const MIN_THRESHOLD: f64 = 0.5;

/// Highest accepted load factor ceiling.
pub const MAX_THRESHOLD: f64 = 0.95;

/// Folds a requested load factor ceiling into
/// `[MIN_THRESHOLD, MAX_THRESHOLD]`.
///
/// Out of range values are not rejected. `NaN` falls back to
/// [`DEFAULT_THRESHOLD`].
pub fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        log::trace!("threshold NaN replaced by {DEFAULT_THRESHOLD}");
        return DEFAULT_THRESHOLD;
    }

    let clamped = threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
    if clamped != threshold {
        log::trace!("threshold {threshold} clamped to {clamped}");
    }
    clamped
}

/// Construction parameters shared by [`HashTable`], [`HashMap`] and
/// [`HashSet`].
///
/// # Examples
///
/// ```rust
/// use chain_hash::HashMap;
/// use chain_hash::TableConfig;
///
/// let config = TableConfig::new()
///     .with_initial_capacity(79)
///     .with_threshold(2.0)
///     .with_growth(false);
/// assert_eq!(config.threshold(), 0.95);
///
/// let map: HashMap<u32, &str> = HashMap::with_config(config);
/// assert_eq!(map.capacity(), 79);
/// ```
///
/// [`HashTable`]: crate::HashTable
/// [`HashMap`]: crate::HashMap
/// [`HashSet`]: crate::HashSet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    initial_capacity: usize,
    threshold: f64,
    growth: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            threshold: DEFAULT_THRESHOLD,
            growth: true,
        }
    }
}

impl TableConfig {
    /// Returns the default configuration: 7 buckets, threshold 0.75, growth
    /// enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial bucket count. Values below [`MIN_CAPACITY`] are
    /// raised to it.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.max(MIN_CAPACITY);
        self
    }

    /// Sets the load factor ceiling, clamped into
    /// `[MIN_THRESHOLD, MAX_THRESHOLD]`.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = clamp_threshold(threshold);
        self
    }

    /// Enables or disables automatic rehashing.
    ///
    /// With growth disabled the bucket count stays at the initial capacity
    /// and chains grow without bound.
    pub fn with_growth(mut self, growth: bool) -> Self {
        self.growth = growth;
        self
    }

    /// The bucket count a new table starts with.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// The load factor ceiling.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether tables built from this configuration rehash.
    pub fn growth(&self) -> bool {
        self.growth
    }
}
