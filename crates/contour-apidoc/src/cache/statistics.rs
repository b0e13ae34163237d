//! Cache statistics and entry inspection

/// Snapshot of one stored entry
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntryInfo {
	pub key: String,
	/// Size of the serialized value in bytes
	pub size: usize,
	pub has_expiry: bool,
	/// Whole seconds until expiry, if the entry expires
	pub ttl_seconds: Option<u64>,
}

/// Hit and miss counters plus store size
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStatistics {
	pub hits: u64,
	pub misses: u64,
	pub entry_count: u64,
	/// Sum of serialized value sizes in bytes
	pub memory_usage: u64,
}

impl CacheStatistics {
	pub fn total_requests(&self) -> u64 {
		self.hits + self.misses
	}

	/// Fraction of lookups that hit, 0.0 when nothing was looked up
	///
	/// # Examples
	///
	/// ```
	/// use contour_apidoc::CacheStatistics;
	///
	/// let stats = CacheStatistics { hits: 3, misses: 1, ..Default::default() };
	/// assert_eq!(stats.hit_rate(), 0.75);
	/// assert_eq!(CacheStatistics::default().hit_rate(), 0.0);
	/// ```
	pub fn hit_rate(&self) -> f64 {
		match self.total_requests() {
			0 => 0.0,
			total => self.hits as f64 / total as f64,
		}
	}
}
