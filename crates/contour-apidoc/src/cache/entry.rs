//! Stored cache entry

use std::time::{Duration, SystemTime};

/// Serialized value with an optional expiry
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
	pub(crate) value: Vec<u8>,
	pub(crate) expires_at: Option<SystemTime>,
}

impl CacheEntry {
	/// A TTL too large to represent as a point in time never expires
	pub(crate) fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
		Self {
			value,
			expires_at: ttl.and_then(|ttl| SystemTime::now().checked_add(ttl)),
		}
	}

	pub(crate) fn is_expired(&self) -> bool {
		self.expires_at
			.is_some_and(|expires_at| SystemTime::now() > expires_at)
	}

	/// Time left before expiry; `None` for entries that never expire
	pub(crate) fn remaining(&self) -> Option<Duration> {
		self.expires_at.map(|expires_at| {
			expires_at
				.duration_since(SystemTime::now())
				.unwrap_or(Duration::ZERO)
		})
	}
}
