//! Cache backend contract

use async_trait::async_trait;
use contour_core::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Key/value store with optional per-entry expiry
///
/// Keys are ASCII strings. A `ttl` of `None` leaves expiry to the backend's
/// default, which may be "never".
#[async_trait]
pub trait Cache: Send + Sync {
	/// Returns the value stored under `key`, or `None` on a miss
	async fn get<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: for<'de> Deserialize<'de> + Send;

	async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
	where
		T: Serialize + Send + Sync;

	async fn delete(&self, key: &str) -> Result<()>;

	async fn has_key(&self, key: &str) -> Result<bool>;

	async fn clear(&self) -> Result<()>;
}
