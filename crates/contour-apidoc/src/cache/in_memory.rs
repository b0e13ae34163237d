//! In-process cache backend

use async_trait::async_trait;
use contour_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use super::cache_trait::Cache;
use super::entry::CacheEntry;
use super::statistics::{CacheEntryInfo, CacheStatistics};

/// Cache backed by a shared map; values are stored as JSON
///
/// Clones share the same store and counters.
///
/// # Examples
///
/// ```
/// use contour_apidoc::{Cache, InMemoryCache};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = InMemoryCache::new();
/// cache.set("greeting", &"hello", None).await.unwrap();
///
/// let value: Option<String> = cache.get("greeting").await.unwrap();
/// assert_eq!(value.as_deref(), Some("hello"));
///
/// let stats = cache.statistics().await;
/// assert_eq!((stats.hits, stats.misses, stats.entry_count), (1, 0, 1));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
	store: Arc<RwLock<HashMap<String, CacheEntry>>>,
	default_ttl: Option<Duration>,
	hits: Arc<AtomicU64>,
	misses: Arc<AtomicU64>,
}

impl InMemoryCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Expiry applied when `set` is called without a TTL
	pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
		self.default_ttl = Some(ttl);
		self
	}

	/// Drops expired entries and returns how many were removed
	pub async fn cleanup_expired(&self) -> usize {
		let mut store = self.store.write().await;
		let before = store.len();
		store.retain(|_, entry| !entry.is_expired());
		let removed = before - store.len();
		if removed > 0 {
			tracing::debug!(removed, "Removed expired cache entries");
		}
		removed
	}

	pub async fn statistics(&self) -> CacheStatistics {
		let store = self.store.read().await;
		CacheStatistics {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			entry_count: store.len() as u64,
			memory_usage: store.values().map(|e| e.value.len() as u64).sum(),
		}
	}

	/// Keys currently stored, including expired entries not yet cleaned up
	pub async fn list_keys(&self) -> Vec<String> {
		let mut keys: Vec<String> = self.store.read().await.keys().cloned().collect();
		keys.sort();
		keys
	}

	pub async fn inspect_entry(&self, key: &str) -> Option<CacheEntryInfo> {
		let store = self.store.read().await;
		store.get(key).map(|entry| CacheEntryInfo {
			key: key.to_string(),
			size: entry.value.len(),
			has_expiry: entry.expires_at.is_some(),
			ttl_seconds: entry.remaining().map(|d| d.as_secs()),
		})
	}

	fn record(&self, hit: bool) {
		let counter = if hit { &self.hits } else { &self.misses };
		counter.fetch_add(1, Ordering::Relaxed);
	}
}

#[async_trait]
impl Cache for InMemoryCache {
	async fn get<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: for<'de> Deserialize<'de> + Send,
	{
		let store = self.store.read().await;
		let Some(entry) = store.get(key).filter(|entry| !entry.is_expired()) else {
			self.record(false);
			return Ok(None);
		};
		self.record(true);

		serde_json::from_slice(&entry.value)
			.map(Some)
			.map_err(|e| Error::Serialization(format!("Cannot decode cache entry {}: {}", key, e)))
	}

	async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
	where
		T: Serialize + Send + Sync,
	{
		let encoded = serde_json::to_vec(value)
			.map_err(|e| Error::Serialization(format!("Cannot encode cache entry {}: {}", key, e)))?;
		let entry = CacheEntry::new(encoded, ttl.or(self.default_ttl));
		self.store.write().await.insert(key.to_string(), entry);
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<()> {
		self.store.write().await.remove(key);
		Ok(())
	}

	async fn has_key(&self, key: &str) -> Result<bool> {
		let store = self.store.read().await;
		Ok(store.get(key).is_some_and(|entry| !entry.is_expired()))
	}

	async fn clear(&self) -> Result<()> {
		self.store.write().await.clear();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_set_get_delete() {
		let cache = InMemoryCache::new();
		cache.set("key1", &vec![1, 2, 3], None).await.unwrap();

		let value: Option<Vec<i32>> = cache.get("key1").await.unwrap();
		assert_eq!(value, Some(vec![1, 2, 3]));
		assert!(cache.has_key("key1").await.unwrap());

		cache.delete("key1").await.unwrap();
		let value: Option<Vec<i32>> = cache.get("key1").await.unwrap();
		assert_eq!(value, None);
		assert!(!cache.has_key("key1").await.unwrap());
	}

	#[rstest]
	#[tokio::test]
	async fn test_expiry() {
		let cache = InMemoryCache::new();
		cache
			.set("short", &"value", Some(Duration::from_millis(20)))
			.await
			.unwrap();
		cache.set("forever", &"value", None).await.unwrap();

		tokio::time::sleep(Duration::from_millis(50)).await;

		let value: Option<String> = cache.get("short").await.unwrap();
		assert_eq!(value, None);
		assert_eq!(cache.list_keys().await, vec!["forever", "short"]);

		assert_eq!(cache.cleanup_expired().await, 1);
		assert_eq!(cache.list_keys().await, vec!["forever"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_default_ttl() {
		let cache = InMemoryCache::new().with_default_ttl(Duration::from_secs(300));
		cache.set("key", &1, None).await.unwrap();

		let info = cache.inspect_entry("key").await.unwrap();
		assert!(info.has_expiry);
		assert!(info.ttl_seconds.is_some_and(|s| s <= 300));
		assert!(cache.inspect_entry("missing").await.is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_statistics() {
		let cache = InMemoryCache::new();
		cache.set("a", &"x", None).await.unwrap();
		let _: Option<String> = cache.get("a").await.unwrap();
		let _: Option<String> = cache.get("b").await.unwrap();

		let stats = cache.statistics().await;
		assert_eq!(stats.hits, 1);
		assert_eq!(stats.misses, 1);
		assert_eq!(stats.total_requests(), 2);
		assert_eq!(stats.entry_count, 1);
		assert_eq!(stats.memory_usage, 3);
	}

	#[rstest]
	#[tokio::test]
	async fn test_clones_share_store() {
		let cache = InMemoryCache::new();
		let other = cache.clone();
		other.set("shared", &true, None).await.unwrap();
		assert!(cache.has_key("shared").await.unwrap());

		cache.clear().await.unwrap();
		assert!(!other.has_key("shared").await.unwrap());
	}
}
