//! Read-through caching for documentation providers

use async_trait::async_trait;
use contour_conf::DocumentationSettings;
use contour_core::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::Cache;
use crate::documentation::{Documentation, ResourceIndex};
use crate::fingerprint::{RESOURCE_INDEX_KEY, documentation_key};
use crate::listing::Listing;

/// Wraps a [`Listing`] with a cache
///
/// The resource index is stored under a fixed key. Documentation is stored
/// under a key derived from its source path, and only after every lazy
/// schema in it has been resolved, so cached values never depend on
/// deferred loading. Unknown source paths are not cached.
///
/// Concurrent misses on the same key may both reach the inner listing;
/// the last write wins.
///
/// # Examples
///
/// ```
/// use contour_apidoc::{CachedListing, Documentation, InMemoryCache, Listing, Resource, StaticListing};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let listing = StaticListing::new()
///     .with_documentation("/entries", Documentation::new().with_version(1, Resource::new("/entries")));
/// let cache = Arc::new(InMemoryCache::new());
/// let cached = CachedListing::new(listing, Arc::clone(&cache));
///
/// let first = cached.documentation("/entries").await.unwrap();
/// let second = cached.documentation("/entries").await.unwrap();
/// assert_eq!(first, second);
/// assert_eq!(cache.statistics().await.hits, 1);
/// # }
/// ```
pub struct CachedListing<L, C> {
	listing: L,
	cache: Arc<C>,
	ttl: Option<Duration>,
}

impl<L, C> CachedListing<L, C>
where
	L: Listing,
	C: Cache,
{
	/// Creates a cached listing whose entries never expire
	pub fn new(listing: L, cache: Arc<C>) -> Self {
		Self {
			listing,
			cache,
			ttl: None,
		}
	}

	pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
		self.ttl = ttl;
		self
	}

	pub fn from_settings(listing: L, cache: Arc<C>, settings: &DocumentationSettings) -> Self {
		Self::new(listing, cache).with_ttl(settings.cache_ttl())
	}

	pub fn listing(&self) -> &L {
		&self.listing
	}

	pub fn cache(&self) -> &Arc<C> {
		&self.cache
	}

	pub fn ttl(&self) -> Option<Duration> {
		self.ttl
	}
}

#[async_trait]
impl<L, C> Listing for CachedListing<L, C>
where
	L: Listing,
	C: Cache,
{
	async fn resource_index(&self) -> Result<ResourceIndex> {
		let cached: Option<ResourceIndex> = self.cache.get(RESOURCE_INDEX_KEY).await?;
		if let Some(index) = cached {
			tracing::debug!(key = RESOURCE_INDEX_KEY, "Resource index cache hit");
			return Ok(index);
		}
		tracing::debug!(key = RESOURCE_INDEX_KEY, "Resource index cache miss");

		let index = self.listing.resource_index().await?;
		self.cache.set(RESOURCE_INDEX_KEY, &index, self.ttl).await?;
		tracing::debug!(
			key = RESOURCE_INDEX_KEY,
			resources = index.len(),
			"Stored resource index"
		);
		Ok(index)
	}

	async fn documentation(&self, source_path: &str) -> Result<Option<Documentation>> {
		let key = documentation_key(source_path);

		let cached: Option<Documentation> = self.cache.get(&key).await?;
		if let Some(documentation) = cached {
			tracing::debug!(key = %key, source_path, "Documentation cache hit");
			return Ok(Some(documentation));
		}
		tracing::debug!(key = %key, source_path, "Documentation cache miss");

		let Some(documentation) = self.listing.documentation(source_path).await? else {
			tracing::debug!(source_path, "No documentation for source path");
			return Ok(None);
		};

		let documentation = match documentation.materialize().await {
			Ok(documentation) => documentation,
			Err(e) => {
				tracing::warn!(
					key = %key,
					source_path,
					error = %e,
					"Documentation not cached: schema materialization failed"
				);
				return Err(e);
			}
		};

		self.cache.set(&key, &documentation, self.ttl).await?;
		tracing::debug!(key = %key, source_path, "Stored documentation");
		Ok(Some(documentation))
	}
}
