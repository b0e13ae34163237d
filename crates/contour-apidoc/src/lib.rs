//! # Contour API Documentation
//!
//! Documentation model for API resources, provider trait, and a
//! read-through cache that resolves lazy schemas before storing.
//!
//! - [`schema`]: resolved or lazy request/response schemas
//! - [`documentation`]: per-version resources, methods and the resource index
//! - [`listing`]: the [`Listing`] provider trait and [`StaticListing`]
//! - [`cache`]: the [`Cache`] backend trait and [`InMemoryCache`]
//! - [`cached_listing`]: [`CachedListing`], the caching decorator

pub mod cache;
pub mod cached_listing;
pub mod documentation;
pub mod fingerprint;
pub mod listing;
pub mod schema;

pub use cache::{Cache, CacheEntryInfo, CacheStatistics, InMemoryCache};
pub use cached_listing::CachedListing;
pub use documentation::{
	Documentation, Method, Resource, ResourceIndex, ResourceStatus, ResourceSummary,
};
pub use fingerprint::{RESOURCE_INDEX_KEY, documentation_key, fingerprint};
pub use listing::{Listing, StaticListing};
pub use schema::{Definition, LazySchema, Schema, SchemaSource};
