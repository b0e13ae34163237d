//! Cache backends for documentation lookups

mod cache_trait;
mod entry;
mod in_memory;
mod statistics;

pub use cache_trait::Cache;
pub use in_memory::InMemoryCache;
pub use statistics::{CacheEntryInfo, CacheStatistics};
