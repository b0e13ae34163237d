//! Integration tests for the documentation cache

use async_trait::async_trait;
use contour_apidoc::{
	Cache, CachedListing, Definition, Documentation, InMemoryCache, Listing, Method,
	RESOURCE_INDEX_KEY, Resource, ResourceIndex, Schema, SchemaSource, StaticListing,
	documentation_key,
};
use contour_conf::{DocumentationSettings, Settings};
use contour_core::{Error, Result};
use rstest::*;
use serde_json::json;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::SubscriberInitExt;
use std::sync::Arc;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Schema source that counts loads and can be told to fail
struct TableSchema {
	name: &'static str,
	loads: Arc<AtomicUsize>,
	fail: bool,
}

#[async_trait]
impl SchemaSource for TableSchema {
	fn reference(&self) -> &str {
		self.name
	}

	async fn load(&self) -> Result<Definition> {
		self.loads.fetch_add(1, Ordering::SeqCst);
		if self.fail {
			return Err(Error::Provider(format!("table {} is missing", self.name)));
		}
		Ok(Definition::new(
			self.name,
			json!({"type": "object", "title": self.name}),
		))
	}
}

/// Listing that builds fresh documentation with lazy schemas on every call
struct CountingListing {
	index_calls: AtomicUsize,
	documentation_calls: AtomicUsize,
	schema_loads: Arc<AtomicUsize>,
	fail_schema: bool,
}

impl CountingListing {
	fn new() -> Self {
		Self {
			index_calls: AtomicUsize::new(0),
			documentation_calls: AtomicUsize::new(0),
			schema_loads: Arc::new(AtomicUsize::new(0)),
			fail_schema: false,
		}
	}

	fn failing() -> Self {
		Self {
			fail_schema: true,
			..Self::new()
		}
	}

	fn lazy(&self, name: &'static str, fail: bool) -> Schema {
		Schema::lazy(TableSchema {
			name,
			loads: Arc::clone(&self.schema_loads),
			fail,
		})
	}

	fn build(&self) -> Documentation {
		Documentation::new()
			.with_description("Entry endpoint")
			.with_version(
				1,
				Resource::new("/entries")
					.with_method("GET", Method::new().with_response(200, self.lazy("entry_collection", false))),
			)
			.with_version(
				2,
				Resource::new("/entries")
					.with_method(
						"GET",
						Method::new()
							.with_description("List entries")
							.with_response(200, self.lazy("entry_collection", false)),
					)
					.with_method(
						"POST",
						Method::new()
							.with_request(self.lazy("entry_create", false))
							.with_response(201, self.lazy("message", false))
							.with_response(400, self.lazy("error", self.fail_schema)),
					),
			)
	}
}

#[async_trait]
impl Listing for CountingListing {
	async fn resource_index(&self) -> Result<ResourceIndex> {
		self.index_calls.fetch_add(1, Ordering::SeqCst);
		StaticListing::new()
			.with_documentation("/entries", self.build())
			.resource_index()
			.await
	}

	async fn documentation(&self, source_path: &str) -> Result<Option<Documentation>> {
		self.documentation_calls.fetch_add(1, Ordering::SeqCst);
		if source_path == "/entries" {
			Ok(Some(self.build()))
		} else {
			Ok(None)
		}
	}
}

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
	fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
	}
}

impl io::Write for LogBuffer {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

#[fixture]
fn cache() -> Arc<InMemoryCache> {
	Arc::new(InMemoryCache::new())
}

#[rstest]
#[tokio::test]
async fn test_documentation_materialized_then_cached(cache: Arc<InMemoryCache>) {
	let cached = CachedListing::new(CountingListing::new(), Arc::clone(&cache));

	let first = cached.documentation("/entries").await.unwrap().unwrap();
	assert!(first.is_materialized());
	assert_eq!(cached.listing().schema_loads.load(Ordering::SeqCst), 5);
	assert!(cache.has_key(&documentation_key("/entries")).await.unwrap());

	let second = cached.documentation("/entries").await.unwrap().unwrap();
	assert_eq!(second, first);
	assert!(second.is_materialized());

	// Served from cache: no second delegation and no further schema loads
	assert_eq!(cached.listing().documentation_calls.load(Ordering::SeqCst), 1);
	assert_eq!(cached.listing().schema_loads.load(Ordering::SeqCst), 5);

	let post = second.resource(2).and_then(|r| r.method("POST")).unwrap();
	let request = post.request.as_ref().and_then(Schema::definition).unwrap();
	assert_eq!(request.name, "entry_create");
	assert_eq!(post.response(400).and_then(Schema::definition).unwrap().name, "error");
}

#[rstest]
#[tokio::test]
async fn test_unknown_source_path_not_cached(cache: Arc<InMemoryCache>) {
	let cached = CachedListing::new(CountingListing::new(), Arc::clone(&cache));

	assert!(cached.documentation("/unknown").await.unwrap().is_none());
	assert!(cached.documentation("/unknown").await.unwrap().is_none());

	assert_eq!(cached.listing().documentation_calls.load(Ordering::SeqCst), 2);
	assert!(cache.list_keys().await.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_materialization_failure_writes_nothing(cache: Arc<InMemoryCache>) {
	let cached = CachedListing::new(CountingListing::failing(), Arc::clone(&cache));

	let err = cached.documentation("/entries").await.unwrap_err();
	assert_eq!(
		err,
		Error::Materialization {
			reference: "error".to_string(),
			message: "Provider error: table error is missing".to_string(),
		}
	);
	assert!(cache.list_keys().await.is_empty());

	// Nothing was cached, so the next lookup delegates again
	assert!(cached.documentation("/entries").await.is_err());
	assert_eq!(cached.listing().documentation_calls.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn test_method_without_request_schema(cache: Arc<InMemoryCache>) {
	let cached = CachedListing::new(CountingListing::new(), cache);

	let documentation = cached.documentation("/entries").await.unwrap().unwrap();
	let get = documentation.resource(2).and_then(|r| r.method("GET")).unwrap();
	assert!(get.request.is_none());
	assert_eq!(get.description.as_deref(), Some("List entries"));

	let response = get.response(200).and_then(Schema::definition).unwrap();
	assert_eq!(response.schema, json!({"type": "object", "title": "entry_collection"}));
}

#[rstest]
#[tokio::test]
async fn test_resource_index_cached_under_fixed_key(cache: Arc<InMemoryCache>) {
	let cached = CachedListing::new(CountingListing::new(), Arc::clone(&cache));

	let first = cached.resource_index().await.unwrap();
	let second = cached.resource_index().await.unwrap();
	assert_eq!(first, second);
	assert_eq!(first.resources[0].methods, vec!["GET", "POST"]);

	assert_eq!(cached.listing().index_calls.load(Ordering::SeqCst), 1);
	assert_eq!(cache.list_keys().await, vec![RESOURCE_INDEX_KEY]);
	// The index never touches schemas
	assert_eq!(cached.listing().schema_loads.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn test_ttl_from_settings(cache: Arc<InMemoryCache>) {
	let settings = DocumentationSettings {
		cache_ttl_secs: Some(60),
	};
	let cached = CachedListing::from_settings(CountingListing::new(), Arc::clone(&cache), &settings);
	assert_eq!(cached.ttl(), Some(Duration::from_secs(60)));

	cached.documentation("/entries").await.unwrap();
	let info = cache.inspect_entry(&documentation_key("/entries")).await.unwrap();
	assert!(info.has_expiry);
	assert!(info.ttl_seconds.is_some_and(|s| s <= 60));
}

#[rstest]
#[tokio::test]
async fn test_unrepresentable_ttl_never_expires(cache: Arc<InMemoryCache>) {
	let settings = Settings::default()
		.apply_env([("CONTOUR_DOC_CACHE_TTL".to_string(), u64::MAX.to_string())])
		.unwrap();
	let cached = CachedListing::from_settings(
		CountingListing::new(),
		Arc::clone(&cache),
		&settings.documentation,
	);
	assert_eq!(cached.ttl(), Some(Duration::from_secs(u64::MAX)));

	cached.documentation("/entries").await.unwrap();
	cached.resource_index().await.unwrap();
	cached.documentation("/entries").await.unwrap();

	assert_eq!(cached.listing().documentation_calls.load(Ordering::SeqCst), 1);
	let info = cache.inspect_entry(&documentation_key("/entries")).await.unwrap();
	assert!(!info.has_expiry);
	assert_eq!(info.ttl_seconds, None);
}

#[rstest]
#[tokio::test]
async fn test_cache_misses_are_logged(cache: Arc<InMemoryCache>) {
	let logs = LogBuffer::default();
	let sink = logs.clone();
	let _guard = tracing_subscriber::fmt()
		.with_max_level(LevelFilter::DEBUG)
		.with_ansi(false)
		.with_writer(move || sink.clone())
		.finish()
		.set_default();

	let cached = CachedListing::new(CountingListing::new(), cache);
	cached.resource_index().await.unwrap();
	cached.documentation("/entries").await.unwrap();

	let output = logs.contents();
	assert!(output.contains("Resource index cache miss"));
	assert!(output.contains("Documentation cache miss"));
	assert!(output.contains("Stored documentation"));
	assert!(!output.contains("cache hit"));

	cached.documentation("/entries").await.unwrap();
	assert!(logs.contents().contains("Documentation cache hit"));
}

#[rstest]
#[tokio::test]
async fn test_expired_entry_recomputed(cache: Arc<InMemoryCache>) {
	let cached = CachedListing::new(CountingListing::new(), Arc::clone(&cache))
		.with_ttl(Some(Duration::from_millis(20)));

	cached.documentation("/entries").await.unwrap();
	tokio::time::sleep(Duration::from_millis(50)).await;
	cached.documentation("/entries").await.unwrap();

	assert_eq!(cached.listing().documentation_calls.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn test_static_listing_round_trip(cache: Arc<InMemoryCache>) {
	let documentation = Documentation::new().with_version(
		1,
		Resource::new("/users").with_method(
			"PUT",
			Method::new()
				.with_request(Schema::resolved(Definition::new("user", json!({"type": "object"}))))
				.with_response(204, Schema::resolved(Definition::new("empty", json!({})))),
		),
	);
	let listing = StaticListing::new().with_documentation("/users", documentation.clone());
	let cached = CachedListing::new(listing, cache);

	cached.documentation("/users").await.unwrap();
	let from_cache = cached.documentation("/users").await.unwrap();
	assert_eq!(from_cache, Some(documentation));
}
