//! Serves cached documentation through a negotiated writer

use contour::prelude::*;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use rstest::*;
use serde_json::json;
use std::sync::Arc;

#[fixture]
fn settings() -> Settings {
	Settings::from_toml_str(
		r#"
		[negotiation]
		default_reader = "json"
		default_writer = "json"

		[documentation]
		cache_ttl_secs = 300
		"#,
	)
	.unwrap()
}

fn entries_documentation() -> Documentation {
	Documentation::new().with_version(
		1,
		Resource::new("/entries").with_method(
			"GET",
			Method::new().with_response(
				200,
				Schema::resolved(Definition::new("entries", json!({"type": "array"}))),
			),
		),
	)
}

#[rstest]
#[tokio::test]
async fn test_documentation_as_xml(settings: Settings) {
	let cache = Arc::new(InMemoryCache::new());
	let listing = CachedListing::from_settings(
		StaticListing::new().with_documentation("/entries", entries_documentation()),
		Arc::clone(&cache),
		&settings.documentation,
	);
	let negotiator = Arc::new(Negotiator::from_settings(&settings.negotiation).unwrap());

	let documentation = listing.documentation("/entries").await.unwrap().unwrap();
	let data = serde_json::to_value(&documentation).unwrap();

	let mut response_headers = HeaderMap::new();
	let body = negotiator
		.for_request()
		.respond(
			&WriterQuery::new().accept("application/json;q=0.2, application/xml"),
			&mut response_headers,
			&data,
		)
		.unwrap();

	let text = String::from_utf8(body.to_vec()).unwrap();
	assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><record>"#));
	assert!(text.contains("<name>entries</name>"));
	assert_eq!(response_headers[CONTENT_TYPE], "application/xml");
	assert_eq!(cache.statistics().await.entry_count, 1);
}

#[rstest]
fn test_format_query_beats_accept(settings: Settings) {
	let negotiator = Arc::new(Negotiator::from_settings(&settings.negotiation).unwrap());
	let format = format_from_query("format=xml").unwrap();
	let query = WriterQuery::new().accept("application/json").format(&format);
	assert!(negotiator.for_request().is_writer(&query, "xml"));
}

#[rstest]
fn test_unknown_reader_is_not_found() {
	let negotiator = Negotiator::builder().build().unwrap();
	let err = negotiator.resolve_reader(Some("application/json"), None).unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));
}
