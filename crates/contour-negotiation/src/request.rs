//! Per-request negotiation context

use bytes::Bytes;
use contour_core::Result;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use once_cell::unsync::OnceCell;
use serde_json::Value;
use std::sync::Arc;

use crate::negotiator::{Negotiator, WriterQuery};
use crate::registry::{ReaderBinding, WriterBinding};

/// Memoizes the reader and writer picked for one request
///
/// The first successful resolution wins for the lifetime of the context;
/// later calls return the same binding whatever arguments they pass. A
/// failed resolution is not remembered.
///
/// # Examples
///
/// ```
/// use contour_negotiation::{Negotiator, WriterQuery};
/// use std::sync::Arc;
///
/// let negotiator = Arc::new(Negotiator::standard().unwrap());
/// let request = negotiator.for_request();
///
/// let first = request.writer(&WriterQuery::new().accept("application/xml")).unwrap();
/// let second = request.writer(&WriterQuery::new().accept("application/json")).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug)]
pub struct RequestNegotiation {
	negotiator: Arc<Negotiator>,
	reader: OnceCell<Arc<ReaderBinding>>,
	writer: OnceCell<Arc<WriterBinding>>,
}

impl RequestNegotiation {
	pub fn new(negotiator: Arc<Negotiator>) -> Self {
		Self {
			negotiator,
			reader: OnceCell::new(),
			writer: OnceCell::new(),
		}
	}

	pub fn negotiator(&self) -> &Negotiator {
		&self.negotiator
	}

	pub fn reader(&self, content_type: Option<&str>, hint: Option<&str>) -> Result<Arc<ReaderBinding>> {
		self.reader
			.get_or_try_init(|| self.negotiator.resolve_reader(content_type, hint))
			.cloned()
	}

	pub fn writer(&self, query: &WriterQuery<'_>) -> Result<Arc<WriterBinding>> {
		self.writer
			.get_or_try_init(|| self.negotiator.resolve_writer(query))
			.cloned()
	}

	/// Decodes a request body with the reader picked from its headers
	pub fn read_body(&self, headers: &HeaderMap, body: &[u8], hint: Option<&str>) -> Result<Value> {
		let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
		let binding = self.reader(content_type, hint)?;
		binding.codec().read(body)
	}

	/// Encodes `data` with the negotiated writer and sets `Content-Type`
	pub fn respond(
		&self,
		query: &WriterQuery<'_>,
		response_headers: &mut HeaderMap,
		data: &Value,
	) -> Result<Bytes> {
		let binding = self.writer(query)?;
		let body = binding.codec().write(data)?;
		self.negotiator
			.finalizer()
			.finalize(response_headers, &binding)?;
		Ok(body)
	}

	/// Checks if `id` is the writer `format` or `Accept` would pick
	pub fn is_writer(&self, query: &WriterQuery<'_>, id: &str) -> bool {
		self.negotiator.is_writer(query, id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn request() -> RequestNegotiation {
		Arc::new(Negotiator::standard().unwrap()).for_request()
	}

	#[rstest]
	fn test_reader_memoized(request: RequestNegotiation) {
		let first = request.reader(Some("application/xml"), None).unwrap();
		let second = request.reader(Some("application/json"), None).unwrap();
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(second.id(), "xml");
	}

	#[rstest]
	fn test_failure_not_memoized() {
		let negotiator = Arc::new(
			Negotiator::builder()
				.writer(
					WriterBinding::writer("json", "application/json", crate::JsonWriter::new())
						.unwrap(),
				)
				.build()
				.unwrap(),
		);
		let request = negotiator.for_request();
		assert!(request.writer(&WriterQuery::new().accept("text/csv")).is_err());
		let writer = request
			.writer(&WriterQuery::new().accept("application/json"))
			.unwrap();
		assert_eq!(writer.id(), "json");
	}

	#[rstest]
	fn test_read_body(request: RequestNegotiation) {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));
		let value = request.read_body(&headers, b"title=Hi", None).unwrap();
		assert_eq!(value, json!({"title": "Hi"}));
	}

	#[rstest]
	fn test_respond(request: RequestNegotiation) {
		let mut headers = HeaderMap::new();
		let body = request
			.respond(
				&WriterQuery::new().accept("application/xml"),
				&mut headers,
				&json!({"id": 1}),
			)
			.unwrap();
		assert_eq!(headers[CONTENT_TYPE], "application/xml");
		assert!(std::str::from_utf8(&body).unwrap().ends_with("<record><id>1</id></record>"));
	}
}
