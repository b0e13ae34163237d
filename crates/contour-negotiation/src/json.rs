//! JSON reader and writer

use bytes::Bytes;
use contour_core::{Error, Result};
use serde_json::Value;

use crate::codec::{Reader, Writer};

/// JSON reader for `application/json` and `application/*+json`
#[derive(Debug, Clone, Default)]
pub struct JsonReader {
	/// Whether an empty body reads as `null` instead of failing
	pub allow_empty: bool,
}

impl JsonReader {
	/// Create a JSON reader that rejects empty bodies
	///
	/// # Examples
	///
	/// ```
	/// use contour_negotiation::JsonReader;
	///
	/// let reader = JsonReader::new();
	/// assert!(!reader.allow_empty);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// # Examples
	///
	/// ```
	/// use contour_negotiation::JsonReader;
	///
	/// let reader = JsonReader::new().allow_empty(true);
	/// assert!(reader.allow_empty);
	/// ```
	pub fn allow_empty(mut self, allow: bool) -> Self {
		self.allow_empty = allow;
		self
	}
}

impl Reader for JsonReader {
	fn read(&self, body: &[u8]) -> Result<Value> {
		if body.iter().all(u8::is_ascii_whitespace) {
			if self.allow_empty {
				return Ok(Value::Null);
			}
			return Err(Error::Parse("Empty request body".to_string()));
		}

		serde_json::from_slice(body).map_err(|e| Error::Parse(format!("Invalid JSON: {}", e)))
	}
}

/// JSON writer for `application/json`
#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
	pub pretty: bool,
}

impl JsonWriter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn pretty(mut self, pretty: bool) -> Self {
		self.pretty = pretty;
		self
	}
}

impl Writer for JsonWriter {
	fn write(&self, data: &Value) -> Result<Bytes> {
		let encoded = if self.pretty {
			serde_json::to_vec_pretty(data)
		} else {
			serde_json::to_vec(data)
		};

		encoded
			.map(Bytes::from)
			.map_err(|e| Error::Serialization(e.to_string()))
	}
}
