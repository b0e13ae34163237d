//! Form reader for `application/x-www-form-urlencoded`

use contour_core::{Error, Result};
use serde_json::{Map, Value};

use crate::codec::Reader;

/// Reads urlencoded bodies into an object of strings
///
/// Repeated keys collect into an array in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FormReader;

impl FormReader {
	pub fn new() -> Self {
		Self
	}
}

impl Reader for FormReader {
	fn read(&self, body: &[u8]) -> Result<Value> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
			.map_err(|e| Error::Parse(format!("Invalid form data: {}", e)))?;

		let mut map = Map::new();
		for (key, value) in pairs {
			match map.get_mut(&key) {
				Some(Value::Array(items)) => items.push(Value::String(value)),
				Some(existing) => {
					let first = existing.take();
					*existing = Value::Array(vec![first, Value::String(value)]);
				}
				None => {
					map.insert(key, Value::String(value));
				}
			}
		}

		Ok(Value::Object(map))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_form_reader() {
		let value = FormReader::new().read(b"title=Hello+World&tag=a&tag=b&tag=c").unwrap();
		assert_eq!(value, json!({"title": "Hello World", "tag": ["a", "b", "c"]}));
	}

	#[rstest]
	fn test_form_reader_empty() {
		assert_eq!(FormReader::new().read(b"").unwrap(), json!({}));
	}
}
