//! Reader and writer traits

use bytes::Bytes;
use contour_core::Result;
use serde_json::Value;

/// Decodes a request body into a generic value
pub trait Reader: Send + Sync {
	fn read(&self, body: &[u8]) -> Result<Value>;
}

/// Encodes a value into a response body
pub trait Writer: Send + Sync {
	fn write(&self, data: &Value) -> Result<Bytes>;
}
