//! Response finalization

use contour_core::{Error, Result};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};

use crate::registry::WriterBinding;

/// Sets the response `Content-Type` from the chosen writer
///
/// A header already set by application code is left alone. A configured
/// override always wins, e.g. `text/html` for clients that upload files
/// through an iframe and cannot accept a JSON content type.
#[derive(Debug, Clone, Default)]
pub struct ResponseFinalizer {
	content_type_override: Option<HeaderValue>,
}

impl ResponseFinalizer {
	pub fn new() -> Self {
		Self::default()
	}

	/// # Examples
	///
	/// ```
	/// use contour_negotiation::ResponseFinalizer;
	///
	/// assert!(ResponseFinalizer::new().with_content_type_override("text/html").is_ok());
	/// assert!(ResponseFinalizer::new().with_content_type_override("bad\nvalue").is_err());
	/// ```
	pub fn with_content_type_override(mut self, content_type: &str) -> Result<Self> {
		let value = HeaderValue::from_str(content_type).map_err(|e| {
			Error::ImproperlyConfigured(format!("Invalid content type override: {}", e))
		})?;
		self.content_type_override = Some(value);
		Ok(self)
	}

	pub fn content_type_override(&self) -> Option<&HeaderValue> {
		self.content_type_override.as_ref()
	}

	pub fn finalize(&self, headers: &mut HeaderMap, binding: &WriterBinding) -> Result<()> {
		if let Some(value) = &self.content_type_override {
			headers.insert(CONTENT_TYPE, value.clone());
			return Ok(());
		}

		if headers.contains_key(CONTENT_TYPE) {
			return Ok(());
		}

		let value = HeaderValue::from_str(binding.content_type()).map_err(|e| {
			Error::ImproperlyConfigured(format!(
				"Writer {} has an invalid content type: {}",
				binding.id(),
				e
			))
		})?;
		headers.insert(CONTENT_TYPE, value);
		Ok(())
	}
}
