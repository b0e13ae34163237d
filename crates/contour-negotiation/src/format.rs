//! Format token table
//!
//! Maps explicit `?format=` tokens to the content type that is negotiated
//! in place of the `Accept` header.
//!
//! # Examples
//!
//! ```
//! use contour_negotiation::FormatTable;
//!
//! let formats = FormatTable::default();
//! assert_eq!(formats.content_type("json"), Some("application/json"));
//! assert_eq!(formats.content_type("XML"), Some("application/xml"));
//! assert_eq!(formats.content_type("unknown"), None);
//! ```

use contour_conf::default_formats;
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct FormatTable {
	formats: IndexMap<String, String>,
}

impl Default for FormatTable {
	fn default() -> Self {
		Self::from_map(default_formats())
	}
}

impl FormatTable {
	/// An empty table; every format token is unknown
	pub fn empty() -> Self {
		Self {
			formats: IndexMap::new(),
		}
	}

	pub fn from_map(formats: IndexMap<String, String>) -> Self {
		let mut table = Self::empty();
		for (format, content_type) in formats {
			table.insert(format, content_type);
		}
		table
	}

	/// Adds or replaces a format token
	pub fn insert(&mut self, format: impl Into<String>, content_type: impl Into<String>) {
		self.formats
			.insert(format.into().to_ascii_lowercase(), content_type.into());
	}

	/// Content type for a format token, compared case-insensitively
	pub fn content_type(&self, format: &str) -> Option<&str> {
		self.formats
			.get(&format.trim().to_ascii_lowercase())
			.map(String::as_str)
	}

	/// Checks if a format token is known
	pub fn is_supported(&self, format: &str) -> bool {
		self.content_type(format).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.formats.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

/// Extracts the `format` parameter from a raw query string
///
/// # Examples
///
/// ```
/// use contour_negotiation::format_from_query;
///
/// assert_eq!(format_from_query("page=2&format=xml"), Some("xml".to_string()));
/// assert_eq!(format_from_query("format="), None);
/// assert_eq!(format_from_query("page=2"), None);
/// ```
pub fn format_from_query(query: &str) -> Option<String> {
	let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
	pairs
		.into_iter()
		.find(|(key, _)| key == "format")
		.map(|(_, value)| value)
		.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("atom", "application/atom+xml")]
	#[case("form", "application/x-www-form-urlencoded")]
	#[case("html", "text/html")]
	#[case("json", "application/json")]
	#[case("jsonp", "application/javascript")]
	#[case("rss", "application/rss+xml")]
	#[case("xml", "application/xml")]
	fn test_default_formats(#[case] format: &str, #[case] expected: &str) {
		assert_eq!(FormatTable::default().content_type(format), Some(expected));
	}

	#[rstest]
	fn test_insert_overrides() {
		let mut table = FormatTable::default();
		table.insert("JSON", "application/vnd.api+json");
		assert_eq!(table.content_type("json"), Some("application/vnd.api+json"));
		assert!(!table.is_supported("yaml"));
	}

	#[rstest]
	fn test_empty_table() {
		assert!(FormatTable::empty().content_type("json").is_none());
	}

	#[rstest]
	#[case("format=json", Some("json"))]
	#[case("a=1&format=rss&format=xml", Some("rss"))]
	#[case("format=%20", None)]
	#[case("", None)]
	fn test_format_from_query(#[case] query: &str, #[case] expected: Option<&str>) {
		assert_eq!(format_from_query(query).as_deref(), expected);
	}
}
