//! Accept header parsing

use super::media_type::MediaType;

/// Represents an Accept header
///
/// Entries are ordered by descending quality; entries of equal quality keep
/// the order in which the client declared them. Entries with `q=0` are
/// "not acceptable" and are dropped.
#[derive(Debug, Clone, Default)]
pub struct AcceptHeader {
	pub media_types: Vec<MediaType>,
}

impl AcceptHeader {
	/// Parses an Accept header string into an AcceptHeader struct
	///
	/// # Examples
	///
	/// ```
	/// use contour_core::AcceptHeader;
	///
	/// let accept = AcceptHeader::parse("application/json;q=0.5, application/xml;q=0.9");
	/// assert_eq!(accept.media_types.len(), 2);
	/// assert_eq!(accept.media_types[0].subtype, "xml");
	/// assert_eq!(accept.media_types[1].subtype, "json");
	///
	/// let complex = AcceptHeader::parse("text/html, application/json; q=0.8, */*; q=0.1");
	/// assert_eq!(complex.media_types.len(), 3);
	/// assert_eq!(complex.media_types[0].subtype, "html");
	/// ```
	pub fn parse(header: &str) -> Self {
		let mut media_types: Vec<MediaType> = header
			.split(',')
			.filter_map(|s| MediaType::parse(s.trim()))
			.filter(|mt| mt.quality > 0.0)
			.collect();

		// Stable: ties keep declaration order
		media_types.sort_by(|a, b| b.quality.total_cmp(&a.quality));

		Self { media_types }
	}

	/// Creates an empty AcceptHeader with no media types
	///
	/// # Examples
	///
	/// ```
	/// use contour_core::AcceptHeader;
	///
	/// let empty = AcceptHeader::empty();
	/// assert!(empty.is_empty());
	/// ```
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.media_types.is_empty()
	}

	/// Finds the best matching media type from available options
	///
	/// # Examples
	///
	/// ```
	/// use contour_core::{AcceptHeader, MediaType};
	///
	/// let accept = AcceptHeader::parse("application/json, text/html");
	/// let available = vec![
	///     MediaType::new("text", "html"),
	///     MediaType::new("application", "xml"),
	/// ];
	/// let best = accept.find_best_match(&available);
	/// assert_eq!(best.unwrap().subtype, "html");
	///
	/// let no_match = AcceptHeader::parse("application/json");
	/// assert!(no_match.find_best_match(&available).is_none());
	/// ```
	pub fn find_best_match(&self, available: &[MediaType]) -> Option<MediaType> {
		for accepted in &self.media_types {
			for available_type in available {
				if accepted.matches(available_type) {
					return Some(available_type.clone());
				}
			}
		}
		None
	}
}
