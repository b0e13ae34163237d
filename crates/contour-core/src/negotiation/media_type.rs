//! Media type values as found in `Content-Type` and `Accept` headers

use std::fmt;

/// A parsed media type such as `application/json; charset=utf-8`
///
/// Type and subtype are stored lowercased. Either may be `*`, and the
/// subtype may be a structured-syntax wildcard like `*+json`. The `q`
/// parameter is lifted into [`MediaType::quality`] and is not kept among
/// [`MediaType::parameters`].
#[derive(Debug, Clone, PartialEq)]
pub struct MediaType {
	pub type_: String,
	pub subtype: String,
	pub parameters: Vec<(String, String)>,
	/// Weight in `[0, 1]`, 1.0 unless a `q` parameter says otherwise
	pub quality: f32,
}

impl MediaType {
	/// Creates a media type with quality 1.0 and no parameters
	///
	/// # Examples
	///
	/// ```
	/// use contour_core::MediaType;
	///
	/// let json = MediaType::new("application", "json");
	/// assert_eq!(json.essence(), "application/json");
	/// assert_eq!(json.quality, 1.0);
	/// ```
	pub fn new(type_: impl Into<String>, subtype: impl Into<String>) -> Self {
		Self {
			type_: type_.into().to_ascii_lowercase(),
			subtype: subtype.into().to_ascii_lowercase(),
			parameters: Vec::new(),
			quality: 1.0,
		}
	}

	/// Parses a single media range, returning `None` when it is malformed
	///
	/// An unparseable `q` value counts as 1.0; values outside `[0, 1]` are
	/// clamped.
	///
	/// # Examples
	///
	/// ```
	/// use contour_core::MediaType;
	///
	/// let mt = MediaType::parse("text/html; charset=UTF-8; q=0.8").unwrap();
	/// assert_eq!(mt.essence(), "text/html");
	/// assert_eq!(mt.parameter("charset"), Some("UTF-8"));
	/// assert_eq!(mt.quality, 0.8);
	///
	/// assert!(MediaType::parse("not a media type").is_none());
	/// assert!(MediaType::parse("*/json").is_none());
	/// ```
	pub fn parse(s: &str) -> Option<Self> {
		let mut parts = s.split(';');
		let essence = parts.next()?.trim();
		let (type_, subtype) = essence.split_once('/')?;
		let (type_, subtype) = (type_.trim(), subtype.trim());

		if !is_token(type_) || !is_token(subtype) {
			return None;
		}
		if type_ == "*" && subtype != "*" {
			return None;
		}

		let mut media_type = Self::new(type_, subtype);

		for param in parts {
			let Some((name, value)) = param.split_once('=') else {
				continue;
			};
			let name = name.trim().to_ascii_lowercase();
			let value = value.trim().trim_matches('"');

			if name == "q" {
				media_type.quality = value
					.parse::<f32>()
					.ok()
					.filter(|q| q.is_finite())
					.map(|q| q.clamp(0.0, 1.0))
					.unwrap_or(1.0);
			} else if !name.is_empty() {
				media_type.parameters.push((name, value.to_string()));
			}
		}

		Some(media_type)
	}

	/// `type/subtype` without parameters
	pub fn essence(&self) -> String {
		format!("{}/{}", self.type_, self.subtype)
	}

	/// Looks up a parameter by case-insensitive name
	pub fn parameter(&self, name: &str) -> Option<&str> {
		self.parameters
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Whether the type or subtype contains a wildcard
	pub fn is_wildcard(&self) -> bool {
		self.type_ == "*" || self.subtype == "*" || self.subtype.starts_with("*+")
	}

	/// Structured syntax suffix, e.g. `json` for `application/vnd.api+json`
	pub fn suffix(&self) -> Option<&str> {
		self.subtype.rsplit_once('+').map(|(_, suffix)| suffix)
	}

	/// Whether both values name the same type and subtype
	pub fn same_essence(&self, other: &MediaType) -> bool {
		self.type_ == other.type_ && self.subtype == other.subtype
	}

	/// Checks whether `self`, used as a pattern, matches `other`
	///
	/// # Examples
	///
	/// ```
	/// use contour_core::MediaType;
	///
	/// let any_text = MediaType::new("text", "*");
	/// assert!(any_text.matches(&MediaType::new("text", "html")));
	/// assert!(!any_text.matches(&MediaType::new("application", "json")));
	///
	/// let any_json = MediaType::new("application", "*+json");
	/// assert!(any_json.matches(&MediaType::new("application", "vnd.api+json")));
	/// ```
	pub fn matches(&self, other: &MediaType) -> bool {
		let type_matches = self.type_ == "*" || self.type_ == other.type_;
		let subtype_matches = self.subtype == "*"
			|| self.subtype == other.subtype
			|| self
				.subtype
				.strip_prefix("*+")
				.is_some_and(|suffix| other.suffix() == Some(suffix));

		type_matches && subtype_matches
	}
}

impl fmt::Display for MediaType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.type_, self.subtype)?;
		for (name, value) in &self.parameters {
			write!(f, "; {}={}", name, value)?;
		}
		Ok(())
	}
}

fn is_token(s: &str) -> bool {
	!s.is_empty()
		&& s
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+*".contains(c))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("application/json", "application/json")]
	#[case("Application/JSON", "application/json")]
	#[case("text/html; charset=utf-8", "text/html")]
	#[case("  application/xml  ", "application/xml")]
	#[case("*/*", "*/*")]
	#[case("application/*+json", "application/*+json")]
	fn test_parse_essence(#[case] input: &str, #[case] expected: &str) {
		let mt = MediaType::parse(input).unwrap();
		assert_eq!(mt.essence(), expected);
	}

	#[rstest]
	#[case("")]
	#[case("json")]
	#[case("application/")]
	#[case("/json")]
	#[case("application json/x")]
	fn test_parse_rejects_malformed(#[case] input: &str) {
		assert!(MediaType::parse(input).is_none());
	}

	#[rstest]
	#[case("text/html;q=0.5", 0.5)]
	#[case("text/html;q=2", 1.0)]
	#[case("text/html;q=-1", 0.0)]
	#[case("text/html;q=abc", 1.0)]
	#[case("text/html", 1.0)]
	fn test_quality(#[case] input: &str, #[case] expected: f32) {
		assert_eq!(MediaType::parse(input).unwrap().quality, expected);
	}

	#[rstest]
	fn test_parameters_exclude_quality() {
		let mt = MediaType::parse("text/plain; q=0.3; charset=\"utf-8\"").unwrap();
		assert_eq!(mt.parameters, vec![("charset".to_string(), "utf-8".to_string())]);
		assert_eq!(mt.to_string(), "text/plain; charset=utf-8");
	}

	#[rstest]
	fn test_matches_is_directional() {
		let wildcard = MediaType::new("text", "*");
		let html = MediaType::new("text", "html");
		assert!(wildcard.matches(&html));
		assert!(!html.matches(&wildcard));
	}

	#[rstest]
	fn test_suffix() {
		assert_eq!(MediaType::new("application", "atom+xml").suffix(), Some("xml"));
		assert_eq!(MediaType::new("application", "json").suffix(), None);
	}
}
