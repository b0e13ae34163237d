//! Settings structures and their sources

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "CONTOUR_";

/// Error type for settings sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },
}

/// Format token to content type table used for `?format=` overrides
///
/// # Examples
///
/// ```
/// use contour_conf::default_formats;
///
/// let formats = default_formats();
/// assert_eq!(formats.get("json").map(String::as_str), Some("application/json"));
/// assert_eq!(formats.get("rss").map(String::as_str), Some("application/rss+xml"));
/// ```
pub fn default_formats() -> IndexMap<String, String> {
	[
		("atom", "application/atom+xml"),
		("form", "application/x-www-form-urlencoded"),
		("html", "text/html"),
		("json", "application/json"),
		("jsonp", "application/javascript"),
		("rss", "application/rss+xml"),
		("xml", "application/xml"),
	]
	.into_iter()
	.map(|(format, content_type)| (format.to_string(), content_type.to_string()))
	.collect()
}

/// Negotiation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationSettings {
	/// Binding id of the reader used when nothing else matches
	pub default_reader: Option<String>,
	/// Binding id of the writer used when nothing else matches
	pub default_writer: Option<String>,
	/// Format token to content type table
	pub formats: IndexMap<String, String>,
	/// Forces the response `Content-Type`, whatever the writer emits
	pub content_type_override: Option<String>,
}

impl Default for NegotiationSettings {
	fn default() -> Self {
		Self {
			default_reader: Some("json".to_string()),
			default_writer: Some("json".to_string()),
			formats: default_formats(),
			content_type_override: None,
		}
	}
}

/// Documentation cache settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationSettings {
	/// Lifetime of cached documentation; absent means no expiry
	pub cache_ttl_secs: Option<u64>,
}

impl DocumentationSettings {
	pub fn cache_ttl(&self) -> Option<Duration> {
		self.cache_ttl_secs.map(Duration::from_secs)
	}
}

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub negotiation: NegotiationSettings,
	pub documentation: DocumentationSettings,
}

impl Settings {
	/// Parses settings from TOML; missing keys keep their defaults
	///
	/// A `[negotiation.formats]` table replaces the default format table.
	///
	/// # Examples
	///
	/// ```
	/// use contour_conf::Settings;
	///
	/// let settings = Settings::from_toml_str(r#"
	///     [negotiation]
	///     default_writer = "xml"
	///
	///     [documentation]
	///     cache_ttl_secs = 3600
	/// "#).unwrap();
	///
	/// assert_eq!(settings.negotiation.default_writer.as_deref(), Some("xml"));
	/// assert_eq!(settings.negotiation.default_reader.as_deref(), Some("json"));
	/// assert_eq!(settings.documentation.cache_ttl_secs, Some(3600));
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(source)?)
	}

	/// Reads settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = fs::read_to_string(path)?;
		tracing::debug!(path = %path.display(), "loaded settings file");
		Self::from_toml_str(&source)
	}

	/// Applies overrides from the process environment
	pub fn with_env_overrides(self) -> Result<Self, SettingsError> {
		self.apply_env(std::env::vars())
	}

	/// Applies `CONTOUR_*` overrides from the given variables
	///
	/// An empty value clears an optional setting.
	///
	/// # Examples
	///
	/// ```
	/// use contour_conf::Settings;
	///
	/// let vars = vec![
	///     ("CONTOUR_DEFAULT_WRITER".to_string(), "xml".to_string()),
	///     ("CONTOUR_DOC_CACHE_TTL".to_string(), "60".to_string()),
	///     ("PATH".to_string(), "/usr/bin".to_string()),
	/// ];
	/// let settings = Settings::default().apply_env(vars).unwrap();
	///
	/// assert_eq!(settings.negotiation.default_writer.as_deref(), Some("xml"));
	/// assert_eq!(settings.documentation.cache_ttl_secs, Some(60));
	/// ```
	pub fn apply_env<I>(mut self, vars: I) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		for (key, value) in vars {
			let Some(name) = key.strip_prefix(ENV_PREFIX) else {
				continue;
			};

			match name {
				"DEFAULT_READER" => self.negotiation.default_reader = non_empty(value),
				"DEFAULT_WRITER" => self.negotiation.default_writer = non_empty(value),
				"CONTENT_TYPE_OVERRIDE" => {
					self.negotiation.content_type_override = non_empty(value)
				}
				"DOC_CACHE_TTL" => {
					self.documentation.cache_ttl_secs = match non_empty(value) {
						None => None,
						Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
							SettingsError::InvalidValue {
								key: key.clone(),
								message: e.to_string(),
							}
						})?),
					};
				}
				_ => {
					tracing::trace!(key = %key, "ignoring unknown environment override");
					continue;
				}
			}

			tracing::debug!(key = %key, "applied environment override");
		}

		Ok(self)
	}
}

fn non_empty(value: String) -> Option<String> {
	if value.trim().is_empty() {
		None
	} else {
		Some(value)
	}
}
