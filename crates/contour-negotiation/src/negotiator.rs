//! Reader and writer resolution
//!
//! The [`Negotiator`] owns a reader registry, a writer registry, the format
//! token table and the response finalizer. It is built once at startup and
//! shared read-only between requests.
//!
//! Reader priority: explicit hint, then `Content-Type`, then the default.
//! Writer priority: explicit hint, then the `format` token, then `Accept`
//! entries in descending quality, then the default. Every step except the
//! hint is restricted to the allowed writer ids when a set is given.

use contour_conf::NegotiationSettings;
use contour_core::{AcceptHeader, Error, MediaType, Result};
use http::HeaderMap;
use http::header::ACCEPT;
use std::sync::Arc;

use crate::form::FormReader;
use crate::format::FormatTable;
use crate::json::{JsonReader, JsonWriter};
use crate::registry::{ReaderBinding, ReaderRegistry, WriterBinding, WriterRegistry};
use crate::request::RequestNegotiation;
use crate::response::ResponseFinalizer;
use crate::xml::{XmlReader, XmlWriter};

/// Inputs for writer resolution
///
/// # Examples
///
/// ```
/// use contour_negotiation::WriterQuery;
///
/// let allowed = ["json", "xml"];
/// let query = WriterQuery::new()
///     .accept("application/xml;q=0.9, application/json;q=0.5")
///     .allowed(&allowed);
/// assert_eq!(query.format, None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WriterQuery<'a> {
	/// Raw `Accept` header value
	pub accept: Option<&'a str>,
	/// Explicit format token, usually from `?format=`
	pub format: Option<&'a str>,
	/// Writer id requested by application code
	pub hint: Option<&'a str>,
	/// Writer ids the caller permits
	pub allowed: Option<&'a [&'a str]>,
}

impl<'a> WriterQuery<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Takes the `Accept` header from request headers
	pub fn from_headers(headers: &'a HeaderMap) -> Self {
		Self {
			accept: headers.get(ACCEPT).and_then(|v| v.to_str().ok()),
			..Self::default()
		}
	}

	pub fn accept(mut self, accept: &'a str) -> Self {
		self.accept = Some(accept);
		self
	}

	pub fn format(mut self, format: &'a str) -> Self {
		self.format = Some(format);
		self
	}

	pub fn hint(mut self, hint: &'a str) -> Self {
		self.hint = Some(hint);
		self
	}

	pub fn allowed(mut self, allowed: &'a [&'a str]) -> Self {
		self.allowed = Some(allowed);
		self
	}
}

/// Resolves readers and writers for requests
#[derive(Debug)]
pub struct Negotiator {
	readers: ReaderRegistry,
	writers: WriterRegistry,
	formats: FormatTable,
	finalizer: ResponseFinalizer,
}

impl Negotiator {
	pub fn builder() -> NegotiatorBuilder {
		NegotiatorBuilder::new()
	}

	/// The stock codec set with `json` as default reader and writer
	///
	/// Readers: `json` (`application/json`, `application/*+json`), `xml`
	/// (`application/xml`, `text/xml`), `form`. Writers: `json`, `xml`.
	///
	/// # Examples
	///
	/// ```
	/// use contour_negotiation::{Negotiator, WriterQuery};
	///
	/// let negotiator = Negotiator::standard().unwrap();
	/// let reader = negotiator.resolve_reader(Some("text/xml"), None).unwrap();
	/// assert_eq!(reader.id(), "xml");
	///
	/// let writer = negotiator
	///     .resolve_writer(&WriterQuery::new().accept("text/html"))
	///     .unwrap();
	/// assert_eq!(writer.id(), "json");
	/// ```
	pub fn standard() -> Result<Self> {
		standard_codecs()?
			.default_reader("json")
			.default_writer("json")
			.build()
	}

	/// The stock codec set configured from settings
	pub fn from_settings(settings: &NegotiationSettings) -> Result<Self> {
		standard_codecs()?.settings(settings).build()
	}

	pub fn readers(&self) -> &ReaderRegistry {
		&self.readers
	}

	pub fn writers(&self) -> &WriterRegistry {
		&self.writers
	}

	pub fn formats(&self) -> &FormatTable {
		&self.formats
	}

	pub fn finalizer(&self) -> &ResponseFinalizer {
		&self.finalizer
	}

	/// Creates a per-request context that memoizes the resolved codecs
	pub fn for_request(self: &Arc<Self>) -> RequestNegotiation {
		RequestNegotiation::new(Arc::clone(self))
	}

	/// Picks the reader for a request body
	///
	/// A hint naming no registered reader is ignored and falls through to
	/// the default rather than to `Content-Type`.
	pub fn resolve_reader(
		&self,
		content_type: Option<&str>,
		hint: Option<&str>,
	) -> Result<Arc<ReaderBinding>> {
		if let Some(hint) = hint {
			if let Some(binding) = self.readers.by_id(hint) {
				tracing::debug!(reader = binding.id(), step = "hint", "Resolved reader");
				return Ok(Arc::clone(binding));
			}
			tracing::debug!(hint, "Reader hint matches no registered reader");
		} else if let Some(media_type) = content_type.and_then(MediaType::parse) {
			if let Some(binding) = self.readers.find(&media_type, None) {
				tracing::debug!(
					reader = binding.id(),
					content_type = %media_type,
					step = "content_type",
					"Resolved reader"
				);
				return Ok(Arc::clone(binding));
			}
		}

		match self.readers.default_binding(None) {
			Some(binding) => {
				tracing::debug!(reader = binding.id(), step = "default", "Resolved reader");
				Ok(Arc::clone(binding))
			}
			None => {
				tracing::debug!(content_type, "No reader found");
				Err(Error::NotFound("Could not find fitting data reader".to_string()))
			}
		}
	}

	/// Picks the writer for a response body
	pub fn resolve_writer(&self, query: &WriterQuery<'_>) -> Result<Arc<WriterBinding>> {
		if let Some(hint) = query.hint {
			if let Some(binding) = self.writers.by_id(hint) {
				tracing::debug!(writer = binding.id(), step = "hint", "Resolved writer");
				return Ok(Arc::clone(binding));
			}
			tracing::debug!(hint, "Writer hint matches no registered writer");
		} else if let Some(binding) = self.preferred_writer(query) {
			return Ok(binding);
		}

		match self.writers.default_binding(query.allowed) {
			Some(binding) => {
				tracing::debug!(writer = binding.id(), step = "default", "Resolved writer");
				Ok(Arc::clone(binding))
			}
			None => {
				tracing::debug!(accept = query.accept, format = query.format, "No writer found");
				Err(Error::NotFound("Could not find fitting data writer".to_string()))
			}
		}
	}

	/// The writer chosen by `format` or `Accept` alone, without hint or default
	///
	/// An unknown format token yields `None`; `Accept` is not consulted then.
	pub fn preferred_writer(&self, query: &WriterQuery<'_>) -> Option<Arc<WriterBinding>> {
		let (accept, step) = match query.format.map(str::trim).filter(|f| !f.is_empty()) {
			Some(format) => match self.formats.content_type(format) {
				Some(content_type) => (AcceptHeader::parse(content_type), "format"),
				None => {
					tracing::debug!(format, "Unknown format token");
					return None;
				}
			},
			None => (
				query.accept.map(AcceptHeader::parse).unwrap_or_default(),
				"accept",
			),
		};

		accept.media_types.iter().find_map(|wanted| {
			self.writers.find(wanted, query.allowed).map(|binding| {
				tracing::debug!(
					writer = binding.id(),
					media_type = %wanted,
					step,
					"Resolved writer"
				);
				Arc::clone(binding)
			})
		})
	}

	/// Checks if `id` is the writer `format` or `Accept` would pick
	pub fn is_writer(&self, query: &WriterQuery<'_>, id: &str) -> bool {
		self.preferred_writer(query)
			.is_some_and(|binding| binding.id() == id)
	}
}

fn standard_codecs() -> Result<NegotiatorBuilder> {
	Ok(NegotiatorBuilder::new()
		.reader(
			ReaderBinding::reader("json", "application/json", JsonReader::new())?
				.also_accepts("application/*+json")?,
		)
		.reader(
			ReaderBinding::reader("xml", "application/xml", XmlReader::new())?
				.also_accepts("text/xml")?,
		)
		.reader(ReaderBinding::reader(
			"form",
			"application/x-www-form-urlencoded",
			FormReader::new(),
		)?)
		.writer(WriterBinding::writer("json", "application/json", JsonWriter::new())?)
		.writer(
			WriterBinding::writer("xml", "application/xml", XmlWriter::new())?
				.also_accepts("text/xml")?,
		))
}

/// Builder for [`Negotiator`]
///
/// # Examples
///
/// ```
/// use contour_negotiation::{JsonWriter, Negotiator, WriterBinding, WriterQuery};
///
/// let negotiator = Negotiator::builder()
///     .writer(WriterBinding::writer("json", "application/json", JsonWriter::new()).unwrap())
///     .build()
///     .unwrap();
///
/// // No default writer: an unmatched Accept is an error
/// let result = negotiator.resolve_writer(&WriterQuery::new().accept("text/csv"));
/// assert!(result.unwrap_err().is_not_found());
/// ```
#[derive(Default)]
pub struct NegotiatorBuilder {
	readers: Vec<ReaderBinding>,
	writers: Vec<WriterBinding>,
	default_reader: Option<String>,
	default_writer: Option<String>,
	formats: FormatTable,
	content_type_override: Option<String>,
}

impl NegotiatorBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn reader(mut self, binding: ReaderBinding) -> Self {
		self.readers.push(binding);
		self
	}

	pub fn writer(mut self, binding: WriterBinding) -> Self {
		self.writers.push(binding);
		self
	}

	pub fn default_reader(mut self, id: impl Into<String>) -> Self {
		self.default_reader = Some(id.into());
		self
	}

	pub fn default_writer(mut self, id: impl Into<String>) -> Self {
		self.default_writer = Some(id.into());
		self
	}

	pub fn formats(mut self, formats: FormatTable) -> Self {
		self.formats = formats;
		self
	}

	pub fn format(mut self, format: &str, content_type: &str) -> Self {
		self.formats.insert(format, content_type);
		self
	}

	pub fn content_type_override(mut self, content_type: impl Into<String>) -> Self {
		self.content_type_override = Some(content_type.into());
		self
	}

	/// Applies defaults, formats and the content type override from settings
	///
	/// Settings replace whatever was configured on the builder before.
	pub fn settings(mut self, settings: &NegotiationSettings) -> Self {
		self.default_reader = settings.default_reader.clone();
		self.default_writer = settings.default_writer.clone();
		self.formats = FormatTable::from_map(settings.formats.clone());
		self.content_type_override = settings.content_type_override.clone();
		self
	}

	/// Registers everything and validates the defaults
	pub fn build(self) -> Result<Negotiator> {
		let mut readers = ReaderRegistry::new();
		for binding in self.readers {
			readers.register(binding)?;
		}
		if let Some(id) = &self.default_reader {
			readers.set_default(id)?;
		}

		let mut writers = WriterRegistry::new();
		for binding in self.writers {
			writers.register(binding)?;
		}
		if let Some(id) = &self.default_writer {
			writers.set_default(id)?;
		}

		let finalizer = match &self.content_type_override {
			Some(content_type) => ResponseFinalizer::new().with_content_type_override(content_type)?,
			None => ResponseFinalizer::new(),
		};

		tracing::debug!(
			readers = readers.len(),
			writers = writers.len(),
			default_reader = self.default_reader.as_deref(),
			default_writer = self.default_writer.as_deref(),
			"Built negotiator"
		);

		Ok(Negotiator {
			readers,
			writers,
			formats: self.formats,
			finalizer,
		})
	}
}
