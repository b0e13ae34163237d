//! Codec bindings and the registry that resolves them
//!
//! A [`Binding`] ties a stable identifier and one or more media type
//! patterns to a codec. A [`Registry`] keeps bindings in registration order
//! plus at most one default.
//!
//! Lookup for a concrete media type tries, in order:
//!
//! 1. a binding registered for exactly that type
//! 2. a binding registered for a structured-syntax wildcard (`application/*+json`)
//! 3. a binding registered for `type/*`
//! 4. a binding registered for `*/*`
//!
//! A wildcard media type (as found in `Accept`) picks the default binding
//! when it matches, otherwise the first matching binding.

use contour_core::{Error, MediaType, Result};
use std::fmt;
use std::sync::Arc;

use crate::codec::{Reader, Writer};

/// A codec registered under an id and a set of media type patterns
pub struct Binding<C: ?Sized> {
	id: String,
	media_types: Vec<MediaType>,
	content_type: String,
	codec: Arc<C>,
}

pub type ReaderBinding = Binding<dyn Reader>;
pub type WriterBinding = Binding<dyn Writer>;

impl<C: ?Sized> Binding<C> {
	/// Stable identifier used for hints, defaults and allow-lists
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Media type patterns this binding answers to
	pub fn media_types(&self) -> &[MediaType] {
		&self.media_types
	}

	/// Canonical `Content-Type` emitted for this binding
	pub fn content_type(&self) -> &str {
		&self.content_type
	}

	pub fn codec(&self) -> &C {
		&self.codec
	}

	fn is_allowed(&self, allowed: Option<&[&str]>) -> bool {
		allowed.is_none_or(|ids| ids.contains(&self.id()))
	}

	fn answers_exactly(&self, wanted: &MediaType) -> bool {
		self.media_types
			.iter()
			.any(|pattern| !pattern.is_wildcard() && pattern.same_essence(wanted))
	}

	fn answers_pattern(&self, predicate: impl Fn(&MediaType) -> bool) -> bool {
		self.media_types.iter().any(predicate)
	}
}

impl ReaderBinding {
	/// Creates a reader binding
	///
	/// # Examples
	///
	/// ```
	/// use contour_negotiation::{JsonReader, ReaderBinding};
	///
	/// let binding = ReaderBinding::reader("json", "application/json", JsonReader::new())
	///     .unwrap()
	///     .also_accepts("application/*+json")
	///     .unwrap();
	/// assert_eq!(binding.id(), "json");
	/// assert_eq!(binding.media_types().len(), 2);
	/// ```
	pub fn reader(
		id: impl Into<String>,
		media_type: &str,
		reader: impl Reader + 'static,
	) -> Result<Self> {
		Self::from_codec(id.into(), media_type, Arc::new(reader))
	}
}

impl WriterBinding {
	/// Creates a writer binding whose canonical content type is `media_type`
	///
	/// # Examples
	///
	/// ```
	/// use contour_negotiation::{JsonWriter, WriterBinding};
	///
	/// let binding = WriterBinding::writer("json", "application/json", JsonWriter::new()).unwrap();
	/// assert_eq!(binding.content_type(), "application/json");
	///
	/// let binding = binding.with_content_type("application/json; charset=utf-8");
	/// assert_eq!(binding.content_type(), "application/json; charset=utf-8");
	/// ```
	pub fn writer(
		id: impl Into<String>,
		media_type: &str,
		writer: impl Writer + 'static,
	) -> Result<Self> {
		Self::from_codec(id.into(), media_type, Arc::new(writer))
	}
}

impl<C: ?Sized> Binding<C> {
	fn from_codec(id: String, media_type: &str, codec: Arc<C>) -> Result<Self> {
		let pattern = parse_pattern(media_type)?;
		Ok(Self {
			id,
			content_type: pattern.to_string(),
			media_types: vec![pattern],
			codec,
		})
	}

	/// Adds another media type pattern to this binding
	pub fn also_accepts(mut self, media_type: &str) -> Result<Self> {
		self.media_types.push(parse_pattern(media_type)?);
		Ok(self)
	}

	/// Overrides the canonical content type
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = content_type.into();
		self
	}
}

impl<C: ?Sized> fmt::Debug for Binding<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("id", &self.id)
			.field(
				"media_types",
				&self.media_types.iter().map(|m| m.essence()).collect::<Vec<_>>(),
			)
			.field("content_type", &self.content_type)
			.finish()
	}
}

fn parse_pattern(media_type: &str) -> Result<MediaType> {
	MediaType::parse(media_type).ok_or_else(|| {
		Error::ImproperlyConfigured(format!("Invalid media type pattern: {}", media_type))
	})
}

/// Ordered set of bindings with an optional default
pub struct Registry<C: ?Sized> {
	bindings: Vec<Arc<Binding<C>>>,
	default: Option<usize>,
}

pub type ReaderRegistry = Registry<dyn Reader>;
pub type WriterRegistry = Registry<dyn Writer>;

impl<C: ?Sized> Default for Registry<C> {
	fn default() -> Self {
		Self {
			bindings: Vec::new(),
			default: None,
		}
	}
}

impl<C: ?Sized> fmt::Debug for Registry<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("bindings", &self.bindings.iter().map(|b| b.id()).collect::<Vec<_>>())
			.field("default", &self.default.and_then(|i| self.bindings.get(i)).map(|b| b.id()))
			.finish()
	}
}

impl<C: ?Sized> Registry<C> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a binding; ids must be unique
	pub fn register(&mut self, binding: Binding<C>) -> Result<()> {
		if self.by_id(binding.id()).is_some() {
			return Err(Error::ImproperlyConfigured(format!(
				"Duplicate binding id: {}",
				binding.id()
			)));
		}
		self.bindings.push(Arc::new(binding));
		Ok(())
	}

	/// Designates the default binding, replacing any previous default
	pub fn set_default(&mut self, id: &str) -> Result<()> {
		let index = self
			.bindings
			.iter()
			.position(|b| b.id() == id)
			.ok_or_else(|| {
				Error::ImproperlyConfigured(format!("Unknown default binding: {}", id))
			})?;
		self.default = Some(index);
		Ok(())
	}

	pub fn clear_default(&mut self) {
		self.default = None;
	}

	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Arc<Binding<C>>> {
		self.bindings.iter()
	}

	pub fn by_id(&self, id: &str) -> Option<&Arc<Binding<C>>> {
		self.bindings.iter().find(|b| b.id() == id)
	}

	/// The default binding, if configured and permitted by `allowed`
	pub fn default_binding(&self, allowed: Option<&[&str]>) -> Option<&Arc<Binding<C>>> {
		self.default
			.and_then(|index| self.bindings.get(index))
			.filter(|b| b.is_allowed(allowed))
	}

	/// Resolves a media type to a binding, restricted to `allowed` ids
	pub fn find(&self, wanted: &MediaType, allowed: Option<&[&str]>) -> Option<&Arc<Binding<C>>> {
		if wanted.is_wildcard() {
			if let Some(default) = self.default_binding(allowed)
				&& default.answers_pattern(|pattern| wanted.matches(pattern))
			{
				return Some(default);
			}
			return self.first(allowed, |b| b.answers_pattern(|pattern| wanted.matches(pattern)));
		}

		self.first(allowed, |b| b.answers_exactly(wanted))
			.or_else(|| {
				self.first(allowed, |b| {
					b.answers_pattern(|p| {
						p.type_ == wanted.type_ && p.subtype.starts_with("*+") && p.matches(wanted)
					})
				})
			})
			.or_else(|| {
				self.first(allowed, |b| {
					b.answers_pattern(|p| p.type_ == wanted.type_ && p.subtype == "*")
				})
			})
			.or_else(|| {
				self.first(allowed, |b| {
					b.answers_pattern(|p| p.type_ == "*" && p.subtype == "*")
				})
			})
	}

	fn first(
		&self,
		allowed: Option<&[&str]>,
		predicate: impl Fn(&Binding<C>) -> bool,
	) -> Option<&Arc<Binding<C>>> {
		self.bindings
			.iter()
			.filter(|b| b.is_allowed(allowed))
			.find(|b| predicate(b))
	}
}
