//! XML reader and writer
//!
//! The reader maps an XML document onto a JSON-like value using quick-xml:
//! child elements become object members, repeated siblings collapse into an
//! array, attributes are kept under an `@` prefix and text beside children
//! lands under `#text`. The root element itself is unwrapped, so
//! `<record><title>x</title></record>` reads as `{"title": "x"}`.
//!
//! The writer does the reverse, wrapping the value in a root element
//! (`record` unless configured otherwise). `@` members become attributes
//! and `#text` the element text. XML has no list syntax, so an empty list
//! is written as an empty element and reads back as `null`, and a
//! one-item list reads back as the item itself.

use bytes::Bytes;
use contour_core::{Error, Result};
use quick_xml::events::attributes::Attributes;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader as XmlEventReader, Writer as XmlEventWriter};
use serde_json::{Map, Value};

use crate::codec::{Reader, Writer};

const ATTRIBUTE_PREFIX: &str = "@";
const TEXT_KEY: &str = "#text";
const ENTRY_ELEMENT: &str = "entry";

/// XML reader for `application/xml` and `text/xml`
#[derive(Debug, Clone)]
pub struct XmlReader {
	/// Include XML attributes in the parsed output
	pub include_attributes: bool,
}

impl Default for XmlReader {
	fn default() -> Self {
		Self {
			include_attributes: true,
		}
	}
}

impl XmlReader {
	/// # Examples
	///
	/// ```
	/// use contour_negotiation::{Reader, XmlReader};
	/// use serde_json::json;
	///
	/// let value = XmlReader::new()
	///     .read(b"<record><title>Hello</title><tag>a</tag><tag>b</tag></record>")
	///     .unwrap();
	/// assert_eq!(value, json!({"title": "Hello", "tag": ["a", "b"]}));
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	pub fn include_attributes(mut self, include: bool) -> Self {
		self.include_attributes = include;
		self
	}

	fn process_attributes(&self, attributes: Attributes, obj: &mut Map<String, Value>) -> Result<()> {
		for attr in attributes {
			let attr = attr.map_err(|e| Error::Parse(format!("XML attribute error: {}", e)))?;
			let key = format!(
				"{}{}",
				ATTRIBUTE_PREFIX,
				String::from_utf8_lossy(attr.key.as_ref())
			);
			let value = attr
				.unescape_value()
				.map_err(|e| Error::Parse(format!("XML attribute error: {}", e)))?;
			obj.insert(key, Value::String(value.into_owned()));
		}
		Ok(())
	}
}

struct OpenElement {
	name: String,
	children: Map<String, Value>,
	text: String,
}

impl OpenElement {
	fn into_value(self) -> Value {
		let text = self.text.trim();
		if self.children.is_empty() {
			if text.is_empty() {
				Value::Null
			} else {
				Value::String(text.to_string())
			}
		} else {
			let mut children = self.children;
			if !text.is_empty() {
				children.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
			}
			Value::Object(children)
		}
	}
}

fn add_to_parent(parent: &mut Map<String, Value>, name: String, value: Value) {
	match parent.get_mut(&name) {
		Some(Value::Array(items)) => items.push(value),
		Some(existing) => {
			let first = existing.take();
			*existing = Value::Array(vec![first, value]);
		}
		None => {
			parent.insert(name, value);
		}
	}
}

impl Reader for XmlReader {
	fn read(&self, body: &[u8]) -> Result<Value> {
		let mut reader = XmlEventReader::from_reader(body);
		let mut stack: Vec<OpenElement> = Vec::new();

		loop {
			match reader.read_event() {
				Ok(Event::Start(e)) => {
					let mut children = Map::new();
					if self.include_attributes {
						self.process_attributes(e.attributes(), &mut children)?;
					}
					stack.push(OpenElement {
						name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
						children,
						text: String::new(),
					});
				}

				Ok(Event::Empty(e)) => {
					let mut children = Map::new();
					if self.include_attributes {
						self.process_attributes(e.attributes(), &mut children)?;
					}
					let element = OpenElement {
						name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
						children,
						text: String::new(),
					};

					match stack.last_mut() {
						Some(parent) => {
							let name = element.name.clone();
							add_to_parent(&mut parent.children, name, element.into_value());
						}
						None => return Ok(element.into_value()),
					}
				}

				Ok(Event::Text(e)) => {
					let text = e
						.unescape()
						.map_err(|e| Error::Parse(format!("XML decode error: {}", e)))?;
					if let Some(current) = stack.last_mut() {
						current.text.push_str(&text);
					}
				}

				Ok(Event::CData(e)) => {
					if let Some(current) = stack.last_mut() {
						current
							.text
							.push_str(&String::from_utf8_lossy(e.into_inner().as_ref()));
					}
				}

				Ok(Event::End(_)) => {
					let Some(element) = stack.pop() else {
						return Err(Error::Parse("Unbalanced XML end tag".to_string()));
					};

					match stack.last_mut() {
						Some(parent) => {
							let name = element.name.clone();
							add_to_parent(&mut parent.children, name, element.into_value());
						}
						None => return Ok(element.into_value()),
					}
				}

				Ok(Event::Eof) => break,

				Ok(_) => {}

				Err(e) => return Err(Error::Parse(format!("XML parse error: {}", e))),
			}
		}

		Err(Error::Parse("Empty XML document".to_string()))
	}
}

/// XML writer for `application/xml`
#[derive(Debug, Clone)]
pub struct XmlWriter {
	/// Name of the document element
	pub root: String,
}

impl Default for XmlWriter {
	fn default() -> Self {
		Self {
			root: "record".to_string(),
		}
	}
}

impl XmlWriter {
	/// # Examples
	///
	/// ```
	/// use contour_negotiation::{Writer, XmlWriter};
	/// use serde_json::json;
	///
	/// let body = XmlWriter::new().write(&json!({"title": "Hello"})).unwrap();
	/// assert_eq!(
	///     std::str::from_utf8(&body).unwrap(),
	///     r#"<?xml version="1.0" encoding="UTF-8"?><record><title>Hello</title></record>"#
	/// );
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	pub fn root(mut self, root: impl Into<String>) -> Self {
		self.root = root.into();
		self
	}

	fn write_element(
		&self,
		writer: &mut XmlEventWriter<Vec<u8>>,
		name: &str,
		value: &Value,
	) -> Result<()> {
		// Keys that are not XML names (e.g. status codes) go into an attribute
		let (tag, mut start) = if is_xml_name(name) {
			(name, BytesStart::new(name))
		} else {
			(
				ENTRY_ELEMENT,
				BytesStart::new(ENTRY_ELEMENT).with_attributes([("key", name)]),
			)
		};

		match value {
			// An empty list still writes its element so the key is kept
			Value::Array(items) if items.is_empty() => emit(writer, Event::Empty(start))?,
			Value::Array(items) => {
				for item in items {
					self.write_element(writer, name, item)?;
				}
			}
			Value::Object(members) => {
				let mut text = None;
				let mut children = Vec::new();
				for (key, member) in members {
					match (key.strip_prefix(ATTRIBUTE_PREFIX), scalar_text(member)) {
						(Some(attribute), Some(value)) if is_xml_name(attribute) => {
							start.push_attribute((attribute, value.as_str()));
						}
						_ if key == TEXT_KEY && scalar_text(member).is_some() => {
							text = scalar_text(member);
						}
						_ => children.push((key, member)),
					}
				}

				if children.is_empty() && text.is_none() {
					emit(writer, Event::Empty(start))?;
					return Ok(());
				}
				emit(writer, Event::Start(start))?;
				if let Some(text) = text {
					emit(writer, Event::Text(BytesText::new(&text)))?;
				}
				for (key, member) in children {
					self.write_element(writer, key, member)?;
				}
				emit(writer, Event::End(BytesEnd::new(tag)))?;
			}
			Value::Null => emit(writer, Event::Empty(start))?,
			scalar => {
				let text = scalar_text(scalar).unwrap_or_default();
				emit(writer, Event::Start(start))?;
				emit(writer, Event::Text(BytesText::new(&text)))?;
				emit(writer, Event::End(BytesEnd::new(tag)))?;
			}
		}
		Ok(())
	}
}

/// Text of a string, number or boolean
fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
		_ => None,
	}
}

fn is_xml_name(name: &str) -> bool {
	let mut chars = name.chars();
	chars
		.next()
		.is_some_and(|c| c.is_alphabetic() || c == '_')
		&& chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
		&& !name.to_ascii_lowercase().starts_with("xml")
}

fn emit(writer: &mut XmlEventWriter<Vec<u8>>, event: Event<'_>) -> Result<()> {
	writer
		.write_event(event)
		.map_err(|e| Error::Serialization(format!("XML write error: {}", e)))
}

impl Writer for XmlWriter {
	fn write(&self, data: &Value) -> Result<Bytes> {
		let mut writer = XmlEventWriter::new(Vec::new());
		emit(
			&mut writer,
			Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
		)?;

		match data {
			// A bare list needs a single document element around it
			Value::Array(items) => {
				emit(&mut writer, Event::Start(BytesStart::new(self.root.as_str())))?;
				for item in items {
					self.write_element(&mut writer, ENTRY_ELEMENT, item)?;
				}
				emit(&mut writer, Event::End(BytesEnd::new(self.root.as_str())))?;
			}
			other => self.write_element(&mut writer, &self.root, other)?,
		}

		Ok(Bytes::from(writer.into_inner()))
	}
}
