//! # Contour Negotiation
//!
//! Picks the codec that decodes a request body and the codec that encodes
//! the response, from request headers, an explicit `format` token and
//! application hints.
//!
//! ## Example
//!
//! ```
//! use contour_negotiation::{Negotiator, WriterQuery};
//!
//! let negotiator = Negotiator::standard().unwrap();
//!
//! let writer = negotiator
//!     .resolve_writer(&WriterQuery::new().accept("application/xml;q=0.9, application/json;q=0.5"))
//!     .unwrap();
//! assert_eq!(writer.id(), "xml");
//!
//! let writer = negotiator
//!     .resolve_writer(&WriterQuery::new().accept("application/xml").format("json"))
//!     .unwrap();
//! assert_eq!(writer.id(), "json");
//! ```

pub mod codec;
pub mod form;
pub mod format;
pub mod json;
pub mod negotiator;
pub mod registry;
pub mod request;
pub mod response;
pub mod xml;

pub use codec::{Reader, Writer};
pub use form::FormReader;
pub use format::{FormatTable, format_from_query};
pub use json::{JsonReader, JsonWriter};
pub use negotiator::{Negotiator, NegotiatorBuilder, WriterQuery};
pub use registry::{
	Binding, ReaderBinding, ReaderRegistry, Registry, WriterBinding, WriterRegistry,
};
pub use request::RequestNegotiation;
pub use response::ResponseFinalizer;
pub use xml::{XmlReader, XmlWriter};
