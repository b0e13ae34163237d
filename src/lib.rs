//! # Contour
//!
//! Content negotiation and cached API documentation for HTTP services.
//!
//! Contour picks the codec that reads a request body and the codec that
//! writes the response from `Content-Type`, `Accept`, an explicit `format`
//! token and application hints. Alongside it sits a read-through cache for
//! API documentation that resolves every lazy schema before storing.
//!
//! ## Feature Flags
//!
//! - `negotiation` - reader/writer negotiation ([`negotiation`])
//! - `apidoc` - documentation model and cache ([`apidoc`])
//! - `full` (default) - both of the above
//!
//! ## Quick Example
//!
//! ```
//! use contour::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = Settings::from_toml_str(
//!     r#"
//!     [negotiation]
//!     default_writer = "xml"
//!     "#,
//! )
//! .unwrap();
//!
//! let negotiator = Arc::new(Negotiator::from_settings(&settings.negotiation).unwrap());
//! let request = negotiator.for_request();
//!
//! let writer = request.writer(&WriterQuery::new().accept("text/csv")).unwrap();
//! assert_eq!(writer.id(), "xml");
//! ```

pub use contour_conf as conf;
pub use contour_core as core;

#[cfg(feature = "negotiation")]
pub use contour_negotiation as negotiation;

#[cfg(feature = "apidoc")]
pub use contour_apidoc as apidoc;

pub use contour_conf::Settings;
pub use contour_core::{Error, Result};

/// Commonly used types
pub mod prelude {
	pub use contour_conf::{DocumentationSettings, NegotiationSettings, Settings};
	pub use contour_core::{AcceptHeader, Error, MediaType, Result};

	#[cfg(feature = "negotiation")]
	pub use contour_negotiation::{
		FormatTable, Negotiator, Reader, ReaderBinding, RequestNegotiation, Writer, WriterBinding,
		WriterQuery, format_from_query,
	};

	#[cfg(feature = "apidoc")]
	pub use contour_apidoc::{
		Cache, CachedListing, Definition, Documentation, InMemoryCache, Listing, Method, Resource,
		ResourceIndex, Schema, SchemaSource, StaticListing,
	};
}
