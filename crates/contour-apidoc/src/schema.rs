//! Request and response schemas
//!
//! A [`Schema`] is either resolved, holding its [`Definition`], or lazy,
//! holding a [`SchemaSource`] that produces the definition on first use
//! (for instance by reading it from a database). Only resolved schemas can
//! be serialized; deserializing always yields a resolved schema.

use async_trait::async_trait;
use contour_core::{Error, Result};
use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A fully computed schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
	pub name: String,
	/// JSON Schema document
	pub schema: Value,
}

impl Definition {
	/// # Examples
	///
	/// ```
	/// use contour_apidoc::Definition;
	/// use serde_json::json;
	///
	/// let definition = Definition::new("entry", json!({"type": "object"}));
	/// assert_eq!(definition.name, "entry");
	/// ```
	pub fn new(name: impl Into<String>, schema: Value) -> Self {
		Self {
			name: name.into(),
			schema,
		}
	}
}

/// Deferred producer of a schema definition
#[async_trait]
pub trait SchemaSource: Send + Sync {
	/// Identifier of the definition, used in logs and errors
	fn reference(&self) -> &str;

	async fn load(&self) -> Result<Definition>;
}

/// A lazy schema; the source is consulted at most once successfully
pub struct LazySchema {
	source: Box<dyn SchemaSource>,
	loaded: OnceCell<Arc<Definition>>,
}

impl LazySchema {
	pub fn reference(&self) -> &str {
		self.source.reference()
	}

	pub fn is_loaded(&self) -> bool {
		self.loaded.initialized()
	}

	/// Loads the definition, or returns the one loaded before
	pub async fn definition(&self) -> Result<Arc<Definition>> {
		self.loaded
			.get_or_try_init(|| async {
				self.source.load().await.map(Arc::new).map_err(|e| match e {
					Error::Materialization { .. } => e,
					other => Error::Materialization {
						reference: self.reference().to_string(),
						message: other.to_string(),
					},
				})
			})
			.await
			.cloned()
	}
}

#[derive(Clone)]
pub enum Schema {
	Lazy(Arc<LazySchema>),
	Resolved(Arc<Definition>),
}

impl Schema {
	pub fn resolved(definition: Definition) -> Self {
		Self::Resolved(Arc::new(definition))
	}

	pub fn lazy(source: impl SchemaSource + 'static) -> Self {
		Self::Lazy(Arc::new(LazySchema {
			source: Box::new(source),
			loaded: OnceCell::new(),
		}))
	}

	pub fn is_resolved(&self) -> bool {
		matches!(self, Self::Resolved(_))
	}

	/// The definition if this schema is already resolved
	pub fn definition(&self) -> Option<&Definition> {
		match self {
			Self::Resolved(definition) => Some(definition),
			Self::Lazy(_) => None,
		}
	}

	/// Fetches the definition, loading a lazy source if needed
	pub async fn load_definition(&self) -> Result<Arc<Definition>> {
		match self {
			Self::Resolved(definition) => Ok(Arc::clone(definition)),
			Self::Lazy(lazy) => lazy.definition().await,
		}
	}

	/// Returns an equivalent resolved schema
	///
	/// Resolving a resolved schema returns it unchanged.
	///
	/// # Examples
	///
	/// ```
	/// use contour_apidoc::{Definition, Schema};
	/// use serde_json::json;
	///
	/// # #[tokio::main]
	/// # async fn main() {
	/// let schema = Schema::resolved(Definition::new("entry", json!({"type": "object"})));
	/// let resolved = schema.resolve().await.unwrap();
	/// assert_eq!(resolved, schema);
	/// # }
	/// ```
	pub async fn resolve(&self) -> Result<Schema> {
		match self {
			Self::Resolved(_) => Ok(self.clone()),
			Self::Lazy(lazy) => {
				let definition = lazy.definition().await?;
				tracing::trace!(reference = lazy.reference(), "Resolved lazy schema");
				Ok(Self::Resolved(definition))
			}
		}
	}
}

impl From<Definition> for Schema {
	fn from(definition: Definition) -> Self {
		Self::resolved(definition)
	}
}

impl PartialEq for Schema {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Resolved(a), Self::Resolved(b)) => a == b,
			(Self::Lazy(a), Self::Lazy(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl fmt::Debug for Schema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Lazy(lazy) => f.debug_tuple("Lazy").field(&lazy.reference()).finish(),
			Self::Resolved(definition) => f.debug_tuple("Resolved").field(definition).finish(),
		}
	}
}

impl Serialize for Schema {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Self::Resolved(definition) => definition.serialize(serializer),
			Self::Lazy(lazy) => Err(S::Error::custom(format!(
				"schema `{}` must be resolved before serialization",
				lazy.reference()
			))),
		}
	}
}

impl<'de> Deserialize<'de> for Schema {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		Definition::deserialize(deserializer).map(Self::resolved)
	}
}
