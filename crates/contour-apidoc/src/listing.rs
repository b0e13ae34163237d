//! Documentation providers

use async_trait::async_trait;
use contour_core::Result;
use indexmap::IndexMap;

use crate::documentation::{Documentation, ResourceIndex, ResourceSummary};

/// Source of API documentation
#[async_trait]
pub trait Listing: Send + Sync {
	/// Index of every documented resource
	async fn resource_index(&self) -> Result<ResourceIndex>;

	/// Documentation for a source path, or `None` if the path is unknown
	async fn documentation(&self, source_path: &str) -> Result<Option<Documentation>>;
}

/// Provider over documentation registered up front
///
/// # Examples
///
/// ```
/// use contour_apidoc::{Documentation, Listing, Method, Resource, StaticListing};
///
/// # #[tokio::main]
/// # async fn main() {
/// let listing = StaticListing::new().with_documentation(
///     "/entries",
///     Documentation::new().with_version(1, Resource::new("/entries").with_method("GET", Method::new())),
/// );
///
/// let index = listing.resource_index().await.unwrap();
/// assert_eq!(index.resources[0].methods, vec!["GET"]);
/// assert!(listing.documentation("/users").await.unwrap().is_none());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticListing {
	documentation: IndexMap<String, Documentation>,
}

impl StaticListing {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_documentation(mut self, source_path: impl Into<String>, documentation: Documentation) -> Self {
		self.insert(source_path, documentation);
		self
	}

	/// Registers documentation, replacing any for the same source path
	pub fn insert(&mut self, source_path: impl Into<String>, documentation: Documentation) {
		self.documentation.insert(source_path.into(), documentation);
	}

	pub fn len(&self) -> usize {
		self.documentation.len()
	}

	pub fn is_empty(&self) -> bool {
		self.documentation.is_empty()
	}
}

#[async_trait]
impl Listing for StaticListing {
	async fn resource_index(&self) -> Result<ResourceIndex> {
		Ok(ResourceIndex::new(
			self.documentation
				.iter()
				.map(|(path, doc)| ResourceSummary::from_documentation(path.as_str(), doc))
				.collect(),
		))
	}

	async fn documentation(&self, source_path: &str) -> Result<Option<Documentation>> {
		Ok(self.documentation.get(source_path).cloned())
	}
}
