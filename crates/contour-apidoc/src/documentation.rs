//! API documentation model
//!
//! A [`Documentation`] describes one API source path across versions. Each
//! version holds a [`Resource`] whose HTTP methods carry an optional
//! request schema and one response schema per status code.

use contour_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::Schema;

/// Lifecycle state of a resource version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
	#[default]
	Active,
	Deprecated,
	Closed,
	Development,
}

/// One HTTP method of a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Method {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request: Option<Schema>,
	#[serde(default)]
	pub responses: BTreeMap<u16, Schema>,
}

impl Method {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_request(mut self, schema: Schema) -> Self {
		self.request = Some(schema);
		self
	}

	/// Adds a response schema, replacing any for the same status code
	pub fn with_response(mut self, status_code: u16, schema: Schema) -> Self {
		self.responses.insert(status_code, schema);
		self
	}

	pub fn response(&self, status_code: u16) -> Option<&Schema> {
		self.responses.get(&status_code)
	}

	/// Every schema of this method, request first
	pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
		self.request.iter().chain(self.responses.values())
	}

	async fn materialized(&self) -> Result<Method> {
		let request = match &self.request {
			Some(schema) => Some(schema.resolve().await?),
			None => None,
		};

		let mut responses = BTreeMap::new();
		for (status_code, schema) in &self.responses {
			responses.insert(*status_code, schema.resolve().await?);
		}

		Ok(Method {
			description: self.description.clone(),
			request,
			responses,
		})
	}
}

/// A resource as published in one API version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
	pub path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default)]
	pub status: ResourceStatus,
	/// Methods keyed by upper-case HTTP method name
	#[serde(default)]
	pub methods: BTreeMap<String, Method>,
}

impl Resource {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			title: None,
			description: None,
			status: ResourceStatus::default(),
			methods: BTreeMap::new(),
		}
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_status(mut self, status: ResourceStatus) -> Self {
		self.status = status;
		self
	}

	/// # Examples
	///
	/// ```
	/// use contour_apidoc::{Method, Resource};
	///
	/// let resource = Resource::new("/entries").with_method("get", Method::new());
	/// assert!(resource.method("GET").is_some());
	/// assert_eq!(resource.allowed_methods(), vec!["GET"]);
	/// ```
	pub fn with_method(mut self, name: &str, method: Method) -> Self {
		self.methods.insert(name.to_ascii_uppercase(), method);
		self
	}

	pub fn method(&self, name: &str) -> Option<&Method> {
		self.methods.get(&name.to_ascii_uppercase())
	}

	pub fn allowed_methods(&self) -> Vec<&str> {
		self.methods.keys().map(String::as_str).collect()
	}

	async fn materialized(&self) -> Result<Resource> {
		let mut methods = BTreeMap::new();
		for (name, method) in &self.methods {
			methods.insert(name.clone(), method.materialized().await?);
		}

		Ok(Resource {
			path: self.path.clone(),
			title: self.title.clone(),
			description: self.description.clone(),
			status: self.status,
			methods,
		})
	}
}

/// Documentation of one API source path, per version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Documentation {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub versions: BTreeMap<u32, Resource>,
}

impl Documentation {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_version(mut self, version: u32, resource: Resource) -> Self {
		self.versions.insert(version, resource);
		self
	}

	pub fn resource(&self, version: u32) -> Option<&Resource> {
		self.versions.get(&version)
	}

	pub fn latest_version(&self) -> Option<u32> {
		self.versions.keys().next_back().copied()
	}

	/// The resource of the highest version
	pub fn latest(&self) -> Option<&Resource> {
		self.versions.values().next_back()
	}

	/// Checks if no lazy schema remains anywhere in the documentation
	pub fn is_materialized(&self) -> bool {
		self.versions
			.values()
			.flat_map(|resource| resource.methods.values())
			.flat_map(Method::schemas)
			.all(Schema::is_resolved)
	}

	/// Returns a copy in which every schema is resolved
	///
	/// Fails on the first schema whose definition cannot be loaded; `self`
	/// is left untouched either way.
	///
	/// # Examples
	///
	/// ```
	/// use contour_apidoc::{Definition, Documentation, Method, Resource, Schema};
	/// use serde_json::json;
	///
	/// # #[tokio::main]
	/// # async fn main() {
	/// let schema = Schema::resolved(Definition::new("entry", json!({"type": "object"})));
	/// let documentation = Documentation::new().with_version(
	///     1,
	///     Resource::new("/entries").with_method("GET", Method::new().with_response(200, schema)),
	/// );
	///
	/// let materialized = documentation.materialize().await.unwrap();
	/// assert!(materialized.is_materialized());
	/// assert_eq!(materialized, documentation);
	/// # }
	/// ```
	pub async fn materialize(&self) -> Result<Documentation> {
		let mut versions = BTreeMap::new();
		for (version, resource) in &self.versions {
			versions.insert(*version, resource.materialized().await?);
		}

		Ok(Documentation {
			description: self.description.clone(),
			versions,
		})
	}
}

/// Summary of one documented resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
	/// Source path the documentation is looked up by
	pub source_path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default)]
	pub status: ResourceStatus,
	pub methods: Vec<String>,
}

impl ResourceSummary {
	/// Summarizes the latest version of a documentation object
	pub fn from_documentation(source_path: impl Into<String>, documentation: &Documentation) -> Self {
		let latest = documentation.latest();
		Self {
			source_path: source_path.into(),
			title: latest.and_then(|r| r.title.clone()),
			status: latest.map(|r| r.status).unwrap_or_default(),
			methods: latest
				.map(|r| r.methods.keys().cloned().collect())
				.unwrap_or_default(),
		}
	}
}

/// Index of every documented resource; never contains schemas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceIndex {
	pub resources: Vec<ResourceSummary>,
}

impl ResourceIndex {
	pub fn new(resources: Vec<ResourceSummary>) -> Self {
		Self { resources }
	}

	pub fn len(&self) -> usize {
		self.resources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.resources.is_empty()
	}

	pub fn find(&self, source_path: &str) -> Option<&ResourceSummary> {
		self.resources.iter().find(|r| r.source_path == source_path)
	}
}
