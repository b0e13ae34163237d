//! Framework-wide error type

use http::StatusCode;

/// Errors raised by negotiation, codecs, documentation providers and caches
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	/// No reader, writer or document could be resolved where one was required
	#[error("Not found: {0}")]
	NotFound(String),

	/// A lazy schema definition failed to resolve
	#[error("Failed to materialize schema `{reference}`: {message}")]
	Materialization { reference: String, message: String },

	/// A request body could not be decoded
	#[error("Parse error: {0}")]
	Parse(String),

	/// A value could not be encoded or decoded for storage or output
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// The cache backend failed
	#[error("Cache error: {0}")]
	Cache(String),

	/// The documentation provider failed
	#[error("Provider error: {0}")]
	Provider(String),

	/// The component was assembled with an inconsistent configuration
	#[error("Improperly configured: {0}")]
	ImproperlyConfigured(String),
}

impl Error {
	/// HTTP status a caller should surface for this error
	///
	/// # Examples
	///
	/// ```
	/// use contour_core::Error;
	/// use http::StatusCode;
	///
	/// let err = Error::NotFound("no fitting writer".to_string());
	/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
	///
	/// let err = Error::Parse("Invalid JSON".to_string());
	/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::Parse(_) => StatusCode::BAD_REQUEST,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Whether this is a [`Error::NotFound`]
	pub fn is_not_found(&self) -> bool {
		matches!(self, Error::NotFound(_))
	}
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::NotFound("x".into()), StatusCode::NOT_FOUND)]
	#[case(Error::Parse("x".into()), StatusCode::BAD_REQUEST)]
	#[case(Error::Cache("x".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	#[case(
		Error::Materialization { reference: "a".into(), message: "b".into() },
		StatusCode::INTERNAL_SERVER_ERROR
	)]
	fn test_status_code(#[case] err: Error, #[case] expected: StatusCode) {
		assert_eq!(err.status_code(), expected);
	}

	#[rstest]
	fn test_materialization_message() {
		let err = Error::Materialization {
			reference: "schema://entry".to_string(),
			message: "connection refused".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Failed to materialize schema `schema://entry`: connection refused"
		);
		assert!(!err.is_not_found());
	}
}
