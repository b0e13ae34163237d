//! # Contour Core
//!
//! Shared building blocks for the Contour crates.
//!
//! - [`exception`]: the framework-wide [`Error`](exception::Error) type
//! - [`negotiation`]: media type and `Accept` header parsing

pub mod exception;
pub mod negotiation;

pub use exception::{Error, Result};
pub use negotiation::{AcceptHeader, MediaType};
