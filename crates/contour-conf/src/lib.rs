//! # Contour Conf
//!
//! Layered settings for the negotiation and documentation components.
//!
//! Values are merged in priority order: environment variables > TOML file >
//! built-in defaults.
//!
//! ## Example
//!
//! ```rust,no_run
//! use contour_conf::Settings;
//!
//! let settings = Settings::from_file("contour.toml")?.with_env_overrides()?;
//! println!("default writer: {:?}", settings.negotiation.default_writer);
//! # Ok::<(), contour_conf::SettingsError>(())
//! ```

pub mod settings;

pub use settings::{
	DocumentationSettings, ENV_PREFIX, NegotiationSettings, Settings, SettingsError,
	default_formats,
};
