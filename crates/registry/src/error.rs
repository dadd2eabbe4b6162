//! Error types for registry lookups, mutation, and settings I/O.

use thiserror::Error;

use crate::entry::MIN_RATIO;

/// Failure of an administrative registry operation.
///
/// Every variant leaves the published snapshot untouched.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// A ratio that is NaN, infinite, or below [`MIN_RATIO`] was supplied.
	#[error("ratio must be a positive finite number of at least {min}, got {0}", min = MIN_RATIO)]
	InvalidRatio(f64),
	/// A ratio was set for a world that has no pair entry.
	#[error("world '{0}' has no linked mirror world")]
	UnknownWorld(String),
	/// The settings document could not be read or decoded as a whole.
	#[error(transparent)]
	Document(#[from] DocumentError),
	/// The updated settings could not be written back.
	#[error(transparent)]
	Persist(#[from] PersistError),
}

/// The settings document as a whole is unusable.
#[derive(Debug, Error)]
pub enum DocumentError {
	#[error("failed to read settings from {location}: {source}")]
	Read {
		location: String,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("'{key}' must be a positive finite number of at least {min}", min = MIN_RATIO)]
	InvalidDefaultRatio { key: &'static str },
	#[error("'{key}' must be a table of world pairs")]
	InvalidSection { key: &'static str },
}

/// Writing the settings document failed.
#[derive(Debug, Error)]
pub enum PersistError {
	#[error("failed to render settings: {0}")]
	Render(#[from] toml::ser::Error),
	#[error("failed to write settings to {location}: {source}")]
	Write {
		location: String,
		#[source]
		source: std::io::Error,
	},
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
