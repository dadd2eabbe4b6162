use netherlink_registry::{MIN_RATIO, RegistryError};
use netherlink_transit::NoMapping;
use thiserror::Error;

/// A rejected administrative request. Nothing was changed.
#[derive(Debug, Error)]
pub enum AdminError {
	#[error("'{0}' is not a number")]
	InvalidNumber(String),
	#[error("ratio must be a positive finite number of at least {min}, got {0}", min = MIN_RATIO)]
	InvalidRatio(f64),
	#[error("ratio {ratio} is larger than the maximum of {max}")]
	RatioTooLarge { ratio: f64, max: f64 },
	#[error("world '{0}' has no configured pair")]
	NotConfigured(String),
	#[error("world '{0}' does not exist")]
	UnknownWorld(String),
	#[error("world '{0}' is neither a source nor a mirror world")]
	WrongDimension(String),
	#[error(transparent)]
	NoMapping(#[from] NoMapping),
	#[error(transparent)]
	Registry(#[from] RegistryError),
}
