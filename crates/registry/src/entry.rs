use std::sync::Arc;

use crate::error::RegistryError;

/// One configured source/mirror link.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPairEntry {
	/// The primary side of the link (e.g. an overworld).
	pub source: Arc<str>,
	/// The scaled counterpart (e.g. a nether).
	pub mirror: Arc<str>,
	/// Mirror distance to source distance: `source = mirror * ratio`.
	pub ratio: f64,
	/// Where [`Self::ratio`] came from.
	pub origin: RatioOrigin,
}

/// Whether a pair carries its own ratio or follows the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioOrigin {
	/// Set on the pair itself (`{ mirror = "..", ratio = .. }`).
	Explicit,
	/// Taken from `default-ratio`; tracks it when the default changes.
	Inherited,
}

impl WorldPairEntry {
	pub fn is_explicit(&self) -> bool {
		self.origin == RatioOrigin::Explicit
	}
}

/// Smallest ratio the registry accepts.
///
/// Anything smaller lets realistic coordinates overflow to infinity when
/// divided by the ratio.
pub const MIN_RATIO: f64 = 1e-6;

/// Returns true for ratios the registry will accept.
#[inline]
pub fn is_valid_ratio(ratio: f64) -> bool {
	ratio.is_finite() && ratio >= MIN_RATIO
}

/// Rejects non-finite ratios and ratios below [`MIN_RATIO`].
pub fn validate_ratio(ratio: f64) -> Result<f64, RegistryError> {
	if is_valid_ratio(ratio) {
		Ok(ratio)
	} else {
		Err(RegistryError::InvalidRatio(ratio))
	}
}
