//! World-pair ratio registry.
//!
//! Holds the bidirectional mapping between source worlds and their mirror
//! worlds, the coordinate ratio of each pair, and the process-wide default
//! ratio. The state is decoded from a TOML settings document (see
//! [`document`]) and published as immutable [`RegistrySnapshot`]s.
//!
//! # Invariants
//!
//! - Every source maps to exactly one mirror and every mirror back to exactly
//!   one source; no world is both.
//! - Every ratio, including the default, is finite and at least [`MIN_RATIO`]. Setters
//!   reject anything else with [`RegistryError::InvalidRatio`].
//! - A reload either publishes a complete new snapshot or leaves the old one
//!   in place.

pub mod document;
pub mod entry;
pub mod error;
mod registry;
pub mod snapshot;
pub mod store;

pub use document::{
	DEFAULT_RATIO, EntryProblem, FALLBACK_MIRROR, FALLBACK_SOURCE, LoadDiagnostic, LoadReport,
	Settings,
};
pub use entry::{MIN_RATIO, RatioOrigin, WorldPairEntry, is_valid_ratio, validate_ratio};
pub use error::{DocumentError, PersistError, RegistryError, Result};
pub use registry::RatioRegistry;
pub use snapshot::RegistrySnapshot;
pub use store::{FileStore, MemoryStore, SettingsStore};
