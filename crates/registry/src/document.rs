//! Settings document codec.
//!
//! The document is a TOML table:
//!
//! ```toml
//! default-ratio = 8
//!
//! [pairs]
//! world = "world_nether"                                   # shorthand, uses default-ratio
//! survival = { mirror = "survival_nether", ratio = 4.0 }   # explicit
//! ```
//!
//! The older flat layout (`value` for the default ratio, `world-pairs` for the
//! pair table, `nether` for the mirror field) decodes to the same entries.
//! Unrelated top-level keys are carried through untouched when the document is
//! written back.

use serde::Deserialize;
use thiserror::Error;
use toml::{Table, Value};
use tracing::{info, warn};

use crate::entry::{MIN_RATIO, WorldPairEntry, is_valid_ratio};
use crate::error::{DocumentError, PersistError};
use crate::snapshot::RegistrySnapshot;

/// Ratio used when the document does not set one.
pub const DEFAULT_RATIO: f64 = 8.0;
/// Source side of the pair installed when the document has no pair table.
pub const FALLBACK_SOURCE: &str = "world";
/// Mirror side of the pair installed when the document has no pair table.
pub const FALLBACK_MIRROR: &str = "world_nether";

const DEFAULT_RATIO_KEY: &str = "default-ratio";
const LEGACY_DEFAULT_RATIO_KEY: &str = "value";
const PAIRS_KEY: &str = "pairs";
const LEGACY_PAIRS_KEY: &str = "world-pairs";

/// Raw shape of one `pairs.<source>` value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PairValue {
	Shorthand(String),
	Explicit {
		#[serde(alias = "nether")]
		mirror: Option<String>,
		ratio: Option<f64>,
	},
}

/// Why a single pair entry was skipped during load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryProblem {
	#[error("expected a world name or a table with 'mirror', found {found}")]
	UnsupportedValue { found: &'static str },
	#[error("mirror world name is missing or empty")]
	MissingMirror,
	#[error("ratio must be a positive finite number of at least {min}, got {0}", min = MIN_RATIO)]
	InvalidRatio(f64),
	#[error("a world cannot be its own mirror")]
	SelfLinked,
	#[error("world is already linked")]
	DuplicateSource,
	#[error("mirror world is already linked to '{by}'")]
	MirrorTaken { by: String },
	#[error("mirror world is itself configured as a source")]
	MirrorIsSource,
	#[error("world is already the mirror of '{of}'")]
	SourceIsMirror { of: String },
}

/// A pair entry that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDiagnostic {
	pub source: String,
	pub problem: EntryProblem,
}

impl std::fmt::Display for LoadDiagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "skipped world pair '{}': {}", self.source, self.problem)
	}
}

/// Outcome of decoding a settings document into a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
	/// Pairs installed in the snapshot.
	pub loaded: usize,
	/// The document had no pair table and the built-in pair was installed.
	pub used_fallback: bool,
	/// Entries that were skipped.
	pub diagnostics: Vec<LoadDiagnostic>,
}

impl LoadReport {
	pub fn skipped(&self) -> usize {
		self.diagnostics.len()
	}
}

/// A parsed settings document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
	table: Table,
}

impl Settings {
	pub fn parse(text: &str) -> Result<Self, DocumentError> {
		let table = toml::from_str::<Table>(text)?;
		Ok(Self { table })
	}

	/// The document written when no settings exist yet.
	pub fn with_defaults() -> Self {
		let mut table = Table::new();
		table.insert(DEFAULT_RATIO_KEY.to_string(), Value::Float(DEFAULT_RATIO));
		Self { table }
	}

	pub fn render(&self) -> Result<String, PersistError> {
		Ok(toml::to_string(&self.table)?)
	}

	/// Builds a snapshot from the document.
	///
	/// Malformed pair entries are skipped and reported; only a bad default
	/// ratio or a non-table pair section fails the whole document.
	pub fn decode(&self) -> Result<(RegistrySnapshot, LoadReport), DocumentError> {
		let default_ratio = self.default_ratio()?;
		let mut snapshot = RegistrySnapshot::new(default_ratio);
		let mut report = LoadReport::default();

		let Some(pairs) = self.pairs_section()? else {
			warn!(
				source = FALLBACK_SOURCE,
				mirror = FALLBACK_MIRROR,
				"no world pairs configured, using built-in pair"
			);
			let linked = snapshot.try_link(FALLBACK_SOURCE, FALLBACK_MIRROR, None);
			debug_assert!(linked.is_ok());
			report.loaded = snapshot.len();
			report.used_fallback = true;
			return Ok((snapshot, report));
		};

		let mut pairs: Vec<(&String, &Value)> = pairs.iter().collect();
		pairs.sort_by(|a, b| a.0.cmp(b.0));

		for (source, value) in pairs {
			let linked = decode_pair(value)
				.and_then(|(mirror, ratio)| snapshot.try_link(source, &mirror, ratio).map(|()| mirror));
			match linked {
				Ok(mirror) => {
					info!(
						source = %source,
						mirror = %mirror,
						ratio = snapshot.ratio_for(source),
						"world pair loaded"
					);
				}
				Err(problem) => {
					let diagnostic = LoadDiagnostic {
						source: source.clone(),
						problem,
					};
					warn!("{diagnostic}");
					report.diagnostics.push(diagnostic);
				}
			}
		}

		report.loaded = snapshot.len();
		Ok((snapshot, report))
	}

	fn default_ratio(&self) -> Result<f64, DocumentError> {
		let Some((key, value)) = self.lookup(DEFAULT_RATIO_KEY, LEGACY_DEFAULT_RATIO_KEY) else {
			return Ok(DEFAULT_RATIO);
		};
		let ratio = match value {
			Value::Float(ratio) => *ratio,
			Value::Integer(ratio) => *ratio as f64,
			_ => return Err(DocumentError::InvalidDefaultRatio { key }),
		};
		if is_valid_ratio(ratio) {
			Ok(ratio)
		} else {
			Err(DocumentError::InvalidDefaultRatio { key })
		}
	}

	fn pairs_section(&self) -> Result<Option<&Table>, DocumentError> {
		match self.lookup(PAIRS_KEY, LEGACY_PAIRS_KEY) {
			None => Ok(None),
			Some((_, Value::Table(pairs))) => Ok(Some(pairs)),
			Some((key, _)) => Err(DocumentError::InvalidSection { key }),
		}
	}

	/// Finds `key`, falling back to its legacy spelling.
	fn lookup(&self, key: &'static str, legacy: &'static str) -> Option<(&'static str, &Value)> {
		self.table
			.get(key)
			.map(|value| (key, value))
			.or_else(|| self.table.get(legacy).map(|value| (legacy, value)))
	}

	fn key_in_use(&self, key: &'static str, legacy: &'static str) -> &'static str {
		if !self.table.contains_key(key) && self.table.contains_key(legacy) {
			legacy
		} else {
			key
		}
	}

	pub(crate) fn set_default_ratio(&mut self, ratio: f64) {
		let key = self.key_in_use(DEFAULT_RATIO_KEY, LEGACY_DEFAULT_RATIO_KEY);
		self.table.insert(key.to_string(), Value::Float(ratio));
	}

	/// Writes `entry` in explicit form, creating the pair table if needed.
	pub(crate) fn set_pair(&mut self, entry: &WorldPairEntry) {
		let key = self.key_in_use(PAIRS_KEY, LEGACY_PAIRS_KEY);
		let section = self
			.table
			.entry(key.to_string())
			.or_insert_with(|| Value::Table(Table::new()));
		if !section.is_table() {
			*section = Value::Table(Table::new());
		}

		let mut pair = Table::new();
		pair.insert("mirror".to_string(), Value::String(entry.mirror.to_string()));
		pair.insert("ratio".to_string(), Value::Float(entry.ratio));
		if let Value::Table(pairs) = section {
			pairs.insert(entry.source.to_string(), Value::Table(pair));
		}
	}
}

fn decode_pair(value: &Value) -> Result<(String, Option<f64>), EntryProblem> {
	let found = value.type_str();
	match PairValue::deserialize(value.clone()) {
		Ok(PairValue::Shorthand(mirror)) => Ok((mirror, None)),
		Ok(PairValue::Explicit { mirror: Some(mirror), ratio }) => Ok((mirror, ratio)),
		Ok(PairValue::Explicit { mirror: None, .. }) => Err(EntryProblem::MissingMirror),
		Err(_) => Err(EntryProblem::UnsupportedValue { found }),
	}
}
