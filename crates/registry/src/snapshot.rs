use std::collections::BTreeSet;
use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;

use crate::document::EntryProblem;
use crate::entry::{RatioOrigin, WorldPairEntry, is_valid_ratio};

/// Immutable view of every configured pair plus the default ratio.
///
/// Snapshots are only built through [`RegistrySnapshot::try_link`] and the
/// `with_*` copy-on-write helpers, which keep the forward and reverse maps in
/// lockstep and never admit a non-positive or non-finite ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySnapshot {
	entries: HashMap<Arc<str>, WorldPairEntry>,
	/// Mirror name to source name.
	reverse: HashMap<Arc<str>, Arc<str>>,
	default_ratio: f64,
}

impl RegistrySnapshot {
	pub(crate) fn new(default_ratio: f64) -> Self {
		debug_assert!(is_valid_ratio(default_ratio));
		Self {
			entries: HashMap::default(),
			reverse: HashMap::default(),
			default_ratio,
		}
	}

	/// Links `source` to `mirror`, rejecting anything that would break the
	/// one-to-one mapping between the two sides.
	pub(crate) fn try_link(&mut self, source: &str, mirror: &str, ratio: Option<f64>) -> Result<(), EntryProblem> {
		if mirror.is_empty() {
			return Err(EntryProblem::MissingMirror);
		}
		if source == mirror {
			return Err(EntryProblem::SelfLinked);
		}
		if let Some(ratio) = ratio
			&& !is_valid_ratio(ratio)
		{
			return Err(EntryProblem::InvalidRatio(ratio));
		}
		if self.entries.contains_key(source) {
			return Err(EntryProblem::DuplicateSource);
		}
		if let Some(owner) = self.reverse.get(source) {
			return Err(EntryProblem::SourceIsMirror { of: owner.to_string() });
		}
		if let Some(owner) = self.reverse.get(mirror) {
			return Err(EntryProblem::MirrorTaken { by: owner.to_string() });
		}
		if self.entries.contains_key(mirror) {
			return Err(EntryProblem::MirrorIsSource);
		}

		let source: Arc<str> = Arc::from(source);
		let mirror: Arc<str> = Arc::from(mirror);
		let (ratio, origin) = match ratio {
			Some(ratio) => (ratio, RatioOrigin::Explicit),
			None => (self.default_ratio, RatioOrigin::Inherited),
		};
		self.reverse.insert(mirror.clone(), source.clone());
		self.entries.insert(
			source.clone(),
			WorldPairEntry {
				source,
				mirror,
				ratio,
				origin,
			},
		);
		Ok(())
	}

	/// Copy of this snapshot with an explicit ratio on `source`'s pair.
	///
	/// Returns `None` when `source` is not linked.
	pub(crate) fn with_ratio(&self, source: &str, ratio: f64) -> Option<Self> {
		debug_assert!(is_valid_ratio(ratio));
		let mut next = self.clone();
		let entry = next.entries.get_mut(source)?;
		entry.ratio = ratio;
		entry.origin = RatioOrigin::Explicit;
		Some(next)
	}

	/// Copy of this snapshot with a new default; inherited pair ratios follow it.
	pub(crate) fn with_default_ratio(&self, ratio: f64) -> Self {
		debug_assert!(is_valid_ratio(ratio));
		let mut next = self.clone();
		next.default_ratio = ratio;
		for entry in next.entries.values_mut() {
			if entry.origin == RatioOrigin::Inherited {
				entry.ratio = ratio;
			}
		}
		next
	}

	#[inline]
	pub fn linked_mirror(&self, source: &str) -> Option<&Arc<str>> {
		self.entries.get(source).map(|entry| &entry.mirror)
	}

	#[inline]
	pub fn linked_source(&self, mirror: &str) -> Option<&Arc<str>> {
		self.reverse.get(mirror)
	}

	/// The pair's ratio, or the default when `source` is not linked.
	#[inline]
	pub fn ratio_for(&self, source: &str) -> f64 {
		self.entries
			.get(source)
			.map_or(self.default_ratio, |entry| entry.ratio)
	}

	/// Resolves `mirror` to its source and returns that pair's ratio, or the default.
	#[inline]
	pub fn ratio_for_mirror(&self, mirror: &str) -> f64 {
		match self.reverse.get(mirror) {
			Some(source) => self.ratio_for(source),
			None => self.default_ratio,
		}
	}

	#[inline]
	pub fn default_ratio(&self) -> f64 {
		self.default_ratio
	}

	pub fn entry(&self, source: &str) -> Option<&WorldPairEntry> {
		self.entries.get(source)
	}

	pub fn contains_source(&self, source: &str) -> bool {
		self.entries.contains_key(source)
	}

	/// Entries in source-name order.
	pub fn entries(&self) -> Vec<&WorldPairEntry> {
		let mut entries: Vec<_> = self.entries.values().collect();
		entries.sort_by(|a, b| a.source.cmp(&b.source));
		entries
	}

	pub fn source_names(&self) -> BTreeSet<Arc<str>> {
		self.entries.keys().cloned().collect()
	}

	pub fn mirror_names(&self) -> BTreeSet<Arc<str>> {
		self.reverse.keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Asserts the forward/reverse consistency and ratio validity invariants.
	#[cfg(test)]
	pub(crate) fn assert_invariants(&self) {
		assert!(is_valid_ratio(self.default_ratio));
		assert_eq!(self.entries.len(), self.reverse.len());
		for (source, entry) in &self.entries {
			assert_eq!(source, &entry.source);
			assert!(is_valid_ratio(entry.ratio));
			assert_eq!(self.reverse.get(&entry.mirror), Some(source));
			assert!(!self.entries.contains_key(&entry.mirror));
		}
		for (mirror, source) in &self.reverse {
			assert_eq!(self.entries.get(source).map(|e| &e.mirror), Some(mirror));
		}
	}
}
