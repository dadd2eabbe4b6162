use std::collections::BTreeSet;
use std::io;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::info;

use crate::document::{LoadReport, Settings};
use crate::entry::validate_ratio;
use crate::error::{DocumentError, PersistError, RegistryError, Result};
use crate::snapshot::RegistrySnapshot;
use crate::store::{MemoryStore, SettingsStore};

/// Source/mirror world pairs and their coordinate ratios.
///
/// Reads go through an [`ArcSwap`] and never block. Mutations and reloads are
/// serialised on the writer lock, build a complete replacement snapshot,
/// persist it where required, and only then publish it.
pub struct RatioRegistry {
	snap: ArcSwap<RegistrySnapshot>,
	writer: Mutex<Writer>,
}

struct Writer {
	store: Box<dyn SettingsStore>,
	/// Last document that was read or written; edits start from it.
	settings: Settings,
}

impl Writer {
	fn read(&self) -> Result<Settings> {
		let text = self.store.read().map_err(|source| DocumentError::Read {
			location: self.store.location(),
			source,
		})?;
		Ok(Settings::parse(&text)?)
	}

	fn persist(&mut self, settings: Settings) -> std::result::Result<(), PersistError> {
		let text = settings.render()?;
		self.store.write(&text).map_err(|source| PersistError::Write {
			location: self.store.location(),
			source,
		})?;
		self.settings = settings;
		Ok(())
	}
}

impl RatioRegistry {
	/// Loads the registry from `store`.
	///
	/// A store with no document is seeded with the defaults first.
	pub fn open(store: impl SettingsStore + 'static) -> Result<(Self, LoadReport)> {
		let mut writer = Writer {
			store: Box::new(store),
			settings: Settings::default(),
		};

		let settings = match writer.store.read() {
			Ok(text) => Settings::parse(&text)?,
			Err(err) if err.kind() == io::ErrorKind::NotFound => {
				writer.persist(Settings::with_defaults())?;
				info!(location = %writer.store.location(), "wrote default settings");
				writer.settings.clone()
			}
			Err(source) => {
				return Err(DocumentError::Read {
					location: writer.store.location(),
					source,
				}
				.into());
			}
		};

		let (snapshot, report) = settings.decode()?;
		writer.settings = settings;
		info!(
			pairs = report.loaded,
			skipped = report.skipped(),
			default_ratio = snapshot.default_ratio(),
			"ratio registry loaded"
		);

		let registry = Self {
			snap: ArcSwap::from_pointee(snapshot),
			writer: Mutex::new(writer),
		};
		Ok((registry, report))
	}

	/// Loads the registry from an in-memory document.
	pub fn from_document(text: &str) -> Result<(Self, LoadReport)> {
		Self::open(MemoryStore::new(text))
	}

	/// A consistent view for callers that need several lookups to agree.
	#[inline]
	pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
		self.snap.load_full()
	}

	pub fn linked_mirror(&self, source: &str) -> Option<Arc<str>> {
		self.snap.load().linked_mirror(source).cloned()
	}

	pub fn linked_source(&self, mirror: &str) -> Option<Arc<str>> {
		self.snap.load().linked_source(mirror).cloned()
	}

	pub fn ratio_for(&self, source: &str) -> f64 {
		self.snap.load().ratio_for(source)
	}

	pub fn ratio_for_mirror(&self, mirror: &str) -> f64 {
		self.snap.load().ratio_for_mirror(mirror)
	}

	pub fn default_ratio(&self) -> f64 {
		self.snap.load().default_ratio()
	}

	pub fn contains_source(&self, source: &str) -> bool {
		self.snap.load().contains_source(source)
	}

	pub fn all_source_names(&self) -> BTreeSet<Arc<str>> {
		self.snap.load().source_names()
	}

	/// Pins `source`'s pair to `ratio` and persists it.
	pub fn set_ratio_for_world(&self, source: &str, ratio: f64) -> Result<()> {
		let ratio = validate_ratio(ratio)?;
		let mut writer = self.writer.lock();

		let next = self
			.snap
			.load()
			.with_ratio(source, ratio)
			.ok_or_else(|| RegistryError::UnknownWorld(source.to_string()))?;
		let Some(entry) = next.entry(source) else {
			return Err(RegistryError::UnknownWorld(source.to_string()));
		};

		let mut settings = writer.settings.clone();
		settings.set_pair(entry);
		writer.persist(settings)?;
		self.snap.store(Arc::new(next));

		info!(world = source, ratio, "world ratio updated");
		Ok(())
	}

	/// Replaces the default ratio and persists it.
	///
	/// Pairs without their own ratio follow the new default.
	pub fn set_default_ratio(&self, ratio: f64) -> Result<()> {
		let ratio = validate_ratio(ratio)?;
		let mut writer = self.writer.lock();

		let next = self.snap.load().with_default_ratio(ratio);

		let mut settings = writer.settings.clone();
		settings.set_default_ratio(ratio);
		writer.persist(settings)?;
		self.snap.store(Arc::new(next));

		info!(ratio, "default ratio updated");
		Ok(())
	}

	/// Re-reads the backing document and swaps in a fresh snapshot.
	///
	/// On failure the current snapshot stays published.
	pub fn reload(&self) -> Result<LoadReport> {
		let mut writer = self.writer.lock();

		let settings = writer.read()?;
		let (snapshot, report) = settings.decode()?;
		writer.settings = settings;
		self.snap.store(Arc::new(snapshot));

		info!(pairs = report.loaded, skipped = report.skipped(), "ratio registry reloaded");
		Ok(report)
	}
}

impl std::fmt::Debug for RatioRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RatioRegistry")
			.field("snapshot", &*self.snap.load_full())
			.finish_non_exhaustive()
	}
}
