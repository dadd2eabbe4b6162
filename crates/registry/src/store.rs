//! Backing storage for the settings document.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// Where the settings document lives.
///
/// Reads and writes are short, synchronous, and fail fast; the registry never
/// retries them.
pub trait SettingsStore: Send {
	/// Reads the whole document. A missing document is [`io::ErrorKind::NotFound`].
	fn read(&self) -> io::Result<String>;

	/// Replaces the whole document.
	fn write(&mut self, contents: &str) -> io::Result<()>;

	/// Human-readable location for diagnostics.
	fn location(&self) -> String;
}

/// A settings file on disk.
///
/// Writes go to a temporary file next to the target which is then renamed over
/// it, so a crash mid-write leaves either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileStore {
	path: PathBuf,
}

impl FileStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl SettingsStore for FileStore {
	fn read(&self) -> io::Result<String> {
		std::fs::read_to_string(&self.path)
	}

	fn write(&mut self, contents: &str) -> io::Result<()> {
		let dir = match self.path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		std::fs::create_dir_all(dir)?;

		let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
		tmp.write_all(contents.as_bytes())?;
		// The temp file starts out owner-only; keep the mode operators gave the target.
		if let Ok(meta) = std::fs::metadata(&self.path) {
			tmp.as_file().set_permissions(meta.permissions())?;
		}
		tmp.as_file().sync_all()?;
		tmp.persist(&self.path).map_err(|err| err.error)?;
		Ok(())
	}

	fn location(&self) -> String {
		self.path.display().to_string()
	}
}

/// An in-memory document, shared between clones.
///
/// Useful for embedding and tests: one clone goes into the registry while
/// another edits or inspects the contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	contents: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
	pub fn new(contents: impl Into<String>) -> Self {
		Self {
			contents: Arc::new(Mutex::new(Some(contents.into()))),
		}
	}

	/// A store with no document yet.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn contents(&self) -> Option<String> {
		self.contents.lock().clone()
	}

	pub fn replace(&self, contents: impl Into<String>) {
		*self.contents.lock() = Some(contents.into());
	}
}

impl SettingsStore for MemoryStore {
	fn read(&self) -> io::Result<String> {
		self.contents
			.lock()
			.clone()
			.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no settings document"))
	}

	fn write(&mut self, contents: &str) -> io::Result<()> {
		*self.contents.lock() = Some(contents.to_string());
		Ok(())
	}

	fn location(&self) -> String {
		"<memory>".to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn file_store_round_trips_and_replaces() {
		let dir = tempfile::tempdir().expect("create tempdir");
		let path = dir.path().join("nested").join("netherlink.toml");
		let mut store = FileStore::new(&path);

		assert_eq!(store.read().expect_err("missing file").kind(), io::ErrorKind::NotFound);

		store.write("default-ratio = 8.0\n").expect("first write");
		store.write("default-ratio = 4.0\n").expect("second write");
		assert_eq!(store.read().expect("read back"), "default-ratio = 4.0\n");

		let leftovers = std::fs::read_dir(path.parent().expect("has parent"))
			.expect("list dir")
			.count();
		assert_eq!(leftovers, 1, "temporary files should be renamed away");
	}

	#[cfg(unix)]
	#[test]
	fn file_store_keeps_existing_permissions() {
		use std::os::unix::fs::PermissionsExt;

		let dir = tempfile::tempdir().expect("create tempdir");
		let path = dir.path().join("netherlink.toml");
		std::fs::write(&path, "default-ratio = 8.0\n").expect("write settings");
		std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).expect("chmod settings");

		let mut store = FileStore::new(&path);
		store.write("default-ratio = 4.0\n").expect("replace settings");

		let mode = std::fs::metadata(&path).expect("stat settings").permissions().mode() & 0o777;
		assert_eq!(mode, 0o644);
		assert_eq!(store.read().expect("read back"), "default-ratio = 4.0\n");
	}

	#[test]
	fn memory_store_clones_share_contents() {
		let store = MemoryStore::empty();
		let mut handle = store.clone();

		assert!(store.read().is_err());
		handle.write("value = 2").expect("memory writes succeed");
		assert_eq!(store.contents().as_deref(), Some("value = 2"));
	}
}
