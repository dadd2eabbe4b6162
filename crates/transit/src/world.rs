use std::sync::Arc;

use netherlink_registry::RegistrySnapshot;
use rustc_hash::FxHashMap as HashMap;

/// How a world takes part in the source/mirror scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldKind {
	/// Overworld-like; transitions go to the linked mirror.
	Primary,
	/// Nether-like; transitions go back to the linked source.
	Mirror,
	/// Anything else (e.g. an end-like world). Never transformed.
	Other,
}

impl WorldKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Primary => "primary",
			Self::Mirror => "mirror",
			Self::Other => "other",
		}
	}
}

impl std::fmt::Display for WorldKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A world as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorldRef {
	pub name: Arc<str>,
	pub kind: WorldKind,
}

impl WorldRef {
	pub fn new(name: impl Into<Arc<str>>, kind: WorldKind) -> Self {
		Self {
			name: name.into(),
			kind,
		}
	}
}

/// Coordinates plus orientation inside a world.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
	pub x: f64,
	pub y: f64,
	pub z: f64,
	pub yaw: f32,
	pub pitch: f32,
}

impl Position {
	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self {
			x,
			y,
			z,
			yaw: 0.0,
			pitch: 0.0,
		}
	}

	pub const fn with_orientation(self, yaw: f32, pitch: f32) -> Self {
		Self { yaw, pitch, ..self }
	}
}

/// A position together with the world it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
	pub world: WorldRef,
	pub position: Position,
}

impl Location {
	pub fn new(world: WorldRef, position: Position) -> Self {
		Self { world, position }
	}
}

/// Where a transition should land instead of the host's default placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
	pub world: WorldRef,
	pub position: Position,
}

/// Host-side world lookup.
///
/// A world that is configured but not currently available (not loaded, not
/// created yet) resolves to `None`.
pub trait WorldDirectory {
	fn world(&self, name: &str) -> Option<WorldRef>;
}

impl<D: WorldDirectory + ?Sized> WorldDirectory for &D {
	fn world(&self, name: &str) -> Option<WorldRef> {
		(**self).world(name)
	}
}

/// A fixed table of worlds.
#[derive(Debug, Clone, Default)]
pub struct KnownWorlds {
	worlds: HashMap<Arc<str>, WorldKind>,
}

impl KnownWorlds {
	pub fn new() -> Self {
		Self::default()
	}

	/// Every configured source as [`WorldKind::Primary`] and every mirror as
	/// [`WorldKind::Mirror`].
	pub fn from_snapshot(snapshot: &RegistrySnapshot) -> Self {
		let mut worlds = Self::new();
		for entry in snapshot.entries() {
			worlds.insert(entry.source.clone(), WorldKind::Primary);
			worlds.insert(entry.mirror.clone(), WorldKind::Mirror);
		}
		worlds
	}

	pub fn insert(&mut self, name: impl Into<Arc<str>>, kind: WorldKind) {
		self.worlds.insert(name.into(), kind);
	}

	pub fn with(mut self, name: impl Into<Arc<str>>, kind: WorldKind) -> Self {
		self.insert(name, kind);
		self
	}

	pub fn remove(&mut self, name: &str) -> Option<WorldKind> {
		self.worlds.remove(name)
	}

	pub fn len(&self) -> usize {
		self.worlds.len()
	}

	pub fn is_empty(&self) -> bool {
		self.worlds.is_empty()
	}
}

impl WorldDirectory for KnownWorlds {
	fn world(&self, name: &str) -> Option<WorldRef> {
		self.worlds
			.get_key_value(name)
			.map(|(name, &kind)| WorldRef {
				name: name.clone(),
				kind,
			})
	}
}
