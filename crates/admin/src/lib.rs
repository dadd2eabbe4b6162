//! Administrative operations: list, set, reload, and calc.
//!
//! User-supplied ratio text is checked here before it reaches the registry, so
//! the registry only ever sees well-formed numbers and the operator gets a
//! specific message for each kind of mistake.

mod error;
mod reply;

use std::sync::Arc;

use netherlink_registry::{RatioRegistry, is_valid_ratio};
use netherlink_transit::{Transit, WorldDirectory, WorldKind};
use tracing::{info, warn};

pub use error::AdminError;
pub use reply::{Listing, Reply};

/// Largest ratio an operator may set.
pub const MAX_RATIO: f64 = 1000.0;

/// A request from the administrative surface.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
	/// Show the default ratio and every pair.
	List,
	/// Set the default ratio, or one pair's ratio when `world` is given.
	Set { ratio: String, world: Option<String> },
	/// Re-read the settings document.
	Reload,
	/// Preview where `(x, z)` in `world` maps to.
	Calc { world: String, x: f64, z: f64 },
}

/// Executes [`AdminCommand`]s against a registry.
#[derive(Debug)]
pub struct Admin<D> {
	transit: Transit<D>,
}

impl<D: WorldDirectory> Admin<D> {
	pub fn new(transit: Transit<D>) -> Self {
		Self { transit }
	}

	pub fn registry(&self) -> &Arc<RatioRegistry> {
		self.transit.registry()
	}

	pub fn transit(&self) -> &Transit<D> {
		&self.transit
	}

	pub fn execute(&self, command: AdminCommand) -> Result<Reply, AdminError> {
		match command {
			AdminCommand::List => Ok(self.list()),
			AdminCommand::Set { ratio, world } => self.set(&ratio, world.as_deref()),
			AdminCommand::Reload => self.reload(),
			AdminCommand::Calc { world, x, z } => self.calc(&world, x, z),
		}
	}

	pub fn list(&self) -> Reply {
		let snapshot = self.registry().snapshot();
		Reply::Listing(Listing {
			default_ratio: snapshot.default_ratio(),
			pairs: snapshot.entries().into_iter().cloned().collect(),
		})
	}

	pub fn set(&self, ratio: &str, world: Option<&str>) -> Result<Reply, AdminError> {
		let ratio = parse_ratio(ratio)?;
		let registry = self.registry();

		match world {
			None => {
				registry.set_default_ratio(ratio)?;
				Ok(Reply::DefaultRatioUpdated { ratio })
			}
			Some(world) => {
				if !registry.contains_source(world) {
					return Err(AdminError::NotConfigured(world.to_string()));
				}
				registry.set_ratio_for_world(world, ratio)?;
				Ok(Reply::WorldRatioUpdated {
					world: world.to_string(),
					ratio,
				})
			}
		}
	}

	pub fn reload(&self) -> Result<Reply, AdminError> {
		match self.registry().reload() {
			Ok(report) => {
				info!(pairs = report.loaded, skipped = report.skipped(), "settings reloaded by operator");
				Ok(Reply::Reloaded(report))
			}
			Err(err) => {
				warn!(error = %err, "reload failed, keeping previous settings");
				Err(err.into())
			}
		}
	}

	pub fn calc(&self, world: &str, x: f64, z: f64) -> Result<Reply, AdminError> {
		let world = self
			.transit
			.worlds()
			.world(world)
			.ok_or_else(|| AdminError::UnknownWorld(world.to_string()))?;
		if world.kind == WorldKind::Other {
			return Err(AdminError::WrongDimension(world.name.to_string()));
		}
		let projection = self.transit.project(&world, x, z)?;
		Ok(Reply::Projection(projection))
	}
}

/// Parses operator-supplied ratio text and checks it against the accepted range.
pub fn parse_ratio(text: &str) -> Result<f64, AdminError> {
	let ratio: f64 = text
		.trim()
		.parse()
		.map_err(|_| AdminError::InvalidNumber(text.to_string()))?;
	if !is_valid_ratio(ratio) {
		return Err(AdminError::InvalidRatio(ratio));
	}
	if ratio > MAX_RATIO {
		return Err(AdminError::RatioTooLarge {
			ratio,
			max: MAX_RATIO,
		});
	}
	Ok(ratio)
}
