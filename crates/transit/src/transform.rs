use std::sync::Arc;

use netherlink_registry::RatioRegistry;
use thiserror::Error;
use tracing::warn;

use crate::world::{Destination, Location, Position, WorldDirectory, WorldKind, WorldRef};

/// No transform applies; the host should place the traveller as it normally would.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoMapping {
	#[error("world '{world}' is not part of any world pair")]
	UnsupportedKind { world: Arc<str> },
	#[error("no {} world is linked to '{world}'", counterpart(.kind))]
	Unlinked { world: Arc<str>, kind: WorldKind },
	#[error("world '{target}' linked to '{world}' is not available")]
	WorldUnavailable { world: Arc<str>, target: Arc<str> },
}

fn counterpart(kind: &WorldKind) -> &'static str {
	match kind {
		WorldKind::Mirror => "source",
		_ => "mirror",
	}
}

/// Which way coordinates are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	/// Source to mirror: horizontal coordinates are divided by the ratio.
	ToMirror,
	/// Mirror to source: horizontal coordinates are multiplied by the ratio.
	ToSource,
}

impl Direction {
	#[inline]
	pub fn scale(self, coordinate: f64, ratio: f64) -> f64 {
		match self {
			Self::ToMirror => coordinate / ratio,
			Self::ToSource => coordinate * ratio,
		}
	}
}

/// Horizontal preview of a transform, without orientation or height.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
	pub from: WorldRef,
	pub from_x: f64,
	pub from_z: f64,
	pub to: WorldRef,
	pub ratio: f64,
	pub direction: Direction,
	pub x: f64,
	pub z: f64,
}

struct Plan {
	target: WorldRef,
	ratio: f64,
	direction: Direction,
}

/// Computes transition destinations from the registry's pairs and ratios.
#[derive(Debug)]
pub struct Transit<D> {
	registry: Arc<RatioRegistry>,
	worlds: D,
}

impl<D: WorldDirectory> Transit<D> {
	pub fn new(registry: Arc<RatioRegistry>, worlds: D) -> Self {
		Self { registry, worlds }
	}

	pub fn registry(&self) -> &Arc<RatioRegistry> {
		&self.registry
	}

	pub fn worlds(&self) -> &D {
		&self.worlds
	}

	/// Where a traveller leaving `from` should arrive.
	///
	/// `y`, yaw, and pitch pass through unchanged.
	pub fn compute_destination(&self, from: &Location) -> Result<Destination, NoMapping> {
		let plan = self.plan(&from.world)?;
		let Position { x, y, z, yaw, pitch } = from.position;
		Ok(Destination {
			world: plan.target,
			position: Position {
				x: plan.direction.scale(x, plan.ratio),
				y,
				z: plan.direction.scale(z, plan.ratio),
				yaw,
				pitch,
			},
		})
	}

	/// Horizontal coordinates `(x, z)` in `world` mapped onto its counterpart.
	pub fn project(&self, world: &WorldRef, x: f64, z: f64) -> Result<Projection, NoMapping> {
		let plan = self.plan(world)?;
		Ok(Projection {
			from: world.clone(),
			from_x: x,
			from_z: z,
			x: plan.direction.scale(x, plan.ratio),
			z: plan.direction.scale(z, plan.ratio),
			to: plan.target,
			ratio: plan.ratio,
			direction: plan.direction,
		})
	}

	/// Resolves target world and ratio from a single snapshot so both come
	/// from the same configuration generation.
	fn plan(&self, world: &WorldRef) -> Result<Plan, NoMapping> {
		let snap = self.registry.snapshot();
		let (target, ratio, direction) = match world.kind {
			WorldKind::Primary => (
				snap.linked_mirror(&world.name),
				snap.ratio_for(&world.name),
				Direction::ToMirror,
			),
			WorldKind::Mirror => (
				snap.linked_source(&world.name),
				snap.ratio_for_mirror(&world.name),
				Direction::ToSource,
			),
			WorldKind::Other => {
				return Err(NoMapping::UnsupportedKind {
					world: world.name.clone(),
				});
			}
		};

		let Some(target) = target else {
			return Err(NoMapping::Unlinked {
				world: world.name.clone(),
				kind: world.kind,
			});
		};
		let Some(resolved) = self.worlds.world(target) else {
			warn!(world = %world.name, target = %target, "linked world is not available");
			return Err(NoMapping::WorldUnavailable {
				world: world.name.clone(),
				target: target.clone(),
			});
		};

		Ok(Plan {
			target: resolved,
			ratio,
			direction,
		})
	}
}

#[cfg(test)]
mod tests;
