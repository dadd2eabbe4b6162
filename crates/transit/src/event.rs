//! Host transition events.

use tracing::debug;

use crate::transform::Transit;
use crate::world::{Destination, Location, WorldDirectory};

/// What is moving between worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traveller {
	Player,
	/// Mobs, items, vehicles. The host reports no cause for these.
	Entity,
}

/// Why a player is changing worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
	/// A gateway between a source world and its mirror (a nether portal).
	MirrorGateway,
	/// A gateway into an end-like world.
	EndGateway,
	/// Commands, plugins, respawns.
	Other,
}

/// A transition the host is about to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEvent {
	pub traveller: Traveller,
	pub cause: TransitionCause,
	pub from: Location,
}

impl TransitionEvent {
	pub fn player(cause: TransitionCause, from: Location) -> Self {
		Self {
			traveller: Traveller::Player,
			cause,
			from,
		}
	}

	pub fn entity(from: Location) -> Self {
		Self {
			traveller: Traveller::Entity,
			cause: TransitionCause::MirrorGateway,
			from,
		}
	}
}

/// The answer handed back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
	/// Place the traveller here instead.
	Redirect(Destination),
	/// No opinion; the host keeps its own placement.
	Defer,
}

impl<D: WorldDirectory> Transit<D> {
	/// Decides where a transition should land.
	///
	/// Player transitions are only handled for [`TransitionCause::MirrorGateway`].
	pub fn handle_transition(&self, event: &TransitionEvent) -> Decision {
		if event.traveller == Traveller::Player && event.cause != TransitionCause::MirrorGateway {
			return Decision::Defer;
		}

		match self.compute_destination(&event.from) {
			Ok(destination) => Decision::Redirect(destination),
			Err(reason) => {
				debug!(
					world = %event.from.world.name,
					traveller = ?event.traveller,
					%reason,
					"deferring transition to host placement"
				);
				Decision::Defer
			}
		}
	}
}
