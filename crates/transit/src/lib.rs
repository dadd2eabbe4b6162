//! Coordinate transform between linked worlds.
//!
//! Given where a traveller leaves from, [`Transit`] picks the linked world
//! from the [`RatioRegistry`](netherlink_registry::RatioRegistry) and scales
//! the horizontal coordinates by the pair's ratio: divided on the way to the
//! mirror, multiplied on the way back. Height and orientation are kept.

mod event;
mod transform;
mod world;

pub use event::{Decision, TransitionCause, TransitionEvent, Traveller};
pub use transform::{Direction, NoMapping, Projection, Transit};
pub use world::{Destination, KnownWorlds, Location, Position, WorldDirectory, WorldKind, WorldRef};
