use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::event::{Decision, TransitionCause, TransitionEvent};
use crate::world::KnownWorlds;

const SETTINGS: &str = r#"
default-ratio = 8

[pairs]
world = "world_nether"
survival = { mirror = "survival_nether", ratio = 4.0 }
"#;

fn transit(text: &str) -> Transit<KnownWorlds> {
	let (registry, _) = RatioRegistry::from_document(text).expect("document should load");
	let worlds = KnownWorlds::from_snapshot(&registry.snapshot())
		.with("world_the_end", WorldKind::Other)
		.with("survival2", WorldKind::Primary);
	Transit::new(Arc::new(registry), worlds)
}

fn at(name: &str, kind: WorldKind, x: f64, y: f64, z: f64) -> Location {
	Location::new(WorldRef::new(name, kind), Position::new(x, y, z))
}

#[test]
fn source_to_mirror_divides_by_ratio() {
	let transit = transit(SETTINGS);
	let from = at("world", WorldKind::Primary, 800.0, 64.0, -400.0);

	let destination = transit.compute_destination(&from).expect("world is linked");

	assert_eq!(destination.world, WorldRef::new("world_nether", WorldKind::Mirror));
	assert_eq!(destination.position, Position::new(100.0, 64.0, -50.0));
}

#[test]
fn mirror_to_source_multiplies_by_ratio() {
	let transit = transit(SETTINGS);
	let from = at("world_nether", WorldKind::Mirror, 100.0, 64.0, -50.0);

	let destination = transit.compute_destination(&from).expect("world_nether is linked");

	assert_eq!(destination.world, WorldRef::new("world", WorldKind::Primary));
	assert_eq!(destination.position, Position::new(800.0, 64.0, -400.0));
}

#[test]
fn smallest_ratio_keeps_far_coordinates_finite() {
	let transit = transit(SETTINGS);
	transit
		.registry()
		.set_ratio_for_world("world", netherlink_registry::MIN_RATIO)
		.expect("smallest ratio is accepted");
	assert!(transit.registry().set_ratio_for_world("world", 1e-310).is_err());

	let destination = transit
		.compute_destination(&at("world", WorldKind::Primary, 1e10, 64.0, -1e10))
		.expect("world is linked");
	assert!(destination.position.x.is_finite() && destination.position.z.is_finite());
}

#[test]
fn pair_ratio_applies_in_both_directions() {
	let transit = transit(SETTINGS);

	let there = transit
		.compute_destination(&at("survival", WorldKind::Primary, 40.0, 70.0, 8.0))
		.expect("survival is linked");
	assert_eq!(there.position, Position::new(10.0, 70.0, 2.0));

	let back = transit
		.compute_destination(&at("survival_nether", WorldKind::Mirror, 10.0, 70.0, 2.0))
		.expect("survival_nether is linked");
	assert_eq!(back.position, Position::new(40.0, 70.0, 8.0));
}

#[test]
fn height_and_orientation_pass_through() {
	let transit = transit(SETTINGS);
	let mut from = at("world", WorldKind::Primary, 16.0, -12.5, 16.0);
	from.position = from.position.with_orientation(123.5, -30.0);

	let destination = transit.compute_destination(&from).expect("world is linked");

	assert_eq!(destination.position.y, -12.5);
	assert_eq!(destination.position.yaw, 123.5);
	assert_eq!(destination.position.pitch, -30.0);
}

#[test]
fn unlinked_source_has_no_mapping() {
	let transit = transit(SETTINGS);

	let err = transit
		.compute_destination(&at("survival2", WorldKind::Primary, 1.0, 2.0, 3.0))
		.expect_err("survival2 is not linked");
	assert_eq!(
		err,
		NoMapping::Unlinked {
			world: "survival2".into(),
			kind: WorldKind::Primary,
		}
	);
	assert_eq!(err.to_string(), "no mirror world is linked to 'survival2'");

	// A mirror-kind world the registry does not know is unlinked as well.
	let err = transit
		.compute_destination(&at("lost_nether", WorldKind::Mirror, 1.0, 2.0, 3.0))
		.expect_err("lost_nether is not linked");
	assert!(matches!(err, NoMapping::Unlinked { kind: WorldKind::Mirror, .. }));
}

#[test]
fn other_worlds_are_never_transformed() {
	let transit = transit(SETTINGS);

	let err = transit
		.compute_destination(&at("world_the_end", WorldKind::Other, 0.0, 0.0, 0.0))
		.expect_err("end worlds are not paired");
	assert!(matches!(err, NoMapping::UnsupportedKind { .. }));

	// Kind decides, even for a name that is configured as a source.
	let err = transit
		.compute_destination(&at("world", WorldKind::Other, 0.0, 0.0, 0.0))
		.expect_err("kind Other is never paired");
	assert!(matches!(err, NoMapping::UnsupportedKind { .. }));
}

#[test]
fn unavailable_target_world_has_no_mapping() {
	let (registry, _) = RatioRegistry::from_document(SETTINGS).expect("document should load");
	let mut worlds = KnownWorlds::from_snapshot(&registry.snapshot());
	worlds.remove("world_nether");
	let transit = Transit::new(Arc::new(registry), worlds);

	let err = transit
		.compute_destination(&at("world", WorldKind::Primary, 8.0, 0.0, 8.0))
		.expect_err("world_nether is not loaded");
	assert_eq!(
		err,
		NoMapping::WorldUnavailable {
			world: "world".into(),
			target: "world_nether".into(),
		}
	);
}

#[test]
fn registry_changes_are_seen_immediately() {
	let transit = transit(SETTINGS);
	let from = at("world", WorldKind::Primary, 800.0, 64.0, -400.0);

	transit.registry().set_ratio_for_world("world", 16.0).expect("world is linked");
	let destination = transit.compute_destination(&from).expect("world is linked");

	assert_eq!(destination.position, Position::new(50.0, 64.0, -25.0));
}

#[test]
fn projection_reports_ratio_and_direction() {
	let transit = transit(SETTINGS);

	let projection = transit
		.project(&WorldRef::new("survival_nether", WorldKind::Mirror), 5.0, -5.0)
		.expect("survival_nether is linked");

	assert_eq!(projection.to, WorldRef::new("survival", WorldKind::Primary));
	assert_eq!(projection.ratio, 4.0);
	assert_eq!(projection.direction, Direction::ToSource);
	assert_eq!((projection.x, projection.z), (20.0, -20.0));
}

#[test]
fn players_are_only_redirected_through_mirror_gateways() {
	let transit = transit(SETTINGS);
	let from = at("world", WorldKind::Primary, 800.0, 64.0, -400.0);

	let decision = transit.handle_transition(&TransitionEvent::player(TransitionCause::MirrorGateway, from.clone()));
	assert!(matches!(decision, Decision::Redirect(ref d) if d.position == Position::new(100.0, 64.0, -50.0)));

	for cause in [TransitionCause::EndGateway, TransitionCause::Other] {
		let decision = transit.handle_transition(&TransitionEvent::player(cause, from.clone()));
		assert_eq!(decision, Decision::Defer);
	}
}

#[test]
fn entities_are_redirected_and_unmapped_transitions_defer() {
	let transit = transit(SETTINGS);

	let decision = transit.handle_transition(&TransitionEvent::entity(at("world_nether", WorldKind::Mirror, 1.0, 2.0, 3.0)));
	assert!(matches!(decision, Decision::Redirect(ref d) if d.world.name.as_ref() == "world"));

	let decision = transit.handle_transition(&TransitionEvent::entity(at("survival2", WorldKind::Primary, 1.0, 2.0, 3.0)));
	assert_eq!(decision, Decision::Defer);
}

fn close(a: f64, b: f64) -> bool {
	(a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
	/// Source to mirror and back recovers the horizontal coordinates.
	#[test]
	fn prop_round_trip_recovers_position(
		ratio in 0.01f64..1000.0,
		x in -30_000_000.0f64..30_000_000.0,
		y in -64.0f64..320.0,
		z in -30_000_000.0f64..30_000_000.0,
	) {
		let transit = transit(&format!("default-ratio = {ratio:?}\n[pairs]\nworld = \"world_nether\"\n"));
		let from = at("world", WorldKind::Primary, x, y, z);

		let there = transit.compute_destination(&from).expect("world is linked");
		let back = transit
			.compute_destination(&Location::new(there.world.clone(), there.position))
			.expect("world_nether is linked");

		prop_assert_eq!(back.world.name.as_ref(), "world");
		prop_assert!(close(back.position.x, x), "x: {} vs {}", back.position.x, x);
		prop_assert!(close(back.position.z, z), "z: {} vs {}", back.position.z, z);
		prop_assert_eq!(back.position.y, y);
	}
}
