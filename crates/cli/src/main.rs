//! `netherlink` operator command line.
//!
//! Opens the settings document, runs one administrative command against it,
//! and prints the reply. Logs go to stderr; `RUST_LOG` overrides the level.

mod cli;

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Command};
use netherlink_admin::{Admin, AdminCommand};
use netherlink_registry::{FileStore, LoadReport, RatioRegistry};
use netherlink_transit::{
	Decision, KnownWorlds, Location, Position, Transit, TransitionCause, TransitionEvent, WorldDirectory,
};
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let (registry, report) = RatioRegistry::open(FileStore::new(&cli.config))
		.with_context(|| format!("failed to load {}", cli.config.display()))?;
	info!(path = %cli.config.display(), pairs = report.loaded, "settings loaded");

	let mut worlds = KnownWorlds::from_snapshot(&registry.snapshot());
	if let Some((world, kind)) = cli.command.kind_override() {
		debug!(world, %kind, "world kind overridden");
		worlds.insert(world, kind);
	}
	let admin = Admin::new(Transit::new(Arc::new(registry), worlds));

	match cli.command {
		Command::List => println!("{}", admin.execute(AdminCommand::List)?),
		Command::Set { ratio, world } => {
			println!("{}", admin.execute(AdminCommand::Set { ratio, world })?);
		}
		Command::Calc { world, x, z, .. } => {
			println!("{}", admin.execute(AdminCommand::Calc { world, x, z })?);
		}
		Command::Travel {
			world,
			x,
			y,
			z,
			yaw,
			pitch,
			..
		} => travel(admin.transit(), &world, Position::new(x, y, z).with_orientation(yaw, pitch))?,
		Command::Check => print!("{}", check_summary(&report)),
	}

	Ok(())
}

fn travel(transit: &Transit<KnownWorlds>, world: &str, position: Position) -> anyhow::Result<()> {
	let Some(world) = transit.worlds().world(world) else {
		bail!("world '{world}' does not exist");
	};
	let event = TransitionEvent::player(TransitionCause::MirrorGateway, Location::new(world, position));

	match transit.handle_transition(&event) {
		Decision::Redirect(destination) => {
			let Position { x, y, z, yaw, pitch } = destination.position;
			println!(
				"{} -> {} ({x:.3}, {y:.3}, {z:.3}) yaw {yaw:.1} pitch {pitch:.1}",
				event.from.world.name, destination.world.name
			);
		}
		Decision::Defer => {
			println!("no mapping for '{}', host placement applies", event.from.world.name);
		}
	}
	Ok(())
}

/// Diagnostics for a document that loaded.
///
/// Skipped entries are reported but do not fail the check; a document that
/// cannot load at all has already failed in `main`.
fn check_summary(report: &LoadReport) -> String {
	let mut out = String::new();
	for diagnostic in &report.diagnostics {
		out.push_str(&format!("{diagnostic}\n"));
	}
	if report.used_fallback {
		out.push_str("no pairs configured, using the built-in pair\n");
	}
	out.push_str(&format!("{} world pair(s) loaded, {} skipped\n", report.loaded, report.skipped()));
	out
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("netherlink=debug,netherlink_registry=debug,netherlink_transit=debug,netherlink_admin=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
