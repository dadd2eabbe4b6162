use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use netherlink_transit::WorldKind;

#[derive(Parser, Debug)]
#[command(name = "netherlink")]
#[command(about = "Inspect and edit world-pair coordinate ratios")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Settings document to operate on
	#[arg(long, short = 'c', global = true, value_name = "PATH", default_value = "netherlink.toml")]
	pub config: PathBuf,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Show the default ratio and every world pair
	List,
	/// Set the default ratio, or one world's ratio
	Set {
		/// New ratio (greater than 0, at most 1000)
		#[arg(allow_hyphen_values = true)]
		ratio: String,
		/// Source world whose pair should use the ratio
		world: Option<String>,
	},
	/// Preview where horizontal coordinates map to in the linked world
	Calc {
		/// World the coordinates are in
		world: String,
		#[arg(allow_negative_numbers = true)]
		x: f64,
		#[arg(allow_negative_numbers = true)]
		z: f64,
		/// Treat the world as this kind instead of deriving it from the pairs
		#[arg(long, value_enum)]
		kind: Option<KindArg>,
	},
	/// Simulate a player walking through a mirror gateway
	Travel {
		/// World the player leaves from
		world: String,
		#[arg(allow_negative_numbers = true)]
		x: f64,
		#[arg(allow_negative_numbers = true)]
		y: f64,
		#[arg(allow_negative_numbers = true)]
		z: f64,
		#[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
		yaw: f32,
		#[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
		pitch: f32,
		/// Treat the world as this kind instead of deriving it from the pairs
		#[arg(long, value_enum)]
		kind: Option<KindArg>,
	},
	/// Load the settings and report skipped entries
	Check,
}

impl Command {
	/// The world named on the command line and the kind forced for it, if any.
	pub fn kind_override(&self) -> Option<(&str, WorldKind)> {
		match self {
			Command::Calc {
				world,
				kind: Some(kind),
				..
			}
			| Command::Travel {
				world,
				kind: Some(kind),
				..
			} => Some((world.as_str(), WorldKind::from(*kind))),
			_ => None,
		}
	}
}

/// World kind override.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
	Primary,
	Mirror,
	Other,
}

impl From<KindArg> for WorldKind {
	fn from(kind: KindArg) -> Self {
		match kind {
			KindArg::Primary => WorldKind::Primary,
			KindArg::Mirror => WorldKind::Mirror,
			KindArg::Other => WorldKind::Other,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_set_with_world() {
		let cli = Cli::try_parse_from(["netherlink", "set", "4", "survival"]).expect("valid args");
		assert!(matches!(
			cli.command,
			Command::Set { ref ratio, world: Some(ref world) } if ratio == "4" && world == "survival"
		));
		assert_eq!(cli.config, PathBuf::from("netherlink.toml"));
	}

	#[test]
	fn negative_ratio_reaches_validation() {
		let cli = Cli::try_parse_from(["netherlink", "set", "-5"]).expect("valid args");
		assert!(matches!(cli.command, Command::Set { ref ratio, world: None } if ratio == "-5"));
	}

	#[test]
	fn parses_calc_with_negative_coordinates_and_kind() {
		let cli = Cli::try_parse_from([
			"netherlink",
			"--config",
			"/tmp/settings.toml",
			"calc",
			"world_nether",
			"-100",
			"50.5",
			"--kind",
			"mirror",
		])
		.expect("valid args");

		assert_eq!(cli.config, PathBuf::from("/tmp/settings.toml"));
		match cli.command {
			Command::Calc { world, x, z, kind } => {
				assert_eq!(world, "world_nether");
				assert_eq!((x, z), (-100.0, 50.5));
				assert_eq!(kind.map(WorldKind::from), Some(WorldKind::Mirror));
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn kind_override_only_when_requested() {
		let cli = Cli::try_parse_from(["netherlink", "travel", "lobby", "1", "64", "-2", "--kind", "primary"])
			.expect("valid args");
		assert_eq!(cli.command.kind_override(), Some(("lobby", WorldKind::Primary)));

		let cli = Cli::try_parse_from(["netherlink", "calc", "lobby", "1", "2"]).expect("valid args");
		assert_eq!(cli.command.kind_override(), None);
	}

	#[test]
	fn rejects_unknown_kind() {
		assert!(Cli::try_parse_from(["netherlink", "calc", "world", "1", "2", "--kind", "end"]).is_err());
	}
}
