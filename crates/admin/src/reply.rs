use std::fmt;

use netherlink_registry::{LoadReport, WorldPairEntry};
use netherlink_transit::Projection;

/// Successful outcome of an administrative command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
	Listing(Listing),
	DefaultRatioUpdated { ratio: f64 },
	WorldRatioUpdated { world: String, ratio: f64 },
	Reloaded(LoadReport),
	Projection(Projection),
}

/// The default ratio and every configured pair, sorted by source.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
	pub default_ratio: f64,
	pub pairs: Vec<WorldPairEntry>,
}

impl fmt::Display for Reply {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Reply::Listing(listing) => write!(f, "{listing}"),
			Reply::DefaultRatioUpdated { ratio } => write!(f, "Default ratio set to {ratio}"),
			Reply::WorldRatioUpdated { world, ratio } => write!(f, "Ratio for '{world}' set to {ratio}"),
			Reply::Reloaded(report) => {
				write!(
					f,
					"Settings reloaded: {} world pair(s), {} skipped",
					report.loaded,
					report.skipped()
				)?;
				for diagnostic in &report.diagnostics {
					write!(f, "\n  {diagnostic}")?;
				}
				Ok(())
			}
			Reply::Projection(p) => write!(
				f,
				"{} ({:.1}, {:.1}) -> {} ({:.1}, {:.1}) at ratio {}",
				p.from.name,
				p.from_x,
				p.from_z,
				p.to.name,
				p.x,
				p.z,
				p.ratio
			),
		}
	}
}

impl fmt::Display for Listing {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Default ratio: {}", self.default_ratio)?;
		if self.pairs.is_empty() {
			return Ok(());
		}
		write!(f, "\nWorld ratios:")?;
		for pair in &self.pairs {
			write!(f, "\n  {} -> {}: {}", pair.source, pair.mirror, pair.ratio)?;
			if !pair.is_explicit() {
				f.write_str(" (default)")?;
			}
		}
		Ok(())
	}
}
