use serde::{Deserialize, Serialize};

use crate::parser::{Observation, Terrain};

/// Discrete action returned to the remote controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Hover,
    Land,
    MoveNext,
}

impl Command {
    /// Returned whenever no decision could be made at all.
    pub const SAFE_DEFAULT: Command = Command::Hover;

    /// The wire string the controller matches on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Hover => "HOVER",
            Command::Land => "LAND",
            Command::MoveNext => "MOVE_NEXT",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Landing decision. Only a confident "grass" answer lands; anything else moves on.
pub fn terrain_command(terrain: Terrain) -> Command {
    match terrain {
        Terrain::Safe => Command::Land,
        Terrain::Unsafe => Command::MoveNext,
        Terrain::Unknown => Command::MoveNext,
    }
}

/// Display label for the probe harness report.
pub fn observation_label(observation: Observation) -> &'static str {
    match observation {
        Observation::Detected => "DETECTED",
        Observation::NotDetected => "NONE",
        Observation::Flat => "SAFE (FLAT)",
        Observation::Rocky => "DANGER (ROCKY)",
        Observation::Unknown => "UNKNOWN",
    }
}
