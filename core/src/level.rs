use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Difficulty preset, selecting how many bombs a board holds and how fast the multiplier grows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub const fn bombs_count(self) -> CellCount {
        match self {
            Self::Easy => 3,
            Self::Medium => 5,
            Self::Hard => 8,
        }
    }

    pub const fn safe_cells(self) -> CellCount {
        TOTAL_CELLS - self.bombs_count()
    }

    pub const fn base_multiplier(self) -> Multiplier {
        Multiplier::from_hundredths(match self {
            Self::Easy => 120,
            Self::Medium => 150,
            Self::Hard => 200,
        })
    }

    /// Multiplier after `revealed` safe cells have been opened on a board of this level.
    pub const fn multiplier_after(self, revealed: CellCount) -> Multiplier {
        Multiplier::for_progress(self.base_multiplier(), revealed, self.safe_cells())
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = ParseError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(ParseError::UnknownLevel)
    }
}
