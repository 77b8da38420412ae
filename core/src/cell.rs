use serde::{Deserialize, Serialize};

use crate::*;

/// One board position. Whether it holds a bomb is fixed when the board is generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_bomb: bool,
    pub is_revealed: bool,
}

impl Cell {
    pub const fn safe() -> Self {
        Self {
            is_bomb: false,
            is_revealed: false,
        }
    }

    pub const fn bomb() -> Self {
        Self {
            is_bomb: true,
            is_revealed: false,
        }
    }
}

/// What a renderer needs to draw a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub x: Coord,
    pub y: Coord,
    pub index: CellIndex,
    pub is_bomb: bool,
    pub is_revealed: bool,
}

impl CellView {
    /// Whether the cell content should be drawn, honoring the board-wide reveal-all override.
    pub const fn is_shown(self, reveal_all: bool) -> bool {
        reveal_all || self.is_revealed
    }
}
