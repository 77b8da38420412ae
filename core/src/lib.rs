#![no_std]

extern crate alloc;

use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use config::*;
pub use controller::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use level::*;
pub use payout::*;
pub use types::*;

mod cell;
mod config;
mod controller;
mod engine;
mod error;
mod generator;
mod level;
mod payout;
mod types;

/// Bet denominations offered to the player. The engine itself accepts any positive amount.
pub const BET_PRESETS: [Money; 5] = [
    Money::from_units(20),
    Money::from_units(50),
    Money::from_units(100),
    Money::from_units(500),
    Money::from_units(1000),
];

/// The 5×5 grid of cells for one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardCells")]
pub struct Board {
    cells: Array2<Cell>,
    bomb_count: CellCount,
}

/// Unchecked serialized form of [`Board`].
#[derive(Deserialize)]
struct BoardCells {
    cells: Array2<Cell>,
    bomb_count: CellCount,
}

impl TryFrom<BoardCells> for Board {
    type Error = RoundError;

    fn try_from(raw: BoardCells) -> Result<Self> {
        let size = usize::from(GRID_SIZE);
        if raw.cells.dim() != (size, size) {
            return Err(RoundError::InvalidBoardShape);
        }
        let bombs = raw.cells.iter().filter(|cell| cell.is_bomb).count();
        if bombs != usize::from(raw.bomb_count) {
            return Err(RoundError::BombCountMismatch);
        }
        Ok(Self {
            cells: raw.cells,
            bomb_count: raw.bomb_count,
        })
    }
}

impl Board {
    /// A board without bombs.
    pub fn empty() -> Self {
        let size = usize::from(GRID_SIZE);
        Self {
            cells: Array2::default((size, size)),
            bomb_count: 0,
        }
    }

    /// Puts a bomb at `coords`, returning `false` when one was already there.
    pub(crate) fn place_bomb(&mut self, coords: Coord2) -> bool {
        let cell = &mut self[coords];
        if cell.is_bomb {
            return false;
        }
        cell.is_bomb = true;
        self.bomb_count += 1;
        true
    }

    pub fn from_bomb_mask(bomb_mask: &Array2<bool>) -> Result<Self> {
        let size = usize::from(GRID_SIZE);
        if bomb_mask.dim() != (size, size) {
            return Err(RoundError::InvalidBoardShape);
        }
        let cells = bomb_mask.map(|&is_bomb| Cell {
            is_bomb,
            is_revealed: false,
        });
        let bomb_count = bomb_mask
            .iter()
            .filter(|&&is_bomb| is_bomb)
            .count()
            .try_into()
            .map_err(|_| RoundError::InvalidBoardShape)?;
        Ok(Self { cells, bomb_count })
    }

    pub fn from_bomb_indices(bomb_indices: &[CellIndex]) -> Result<Self> {
        let size = usize::from(GRID_SIZE);
        let mut bomb_mask: Array2<bool> = Array2::default((size, size));

        for &index in bomb_indices {
            let coords = index_to_coords(index).ok_or(RoundError::InvalidIndex)?;
            bomb_mask[coords.to_nd_index()] = true;
        }

        Self::from_bomb_mask(&bomb_mask)
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<Coord2> {
        index_to_coords(index).ok_or(RoundError::InvalidIndex)
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        TOTAL_CELLS - self.bomb_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_revealed)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn cell(&self, index: CellIndex) -> Option<Cell> {
        index_to_coords(index).map(|coords| self[coords])
    }

    pub fn contains_bomb(&self, coords: Coord2) -> bool {
        self[coords].is_bomb
    }

    /// Cells in index order, `y * GRID_SIZE + x`.
    pub fn iter(&self) -> impl Iterator<Item = CellView> + '_ {
        self.cells.indexed_iter().map(|((y, x), cell)| CellView {
            x: x as Coord,
            y: y as Coord,
            index: y * usize::from(GRID_SIZE) + x,
            is_bomb: cell.is_bomb,
            is_revealed: cell.is_revealed,
        })
    }

    pub fn bomb_indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.iter().filter(|view| view.is_bomb).map(|view| view.index)
    }

    pub fn safe_indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.iter().filter(|view| !view.is_bomb).map(|view| view.index)
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Safe,
    HitBomb,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Safe => true,
            HitBomb => true,
            Won => true,
        }
    }

    /// Whether this reveal resolved the round and started the reveal-all window.
    pub const fn ends_round(self) -> bool {
        matches!(self, Self::HitBomb | Self::Won)
    }
}

/// What a deferred transition did when it fired.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SettleOutcome {
    /// A won or lost round returned to idle.
    ReturnedToIdle,
    /// A cashed-out round credited its winnings and returned to idle.
    CashedOut(Money),
}
