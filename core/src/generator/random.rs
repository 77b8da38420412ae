use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Places bombs by drawing uniformly random cells and skipping the ones already holding a bomb.
#[derive(Clone, Debug)]
pub struct RandomBoardGenerator {
    rng: SmallRng,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(&mut self, level: Level) -> Board {
        use rand::Rng;

        let total_cells = usize::from(TOTAL_CELLS);
        let bombs = usize::from(level.bombs_count());
        let mut board = Board::empty();

        // every preset leaves safe cells, but never spin on a full board
        if bombs >= total_cells {
            log::warn!(
                "Board already full, requested {} bombs but only {} cells",
                bombs,
                total_cells
            );
            for coords in (0..total_cells).filter_map(index_to_coords) {
                board.place_bomb(coords);
            }
            return board;
        }

        let mut bombs_placed = 0;
        while bombs_placed < bombs {
            let index = self.rng.random_range(0..total_cells);
            if let Some(coords) = index_to_coords(index)
                && board.place_bomb(coords)
            {
                bombs_placed += 1;
            }
        }

        // double check bomb count
        if usize::from(board.bomb_count()) != bombs {
            log::warn!(
                "Generated board count mismatch, actual: {}, requested: {}",
                board.bomb_count(),
                bombs
            );
        }
        board
    }
}
