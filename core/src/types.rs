/// Single coordinate axis used for board positions.
pub type Coord = u8;

/// Count type used for bomb counts and revealed-cell counts.
pub type CellCount = u8;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Linear cell position, `y * GRID_SIZE + x`.
pub type CellIndex = usize;

/// Width and height of the (square) board.
pub const GRID_SIZE: Coord = 5;

pub const TOTAL_CELLS: CellCount = GRID_SIZE * GRID_SIZE;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    /// Row-major: the first axis is `y`, so the standard layout matches [`CellIndex`].
    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn index_to_coords(index: CellIndex) -> Option<Coord2> {
    if index >= TOTAL_CELLS as CellIndex {
        return None;
    }
    let size = GRID_SIZE as CellIndex;
    Some(((index % size) as Coord, (index / size) as Coord))
}

pub const fn coords_to_index((x, y): Coord2) -> Option<CellIndex> {
    if x >= GRID_SIZE || y >= GRID_SIZE {
        return None;
    }
    Some(y as CellIndex * GRID_SIZE as CellIndex + x as CellIndex)
}
