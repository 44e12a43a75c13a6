use core::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Neighbor list that never spills to the heap.
pub type NeighborList = SmallVec<[Coord2; 8]>;

/// Symbolic model of the board, rebuilt from every perception snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<CellState>", into = "Array2<CellState>")]
pub struct BoardModel {
    cells: Array2<CellState>,
}

impl BoardModel {
    /// All-unopened board, the state of a session before the first scan.
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    /// Builds a board from explicit cell states, rejecting malformed clues.
    pub fn from_cells(cells: Array2<CellState>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        if Coord::try_from(rows).is_err() || Coord::try_from(cols).is_err() {
            return Err(GameError::InvalidBoardShape);
        }
        for &state in cells.iter() {
            state.validate()?;
        }
        Ok(Self { cells })
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        let (rows, cols) = self.size();
        row < rows && col < cols
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords(coords))
        }
    }

    /// State of the cell at `coords`.
    ///
    /// # Panics
    ///
    /// When `coords` lie outside the board. Use [`BoardModel::try_at`] for
    /// coordinates that did not come from this board.
    pub fn at(&self, coords: Coord2) -> CellState {
        assert!(
            self.contains(coords),
            "cell {coords:?} is outside a {:?} board",
            self.size()
        );
        self.cells[coords.to_nd_index()]
    }

    pub fn try_at(&self, coords: Coord2) -> Result<CellState> {
        self.validate_coords(coords).map(|coords| self.cells[coords.to_nd_index()])
    }

    /// Neighbors of `coords` in row-major order, clipped to the board.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        assert!(
            self.contains(coords),
            "cell {coords:?} is outside a {:?} board",
            self.size()
        );
        self.cells.iter_neighbors(coords)
    }

    pub fn neighbors_in_state(&self, coords: Coord2, state: CellState) -> NeighborList {
        self.neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()] == state)
            .collect()
    }

    pub fn count_neighbors(&self, coords: Coord2, state: CellState) -> u8 {
        // at most 8
        self.neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()] == state)
            .count() as u8
    }

    /// Every cell in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, CellState)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &state)| ((row as Coord, col as Coord), state))
    }

    pub fn count_in_state(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    pub fn any(&self, mut predicate: impl FnMut(CellState) -> bool) -> bool {
        self.cells.iter().any(|&cell| predicate(cell))
    }

    /// Replaces this board with the contents of a fresh snapshot.
    ///
    /// Known readings win; an unknown reading keeps the state this board
    /// already holds for that cell.
    pub fn apply(&self, snapshot: &Snapshot) -> Result<Self> {
        if snapshot.size() != self.size() {
            return Err(GameError::InvalidBoardShape);
        }

        let mut cells = self.cells.clone();
        for (cell, &reading) in cells.iter_mut().zip(snapshot.readings().iter()) {
            if let Reading::Known(state) = reading {
                *cell = state.validate()?;
            }
        }

        Ok(Self { cells })
    }
}

impl TryFrom<Array2<CellState>> for BoardModel {
    type Error = GameError;

    fn try_from(cells: Array2<CellState>) -> Result<Self> {
        Self::from_cells(cells)
    }
}

impl From<BoardModel> for Array2<CellState> {
    fn from(board: BoardModel) -> Self {
        board.cells
    }
}

impl fmt::Display for BoardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for state in row {
                write!(f, "{}", state.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
