use alloc::collections::{BTreeSet, VecDeque};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimState {
    Ready,
    Active,
    Won,
    Lost,
}

impl SimState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::Ready
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

/// A minefield that plays by the usual rules and shows what a player would see.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulatedBoard {
    mine_layout: MineLayout,
    board: Array2<CellState>,
    revealed_count: CellCount,
    state: SimState,
    triggered_mine: Option<Coord2>,
}

impl SimulatedBoard {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            state: SimState::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.board[coords.to_nd_index()]
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// What a player looking at the board would perceive.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new_unchecked(self.board.map(|&state| Reading::Known(state)))
    }

    /// Flags a covered cell. Flagging is not a toggle: a flagged cell stays flagged.
    pub fn mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_not_finished()?;

        Ok(match self.board[coords.to_nd_index()] {
            CellState::Unopened => {
                self.board[coords.to_nd_index()] = CellState::Flagged;
                MarkOutcome::Changed
            }
            _ => MarkOutcome::NoChange,
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.board[coords.to_nd_index()].is_unopened() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.mine_layout.contains_mine(coords) {
            self.board[coords.to_nd_index()] = CellState::Exploded;
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return Ok(RevealOutcome::HitMine);
        }

        self.open(coords);
        if self.board[coords.to_nd_index()] == CellState::Blank {
            self.flood_fill(coords);
        }

        if self.revealed_count == self.mine_layout.safe_cell_count() {
            self.end_game(true);
            Ok(RevealOutcome::Won)
        } else {
            self.mark_started();
            Ok(RevealOutcome::Revealed)
        }
    }

    fn open(&mut self, coords: Coord2) {
        let adjacent_mines = self.mine_layout.adjacent_mine_count(coords);
        let state =
            CellState::from_count(adjacent_mines).expect("a cell has at most 8 neighbors");
        self.board[coords.to_nd_index()] = state;
        self.revealed_count += 1;
    }

    /// Opens every covered cell reachable from a blank one through blank cells.
    fn flood_fill(&mut self, start: Coord2) {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<_> = self.mine_layout.iter_neighbors(start).collect();

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            // flags are respected, revealed cells are done
            if !self.board[coords.to_nd_index()].is_unopened() {
                continue;
            }

            self.open(coords);
            log::trace!("Flood opened cell at {coords:?}");

            if self.board[coords.to_nd_index()] == CellState::Blank {
                to_visit.extend(
                    self.mine_layout
                        .iter_neighbors(coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, SimState::Ready) {
            self.state = SimState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won { SimState::Won } else { SimState::Lost };
        log::debug!("Simulated game ended, won: {won}");

        if won {
            // mines left covered are shown flagged once the board is cleared
            for (cell, &is_mine) in self.board.iter_mut().zip(self.mine_layout.mask().iter()) {
                if is_mine && *cell == CellState::Unopened {
                    *cell = CellState::Flagged;
                }
            }
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
