use core::fmt;

use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Move handed to the actuation side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Reveal(Coord2),
    Mark(Coord2),
}

impl Action {
    pub const fn coords(self) -> Coord2 {
        match self {
            Self::Reveal(coords) | Self::Mark(coords) => coords,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reveal((row, col)) => write!(f, "reveal ({row}, {col})"),
            Self::Mark((row, col)) => write!(f, "mark ({row}, {col})"),
        }
    }
}

/// Rule that produced an action, in priority order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// A clue already has all its mines flagged, so its other neighbors are safe.
    SafeReveal,
    /// A clue has exactly as many covered neighbors as mines, so all are mines.
    CertainMine,
    /// Nothing could be deduced; an unopened cell is picked at random.
    Guess,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SafeReveal => "safe-reveal",
            Self::CertainMine => "certain-mine",
            Self::Guess => "guess",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub strategy: Strategy,
}

/// Source of the uniform choice made when no deduction applies.
pub trait RandomSource {
    /// Returns an index in `0..len`. Never called with `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

impl RandomSource for SmallRng {
    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// Neighborhood of one numeric cell.
#[derive(Clone, Debug, PartialEq)]
struct ClueNeighborhood {
    clue: u8,
    flagged: u8,
    unopened: NeighborList,
}

impl ClueNeighborhood {
    fn of(board: &BoardModel, coords: Coord2) -> Option<Self> {
        let clue = board.at(coords).clue()?;
        let mut flagged = 0;
        let mut unopened = NeighborList::new();

        for pos in board.neighbors(coords) {
            match board.at(pos) {
                CellState::Flagged => flagged += 1,
                CellState::Unopened => unopened.push(pos),
                _ => {}
            }
        }

        Some(Self {
            clue,
            flagged,
            unopened,
        })
    }

    fn all_mines_flagged(&self) -> bool {
        self.flagged == self.clue
    }

    fn only_mines_left(&self) -> bool {
        usize::from(self.clue) == self.unopened.len() + usize::from(self.flagged)
    }
}

fn clue_neighborhoods(board: &BoardModel) -> impl Iterator<Item = ClueNeighborhood> + '_ {
    board
        .iter_cells()
        .filter_map(|(coords, _)| ClueNeighborhood::of(board, coords))
}

/// First unopened neighbor of the first clue whose mines are all flagged.
pub fn find_safe_reveal(board: &BoardModel) -> Option<Coord2> {
    clue_neighborhoods(board)
        .filter(ClueNeighborhood::all_mines_flagged)
        .find_map(|hood| hood.unopened.first().copied())
}

/// First unopened neighbor of the first clue whose covered neighbors must all be mines.
pub fn find_certain_mine(board: &BoardModel) -> Option<Coord2> {
    clue_neighborhoods(board)
        .filter(ClueNeighborhood::only_mines_left)
        .find_map(|hood| hood.unopened.first().copied())
}

/// Every unopened cell in row-major order.
pub fn guess_candidates(board: &BoardModel) -> Vec<Coord2> {
    board
        .iter_cells()
        .filter(|&(_, state)| state.is_unopened())
        .map(|(coords, _)| coords)
        .collect()
}

/// Picks the next move from a board, trying each [`Strategy`] in order.
#[derive(Clone, Debug)]
pub struct DeductionEngine<R = SmallRng> {
    rng: R,
}

impl DeductionEngine<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> DeductionEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn next_move(&mut self, board: &BoardModel) -> Option<Action> {
        self.decide(board).map(|decision| decision.action)
    }

    /// Returns `None` only when no unopened cell is left to guess.
    pub fn decide(&mut self, board: &BoardModel) -> Option<Decision> {
        if let Some(coords) = find_safe_reveal(board) {
            return Some(Decision {
                action: Action::Reveal(coords),
                strategy: Strategy::SafeReveal,
            });
        }

        if let Some(coords) = find_certain_mine(board) {
            return Some(Decision {
                action: Action::Mark(coords),
                strategy: Strategy::CertainMine,
            });
        }

        let candidates = guess_candidates(board);
        if candidates.is_empty() {
            return None;
        }

        let coords = candidates[self.rng.pick(candidates.len())];
        log::trace!("Guessing among {} unopened cells", candidates.len());
        Some(Decision {
            action: Action::Reveal(coords),
            strategy: Strategy::Guess,
        })
    }
}
