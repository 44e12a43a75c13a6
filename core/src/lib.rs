//! Board inference and decision engine for minesweeper-style grids.
//!
//! A [`DecisionLoop`] perceives the board through a [`PerceptionAdapter`],
//! keeps a symbolic [`BoardModel`], asks the [`DeductionEngine`] for the next
//! [`Action`] and hands it to an [`ActuationAdapter`] until the game is won,
//! lost or nothing is left to do.

#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use deduction::*;
pub use error::*;
pub use session::*;
pub use sim::*;
pub use snapshot::*;
pub use status::*;
pub use types::*;

mod board;
mod cell;
mod deduction;
mod error;
mod session;
mod sim;
mod snapshot;
mod status;
mod types;

/// Fixed geometry of a session, given to the [`DecisionLoop`] up front.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Coord2", into = "Coord2")]
pub struct SessionConfig {
    /// `(rows, cols)`
    pub size: Coord2,
}

impl SessionConfig {
    pub const fn new_unchecked(size: Coord2) -> Self {
        Self { size }
    }

    pub fn new(size: Coord2) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }
        Ok(Self::new_unchecked(size))
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl TryFrom<Coord2> for SessionConfig {
    type Error = GameError;

    fn try_from(size: Coord2) -> Result<Self> {
        Self::new(size)
    }
}

impl From<SessionConfig> for Coord2 {
    fn from(config: SessionConfig) -> Self {
        config.size
    }
}
