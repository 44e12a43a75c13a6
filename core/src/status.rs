use core::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        })
    }
}

/// Classifies a board as lost, won or still playing.
///
/// The total mine count is never observed, so a win is only reported once
/// every cell is revealed; flags count as unresolved. A board with all safe
/// cells open and its mines left flagged or unopened stays `Playing`, which
/// under-reports wins unless the mines are also revealed by the game. This is
/// an accepted approximation.
pub fn evaluate(board: &BoardModel) -> GameStatus {
    if board.any(|state| state == CellState::Exploded) {
        GameStatus::Lost
    } else if board.any(CellState::is_unresolved) {
        GameStatus::Playing
    } else {
        GameStatus::Won
    }
}
