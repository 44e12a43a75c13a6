use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates {0:?}")]
    InvalidCoords(Coord2),
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Board dimensions must be positive")]
    EmptyBoard,
    #[error("Clue {0} is outside 1..=8")]
    InvalidClue(u8),
    #[error("Unrecognized glyph {0:?}")]
    InvalidGlyph(char),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
