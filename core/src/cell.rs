use core::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

/// Highest clue a numeric cell can show.
pub const MAX_CLUE: u8 = 8;

/// Symbolic state of a single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Unopened,
    Flagged,
    Exploded,
    /// Revealed with no adjacent mines.
    Blank,
    /// Revealed with `1..=8` adjacent mines.
    Numeric(u8),
}

impl CellState {
    /// Maps an adjacent-mine count to the revealed state showing it.
    pub fn from_count(count: u8) -> Result<Self> {
        match count {
            0 => Ok(Self::Blank),
            1..=MAX_CLUE => Ok(Self::Numeric(count)),
            _ => Err(GameError::InvalidClue(count)),
        }
    }

    pub const fn is_unopened(self) -> bool {
        matches!(self, Self::Unopened)
    }

    /// Whether the cell is still covered, flagged or not.
    pub const fn is_unresolved(self) -> bool {
        matches!(self, Self::Unopened | Self::Flagged)
    }

    /// Clue shown by a numeric cell.
    pub const fn clue(self) -> Option<u8> {
        match self {
            Self::Numeric(count) => Some(count),
            _ => None,
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Self::Unopened => '#',
            Self::Flagged => 'F',
            Self::Exploded => '*',
            Self::Blank => '.',
            // boards and snapshots only hold 1..=8; anything else is unreadable
            Self::Numeric(count) => match char::from_digit(count as u32, 10) {
                Some(glyph) => glyph,
                None => Reading::UNKNOWN_GLYPH,
            },
        }
    }

    pub(crate) fn validate(self) -> Result<Self> {
        match self {
            Self::Numeric(count) if !(1..=MAX_CLUE).contains(&count) => {
                Err(GameError::InvalidClue(count))
            }
            state => Ok(state),
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Unopened
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// What perception reports for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reading {
    Known(CellState),
    /// The cell could not be recognized; the prior state is kept.
    Unknown,
}

impl Reading {
    pub const UNKNOWN_GLYPH: char = '?';

    pub fn from_glyph(glyph: char) -> Result<Self> {
        use CellState::*;

        Ok(match glyph {
            '#' => Self::Known(Unopened),
            'F' => Self::Known(Flagged),
            '*' => Self::Known(Exploded),
            '.' => Self::Known(Blank),
            '1'..='8' => Self::Known(Numeric(glyph as u8 - b'0')),
            Self::UNKNOWN_GLYPH => Self::Unknown,
            _ => return Err(GameError::InvalidGlyph(glyph)),
        })
    }

    pub const fn glyph(self) -> char {
        match self {
            Self::Known(state) => state.glyph(),
            Self::Unknown => Self::UNKNOWN_GLYPH,
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<CellState> for Reading {
    fn from(state: CellState) -> Self {
        Self::Known(state)
    }
}
