use core::fmt;

use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Complete read of every cell on the board at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Reading>", into = "Array2<Reading>")]
pub struct Snapshot {
    readings: Array2<Reading>,
}

impl Snapshot {
    pub fn new(readings: Array2<Reading>) -> Result<Self> {
        let snapshot = Self { readings };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub(crate) fn new_unchecked(readings: Array2<Reading>) -> Self {
        Self { readings }
    }

    /// Parses the text grid format, one line per row and one glyph per cell.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<Vec<Reading>> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(Reading::from_glyph).collect::<Result<Vec<_>>>())
            .collect::<Result<_>>()?;

        let Some(cols) = rows.first().map(Vec::len) else {
            return Err(GameError::InvalidBoardShape);
        };
        if rows.iter().any(|row| row.len() != cols) {
            return Err(GameError::InvalidBoardShape);
        }

        let shape = [rows.len(), cols];
        let flat = rows.into_iter().flatten().collect();
        let readings =
            Array2::from_shape_vec(shape, flat).map_err(|_| GameError::InvalidBoardShape)?;
        Self::new(readings)
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.readings)
    }

    pub fn readings(&self) -> &Array2<Reading> {
        &self.readings
    }

    pub fn reading_at(&self, coords: Coord2) -> Reading {
        self.readings[coords.to_nd_index()]
    }

    pub fn unknown_count(&self) -> usize {
        self.readings
            .iter()
            .filter(|&&reading| reading == Reading::Unknown)
            .count()
    }

    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.readings.dim();
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        if Coord::try_from(rows).is_err() || Coord::try_from(cols).is_err() {
            return Err(GameError::InvalidBoardShape);
        }

        for &reading in self.readings.iter() {
            if let Reading::Known(state) = reading {
                state.validate()?;
            }
        }

        Ok(())
    }
}

impl TryFrom<Array2<Reading>> for Snapshot {
    type Error = GameError;

    fn try_from(readings: Array2<Reading>) -> Result<Self> {
        Self::new(readings)
    }
}

impl From<Snapshot> for Array2<Reading> {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.readings
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.readings.rows() {
            for reading in row {
                write!(f, "{}", reading.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
