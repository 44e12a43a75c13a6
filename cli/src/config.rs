use std::fs;
use std::path::Path;

use anyhow::Context;
use minebot_core::{CellCount, Coord, MinefieldConfig};
use serde::{Deserialize, Serialize};

/// Settings for `minebot play`, read from TOML and overridden by flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
    /// Seed for both the minefield and the guesses; random when unset.
    pub seed: Option<u64>,
    /// Pause after every move, like a player watching the board update.
    pub delay_ms: u64,
}

impl Default for PlayConfig {
    fn default() -> Self {
        let beginner = MinefieldConfig::beginner();
        Self {
            rows: beginner.size.0,
            cols: beginner.size.1,
            mines: beginner.mines,
            seed: None,
            delay_ms: 0,
        }
    }
}

impl PlayConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn minefield(&self) -> MinefieldConfig {
        MinefieldConfig::new((self.rows, self.cols), self.mines)
    }
}
