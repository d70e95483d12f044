//! Level settings loaded from TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tileshift_core::BoardConfig;
use tileshift_system_goals::GoalSpec;
use tileshift_system_movement::InputConfig;

/// Everything a play session needs besides the command stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Board shape, catalog and generation parameters.
    pub(crate) board: BoardConfig,
    /// Level goals; an empty list never completes.
    pub(crate) goals: Vec<GoalSpec>,
    /// Swipe tuning.
    pub(crate) input: InputConfig,
}

impl Settings {
    /// Loads settings from `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings in {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("settings are not valid TOML")
    }

    /// Applies command-line overrides on top of the file contents.
    pub(crate) fn override_board(
        &mut self,
        seed: Option<u64>,
        width: Option<u32>,
        height: Option<u32>,
    ) {
        if let Some(seed) = seed {
            self.board.seed = seed;
        }
        if let Some(width) = width {
            self.board.width = width;
        }
        if let Some(height) = height {
            self.board.height = height;
        }
    }
}
