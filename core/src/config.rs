use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{TileCatalog, DEFAULT_CASCADE_CAP, DEFAULT_FILL_ATTEMPTS, MIN_RUN_LENGTH};

/// Board configuration supplied at initialization.
///
/// Every field has a default so partial configuration files deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Names of the tile types, interned in order.
    pub tile_types: Vec<String>,
    /// Maximum number of cleared batches per move.
    pub cascade_cap: u32,
    /// Minimum run length that forms a match.
    pub min_run_length: u32,
    /// Seed for tile generation.
    pub seed: u64,
    /// Number of whole-board re-rolls allowed while initial matches remain.
    pub initial_fill_attempts: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            tile_types: ["red", "green", "blue", "yellow"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            cascade_cap: DEFAULT_CASCADE_CAP,
            min_run_length: MIN_RUN_LENGTH,
            seed: 0,
            initial_fill_attempts: DEFAULT_FILL_ATTEMPTS,
        }
    }
}

impl BoardConfig {
    /// Checks every field and interns the tile catalog.
    pub fn validate(&self) -> Result<TileCatalog, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.min_run_length < MIN_RUN_LENGTH {
            return Err(ConfigError::RunLengthTooShort {
                actual: self.min_run_length,
                min: MIN_RUN_LENGTH,
            });
        }
        if self.cascade_cap == 0 {
            return Err(ConfigError::ZeroCascadeCap);
        }
        TileCatalog::new(self.tile_types.iter().cloned())
    }
}

/// Reasons a board configuration is refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("board dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// The catalog lists no tile types.
    #[error("tile catalog is empty")]
    EmptyCatalog,
    /// A tile type name is empty or whitespace.
    #[error("tile type at index {index} has a blank name")]
    BlankTileType {
        /// Position of the offending name.
        index: usize,
    },
    /// A tile type name appears twice.
    #[error("tile type `{name}` is listed more than once")]
    DuplicateTileType {
        /// Repeated name.
        name: String,
    },
    /// The catalog exceeds the identifier space.
    #[error("tile catalog holds {count} types but at most {max} are supported")]
    TooManyTileTypes {
        /// Number of configured types.
        count: usize,
        /// Largest supported catalog.
        max: usize,
    },
    /// The minimum run length is below three.
    #[error("minimum run length must be at least {min}, got {actual}")]
    RunLengthTooShort {
        /// Configured run length.
        actual: u32,
        /// Smallest supported run length.
        min: u32,
    },
    /// The cascade cap is zero.
    #[error("cascade cap must be at least 1")]
    ZeroCascadeCap,
}
