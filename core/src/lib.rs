#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tileshift engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The cascade system submits
//! [`Command`] values describing desired board mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values that presentation layers replay. Systems read the [`Grid`] through
//! immutable borrows and never hold tile references across a step.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

mod catalog;
mod config;
mod grid;

pub use catalog::TileCatalog;
pub use config::{BoardConfig, ConfigError};
pub use grid::Grid;

/// Minimum number of aligned tiles that form a match.
pub const MIN_RUN_LENGTH: u32 = 3;

/// Number of cleared batches a single move may trigger before resolution stops.
pub const DEFAULT_CASCADE_CAP: u32 = 50;

/// Number of times board initialization re-rolls a board that still contains matches.
pub const DEFAULT_FILL_ATTEMPTS: u32 = 50;

/// Largest catalog size representable by [`TileKind`].
pub const MAX_TILE_KINDS: usize = u8::MAX as usize + 1;

/// Interned identifier of a tile type within a [`TileCatalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKind(u8);

impl TileKind {
    /// Creates a tile kind from its catalog index.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the kind.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Position of the kind within its catalog.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier assigned to a tile when the world creates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable tile stored in a grid cell.
///
/// The identifier only exists so presentation layers can follow a tile
/// between events; matching compares kinds exclusively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    kind: TileKind,
}

impl Tile {
    /// Creates a tile of the provided kind.
    #[must_use]
    pub const fn new(id: TileId, kind: TileKind) -> Self {
        Self { id, kind }
    }

    /// Identity assigned by the world when the tile spawned.
    #[must_use]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Type of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the bottom of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell, counted from the bottom.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Directions a line of tiles can be shifted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Shift a column toward increasing row indices.
    Up,
    /// Shift a column toward decreasing row indices.
    Down,
    /// Shift a row toward decreasing column indices.
    Left,
    /// Shift a row toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Reports whether the direction shifts a row rather than a column.
    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Direction that undoes a shift in this direction.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Player request to rotate the row or column passing through a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    direction: Direction,
    start: CellCoord,
}

impl MoveRequest {
    /// Creates a move request that shifts the line through `start`.
    #[must_use]
    pub const fn new(direction: Direction, start: CellCoord) -> Self {
        Self { direction, start }
    }

    /// Direction the line shifts in.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Cell the gesture started on.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Index of the affected row for horizontal moves or column for vertical ones.
    #[must_use]
    pub const fn line(&self) -> u32 {
        if self.direction.is_horizontal() {
            self.start.row()
        } else {
            self.start.column()
        }
    }
}

/// Deduplicated cells that belong to at least one run, in the order they were found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSet {
    cells: Vec<CellCoord>,
    seen: HashSet<CellCoord>,
}

impl MatchSet {
    /// Creates an empty match set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell, returning `false` when it was already present.
    pub fn insert(&mut self, cell: CellCoord) -> bool {
        if !self.seen.insert(cell) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    /// Number of distinct matched cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no cell matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the cell belongs to a match.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.seen.contains(&cell)
    }

    /// Matched cells in discovery order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Iterator over the matched cells in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Consumes the set, yielding the ordered cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.cells
    }
}

impl FromIterator<CellCoord> for MatchSet {
    fn from_iter<I: IntoIterator<Item = CellCoord>>(iter: I) -> Self {
        let mut set = MatchSet::new();
        for cell in iter {
            let _ = set.insert(cell);
        }
        set
    }
}

/// Relocation of a single tile between two cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileMove {
    /// Tile that moved.
    pub tile: TileId,
    /// Cell the tile occupied before the move.
    pub from: CellCoord,
    /// Cell the tile occupies after the move.
    pub to: CellCoord,
}

/// Tile removed from the board as part of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClearedTile {
    /// Tile that was removed.
    pub tile: TileId,
    /// Kind of the removed tile.
    pub kind: TileKind,
    /// Cell the tile occupied.
    pub cell: CellCoord,
}

/// Where a spawned tile enters the board from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnEntry {
    /// The tile appears directly in its destination cell.
    InPlace,
    /// The tile drops in from above the top row of its column.
    AboveBoard,
}

/// Commands that express all permissible board mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rotates the row or column selected by the request by one cell.
    RotateLine {
        /// Line and direction to rotate.
        request: MoveRequest,
    },
    /// Empties every listed cell.
    ClearCells {
        /// Cells whose tiles should be removed.
        cells: Vec<CellCoord>,
    },
    /// Compacts every column toward row zero, keeping relative order.
    CollapseColumns,
    /// Creates a new tile in an empty cell.
    SpawnTile {
        /// Destination of the new tile.
        cell: CellCoord,
        /// Kind chosen for the new tile.
        kind: TileKind,
        /// Where the tile enters the board from.
        entry: SpawnEntry,
    },
    /// Removes every tile from the board.
    ResetBoard,
}

/// Reason a move request was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// A previous move is still resolving.
    Busy,
    /// The level is complete and the board no longer accepts moves.
    LevelComplete,
}

/// Events broadcast after each committed board step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a row or column rotated by one cell.
    LineRotated {
        /// Direction the line shifted in.
        direction: Direction,
        /// Relocation of every tile in the line.
        moves: Vec<TileMove>,
    },
    /// Announces that a batch of matches was detected.
    MatchesFound {
        /// One-based index of the batch within the current move.
        cascade: u32,
        /// Matched cells in discovery order.
        cells: Vec<CellCoord>,
    },
    /// Confirms that matched tiles were removed.
    TilesCleared {
        /// Tiles removed from the board.
        tiles: Vec<ClearedTile>,
    },
    /// Confirms that tiles fell into lower empty cells.
    TilesCollapsed {
        /// Relocation of every tile that fell.
        moves: Vec<TileMove>,
    },
    /// Confirms that a tile was created.
    TileSpawned {
        /// Identifier assigned to the new tile.
        tile: TileId,
        /// Kind of the new tile.
        kind: TileKind,
        /// Cell the tile enters from; rows at or above the board height lie above the top row.
        from: CellCoord,
        /// Cell the tile comes to rest in.
        to: CellCoord,
    },
    /// Confirms that every tile was removed from the board.
    BoardReset,
    /// Reports that a move kept cascading until the cap stopped it.
    CascadeLimitReached {
        /// Number of batches cleared before resolution stopped.
        cascades: u32,
    },
    /// Announces that the goal collaborator reported the level complete.
    LevelCompleted {
        /// Number of batches cleared by the final move.
        cascades: u32,
    },
    /// Announces that the board accepts moves again.
    BoardSettled {
        /// Number of batches cleared by the move.
        cascades: u32,
    },
    /// Reports that a move request was dropped.
    MoveRejected {
        /// Request that was dropped.
        request: MoveRequest,
        /// Reason the board refused the request.
        reason: RejectReason,
    },
}

/// Collaborator that tracks level goals from reported match tallies.
pub trait GoalTracker {
    /// Records that `count` tiles of `kind` were matched in one batch.
    fn report_match(&mut self, kind: TileKind, count: u32);

    /// Reports whether every goal of the level has been met.
    fn is_level_complete(&self) -> bool;
}

/// Goal tracker used when no collaborator is wired; never completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoGoals;

impl GoalTracker for NoGoals {
    fn report_match(&mut self, _kind: TileKind, _count: u32) {}

    fn is_level_complete(&self) -> bool {
        false
    }
}

impl<T: GoalTracker> GoalTracker for Option<T> {
    fn report_match(&mut self, kind: TileKind, count: u32) {
        if let Some(tracker) = self {
            tracker.report_match(kind, count);
        }
    }

    fn is_level_complete(&self) -> bool {
        self.as_ref().map_or(false, GoalTracker::is_level_complete)
    }
}

impl<T: GoalTracker + ?Sized> GoalTracker for Box<T> {
    fn report_match(&mut self, kind: TileKind, count: u32) {
        (**self).report_match(kind, count);
    }

    fn is_level_complete(&self) -> bool {
        (**self).is_level_complete()
    }
}
