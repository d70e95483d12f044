#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Tileshift adapters.
//!
//! Nothing here schedules work in real time. Adapters feed board events to a
//! [`Planner`] and receive [`Transition`] descriptors with world-space
//! endpoints and durations in seconds, which they play back at their own
//! pace before showing the next event.

use glam::Vec2;
use std::{error::Error, fmt};
use tileshift_core::{CellCoord, Event, TileId};

/// Describes how board cells map onto world space.
///
/// The board is centered on the origin; row zero is the bottom row and
/// positive `y` points up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    /// Number of columns on the board.
    pub columns: u32,
    /// Number of rows on the board.
    pub rows: u32,
    /// Size of a single tile in world units.
    pub tile_size: Vec2,
    /// Gap between neighbouring tiles in world units.
    pub spacing: Vec2,
}

impl BoardLayout {
    /// Default gap between tiles along both axes.
    pub const DEFAULT_SPACING: f32 = 0.1;

    /// Creates a new layout descriptor.
    ///
    /// Returns an error when the board has no cells, a tile has no area, or
    /// the spacing is negative.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_size: Vec2,
        spacing: Vec2,
    ) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyBoard { columns, rows });
        }
        if !(tile_size.x > 0.0 && tile_size.y > 0.0) {
            return Err(RenderingError::InvalidTileSize { tile_size });
        }
        if !(spacing.x >= 0.0 && spacing.y >= 0.0) {
            return Err(RenderingError::NegativeSpacing { spacing });
        }

        Ok(Self {
            columns,
            rows,
            tile_size,
            spacing,
        })
    }

    /// Distance between the centers of neighbouring cells.
    #[must_use]
    pub fn pitch(&self) -> Vec2 {
        self.tile_size + self.spacing
    }

    /// Offset that centers the board on the origin.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        let span = Vec2::new(
            self.columns.saturating_sub(1) as f32,
            self.rows.saturating_sub(1) as f32,
        );
        span * 0.5 * self.pitch()
    }

    /// World-space center of the cell.
    ///
    /// Rows at or above the board height are valid and lie above the top row,
    /// which is where refilled tiles enter from.
    #[must_use]
    pub fn world_position(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.column() as f32, cell.row() as f32) * self.pitch() - self.offset()
    }

    /// Cell whose center is nearest to `point`, if that cell lies on the board.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        let relative = (point + self.offset()) / self.pitch();
        let column = relative.x.round();
        let row = relative.y.round();
        if !(column >= 0.0 && row >= 0.0) {
            return None;
        }
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }
}

/// Durations, in seconds, used when planning transitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionTiming {
    /// Duration of a line rotation.
    pub slide: f32,
    /// Duration of the shrink played on cleared tiles.
    pub clear: f32,
    /// Fall duration per square root of the distance travelled in cells.
    pub fall_factor: f32,
    /// Delay added per tile already queued to enter the same column.
    pub refill_stagger: f32,
    /// Pause after cleared tiles disappear.
    pub after_clear: f32,
    /// Pause after tiles finish falling.
    pub after_fall: f32,
}

impl TransitionTiming {
    /// Time a tile takes to fall `distance` cells.
    #[must_use]
    pub fn fall_duration(&self, distance: u32) -> f32 {
        self.fall_factor * (distance as f32).sqrt()
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            slide: 0.2,
            clear: 0.2,
            fall_factor: 0.1,
            refill_stagger: 0.05,
            after_clear: 0.1,
            after_fall: 0.1,
        }
    }
}

/// Visual treatment of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Tiles slide one cell along a rotated line.
    Slide,
    /// Cleared tiles scale down to nothing in place.
    Shrink,
    /// Surviving tiles fall into emptied cells.
    Fall,
    /// A new tile drops in from above the board.
    Drop,
}

/// Motion of one tile within a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileTrack {
    /// Tile being animated.
    pub tile: TileId,
    /// World-space start position.
    pub from: Vec2,
    /// World-space end position.
    pub to: Vec2,
    /// Seconds to wait before the track starts.
    pub delay: f32,
    /// Seconds the track takes once started.
    pub duration: f32,
}

impl TileTrack {
    /// Time at which the track finishes.
    #[must_use]
    pub fn end(&self) -> f32 {
        self.delay + self.duration
    }

    /// Linear progress of the track, in `0.0..=1.0`, at `time` seconds.
    #[must_use]
    pub fn progress_at(&self, time: f32) -> f32 {
        if time <= self.delay {
            return 0.0;
        }
        if self.duration <= f32::EPSILON {
            return 1.0;
        }
        ((time - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    /// Interpolated position at `time` seconds.
    #[must_use]
    pub fn position_at(&self, time: f32) -> Vec2 {
        self.from.lerp(self.to, self.progress_at(time))
    }
}

/// Presentation of one committed board step.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Visual treatment applied to every track.
    pub kind: TransitionKind,
    /// Per-tile motion.
    pub tracks: Vec<TileTrack>,
    /// Pause after the last track finishes.
    pub hold: f32,
}

impl Transition {
    /// Seconds until the adapter may present the next event.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.tracks.iter().map(TileTrack::end).fold(0.0, f32::max) + self.hold
    }
}

/// Turns board events into transitions for a fixed layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Planner {
    layout: BoardLayout,
    timing: TransitionTiming,
}

impl Planner {
    /// Creates a planner for the provided layout and timing.
    #[must_use]
    pub const fn new(layout: BoardLayout, timing: TransitionTiming) -> Self {
        Self { layout, timing }
    }

    /// Layout the planner positions tiles with.
    #[must_use]
    pub const fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Timing the planner uses.
    #[must_use]
    pub const fn timing(&self) -> &TransitionTiming {
        &self.timing
    }

    /// Describes how to present `event`, or `None` when it has no motion.
    #[must_use]
    pub fn plan(&self, event: &Event) -> Option<Transition> {
        match event {
            Event::LineRotated { moves, .. } => Some(Transition {
                kind: TransitionKind::Slide,
                tracks: moves
                    .iter()
                    .map(|step| self.track(step.tile, step.from, step.to, 0.0, self.timing.slide))
                    .collect(),
                hold: 0.0,
            }),
            Event::TilesCleared { tiles } => Some(Transition {
                kind: TransitionKind::Shrink,
                tracks: tiles
                    .iter()
                    .map(|cleared| {
                        self.track(cleared.tile, cleared.cell, cleared.cell, 0.0, self.timing.clear)
                    })
                    .collect(),
                hold: self.timing.after_clear,
            }),
            Event::TilesCollapsed { moves } => Some(Transition {
                kind: TransitionKind::Fall,
                tracks: moves
                    .iter()
                    .map(|step| {
                        let duration = self
                            .timing
                            .fall_duration(step.from.manhattan_distance(step.to));
                        self.track(step.tile, step.from, step.to, 0.0, duration)
                    })
                    .collect(),
                hold: self.timing.after_fall,
            }),
            Event::TileSpawned { tile, from, to, .. } if from != to => {
                let queued = from.row().saturating_sub(self.layout.rows);
                let delay = self.timing.refill_stagger * queued as f32;
                let duration = self.timing.fall_duration(from.manhattan_distance(*to));
                Some(Transition {
                    kind: TransitionKind::Drop,
                    tracks: vec![self.track(*tile, *from, *to, delay, duration)],
                    hold: 0.0,
                })
            }
            _ => None,
        }
    }

    fn track(
        &self,
        tile: TileId,
        from: CellCoord,
        to: CellCoord,
        delay: f32,
        duration: f32,
    ) -> TileTrack {
        TileTrack {
            tile,
            from: self.layout.world_position(from),
            to: self.layout.world_position(to),
            delay,
            duration,
        }
    }
}

/// Errors that can occur when constructing presentation descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The board has no cells along one axis.
    EmptyBoard {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// Tiles must have a positive size along both axes.
    InvalidTileSize {
        /// Provided tile size.
        tile_size: Vec2,
    },
    /// Spacing must not be negative.
    NegativeSpacing {
        /// Provided spacing.
        spacing: Vec2,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBoard { columns, rows } => {
                write!(f, "board layout needs cells, received {columns}x{rows}")
            }
            Self::InvalidTileSize { tile_size } => {
                write!(f, "tile size must be positive (received {tile_size})")
            }
            Self::NegativeSpacing { spacing } => {
                write!(f, "tile spacing must not be negative (received {spacing})")
            }
        }
    }
}

impl Error for RenderingError {}
