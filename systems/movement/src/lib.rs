#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that turns raw swipe gestures into move requests.
//!
//! Mapping screen positions onto cells is the adapter's job; this system
//! only sees the starting cell and the swipe delta, with positive `dy`
//! pointing toward higher rows.

use serde::{Deserialize, Serialize};
use tileshift_core::{CellCoord, Direction, MoveRequest};

/// Minimum swipe length, in adapter units, that counts as a move.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 30.0;

/// Displacement between the press and release of a swipe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SwipeDelta {
    /// Horizontal displacement; positive values point right.
    pub dx: f32,
    /// Vertical displacement; positive values point up.
    pub dy: f32,
}

impl SwipeDelta {
    /// Creates a new swipe delta.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length of the swipe.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.dx.hypot(self.dy)
    }
}

/// Input tuning loaded alongside the board configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Swipes must be strictly longer than this to register.
    pub swipe_threshold: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

/// Pure system that classifies swipes into move requests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Movement {
    swipe_threshold: f32,
}

impl Movement {
    /// Creates a movement system using the provided input configuration.
    #[must_use]
    pub fn new(config: InputConfig) -> Self {
        Self {
            swipe_threshold: config.swipe_threshold,
        }
    }

    /// Swipe length a gesture must exceed.
    #[must_use]
    pub const fn swipe_threshold(&self) -> f32 {
        self.swipe_threshold
    }

    /// Classifies a swipe into a direction.
    ///
    /// The dominant axis wins; equal magnitudes resolve to vertical. Swipes
    /// no longer than the threshold yield `None`.
    #[must_use]
    pub fn classify(&self, delta: SwipeDelta) -> Option<Direction> {
        if !(delta.magnitude() > self.swipe_threshold) {
            return None;
        }

        let direction = if delta.dx.abs() > delta.dy.abs() {
            if delta.dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.dy > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };
        Some(direction)
    }

    /// Converts a swipe that started on `start` into a move request.
    #[must_use]
    pub fn handle(&self, start: CellCoord, delta: SwipeDelta) -> Option<MoveRequest> {
        self.classify(delta)
            .map(|direction| MoveRequest::new(direction, start))
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}
