#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level goal tracking driven by the match tallies the board reports.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tileshift_core::{GoalTracker, TileCatalog, TileKind};
use tracing::{debug, info};

/// Goal as written in a level description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSpec {
    /// Name of the tile type to collect.
    pub tile: String,
    /// Number of tiles to collect; negative amounts count as zero.
    pub amount: i64,
}

impl GoalSpec {
    /// Creates a new goal description.
    #[must_use]
    pub fn new(tile: impl Into<String>, amount: i64) -> Self {
        Self {
            tile: tile.into(),
            amount,
        }
    }
}

/// Reasons a goal list cannot be built.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GoalError {
    /// The goal names a tile type the catalog does not contain.
    #[error("goal refers to unknown tile type `{name}`")]
    UnknownTile {
        /// Name that failed to resolve.
        name: String,
    },
}

/// Goal resolved against the tile catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    kind: TileKind,
    required: u32,
    remaining: u32,
}

impl Goal {
    /// Creates a goal requiring `required` tiles of `kind`.
    #[must_use]
    pub const fn new(kind: TileKind, required: u32) -> Self {
        Self {
            kind,
            required,
            remaining: required,
        }
    }

    /// Kind of tile this goal collects.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Number of tiles the goal asked for.
    #[must_use]
    pub const fn required(&self) -> u32 {
        self.required
    }

    /// Number of tiles still to collect.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether nothing remains to collect.
    #[must_use]
    pub const fn is_met(&self) -> bool {
        self.remaining == 0
    }
}

/// Ordered list of level goals.
///
/// A level is complete once the list is non-empty and every goal is met.
/// Completion is sticky: later reports are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelGoals {
    goals: Vec<Goal>,
    complete: bool,
}

impl LevelGoals {
    /// Creates a tracker from already resolved goals.
    #[must_use]
    pub fn new(goals: Vec<Goal>) -> Self {
        let complete = Self::all_met(&goals);
        Self { goals, complete }
    }

    /// Resolves goal descriptions against the catalog.
    pub fn from_specs<'a, I>(specs: I, catalog: &TileCatalog) -> Result<Self, GoalError>
    where
        I: IntoIterator<Item = &'a GoalSpec>,
    {
        let goals = specs
            .into_iter()
            .map(|spec| {
                let kind = catalog
                    .kind_of(&spec.tile)
                    .ok_or_else(|| GoalError::UnknownTile {
                        name: spec.tile.clone(),
                    })?;
                let required = u32::try_from(spec.amount.max(0)).unwrap_or(u32::MAX);
                Ok(Goal::new(kind, required))
            })
            .collect::<Result<Vec<_>, GoalError>>()?;
        Ok(Self::new(goals))
    }

    /// Snapshot of every goal in declaration order.
    #[must_use]
    pub fn progress(&self) -> &[Goal] {
        &self.goals
    }

    /// Reports whether the tracker holds no goals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    fn all_met(goals: &[Goal]) -> bool {
        !goals.is_empty() && goals.iter().all(Goal::is_met)
    }
}

impl GoalTracker for LevelGoals {
    fn report_match(&mut self, kind: TileKind, count: u32) {
        if self.complete || count == 0 {
            return;
        }

        // Only the first open goal of the kind is charged; surplus does not
        // spill into later goals of the same kind.
        if let Some(goal) = self
            .goals
            .iter_mut()
            .find(|goal| goal.kind == kind && goal.remaining > 0)
        {
            goal.remaining = goal.remaining.saturating_sub(count);
            debug!(kind = kind.get(), remaining = goal.remaining, "goal progressed");
        }

        if Self::all_met(&self.goals) {
            self.complete = true;
            info!("every level goal met");
        }
    }

    fn is_level_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_requirement_goals_start_met() {
        let goals = LevelGoals::new(vec![Goal::new(TileKind::new(0), 0)]);
        assert!(goals.is_level_complete());
    }

    #[test]
    fn empty_goal_list_never_completes() {
        let mut goals = LevelGoals::default();
        goals.report_match(TileKind::new(0), 10);
        assert!(goals.is_empty());
        assert!(!goals.is_level_complete());
    }
}
