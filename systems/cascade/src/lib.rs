#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Board orchestration: initial fill and the cascade state machine.
//!
//! A move rotates one line, then repeatedly detects matches, reports the
//! tallies to the goal tracker, clears the matched cells, collapses the
//! columns and refills them until the board is stable, the cascade cap is
//! reached or the goal tracker reports the level complete. Every mutation
//! goes through [`tileshift_world::apply`], so each committed step appends
//! its events before the next step begins.

use thiserror::Error;
use tileshift_core::{
    BoardConfig, CellCoord, Command, ConfigError, Event, GoalTracker, Grid, MoveRequest, NoGoals,
    RejectReason, SpawnEntry, TileCatalog,
};
use tileshift_system_matching::Matching;
use tileshift_system_spawning::{Config as SpawnConfig, SpawnError, Spawning};
use tileshift_world::{self as world, World};
use tracing::{debug, info, warn};

/// Reasons a board cannot be created.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The configuration was refused.
    #[error("invalid board configuration")]
    Config(#[from] ConfigError),
    /// The spawner could not produce a tile.
    #[error("initial fill failed")]
    Spawn(#[from] SpawnError),
    /// A preset grid does not have the configured dimensions.
    #[error("preset grid is {actual_width}x{actual_height}, expected {width}x{height}")]
    GridMismatch {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
        /// Width of the preset grid.
        actual_width: u32,
        /// Height of the preset grid.
        actual_height: u32,
    },
    /// A preset grid holds a kind the catalog does not define.
    #[error("preset grid holds tile kind {kind} outside a catalog of {catalog_len}")]
    UnknownKind {
        /// Offending kind identifier.
        kind: u8,
        /// Number of kinds in the catalog.
        catalog_len: usize,
    },
}

/// Coarse lifecycle of the board as seen by input handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The board accepts moves.
    Idle,
    /// A move is resolving; new moves are rejected.
    Resolving,
    /// The goal tracker reported completion; the board stays locked.
    LevelComplete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Resolving(Stage),
    LevelComplete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Stage {
    Rotate(MoveRequest),
    Detect,
    Clear {
        cells: Vec<CellCoord>,
        complete: bool,
    },
    Collapse,
    Refill,
}

/// Tile-matching board that resolves moves and reports progress to `G`.
#[derive(Debug)]
pub struct Board<G: GoalTracker = NoGoals> {
    world: World,
    catalog: TileCatalog,
    matching: Matching,
    spawning: Spawning,
    goals: G,
    cascade_cap: u32,
    cascades: u32,
    state: State,
}

impl Board<NoGoals> {
    /// Creates a board without a goal tracker; the level never completes.
    pub fn new(config: &BoardConfig, out_events: &mut Vec<Event>) -> Result<Self, BoardError> {
        Self::with_goals(config, NoGoals, out_events)
    }
}

impl<G: GoalTracker> Board<G> {
    /// Validates the configuration and fills the board without matches.
    ///
    /// Spawn events are appended only when construction succeeds.
    pub fn with_goals(
        config: &BoardConfig,
        goals: G,
        out_events: &mut Vec<Event>,
    ) -> Result<Self, BoardError> {
        let catalog = config.validate()?;
        let empty = World::new(config.width, config.height);
        let mut board = Self::assemble(config, catalog, empty, goals);

        let mut events = Vec::new();
        board.fill_initial(&mut events)?;
        let mut rerolls = 0;
        while board.matching.has_matches(board.grid()) && rerolls < config.initial_fill_attempts {
            rerolls += 1;
            debug!(rerolls, "initial board contains matches; re-rolling");
            world::apply(&mut board.world, Command::ResetBoard, &mut events);
            board.fill_initial(&mut events)?;
        }
        if board.matching.has_matches(board.grid()) {
            warn!(
                rerolls,
                "initial board still contains matches after every re-roll"
            );
        }

        info!(
            width = config.width,
            height = config.height,
            kinds = board.catalog.len(),
            seed = config.seed,
            "board initialized"
        );
        out_events.append(&mut events);
        Ok(board)
    }

    /// Adopts a preset grid instead of generating one.
    ///
    /// Empty cells and existing matches are left for the first move to
    /// resolve; no events are produced.
    pub fn with_grid(config: &BoardConfig, grid: Grid, goals: G) -> Result<Self, BoardError> {
        let catalog = config.validate()?;
        if (grid.width(), grid.height()) != (config.width, config.height) {
            return Err(BoardError::GridMismatch {
                width: config.width,
                height: config.height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        if let Some(tile) = grid
            .cells()
            .filter_map(|(_, tile)| tile)
            .find(|tile| tile.kind().index() >= catalog.len())
        {
            return Err(BoardError::UnknownKind {
                kind: tile.kind().get(),
                catalog_len: catalog.len(),
            });
        }

        Ok(Self::assemble(config, catalog, World::with_grid(grid), goals))
    }

    fn assemble(config: &BoardConfig, catalog: TileCatalog, world: World, goals: G) -> Self {
        Self {
            world,
            catalog,
            matching: Matching::new(config.min_run_length),
            spawning: Spawning::new(SpawnConfig::new(config.seed, config.min_run_length)),
            goals,
            cascade_cap: config.cascade_cap,
            cascades: 0,
            state: State::Idle,
        }
    }

    fn fill_initial(&mut self, out_events: &mut Vec<Event>) -> Result<(), SpawnError> {
        let (width, height) = world::query::dimensions(&self.world);
        for column in 0..width {
            for row in 0..height {
                let cell = CellCoord::new(column, row);
                let kind =
                    self.spawning
                        .choose(world::query::grid(&self.world), cell, &self.catalog, None)?;
                world::apply(
                    &mut self.world,
                    Command::SpawnTile {
                        cell,
                        kind,
                        entry: SpawnEntry::InPlace,
                    },
                    out_events,
                );
            }
        }
        Ok(())
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle if self.goals.is_level_complete() => Phase::LevelComplete,
            State::Idle => Phase::Idle,
            State::Resolving(_) => Phase::Resolving,
            State::LevelComplete => Phase::LevelComplete,
        }
    }

    /// Reports whether a move is still resolving.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase() == Phase::Resolving
    }

    /// Reports whether the board accepts a new move.
    #[must_use]
    pub fn is_interactable(&self) -> bool {
        self.phase() == Phase::Idle
    }

    /// Number of batches cleared by the current or most recent move.
    #[must_use]
    pub const fn cascades(&self) -> u32 {
        self.cascades
    }

    /// Read-only view of the grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        world::query::grid(&self.world)
    }

    /// Catalog the board draws tile kinds from.
    #[must_use]
    pub const fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Goal tracker receiving match tallies.
    #[must_use]
    pub const fn goals(&self) -> &G {
        &self.goals
    }

    /// Applies a move and resolves every cascade it triggers.
    ///
    /// Returns the phase once resolution stops. A rejected move leaves the
    /// board untouched apart from a [`Event::MoveRejected`] notification.
    pub fn submit_move(&mut self, request: MoveRequest, out_events: &mut Vec<Event>) -> Phase {
        if !self.begin_move(request, out_events) {
            return self.phase();
        }
        loop {
            let phase = self.step(out_events);
            if phase != Phase::Resolving {
                return phase;
            }
        }
    }

    /// Accepts a move for step-by-step resolution.
    ///
    /// Nothing changes on the board until the first [`Board::step`].
    /// Returns `false` and reports the rejection when the board is busy or
    /// the level is complete.
    ///
    /// # Panics
    ///
    /// Panics when the request's start cell lies outside the board.
    pub fn begin_move(&mut self, request: MoveRequest, out_events: &mut Vec<Event>) -> bool {
        let reason = match self.phase() {
            Phase::Idle => None,
            Phase::Resolving => Some(RejectReason::Busy),
            Phase::LevelComplete => {
                self.state = State::LevelComplete;
                Some(RejectReason::LevelComplete)
            }
        };
        if let Some(reason) = reason {
            debug!(?request, ?reason, "move rejected");
            out_events.push(Event::MoveRejected { request, reason });
            return false;
        }

        assert!(
            self.grid().contains(request.start()),
            "move starts outside the board: {request:?}"
        );
        self.cascades = 0;
        self.state = State::Resolving(Stage::Rotate(request));
        true
    }

    /// Advances the resolving move by one committed step.
    ///
    /// Does nothing outside [`Phase::Resolving`].
    pub fn step(&mut self, out_events: &mut Vec<Event>) -> Phase {
        let stage = match std::mem::replace(&mut self.state, State::Idle) {
            State::Resolving(stage) => stage,
            other => {
                self.state = other;
                return self.phase();
            }
        };

        self.state = match stage {
            Stage::Rotate(request) => {
                debug!(?request, "rotating line");
                world::apply(&mut self.world, Command::RotateLine { request }, out_events);
                State::Resolving(Stage::Detect)
            }
            Stage::Detect => self.detect(out_events),
            Stage::Clear { cells, complete } => {
                debug!(cells = cells.len(), "clearing matches");
                world::apply(&mut self.world, Command::ClearCells { cells }, out_events);
                if complete {
                    info!(cascades = self.cascades, "level complete");
                    out_events.push(Event::LevelCompleted {
                        cascades: self.cascades,
                    });
                    State::LevelComplete
                } else {
                    State::Resolving(Stage::Collapse)
                }
            }
            Stage::Collapse => {
                debug!("collapsing columns");
                world::apply(&mut self.world, Command::CollapseColumns, out_events);
                State::Resolving(Stage::Refill)
            }
            Stage::Refill => {
                self.refill(out_events);
                State::Resolving(Stage::Detect)
            }
        };
        self.phase()
    }

    fn detect(&mut self, out_events: &mut Vec<Event>) -> State {
        if self.cascades >= self.cascade_cap {
            warn!(
                cascades = self.cascades,
                cap = self.cascade_cap,
                "cascade limit reached; leaving board as is"
            );
            out_events.push(Event::CascadeLimitReached {
                cascades: self.cascades,
            });
            return self.settle(out_events);
        }

        let matches = self.matching.detect(self.grid());
        if matches.is_empty() {
            return self.settle(out_events);
        }

        self.cascades += 1;
        debug!(
            cascade = self.cascades,
            cells = matches.len(),
            "matches found"
        );
        self.report(matches.cells());
        let complete = self.goals.is_level_complete();
        let cells = matches.into_vec();
        out_events.push(Event::MatchesFound {
            cascade: self.cascades,
            cells: cells.clone(),
        });
        State::Resolving(Stage::Clear { cells, complete })
    }

    /// Reports per-kind tallies in ascending kind order.
    fn report(&mut self, cells: &[CellCoord]) {
        let mut tallies = vec![0_u32; self.catalog.len()];
        for kind in cells.iter().filter_map(|cell| self.grid().kind_at(*cell)) {
            tallies[kind.index()] += 1;
        }
        for (kind, count) in self.catalog.kinds().zip(tallies) {
            if count > 0 {
                self.goals.report_match(kind, count);
            }
        }
    }

    fn refill(&mut self, out_events: &mut Vec<Event>) {
        let (width, _) = world::query::dimensions(&self.world);
        for column in 0..width {
            for cell in world::query::empty_cells_in_column(&self.world, column) {
                let grid = world::query::grid(&self.world);
                let kind = self.spawning.refill_kind(grid, cell, &self.catalog);
                world::apply(
                    &mut self.world,
                    Command::SpawnTile {
                        cell,
                        kind,
                        entry: SpawnEntry::AboveBoard,
                    },
                    out_events,
                );
            }
        }
    }

    fn settle(&mut self, out_events: &mut Vec<Event>) -> State {
        if self.goals.is_level_complete() {
            info!(cascades = self.cascades, "level complete");
            out_events.push(Event::LevelCompleted {
                cascades: self.cascades,
            });
            return State::LevelComplete;
        }
        debug!(cascades = self.cascades, "board settled");
        out_events.push(Event::BoardSettled {
            cascades: self.cascades,
        });
        State::Idle
    }
}
