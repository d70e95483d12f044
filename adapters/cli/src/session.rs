//! Interactive play loop over a line-oriented command stream.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use glam::Vec2;
use tileshift_core::{CellCoord, Direction, Event, Grid, MoveRequest, RejectReason, TileCatalog};
use tileshift_rendering::{BoardLayout, Planner, TransitionTiming};
use tileshift_system_cascade::{Board, Phase};
use tileshift_system_goals::LevelGoals;
use tileshift_system_movement::Movement;
use tracing::{debug, info};

use crate::{
    command::{self, Input},
    settings::Settings,
};

/// How board events are echoed to the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum EventFormat {
    /// One human-readable line per event.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
    /// Events are not printed.
    Off,
}

/// Whether the loop keeps reading commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Board, input system and presentation planner driven by text commands.
pub(crate) struct Session<W: Write> {
    board: Board<LevelGoals>,
    movement: Movement,
    planner: Planner,
    format: EventFormat,
    out: W,
}

impl<W: Write> Session<W> {
    /// Builds the board described by `settings` and prints its opening state.
    pub(crate) fn start(settings: &Settings, format: EventFormat, out: W) -> Result<Self> {
        let catalog = settings.board.validate().context("invalid board settings")?;
        let goals =
            LevelGoals::from_specs(&settings.goals, &catalog).context("invalid level goals")?;
        let mut events = Vec::new();
        let board = Board::with_goals(&settings.board, goals, &mut events)
            .context("failed to create board")?;
        let layout = BoardLayout::new(
            settings.board.width,
            settings.board.height,
            Vec2::ONE,
            Vec2::splat(BoardLayout::DEFAULT_SPACING),
        )
        .context("failed to lay out board")?;

        let mut session = Self {
            board,
            movement: Movement::new(settings.input),
            planner: Planner::new(layout, TransitionTiming::default()),
            format,
            out,
        };

        if session.format == EventFormat::Json {
            session.emit(&events)?;
        } else {
            session.legend()?;
            session.show()?;
        }
        Ok(session)
    }

    /// Executes commands until input ends, `quit` is read or the level completes.
    pub(crate) fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        if self.board.phase() == Phase::LevelComplete {
            return self.finish();
        }
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let parsed = match command::parse(&line) {
                Ok(Some(parsed)) => parsed,
                Ok(None) => continue,
                Err(error) => {
                    writeln!(self.out, "error: {error}")?;
                    continue;
                }
            };
            debug!(?parsed, "command");

            if self.execute(parsed)? == Flow::Stop {
                break;
            }
            if self.board.phase() == Phase::LevelComplete {
                return self.finish();
            }
        }
        self.out.flush().context("failed to flush output")
    }

    fn finish(&mut self) -> Result<()> {
        info!("level complete; ending session");
        if self.format != EventFormat::Json {
            writeln!(self.out, "level complete")?;
            self.goals()?;
        }
        self.out.flush().context("failed to flush output")
    }

    fn execute(&mut self, input: Input) -> Result<Flow> {
        match input {
            Input::Move { direction, cell } => self.submit(MoveRequest::new(direction, cell))?,
            Input::Swipe { cell, delta } => match self.movement.handle(cell, delta) {
                Some(request) => self.submit(request)?,
                None => writeln!(self.out, "swipe too short")?,
            },
            Input::Show => self.show()?,
            Input::Goals => self.goals()?,
            Input::Quit => return Ok(Flow::Stop),
        }
        Ok(Flow::Continue)
    }

    fn submit(&mut self, request: MoveRequest) -> Result<()> {
        let grid = self.board.grid();
        if !grid.contains(request.start()) {
            let start = request.start();
            writeln!(
                self.out,
                "error: cell ({}, {}) is outside the {}x{} board",
                start.column(),
                start.row(),
                grid.width(),
                grid.height()
            )?;
            return Ok(());
        }

        let mut events = Vec::new();
        let _ = self.board.submit_move(request, &mut events);
        self.emit(&events)?;
        if self.format != EventFormat::Json {
            self.show()?;
        }
        Ok(())
    }

    fn emit(&mut self, events: &[Event]) -> Result<()> {
        for event in events {
            match self.format {
                EventFormat::Text => {
                    let line = describe(event, self.board.catalog(), &self.planner);
                    writeln!(self.out, "{line}")?;
                }
                EventFormat::Json => {
                    let line = serde_json::to_string(event).context("failed to encode event")?;
                    writeln!(self.out, "{line}")?;
                }
                EventFormat::Off => {}
            }
        }
        Ok(())
    }

    fn legend(&mut self) -> Result<()> {
        let legend: Vec<String> = self
            .board
            .catalog()
            .kinds()
            .map(|kind| {
                let name = self.board.catalog().name(kind).unwrap_or("?");
                format!("{}={name}", symbol(kind.index()))
            })
            .collect();
        writeln!(self.out, "tiles: {}", legend.join(" "))?;
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        write!(self.out, "{}", render(self.board.grid()))?;
        Ok(())
    }

    fn goals(&mut self) -> Result<()> {
        let goals = self.board.goals().progress();
        if goals.is_empty() {
            writeln!(self.out, "goals: none")?;
            return Ok(());
        }
        for goal in goals {
            let name = self.board.catalog().name(goal.kind()).unwrap_or("?");
            writeln!(
                self.out,
                "goal {name}: {}/{} collected",
                goal.required() - goal.remaining(),
                goal.required()
            )?;
        }
        Ok(())
    }
}

/// Letter used for the kind at `index`; `.` is reserved for empty cells.
fn symbol(index: usize) -> char {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    LETTERS.get(index).map_or('#', |letter| char::from(*letter))
}

/// Draws the grid top row first.
fn render(grid: &Grid) -> String {
    let mut text = String::with_capacity(((grid.width() + 1) * grid.height()) as usize);
    for row in (0..grid.height()).rev() {
        for column in 0..grid.width() {
            let cell = CellCoord::new(column, row);
            text.push(grid.kind_at(cell).map_or('.', |kind| symbol(kind.index())));
        }
        text.push('\n');
    }
    text
}

fn describe(event: &Event, catalog: &TileCatalog, planner: &Planner) -> String {
    let timing = planner
        .plan(event)
        .map(|transition| format!(" ({:.2}s)", transition.duration()))
        .unwrap_or_default();

    match event {
        Event::LineRotated { direction, moves } => {
            let direction = match direction {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
            };
            format!("rotated {direction}: {} tiles{timing}", moves.len())
        }
        Event::MatchesFound { cascade, cells } => {
            format!("cascade {cascade}: {} matched cells", cells.len())
        }
        Event::TilesCleared { tiles } => format!("cleared {} tiles{timing}", tiles.len()),
        Event::TilesCollapsed { moves } => format!("{} tiles fell{timing}", moves.len()),
        Event::TileSpawned { kind, to, .. } => format!(
            "spawned {} at ({}, {}){timing}",
            catalog.name(*kind).unwrap_or("?"),
            to.column(),
            to.row()
        ),
        Event::BoardReset => "board reset".to_owned(),
        Event::CascadeLimitReached { cascades } => {
            format!("cascade limit reached after {cascades} batches")
        }
        Event::LevelCompleted { cascades } => {
            format!("goals met after {cascades} cascades")
        }
        Event::BoardSettled { cascades } => format!("settled after {cascades} cascades"),
        Event::MoveRejected { reason, .. } => match reason {
            RejectReason::Busy => "move rejected: board is busy".to_owned(),
            RejectReason::LevelComplete => "move rejected: level is complete".to_owned(),
        },
    }
}
