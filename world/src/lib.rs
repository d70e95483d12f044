#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Tileshift.

mod gravity;
mod rotation;

use tileshift_core::{CellCoord, Command, Event, Grid, SpawnEntry, Tile, TileId};
use tracing::trace;

/// Represents the authoritative Tileshift board state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    next_tile_id: u32,
    entry_depth: Vec<u32>,
}

impl World {
    /// Creates an empty world with the provided board dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_grid(Grid::new(width, height))
    }

    /// Creates a world that adopts an existing grid.
    ///
    /// New tiles receive identifiers above the largest identifier present.
    #[must_use]
    pub fn with_grid(grid: Grid) -> Self {
        let next_tile_id = grid
            .cells()
            .filter_map(|(_, tile)| tile)
            .map(|tile| tile.id().get().saturating_add(1))
            .max()
            .unwrap_or(0);
        let entry_depth = vec![0; grid.width() as usize];
        Self {
            grid,
            next_tile_id,
            entry_depth,
        }
    }

    fn allocate_tile_id(&mut self) -> TileId {
        let id = TileId::new(self.next_tile_id);
        self.next_tile_id = self.next_tile_id.wrapping_add(1);
        id
    }

    fn reset_entry_depth(&mut self) {
        self.entry_depth.fill(0);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Every command that changes the board appends exactly one event describing
/// the committed change; commands that change nothing emit nothing.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    trace!(?command, "applying board command");
    match command {
        Command::RotateLine { request } => {
            let moves = rotation::rotate_line(&mut world.grid, request);
            if !moves.is_empty() {
                out_events.push(Event::LineRotated {
                    direction: request.direction(),
                    moves,
                });
            }
        }
        Command::ClearCells { cells } => {
            let tiles = gravity::clear_cells(&mut world.grid, &cells);
            if !tiles.is_empty() {
                out_events.push(Event::TilesCleared { tiles });
            }
        }
        Command::CollapseColumns => {
            world.reset_entry_depth();
            let moves = gravity::collapse(&mut world.grid);
            if !moves.is_empty() {
                out_events.push(Event::TilesCollapsed { moves });
            }
        }
        Command::SpawnTile { cell, kind, entry } => {
            debug_assert!(
                world.grid.get(cell).is_none(),
                "spawning into occupied cell {cell:?}"
            );
            let from = match entry {
                SpawnEntry::InPlace => cell,
                SpawnEntry::AboveBoard => {
                    let depth = &mut world.entry_depth[cell.column() as usize];
                    let from = CellCoord::new(cell.column(), world.grid.height() + *depth);
                    *depth += 1;
                    from
                }
            };
            let id = world.allocate_tile_id();
            world.grid.set(cell, Some(Tile::new(id, kind)));
            out_events.push(Event::TileSpawned {
                tile: id,
                kind,
                from,
                to: cell,
            });
        }
        Command::ResetBoard => {
            world.grid.clear();
            world.reset_entry_depth();
            out_events.push(Event::BoardReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tileshift_core::{CellCoord, Grid, TileKind};

    /// Provides read-only access to the board grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Board dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.grid.width(), world.grid.height())
    }

    /// Kind of the tile in the cell, if any.
    #[must_use]
    pub fn kind_at(world: &World, cell: CellCoord) -> Option<TileKind> {
        world.grid.kind_at(cell)
    }

    /// Empty cells of a column from the bottom up.
    #[must_use]
    pub fn empty_cells_in_column(world: &World, column: u32) -> Vec<CellCoord> {
        (0..world.grid.height())
            .map(|row| CellCoord::new(column, row))
            .filter(|cell| world.grid.get(*cell).is_none())
            .collect()
    }
}
