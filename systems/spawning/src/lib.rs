#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that picks kinds for new tiles.
//!
//! Picks avoid completing a run with tiles already placed to the left or
//! below the target cell, the two directions filled earlier by a
//! column-by-column, bottom-to-top fill.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tileshift_core::{CellCoord, Grid, TileCatalog, TileKind, MIN_RUN_LENGTH};
use tracing::debug;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    min_run_length: u32,
}

impl Config {
    /// Creates a new configuration using the provided seed and run length.
    #[must_use]
    pub const fn new(rng_seed: u64, min_run_length: u32) -> Self {
        Self {
            rng_seed,
            min_run_length,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0, MIN_RUN_LENGTH)
    }
}

/// Failure to produce a tile kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Every catalog kind was excluded, or the catalog is empty.
    #[error("no tile type is available to spawn")]
    NoCandidates,
}

/// Seeded tile kind generator.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    min_run_length: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            min_run_length: config.min_run_length,
        }
    }

    /// Picks a kind for `cell` that does not complete a run with the tiles
    /// already placed to its left or below.
    ///
    /// Falls back to any candidate when every kind would complete a run, so a
    /// refill never stalls.
    pub fn choose(
        &mut self,
        grid: &Grid,
        cell: CellCoord,
        catalog: &TileCatalog,
        exclude: Option<TileKind>,
    ) -> Result<TileKind, SpawnError> {
        let candidates = catalog.candidates(exclude);
        let safe: Vec<TileKind> = candidates
            .iter()
            .copied()
            .filter(|kind| !completes_run(grid, cell, *kind, self.min_run_length))
            .collect();

        if let Some(kind) = safe.choose(&mut self.rng) {
            return Ok(*kind);
        }

        debug!(?cell, "every tile kind completes a run; spawning unconstrained");
        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(SpawnError::NoCandidates)
    }

    /// Picks a kind for a refill cell the way [`Spawning::choose`] does.
    ///
    /// Never fails: a [`TileCatalog`] cannot be empty and nothing is
    /// excluded, so kind zero always exists.
    pub fn refill_kind(
        &mut self,
        grid: &Grid,
        cell: CellCoord,
        catalog: &TileCatalog,
    ) -> TileKind {
        self.choose(grid, cell, catalog, None).unwrap_or(TileKind::new(0))
    }

    /// Picks any catalog kind other than `exclude`, uniformly.
    pub fn choose_any(
        &mut self,
        catalog: &TileCatalog,
        exclude: Option<TileKind>,
    ) -> Result<TileKind, SpawnError> {
        catalog
            .candidates(exclude)
            .choose(&mut self.rng)
            .copied()
            .ok_or(SpawnError::NoCandidates)
    }
}

/// Reports whether placing `kind` at `cell` would complete a run together
/// with the tiles immediately to the left or immediately below.
#[must_use]
pub fn completes_run(grid: &Grid, cell: CellCoord, kind: TileKind, min_run_length: u32) -> bool {
    let preceding = min_run_length.saturating_sub(1);
    if preceding == 0 {
        return true;
    }

    let holds_kind =
        |column: u32, row: u32| grid.kind_at(CellCoord::new(column, row)) == Some(kind);
    let left = cell.column() >= preceding
        && (1..=preceding).all(|step| holds_kind(cell.column() - step, cell.row()));
    let below = cell.row() >= preceding
        && (1..=preceding).all(|step| holds_kind(cell.column(), cell.row() - step));

    left || below
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileshift_core::{Tile, TileId};

    fn place(grid: &mut Grid, column: u32, row: u32, kind: u8) {
        grid.set(
            CellCoord::new(column, row),
            Some(Tile::new(TileId::new(column * 100 + row), TileKind::new(kind))),
        );
    }

    #[test]
    fn detects_runs_to_the_left_and_below() {
        let mut grid = Grid::new(3, 3);
        place(&mut grid, 0, 2, 1);
        place(&mut grid, 1, 2, 1);
        place(&mut grid, 2, 0, 2);
        place(&mut grid, 2, 1, 2);

        let target = CellCoord::new(2, 2);
        assert!(completes_run(&grid, target, TileKind::new(1), 3));
        assert!(completes_run(&grid, target, TileKind::new(2), 3));
        assert!(!completes_run(&grid, target, TileKind::new(0), 3));
    }

    #[test]
    fn ignores_cells_to_the_right_and_above() {
        let mut grid = Grid::new(3, 3);
        place(&mut grid, 1, 0, 1);
        place(&mut grid, 2, 0, 1);
        place(&mut grid, 0, 1, 1);
        place(&mut grid, 0, 2, 1);

        assert!(!completes_run(&grid, CellCoord::new(0, 0), TileKind::new(1), 3));
    }

    #[test]
    fn a_single_matching_neighbour_is_not_a_run() {
        let mut grid = Grid::new(3, 1);
        place(&mut grid, 1, 0, 1);
        assert!(!completes_run(&grid, CellCoord::new(2, 0), TileKind::new(1), 3));
    }

    #[test]
    fn choose_avoids_completing_a_run() {
        let catalog = TileCatalog::new(["a", "b"]).expect("valid catalog");
        let mut grid = Grid::new(3, 1);
        place(&mut grid, 0, 0, 0);
        place(&mut grid, 1, 0, 0);

        let mut spawning = Spawning::new(Config::new(7, 3));
        for _ in 0..32 {
            let kind = spawning
                .choose(&grid, CellCoord::new(2, 0), &catalog, None)
                .expect("catalog has candidates");
            assert_eq!(kind, TileKind::new(1));
        }
    }

    #[test]
    fn choose_falls_back_when_no_kind_is_safe() {
        let catalog = TileCatalog::new(["only"]).expect("valid catalog");
        let mut grid = Grid::new(3, 1);
        place(&mut grid, 0, 0, 0);
        place(&mut grid, 1, 0, 0);

        let mut spawning = Spawning::new(Config::default());
        assert_eq!(
            spawning.choose(&grid, CellCoord::new(2, 0), &catalog, None),
            Ok(TileKind::new(0))
        );
    }

    #[test]
    fn excluding_the_only_kind_is_an_error() {
        let catalog = TileCatalog::new(["only"]).expect("valid catalog");
        let grid = Grid::new(1, 1);
        let mut spawning = Spawning::new(Config::default());

        assert_eq!(
            spawning.choose(&grid, CellCoord::new(0, 0), &catalog, Some(TileKind::new(0))),
            Err(SpawnError::NoCandidates)
        );
        assert_eq!(
            spawning.choose_any(&catalog, Some(TileKind::new(0))),
            Err(SpawnError::NoCandidates)
        );
    }

    #[test]
    fn refill_kind_always_yields_a_catalog_kind() {
        let single = TileCatalog::new(["only"]).expect("valid catalog");
        let mut grid = Grid::new(1, 3);
        place(&mut grid, 0, 0, 0);
        place(&mut grid, 0, 1, 0);

        let mut spawning = Spawning::new(Config::default());
        assert_eq!(
            spawning.refill_kind(&grid, CellCoord::new(0, 2), &single),
            TileKind::new(0)
        );

        let pair = TileCatalog::new(["a", "b"]).expect("valid catalog");
        for _ in 0..16 {
            assert_eq!(
                spawning.refill_kind(&grid, CellCoord::new(0, 2), &pair),
                TileKind::new(1),
                "the constrained pick still applies"
            );
        }
    }

    #[test]
    fn choose_any_respects_exclusion() {
        let catalog = TileCatalog::new(["a", "b", "c"]).expect("valid catalog");
        let mut spawning = Spawning::new(Config::new(99, 3));
        for _ in 0..64 {
            let kind = spawning
                .choose_any(&catalog, Some(TileKind::new(2)))
                .expect("two candidates remain");
            assert_ne!(kind, TileKind::new(2));
        }
    }
}
