#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that finds horizontal and vertical runs of same-kind tiles.

use std::ops::ControlFlow;

use tileshift_core::{CellCoord, Grid, MatchSet, MIN_RUN_LENGTH};

/// Match detector configured with the minimum run length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Matching {
    min_run_length: u32,
}

impl Matching {
    /// Creates a detector that reports runs of at least `min_run_length` tiles.
    #[must_use]
    pub const fn new(min_run_length: u32) -> Self {
        Self { min_run_length }
    }

    /// Minimum run length this detector reports.
    #[must_use]
    pub const fn min_run_length(&self) -> u32 {
        self.min_run_length
    }

    /// Collects every cell that belongs to a qualifying run.
    ///
    /// Rows are scanned left to right from the bottom row up, then columns
    /// bottom to top from the leftmost column. A cell that is part of both a
    /// horizontal and a vertical run is reported once, at its first discovery.
    #[must_use]
    pub fn detect(&self, grid: &Grid) -> MatchSet {
        let mut matches = MatchSet::new();
        let _ = self.visit_runs(grid, |run| {
            for &cell in run {
                let _ = matches.insert(cell);
            }
            ControlFlow::Continue(())
        });
        matches
    }

    /// Reports whether the grid contains at least one qualifying run.
    #[must_use]
    pub fn has_matches(&self, grid: &Grid) -> bool {
        self.visit_runs(grid, |_| ControlFlow::Break(())).is_break()
    }

    fn visit_runs<F>(&self, grid: &Grid, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&[CellCoord]) -> ControlFlow<()>,
    {
        let mut line = Vec::with_capacity(grid.width().max(grid.height()) as usize);

        for row in 0..grid.height() {
            line.clear();
            line.extend((0..grid.width()).map(|column| CellCoord::new(column, row)));
            self.scan_line(grid, &line, &mut visit)?;
        }

        for column in 0..grid.width() {
            line.clear();
            line.extend((0..grid.height()).map(|row| CellCoord::new(column, row)));
            self.scan_line(grid, &line, &mut visit)?;
        }

        ControlFlow::Continue(())
    }

    /// Greedy scan: each run is examined once and the pointer jumps past it.
    fn scan_line<F>(&self, grid: &Grid, line: &[CellCoord], visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&[CellCoord]) -> ControlFlow<()>,
    {
        let min_run = self.min_run_length as usize;
        let mut start = 0;

        while start < line.len() {
            let Some(kind) = grid.kind_at(line[start]) else {
                start += 1;
                continue;
            };

            let mut end = start + 1;
            while end < line.len() && grid.kind_at(line[end]) == Some(kind) {
                end += 1;
            }

            if end - start >= min_run {
                visit(&line[start..end])?;
            }
            start = end;
        }

        ControlFlow::Continue(())
    }
}

impl Default for Matching {
    fn default() -> Self {
        Self::new(MIN_RUN_LENGTH)
    }
}
