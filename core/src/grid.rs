use serde::{Deserialize, Serialize};

use crate::{CellCoord, Tile, TileKind};

/// Dense, fixed-size board storage where every cell is empty or holds one tile.
///
/// Cells are stored row-major with row zero at the bottom. Coordinates outside
/// the grid are a programming error and panic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![None; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Tile stored in the cell, if any.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Tile> {
        self.cells[self.index(cell)]
    }

    /// Kind of the tile stored in the cell, if any.
    #[must_use]
    pub fn kind_at(&self, cell: CellCoord) -> Option<TileKind> {
        self.get(cell).map(|tile| tile.kind())
    }

    /// Replaces the contents of the cell.
    pub fn set(&mut self, cell: CellCoord, tile: Option<Tile>) {
        let index = self.index(cell);
        self.cells[index] = tile;
    }

    /// Removes and returns the tile stored in the cell.
    pub fn take(&mut self, cell: CellCoord) -> Option<Tile> {
        let index = self.index(cell);
        self.cells[index].take()
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Reports whether every cell holds a tile.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Iterates over every cell and its contents in row-major order, bottom row first.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Option<Tile>)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % width, index / width), *tile)
        })
    }

    /// Iterates over the empty cells in row-major order, bottom row first.
    pub fn empty_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells()
            .filter(|(_, tile)| tile.is_none())
            .map(|(cell, _)| cell)
    }

    fn index(&self, cell: CellCoord) -> usize {
        assert!(
            self.contains(cell),
            "cell ({}, {}) lies outside the {}x{} grid",
            cell.column(),
            cell.row(),
            self.width,
            self.height
        );
        cell.row() as usize * self.width as usize + cell.column() as usize
    }
}
