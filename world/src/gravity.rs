//! Clearing and stable gravity compaction.

use tileshift_core::{CellCoord, ClearedTile, Grid, TileMove};

/// Removes the tiles stored in `cells`, skipping cells that are already empty.
pub(crate) fn clear_cells(grid: &mut Grid, cells: &[CellCoord]) -> Vec<ClearedTile> {
    cells
        .iter()
        .filter_map(|&cell| {
            grid.take(cell).map(|tile| ClearedTile {
                tile: tile.id(),
                kind: tile.kind(),
                cell,
            })
        })
        .collect()
}

/// Compacts every column toward row zero.
///
/// Tiles keep their relative order within a column; empties end up on top.
pub(crate) fn collapse(grid: &mut Grid) -> Vec<TileMove> {
    let mut moves = Vec::new();
    for column in 0..grid.width() {
        collapse_column(grid, column, &mut moves);
    }
    moves
}

fn collapse_column(grid: &mut Grid, column: u32, moves: &mut Vec<TileMove>) {
    let mut write_row = 0;
    for read_row in 0..grid.height() {
        let from = CellCoord::new(column, read_row);
        let Some(tile) = grid.get(from) else {
            continue;
        };

        if read_row != write_row {
            let to = CellCoord::new(column, write_row);
            grid.set(to, Some(tile));
            grid.set(from, None);
            moves.push(TileMove {
                tile: tile.id(),
                from,
                to,
            });
        }
        write_row += 1;
    }
}
