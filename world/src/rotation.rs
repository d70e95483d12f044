//! Single-step line rotation applied when the player shifts a row or column.

use tileshift_core::{CellCoord, Direction, Grid, MoveRequest, TileMove};

/// Rotates the line selected by the request by exactly one cell, wrapping the
/// tile that leaves one end onto the other end.
///
/// Empty cells travel with the line like any tile. Returns the relocation of
/// every tile in the line.
pub(crate) fn rotate_line(grid: &mut Grid, request: MoveRequest) -> Vec<TileMove> {
    assert!(
        grid.contains(request.start()),
        "move starts outside the {}x{} grid",
        grid.width(),
        grid.height()
    );

    let cells = line_cells(grid, request);
    let len = cells.len();
    let before: Vec<_> = cells.iter().map(|cell| grid.get(*cell)).collect();

    let mut moves = Vec::with_capacity(len);
    for (index, tile) in before.into_iter().enumerate() {
        let destination = match request.direction() {
            Direction::Right | Direction::Up => (index + 1) % len,
            Direction::Left | Direction::Down => (index + len - 1) % len,
        };
        grid.set(cells[destination], tile);
        if let Some(tile) = tile {
            moves.push(TileMove {
                tile: tile.id(),
                from: cells[index],
                to: cells[destination],
            });
        }
    }
    moves
}

/// Cells of the row or column selected by the request, ordered by increasing index.
fn line_cells(grid: &Grid, request: MoveRequest) -> Vec<CellCoord> {
    let line = request.line();
    if request.direction().is_horizontal() {
        (0..grid.width())
            .map(|column| CellCoord::new(column, line))
            .collect()
    } else {
        (0..grid.height())
            .map(|row| CellCoord::new(line, row))
            .collect()
    }
}
