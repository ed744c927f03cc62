//! Read-only grid scans and the trim step shared by mutators.

use crate::model::id::Id;
use crate::model::render_map::{BlockRenderMap, RenderMapRow};

/// Cell coordinates in a `BlockRenderMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub row: usize,
    pub column: usize,
}

impl GridPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Scan direction through the row-major grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalDirection {
    /// Towards the first row / column.
    Up,
    /// Towards the last row / column.
    Down,
}

/// Drops every row without a block entry.
pub fn trim_map(map: &BlockRenderMap) -> BlockRenderMap {
    trimmed(map.rows.clone())
}

pub(crate) fn trimmed(rows: Vec<RenderMapRow>) -> BlockRenderMap {
    BlockRenderMap::new(
        rows.into_iter()
            .filter(|row| row.iter().any(|entry| entry.is_block()))
            .collect(),
    )
}

/// Row-major position of the cell holding `id`.
pub fn find_grid_position_by_id(id: &Id, map: &BlockRenderMap) -> Option<GridPosition> {
    map.rows.iter().enumerate().find_map(|(row, cells)| {
        cells
            .iter()
            .position(|entry| &entry.id == id)
            .map(|column| GridPosition::new(row, column))
    })
}

/// First empty cell from `(start_row, start_column)` in `direction`.
///
/// `Down` scans rows forward, starting at `start_column` on the first row and
/// at column 0 afterwards. `Up` scans rows backward, starting at `start_column`
/// on the first row and at the last column afterwards.
pub fn find_free_grid_space(
    direction: VerticalDirection,
    start_row: usize,
    start_column: usize,
    map: &BlockRenderMap,
) -> Option<GridPosition> {
    let rows = &map.rows;
    match direction {
        VerticalDirection::Down => {
            for (row, cells) in rows.iter().enumerate().skip(start_row) {
                let first = if row == start_row { start_column } else { 0 };
                if let Some(column) = cells
                    .iter()
                    .enumerate()
                    .skip(first)
                    .find_map(|(column, entry)| entry.is_empty().then_some(column))
                {
                    return Some(GridPosition::new(row, column));
                }
            }
            None
        }
        VerticalDirection::Up => {
            if start_row >= rows.len() {
                return None;
            }
            for row in (0..=start_row).rev() {
                let cells = &rows[row];
                let Some(last) = cells.len().checked_sub(1) else {
                    continue;
                };
                let first = if row == start_row {
                    start_column.min(last)
                } else {
                    last
                };
                if let Some(column) = (0..=first).rev().find(|&column| cells[column].is_empty()) {
                    return Some(GridPosition::new(row, column));
                }
            }
            None
        }
    }
}

/// Next existing cell from `(start_row, start_column)` in `direction`.
///
/// On the starting row this is the previous (`Up`) or next (`Down`) column;
/// otherwise the last or first cell of the nearest non-empty row.
pub fn find_adjacent_cell(
    start_row: usize,
    start_column: usize,
    direction: VerticalDirection,
    map: &BlockRenderMap,
) -> Option<GridPosition> {
    let rows = &map.rows;
    if start_row >= rows.len() {
        return None;
    }
    match direction {
        VerticalDirection::Up => (0..=start_row).rev().find_map(|row| {
            let width = rows[row].len();
            let column = if row == start_row {
                start_column.checked_sub(1).filter(|&column| column < width)
            } else {
                width.checked_sub(1)
            };
            column.map(|column| GridPosition::new(row, column))
        }),
        VerticalDirection::Down => (start_row..rows.len()).find_map(|row| {
            let column = if row == start_row { start_column + 1 } else { 0 };
            (column < rows[row].len()).then(|| GridPosition::new(row, column))
        }),
    }
}
