//! Grid mutators.
//!
//! Each mutator borrows the input map and returns a new one, or `None` when the
//! operation does not apply. Results are trimmed unless noted otherwise.

use crate::grid::lookup::{
    find_adjacent_cell, find_free_grid_space, find_grid_position_by_id, trimmed,
    VerticalDirection,
};
use crate::model::id::{Id, IdSource};
use crate::model::render_map::{BlockRenderMap, RenderMapEntry, MAX_ENTRIES_PER_ROW};

/// Which of the first two row entries `balance` widens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalSide {
    Left,
    Right,
}

/// Map end used when adding blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Start,
    End,
}

fn debug_assert_unique(map: &BlockRenderMap) {
    debug_assert!(map.has_unique_ids(), "render map holds duplicate cell ids");
}

/// Exchanges `scale` between the entry holding `id` and the nearest empty cell.
///
/// Both cells keep their id and kind; only widths move.
pub fn move_entry_to_empty(
    id: &Id,
    direction: VerticalDirection,
    map: &BlockRenderMap,
) -> Option<BlockRenderMap> {
    debug_assert_unique(map);
    let entry = find_grid_position_by_id(id, map)?;
    let free = find_free_grid_space(direction, entry.row, entry.column, map)?;

    let mut rows = map.rows.clone();
    let entry_scale = rows[entry.row][entry.column].scale;
    let free_scale = rows[free.row][free.column].scale;
    rows[entry.row][entry.column].scale = free_scale;
    rows[free.row][free.column].scale = entry_scale;
    Some(trimmed(rows))
}

/// Moves the entry at `(current_row, current_column)` to the target cell.
///
/// A negative `target_row` prepends a new row, one at or past the row count
/// appends one. `target_column` is clamped to the target row width.
pub fn move_entry(
    current_row: usize,
    current_column: usize,
    target_row: isize,
    target_column: usize,
    map: &BlockRenderMap,
) -> Option<BlockRenderMap> {
    debug_assert_unique(map);
    let entry = map.entry(current_row, current_column)?.clone();

    let mut rows = map.rows.clone();
    rows[current_row].remove(current_column);

    match usize::try_from(target_row) {
        Err(_) => rows.insert(0, vec![entry]),
        Ok(target) if target >= map.row_count() => rows.push(vec![entry]),
        Ok(target) => {
            let cells = &mut rows[target];
            let column = target_column.min(cells.len());
            cells.insert(column, entry);
        }
    }
    Some(trimmed(rows))
}

/// Swaps the entry holding `id` with its adjacent cell; each keeps its own scale.
pub fn slide_entry(
    id: &Id,
    direction: VerticalDirection,
    map: &BlockRenderMap,
) -> Option<BlockRenderMap> {
    debug_assert_unique(map);
    let entry = find_grid_position_by_id(id, map)?;
    let neighbour = find_adjacent_cell(entry.row, entry.column, direction, map)?;

    let mut rows = map.rows.clone();
    let moving = rows[entry.row][entry.column].clone();
    let displaced = std::mem::replace(&mut rows[neighbour.row][neighbour.column], moving);
    rows[entry.row][entry.column] = displaced;
    Some(trimmed(rows))
}

/// Grows (`Down` shrinks) the scale of the entry holding `id`, floored at 1.
///
/// Not applicable to a lone entry: there is no sibling to take width from.
pub fn scale_entry(
    id: &Id,
    direction: VerticalDirection,
    map: &BlockRenderMap,
) -> Option<BlockRenderMap> {
    debug_assert_unique(map);
    let position = find_grid_position_by_id(id, map)?;
    if map.rows[position.row].len() < 2 {
        return None;
    }

    let mut rows = map.rows.clone();
    let entry = &mut rows[position.row][position.column];
    entry.scale = match direction {
        VerticalDirection::Up => entry.scale.saturating_add(1),
        VerticalDirection::Down => entry.scale.saturating_sub(1).max(1),
    };
    Some(trimmed(rows))
}

/// Widens the first (`Left`) or second (`Right`) entry of a row by one.
pub fn balance(row: usize, side: HorizontalSide, map: &BlockRenderMap) -> Option<BlockRenderMap> {
    debug_assert_unique(map);
    if map.row(row)?.len() < 2 {
        return None;
    }

    let mut rows = map.rows.clone();
    let column = match side {
        HorizontalSide::Left => 0,
        HorizontalSide::Right => 1,
    };
    let entry = &mut rows[row][column];
    entry.scale = entry.scale.saturating_add(1);
    Some(trimmed(rows))
}

/// Removes the first empty placeholder of a row.
pub fn merge_row(row: usize, map: &BlockRenderMap) -> Option<BlockRenderMap> {
    debug_assert_unique(map);
    let cells = map.row(row)?;
    if cells.len() < 2 {
        return None;
    }
    let empty = cells.iter().position(RenderMapEntry::is_empty)?;

    let mut rows = map.rows.clone();
    rows[row].remove(empty);
    Some(trimmed(rows))
}

/// Appends one empty placeholder with a fresh id to a row.
///
/// Not applicable to rows without cells or already holding
/// `MAX_ENTRIES_PER_ROW` cells.
pub fn split_row(row: usize, ids: &impl IdSource, map: &BlockRenderMap) -> Option<BlockRenderMap> {
    debug_assert_unique(map);
    let width = map.row(row)?.len();
    if width == 0 || width >= MAX_ENTRIES_PER_ROW {
        return None;
    }

    let mut rows = map.rows.clone();
    rows[row].push(RenderMapEntry::empty(ids.next_id()));
    Some(trimmed(rows))
}

/// Adds a single-cell row holding `id` at the start or end of the map.
pub fn add_row(id: Id, position: InsertPosition, map: &BlockRenderMap) -> BlockRenderMap {
    debug_assert!(
        find_grid_position_by_id(&id, map).is_none(),
        "block {id} is already placed"
    );
    let mut rows = Vec::with_capacity(map.row_count() + 1);
    let new_row = vec![RenderMapEntry::block(id)];
    match position {
        InsertPosition::Start => {
            rows.push(new_row);
            rows.extend(map.rows.iter().cloned());
        }
        InsertPosition::End => {
            rows.extend(map.rows.iter().cloned());
            rows.push(new_row);
        }
    }
    trimmed(rows)
}

/// Places `id` in the first empty cell found from the given end of the map.
///
/// The block inherits the placeholder's scale. Without a free cell a new row
/// is appended at the end.
pub fn add_entry(id: Id, position: InsertPosition, map: &BlockRenderMap) -> BlockRenderMap {
    debug_assert_unique(map);
    debug_assert!(
        find_grid_position_by_id(&id, map).is_none(),
        "block {id} is already placed"
    );
    let free = match position {
        InsertPosition::Start => find_free_grid_space(VerticalDirection::Down, 0, 0, map),
        InsertPosition::End => map.rows.last().and_then(|last| {
            find_free_grid_space(
                VerticalDirection::Up,
                map.row_count() - 1,
                last.len().saturating_sub(1),
                map,
            )
        }),
    };

    let Some(free) = free else {
        return add_row(id, InsertPosition::End, map);
    };
    let mut rows = map.rows.clone();
    let cell = &mut rows[free.row][free.column];
    *cell = RenderMapEntry::block(id).with_scale(cell.scale);
    trimmed(rows)
}

/// Deletes the cell holding `id`, dropping its row when nothing is left.
pub fn remove_entry(id: &Id, map: &BlockRenderMap) -> Option<BlockRenderMap> {
    debug_assert_unique(map);
    let position = find_grid_position_by_id(id, map)?;

    let mut rows = map.rows.clone();
    rows[position.row].remove(position.column);
    if rows[position.row].is_empty() {
        rows.remove(position.row);
    }
    Some(trimmed(rows))
}

/// Exchanges which entries occupy two cells; each cell keeps its scale.
pub fn swap_entries(
    source_row: usize,
    source_column: usize,
    target_row: usize,
    target_column: usize,
    map: &BlockRenderMap,
) -> Option<BlockRenderMap> {
    debug_assert_unique(map);
    if source_row == target_row && source_column == target_column {
        return None;
    }
    let source = map.entry(source_row, source_column)?.clone();
    let target = map.entry(target_row, target_column)?.clone();

    let target_scale = target.scale;

    let mut rows = map.rows.clone();
    rows[source_row][source_column] = target.with_scale(source.scale);
    rows[target_row][target_column] = source.with_scale(target_scale);
    Some(trimmed(rows))
}

/// Inserts a row without cells at `row_index` (`0..=row_count`).
///
/// Not trimmed: the new row is meant to receive a following `move_entry`.
pub fn insert_empty_row(row_index: usize, map: &BlockRenderMap) -> Option<BlockRenderMap> {
    if row_index > map.row_count() {
        return None;
    }
    let mut rows = map.rows.clone();
    rows.insert(row_index, Vec::new());
    Some(BlockRenderMap::new(rows))
}
