//! Grid layout engine.
//!
//! # Responsibility
//! - Locate cells and free space in a `BlockRenderMap`.
//! - Move, slide, swap, scale, split and merge cells.
//!
//! # Invariants
//! - Mutators never touch their input; they return a new map or `None` when
//!   the operation does not apply.
//! - Mutator results contain no row without a block entry (`trim_map`), except
//!   `insert_empty_row`.
//! - Duplicate cell ids are a caller bug and trip a debug assertion.
//!
//! Width and identity are exchanged by three distinct operations:
//! `move_entry_to_empty` moves width only, `swap_entries` moves identity only,
//! `slide_entry` moves whole entries.

mod lookup;
mod ops;

pub use lookup::{
    find_adjacent_cell, find_free_grid_space, find_grid_position_by_id, trim_map, GridPosition,
    VerticalDirection,
};
pub use ops::{
    add_entry, add_row, balance, insert_empty_row, merge_row, move_entry, move_entry_to_empty,
    remove_entry, scale_entry, slide_entry, split_row, swap_entries, HorizontalSide,
    InsertPosition,
};
