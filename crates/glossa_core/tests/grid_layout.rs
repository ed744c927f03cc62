use glossa_core::grid::{
    add_entry, add_row, balance, find_grid_position_by_id, insert_empty_row, merge_row,
    move_entry, move_entry_to_empty, remove_entry, scale_entry, slide_entry, split_row,
    swap_entries,
};
use glossa_core::{
    BlockRenderMap, GridPosition, HorizontalSide, Id, IdSource, InsertPosition, RenderMapEntry,
    VerticalDirection,
};
use proptest::prelude::*;
use std::cell::Cell;

struct SequentialIds(Cell<u32>);

impl SequentialIds {
    fn new() -> Self {
        Self(Cell::new(0))
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> Id {
        let next = self.0.get() + 1;
        self.0.set(next);
        Id::from(format!("generated-{next}"))
    }
}

fn block(id: &str) -> RenderMapEntry {
    RenderMapEntry::block(Id::from(id))
}

fn empty(id: &str) -> RenderMapEntry {
    RenderMapEntry::empty(Id::from(id))
}

fn ids(map: &BlockRenderMap) -> Vec<Vec<&str>> {
    map.rows
        .iter()
        .map(|row| row.iter().map(|entry| entry.id.as_str()).collect())
        .collect()
}

fn every_row_has_block(map: &BlockRenderMap) -> bool {
    map.rows.iter().all(|row| row.iter().any(RenderMapEntry::is_block))
}

#[test]
fn scale_scenario_grows_and_shrinks_with_floor() {
    let map = BlockRenderMap::new(vec![vec![block("A"), block("B")]]);

    let grown = scale_entry(&Id::from("A"), VerticalDirection::Up, &map).expect("two cells");
    assert_eq!(grown.rows[0][0].scale, 2);
    assert_eq!(grown.rows[0][1].scale, 1);

    let shrunk = scale_entry(&Id::from("B"), VerticalDirection::Down, &grown).expect("two cells");
    assert_eq!(shrunk.rows[0][1].scale, 1);

    let lone = BlockRenderMap::new(vec![vec![block("A")]]);
    assert!(scale_entry(&Id::from("A"), VerticalDirection::Up, &lone).is_none());
}

#[test]
fn move_to_negative_row_prepends() {
    let map = BlockRenderMap::new(vec![vec![block("A"), block("B")], vec![block("C")]]);
    let moved = move_entry(1, 0, -1, 0, &map).expect("source exists");
    assert_eq!(ids(&moved), vec![vec!["C"], vec!["A", "B"]]);
}

#[test]
fn move_past_last_row_appends_and_trims_source() {
    let map = BlockRenderMap::new(vec![vec![block("A"), empty("e")], vec![block("B")]]);
    let moved = move_entry(0, 0, 5, 0, &map).expect("source exists");
    assert_eq!(ids(&moved), vec![vec!["B"], vec!["A"]]);
}

#[test]
fn move_within_row_does_not_duplicate() {
    let map = BlockRenderMap::new(vec![vec![block("A"), block("B"), block("C")]]);
    let moved = move_entry(0, 0, 0, 2, &map).expect("source exists");
    assert_eq!(ids(&moved), vec![vec!["B", "C", "A"]]);
    assert!(moved.has_unique_ids());
}

#[test]
fn move_from_missing_cell_is_not_applicable() {
    let map = BlockRenderMap::new(vec![vec![block("A")]]);
    assert!(move_entry(3, 0, 0, 0, &map).is_none());
    assert!(move_entry(0, 4, 0, 0, &map).is_none());
}

#[test]
fn removing_last_cell_drops_row() {
    let map = BlockRenderMap::new(vec![vec![block("A")], vec![block("B"), empty("e")]]);
    let removed = remove_entry(&Id::from("A"), &map).expect("A is placed");
    assert_eq!(ids(&removed), vec![vec!["B", "e"]]);

    let cleared = remove_entry(&Id::from("B"), &removed).expect("B is placed");
    assert!(cleared.is_empty());
}

#[test]
fn width_identity_and_whole_entry_moves_stay_distinct() {
    let map = BlockRenderMap::new(vec![vec![
        block("A").with_scale(3),
        empty("e").with_scale(1),
    ]]);

    let widths = move_entry_to_empty(&Id::from("A"), VerticalDirection::Down, &map)
        .expect("free cell to the right");
    assert_eq!(ids(&widths), vec![vec!["A", "e"]]);
    assert_eq!(widths.rows[0][0].scale, 1);
    assert_eq!(widths.rows[0][1].scale, 3);

    let swapped = swap_entries(0, 0, 0, 1, &map).expect("distinct cells");
    assert_eq!(ids(&swapped), vec![vec!["e", "A"]]);
    assert_eq!(swapped.rows[0][0].scale, 3);
    assert_eq!(swapped.rows[0][1].scale, 1);

    let slid = slide_entry(&Id::from("A"), VerticalDirection::Down, &map).expect("neighbour");
    assert_eq!(ids(&slid), vec![vec!["e", "A"]]);
    assert_eq!(slid.rows[0][0].scale, 1);
    assert_eq!(slid.rows[0][1].scale, 3);
}

#[test]
fn add_entry_fills_placeholder_before_appending_row() {
    let map = BlockRenderMap::new(vec![vec![block("A"), empty("e").with_scale(2)]]);

    let filled = add_entry(Id::from("B"), InsertPosition::Start, &map);
    assert_eq!(ids(&filled), vec![vec!["A", "B"]]);
    assert!(filled.rows[0][1].is_block());
    assert_eq!(filled.rows[0][1].scale, 2);

    let appended = add_entry(Id::from("C"), InsertPosition::End, &filled);
    assert_eq!(ids(&appended), vec![vec!["A", "B"], vec!["C"]]);

    let first = add_row(Id::from("D"), InsertPosition::Start, &appended);
    assert_eq!(find_grid_position_by_id(&Id::from("D"), &first), Some(GridPosition::new(0, 0)));
}

#[test]
fn empty_row_survives_until_next_trimming_mutator() {
    let map = BlockRenderMap::new(vec![vec![block("A"), block("B")]]);
    let spaced = insert_empty_row(1, &map).expect("index within bounds");
    assert_eq!(spaced.row_count(), 2);
    assert!(insert_empty_row(3, &map).is_none());

    let moved = move_entry(0, 1, 1, 0, &spaced).expect("source exists");
    assert_eq!(ids(&moved), vec![vec!["A"], vec!["B"]]);
}

#[derive(Debug, Clone)]
enum Step {
    MoveToEmpty(usize, bool),
    Move(usize, usize, isize, usize),
    Slide(usize, bool),
    Scale(usize, bool),
    Balance(usize, bool),
    Merge(usize),
    Split(usize),
    AddEntry(bool),
    AddRow(bool),
    Remove(usize),
    Swap(usize, usize, usize, usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..12, any::<bool>()).prop_map(|(cell, up)| Step::MoveToEmpty(cell, up)),
        (0usize..5, 0usize..5, -1isize..6, 0usize..5)
            .prop_map(|(r, c, tr, tc)| Step::Move(r, c, tr, tc)),
        (0usize..12, any::<bool>()).prop_map(|(cell, up)| Step::Slide(cell, up)),
        (0usize..12, any::<bool>()).prop_map(|(cell, up)| Step::Scale(cell, up)),
        (0usize..5, any::<bool>()).prop_map(|(row, left)| Step::Balance(row, left)),
        (0usize..5).prop_map(Step::Merge),
        (0usize..5).prop_map(Step::Split),
        any::<bool>().prop_map(Step::AddEntry),
        any::<bool>().prop_map(Step::AddRow),
        (0usize..12).prop_map(Step::Remove),
        (0usize..5, 0usize..5, 0usize..5, 0usize..5)
            .prop_map(|(a, b, c, d)| Step::Swap(a, b, c, d)),
    ]
}

fn direction(up: bool) -> VerticalDirection {
    if up {
        VerticalDirection::Up
    } else {
        VerticalDirection::Down
    }
}

fn position(start: bool) -> InsertPosition {
    if start {
        InsertPosition::Start
    } else {
        InsertPosition::End
    }
}

fn nth_id(map: &BlockRenderMap, index: usize) -> Option<Id> {
    let all: Vec<&Id> = map.rows.iter().flatten().map(|entry| &entry.id).collect();
    if all.is_empty() {
        return None;
    }
    Some(all[index % all.len()].clone())
}

fn apply(step: &Step, ids: &SequentialIds, map: &BlockRenderMap) -> Option<BlockRenderMap> {
    match *step {
        Step::MoveToEmpty(cell, up) => move_entry_to_empty(&nth_id(map, cell)?, direction(up), map),
        Step::Move(row, column, target_row, target_column) => {
            move_entry(row, column, target_row, target_column, map)
        }
        Step::Slide(cell, up) => slide_entry(&nth_id(map, cell)?, direction(up), map),
        Step::Scale(cell, up) => scale_entry(&nth_id(map, cell)?, direction(up), map),
        Step::Balance(row, left) => {
            let side = if left {
                HorizontalSide::Left
            } else {
                HorizontalSide::Right
            };
            balance(row, side, map)
        }
        Step::Merge(row) => merge_row(row, map),
        Step::Split(row) => split_row(row, ids, map),
        Step::AddEntry(start) => Some(add_entry(ids.next_id(), position(start), map)),
        Step::AddRow(start) => Some(add_row(ids.next_id(), position(start), map)),
        Step::Remove(cell) => remove_entry(&nth_id(map, cell)?, map),
        Step::Swap(a, b, c, d) => swap_entries(a, b, c, d, map),
    }
}

proptest! {
    #[test]
    fn mutator_sequences_keep_ids_unique_and_rows_trimmed(
        steps in prop::collection::vec(step_strategy(), 1..40),
    ) {
        let ids = SequentialIds::new();
        let mut map = BlockRenderMap::new(vec![
            vec![block("A"), empty("e1")],
            vec![block("B"), block("C"), empty("e2")],
        ]);

        for step in &steps {
            if let Some(next) = apply(step, &ids, &map) {
                prop_assert!(next.has_unique_ids(), "{step:?} duplicated an id in {next:?}");
                prop_assert!(every_row_has_block(&next), "{step:?} left an untrimmed row");
                prop_assert!(next.rows.iter().flatten().all(|entry| entry.scale >= 1));
                map = next;
            }
        }
    }

    #[test]
    fn split_then_merge_restores_row(width in 1usize..9) {
        let ids = SequentialIds::new();
        let row: Vec<RenderMapEntry> = (0..width).map(|n| block(&format!("b{n}"))).collect();
        let map = BlockRenderMap::new(vec![row]);

        let split = split_row(0, &ids, &map).expect("row below the cell limit");
        prop_assert_eq!(split.rows[0].len(), width + 1);
        let merged = merge_row(0, &split).expect("one placeholder to merge");
        prop_assert_eq!(merged, map);
    }
}
