//! Block placement grid model.
//!
//! # Responsibility
//! - Define grid cells and the row-major map consumed by the renderer.
//!
//! # Invariants
//! - `scale >= 1` for every entry.
//! - A block id occupies at most one cell of a map.
//! - Persisted maps carry no row made only of empty placeholders.

use crate::model::id::Id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound of cells per row accepted by `split_row`.
pub const MAX_ENTRIES_PER_ROW: usize = 10;

/// Cell occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Block,
    Empty,
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRenderMapEntry")]
pub struct RenderMapEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub id: Id,
    /// Columns this cell spans relative to its row siblings.
    pub scale: u32,
}

#[derive(Deserialize)]
struct RawRenderMapEntry {
    #[serde(rename = "type")]
    kind: EntryKind,
    id: Id,
    scale: u32,
}

/// Rejected persisted cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderMapEntryError {
    ZeroScale { id: Id },
}

impl Display for RenderMapEntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroScale { id } => write!(f, "cell {id} has scale 0; expected >= 1"),
        }
    }
}

impl Error for RenderMapEntryError {}

impl TryFrom<RawRenderMapEntry> for RenderMapEntry {
    type Error = RenderMapEntryError;

    fn try_from(value: RawRenderMapEntry) -> Result<Self, Self::Error> {
        if value.scale == 0 {
            return Err(RenderMapEntryError::ZeroScale { id: value.id });
        }
        Ok(Self {
            kind: value.kind,
            id: value.id,
            scale: value.scale,
        })
    }
}

impl RenderMapEntry {
    pub fn block(id: Id) -> Self {
        Self {
            kind: EntryKind::Block,
            id,
            scale: 1,
        }
    }

    pub fn empty(id: Id) -> Self {
        Self {
            kind: EntryKind::Empty,
            id,
            scale: 1,
        }
    }

    pub fn with_scale(self, scale: u32) -> Self {
        Self {
            scale: scale.max(1),
            ..self
        }
    }

    pub fn is_block(&self) -> bool {
        self.kind == EntryKind::Block
    }

    pub fn is_empty(&self) -> bool {
        self.kind == EntryKind::Empty
    }
}

pub type RenderMapRow = Vec<RenderMapEntry>;

/// Row-major grid of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockRenderMap {
    pub rows: Vec<RenderMapRow>,
}

impl BlockRenderMap {
    pub fn new(rows: Vec<RenderMapRow>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&RenderMapRow> {
        self.rows.get(index)
    }

    pub fn entry(&self, row: usize, column: usize) -> Option<&RenderMapEntry> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Block ids in row-major order.
    pub fn block_ids(&self) -> impl Iterator<Item = &Id> {
        self.rows
            .iter()
            .flatten()
            .filter(|entry| entry.is_block())
            .map(|entry| &entry.id)
    }

    /// Returns whether every cell id is unique across the map.
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = HashSet::new();
        self.rows.iter().flatten().all(|entry| seen.insert(&entry.id))
    }
}

impl From<Vec<RenderMapRow>> for BlockRenderMap {
    fn from(rows: Vec<RenderMapRow>) -> Self {
        Self::new(rows)
    }
}
