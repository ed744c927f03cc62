//! Document aggregate: ordered blocks plus their grid placement.
//!
//! # Invariants
//! - Block ids are unique and each block occupies exactly one grid cell.
//! - Every grid block cell names an existing block.
//! - Block content references resolve to that block's fragmentables.

use crate::fragment::excerpt_around;
use crate::model::block::DocumentBlock;
use crate::model::fragment::{FragmentValidationError, FragmentableString, Range};
use crate::model::id::Id;
use crate::model::render_map::BlockRenderMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Id,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lang: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    pub blocks: Vec<DocumentBlock>,
    pub render_map: BlockRenderMap,
}

/// Text selection inside one fragmentable of one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSelection {
    pub block_id: Id,
    pub fragmentable_id: Id,
    pub fragmentable_range: Range,
}

/// Address of one fragment inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIdentifier {
    pub block_id: Id,
    pub fragmentable_id: Id,
    pub fragment_id: Id,
}

/// Location of a character inside a document, e.g. where a word was first seen.
///
/// `position` is `[block index, fragmentable index]`; `offset` counts chars of
/// that fragmentable's root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLink {
    pub document_id: Id,
    pub position: Vec<usize>,
    pub offset: usize,
}

/// Document link plus the line of text around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcerptedDocumentLink {
    pub link: DocumentLink,
    pub excerpt: String,
}

/// Structural inconsistencies between blocks and their placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    DuplicateBlock(Id),
    DuplicateCell(Id),
    UnknownBlockInMap(Id),
    BlockNotPlaced(Id),
    DanglingContent { block: Id, content: Id },
    /// Render map row holding no block entry.
    UntrimmedRow(usize),
    Fragment {
        block: Id,
        source: FragmentValidationError,
    },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateBlock(id) => write!(f, "duplicate block id: {id}"),
            Self::DuplicateCell(id) => write!(f, "render map holds cell id more than once: {id}"),
            Self::UnknownBlockInMap(id) => write!(f, "render map references unknown block: {id}"),
            Self::BlockNotPlaced(id) => write!(f, "block is missing from render map: {id}"),
            Self::DanglingContent { block, content } => {
                write!(f, "block {block} references missing fragmentable {content}")
            }
            Self::UntrimmedRow(row) => write!(f, "render map row {row} holds no block"),
            Self::Fragment { block, source } => write!(f, "block {block}: {source}"),
        }
    }
}

impl Error for DocumentValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fragment { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Document {
    /// Creates an empty document stamped with `now_ms` for both timestamps.
    pub fn new(id: Id, title: impl Into<String>, lang: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id,
            title: title.into(),
            name: None,
            lang: lang.into(),
            created_at: now_ms,
            updated_at: now_ms,
            blocks: Vec::new(),
            render_map: BlockRenderMap::default(),
        }
    }

    pub fn block(&self, id: &Id) -> Option<&DocumentBlock> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn block_mut(&mut self, id: &Id) -> Option<&mut DocumentBlock> {
        self.blocks.iter_mut().find(|block| &block.id == id)
    }

    /// Builds a link to `offset` in the given fragmentable.
    ///
    /// `None` when the fragmentable is unknown or `offset` lies past its root.
    pub fn link_to(&self, block_id: &Id, fragmentable_id: &Id, offset: usize) -> Option<DocumentLink> {
        let block_index = self.blocks.iter().position(|block| &block.id == block_id)?;
        let text_index = self.blocks[block_index]
            .fragmentables
            .iter()
            .position(|text| &text.id == fragmentable_id)?;
        if offset > self.blocks[block_index].fragmentables[text_index].char_len() {
            return None;
        }
        Some(DocumentLink {
            document_id: self.id.clone(),
            position: vec![block_index, text_index],
            offset,
        })
    }

    /// Fragmentable addressed by a link into this document.
    pub fn resolve_link(&self, link: &DocumentLink) -> Option<&FragmentableString> {
        if link.document_id != self.id {
            return None;
        }
        let [block_index, text_index] = link.position.as_slice() else {
            return None;
        };
        self.blocks.get(*block_index)?.fragmentables.get(*text_index)
    }

    /// Attaches the line around the linked offset, cut to a window of `length` chars.
    pub fn excerpt(&self, link: &DocumentLink, length: usize) -> Option<ExcerptedDocumentLink> {
        let text = self.resolve_link(link)?;
        Some(ExcerptedDocumentLink {
            link: link.clone(),
            excerpt: excerpt_around(text.root(), length, link.offset),
        })
    }

    /// Checks block/grid consistency and every fragmentable.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        let mut block_ids = HashSet::new();
        for block in &self.blocks {
            if !block_ids.insert(&block.id) {
                return Err(DocumentValidationError::DuplicateBlock(block.id.clone()));
            }
            for content in block.content_ids() {
                if block.fragmentable(content).is_none() {
                    return Err(DocumentValidationError::DanglingContent {
                        block: block.id.clone(),
                        content: content.clone(),
                    });
                }
            }
            for text in &block.fragmentables {
                text.validate()
                    .map_err(|source| DocumentValidationError::Fragment {
                        block: block.id.clone(),
                        source,
                    })?;
            }
        }

        if let Some(row) = self
            .render_map
            .rows
            .iter()
            .position(|cells| !cells.iter().any(|entry| entry.is_block()))
        {
            return Err(DocumentValidationError::UntrimmedRow(row));
        }

        let mut cell_ids = HashSet::new();
        for entry in self.render_map.rows.iter().flatten() {
            if !cell_ids.insert(&entry.id) {
                return Err(DocumentValidationError::DuplicateCell(entry.id.clone()));
            }
            if entry.is_block() && !block_ids.contains(&entry.id) {
                return Err(DocumentValidationError::UnknownBlockInMap(entry.id.clone()));
            }
        }

        let placed: HashSet<&Id> = self.render_map.block_ids().collect();
        if let Some(missing) = self.blocks.iter().find(|block| !placed.contains(&block.id)) {
            return Err(DocumentValidationError::BlockNotPlaced(missing.id.clone()));
        }
        Ok(())
    }
}
