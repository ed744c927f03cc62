//! Document assembly service.
//!
//! # Responsibility
//! - Own one document snapshot and sequence fragment and grid engine calls on it.
//! - Reject malformed selections at the boundary before they reach an engine.
//!
//! # Invariants
//! - A mutation either commits a fully validated snapshot or leaves the
//!   current one untouched.
//! - Engines are never called with inverted or out-of-bounds ranges.
//! - Logs carry ids and counts only, never document text.

use crate::fragment::{
    get_fragments_in_range, normalize_range, push_fragment, remove_fragments_in_range,
    FragmentIntersection,
};
use crate::grid::{
    add_entry, balance, insert_empty_row, merge_row, move_entry, move_entry_to_empty,
    remove_entry, scale_entry, slide_entry, split_row, swap_entries, GridPosition,
    HorizontalSide, InsertPosition, VerticalDirection,
};
use crate::model::block::DocumentBlock;
use crate::model::document::{
    Document, DocumentIdentifier, DocumentSelection, DocumentValidationError,
};
use crate::model::fragment::{
    Fragment, FragmentData, FragmentType, FragmentValidationError, FragmentableString, Range,
    RangeError,
};
use crate::model::id::{Id, IdSource};
use crate::model::render_map::BlockRenderMap;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DocumentServiceResult<T> = Result<T, DocumentServiceError>;

/// Errors from document service operations.
#[derive(Debug)]
pub enum DocumentServiceError {
    BlockNotFound(Id),
    DuplicateBlock(Id),
    FragmentableNotFound { block: Id, fragmentable: Id },
    FragmentNotFound(Id),
    NotASentence(Id),
    /// Selection offsets with `end < start`.
    InvalidRange(RangeError),
    /// Selection reaches past the end of the root string.
    SelectionOutOfBounds { range: Range, root_len: usize },
    /// Selection does not lie within the target sentence.
    SelectionOutsideSentence { sentence: Id, range: Range },
    Fragment(FragmentValidationError),
    Validation(DocumentValidationError),
    /// Grid operation did not apply; the layout is unchanged.
    LayoutNotApplicable(&'static str),
}

impl Display for DocumentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlockNotFound(id) => write!(f, "block not found: {id}"),
            Self::DuplicateBlock(id) => write!(f, "block already exists: {id}"),
            Self::FragmentableNotFound {
                block,
                fragmentable,
            } => write!(f, "fragmentable {fragmentable} not found in block {block}"),
            Self::FragmentNotFound(id) => write!(f, "fragment not found: {id}"),
            Self::NotASentence(id) => write!(f, "fragment is not a sentence: {id}"),
            Self::InvalidRange(err) => write!(f, "{err}"),
            Self::SelectionOutOfBounds { range, root_len } => {
                write!(f, "selection {range} exceeds text length {root_len}")
            }
            Self::SelectionOutsideSentence { sentence, range } => {
                write!(f, "selection {range} lies outside sentence {sentence}")
            }
            Self::Fragment(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::LayoutNotApplicable(command) => {
                write!(f, "layout command not applicable: {command}")
            }
        }
    }
}

impl Error for DocumentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRange(err) => Some(err),
            Self::Fragment(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RangeError> for DocumentServiceError {
    fn from(value: RangeError) -> Self {
        Self::InvalidRange(value)
    }
}

impl From<FragmentValidationError> for DocumentServiceError {
    fn from(value: FragmentValidationError) -> Self {
        Self::Fragment(value)
    }
}

impl From<DocumentValidationError> for DocumentServiceError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Grid operation requested by the input layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutCommand {
    MoveToEmpty {
        id: Id,
        direction: VerticalDirection,
    },
    Move {
        from: GridPosition,
        /// Negative prepends a new row; past the last row appends one.
        target_row: isize,
        target_column: usize,
    },
    Slide {
        id: Id,
        direction: VerticalDirection,
    },
    Scale {
        id: Id,
        direction: VerticalDirection,
    },
    Balance {
        row: usize,
        side: HorizontalSide,
    },
    MergeRow {
        row: usize,
    },
    SplitRow {
        row: usize,
    },
    Swap {
        source: GridPosition,
        target: GridPosition,
    },
    InsertEmptyRow {
        row: usize,
    },
}

impl LayoutCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveToEmpty { .. } => "move_to_empty",
            Self::Move { .. } => "move",
            Self::Slide { .. } => "slide",
            Self::Scale { .. } => "scale",
            Self::Balance { .. } => "balance",
            Self::MergeRow { .. } => "merge_row",
            Self::SplitRow { .. } => "split_row",
            Self::Swap { .. } => "swap",
            Self::InsertEmptyRow { .. } => "insert_empty_row",
        }
    }
}

/// Document facade sequencing engine calls on an owned snapshot.
pub struct DocumentService<S: IdSource> {
    document: Document,
    ids: S,
}

impl<S: IdSource> DocumentService<S> {
    /// Wraps a document after validating it.
    pub fn new(document: Document, ids: S) -> DocumentServiceResult<Self> {
        document.validate()?;
        Ok(Self { document, ids })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Builds a selection from raw offsets, rejecting `end < start`.
    pub fn selection(
        &self,
        block_id: Id,
        fragmentable_id: Id,
        start: usize,
        end: usize,
    ) -> DocumentServiceResult<DocumentSelection> {
        let fragmentable_range = Range::try_new(start, end)?;
        Ok(DocumentSelection {
            block_id,
            fragmentable_id,
            fragmentable_range,
        })
    }

    /// Adds a block and places it in the first free cell from `position`.
    pub fn insert_block(
        &mut self,
        block: DocumentBlock,
        position: InsertPosition,
    ) -> DocumentServiceResult<()> {
        if self.document.block(&block.id).is_some() {
            return Err(DocumentServiceError::DuplicateBlock(block.id));
        }

        let mut next = self.document.clone();
        next.render_map = add_entry(block.id.clone(), position, &next.render_map);
        debug!(
            "event=block_insert module=service status=ok block={} kind={} rows={}",
            block.id,
            block.kind.as_str(),
            next.render_map.row_count()
        );
        next.blocks.push(block);
        self.commit(next)
    }

    /// Removes a block and its grid cell, returning the block.
    pub fn remove_block(&mut self, id: &Id) -> DocumentServiceResult<DocumentBlock> {
        let index = self
            .document
            .blocks
            .iter()
            .position(|block| &block.id == id)
            .ok_or_else(|| DocumentServiceError::BlockNotFound(id.clone()))?;

        let mut next = self.document.clone();
        let removed = next.blocks.remove(index);
        next.render_map = remove_entry(id, &next.render_map)
            .ok_or(DocumentServiceError::LayoutNotApplicable("remove_entry"))?;
        self.commit(next)?;
        debug!("event=block_remove module=service status=ok block={id}");
        Ok(removed)
    }

    /// Applies one grid command to the document layout.
    pub fn apply_layout(&mut self, command: &LayoutCommand) -> DocumentServiceResult<()> {
        let map = &self.document.render_map;
        let next: Option<BlockRenderMap> = match command {
            LayoutCommand::MoveToEmpty { id, direction } => move_entry_to_empty(id, *direction, map),
            LayoutCommand::Move {
                from,
                target_row,
                target_column,
            } => move_entry(from.row, from.column, *target_row, *target_column, map),
            LayoutCommand::Slide { id, direction } => slide_entry(id, *direction, map),
            LayoutCommand::Scale { id, direction } => scale_entry(id, *direction, map),
            LayoutCommand::Balance { row, side } => balance(*row, *side, map),
            LayoutCommand::MergeRow { row } => merge_row(*row, map),
            LayoutCommand::SplitRow { row } => split_row(*row, &self.ids, map),
            LayoutCommand::Swap { source, target } => {
                swap_entries(source.row, source.column, target.row, target.column, map)
            }
            LayoutCommand::InsertEmptyRow { row } => insert_empty_row(*row, map),
        };

        let Some(render_map) = next else {
            info!(
                "event=layout_apply module=service status=skip command={}",
                command.name()
            );
            return Err(DocumentServiceError::LayoutNotApplicable(command.name()));
        };
        debug!(
            "event=layout_apply module=service status=ok command={} rows={}",
            command.name(),
            render_map.row_count()
        );
        self.document.render_map = render_map;
        Ok(())
    }

    /// Fragments touching the selection, sentence words expanded one level.
    pub fn select(
        &self,
        selection: &DocumentSelection,
    ) -> DocumentServiceResult<Vec<FragmentIntersection<'_>>> {
        let text = self.fragmentable(selection)?;
        ensure_within_root(text, selection.fragmentable_range)?;
        Ok(get_fragments_in_range(
            selection.fragmentable_range,
            &text.fragments,
        ))
    }

    /// Annotates the selection with a new fragment and returns its id.
    pub fn annotate(
        &mut self,
        selection: &DocumentSelection,
        data: FragmentData,
    ) -> DocumentServiceResult<Id> {
        let range = selection.fragmentable_range;
        let fragment = Fragment::new(self.ids.next_id(), range, data);
        fragment.validate()?;
        let id = fragment.id.clone();
        let kind = fragment.kind();

        self.update_fragmentable(selection, |text| {
            ensure_within_root(text, range)?;
            text.fragments = push_fragment(fragment, &text.fragments);
            Ok(())
        })?;
        debug!("event=fragment_push module=service status=ok kind={kind} fragment={id}");
        Ok(id)
    }

    /// Adds a dictionary word inside an existing sentence fragment.
    ///
    /// The selection is given in root coordinates and stored relative to the
    /// sentence start.
    pub fn annotate_word(
        &mut self,
        selection: &DocumentSelection,
        sentence_id: &Id,
        dict_id: Id,
    ) -> DocumentServiceResult<Id> {
        let word_id = self.ids.next_id();
        let range = selection.fragmentable_range;

        self.update_fragmentable(selection, |text| {
            ensure_within_root(text, range)?;
            let sentence = text
                .fragments
                .iter_mut()
                .find(|fragment| &fragment.id == sentence_id)
                .ok_or_else(|| DocumentServiceError::FragmentNotFound(sentence_id.clone()))?;
            let sentence_range = sentence.range;
            let FragmentData::Sentence { words, .. } = &mut sentence.data else {
                return Err(DocumentServiceError::NotASentence(sentence_id.clone()));
            };

            let local = normalize_range(sentence_range, range)
                .filter(|local| local.end <= sentence_range.len())
                .ok_or_else(|| DocumentServiceError::SelectionOutsideSentence {
                    sentence: sentence_id.clone(),
                    range,
                })?;
            let word = Fragment::new(word_id.clone(), local, FragmentData::Word { dict_id });
            word.validate()?;
            let next_words = push_fragment(word, words.as_slice());
            *words = next_words;
            Ok(())
        })?;
        debug!(
            "event=word_push module=service status=ok sentence={sentence_id} fragment={word_id}"
        );
        Ok(word_id)
    }

    /// Removes fragments (optionally of one type) touching the selection.
    ///
    /// Returns how many fragments were removed.
    pub fn clear_annotations(
        &mut self,
        selection: &DocumentSelection,
        filter: Option<FragmentType>,
    ) -> DocumentServiceResult<usize> {
        let range = selection.fragmentable_range;
        let mut removed = 0;
        self.update_fragmentable(selection, |text| {
            ensure_within_root(text, range)?;
            let kept = remove_fragments_in_range(range, &text.fragments, filter);
            removed = text.fragments.len() - kept.len();
            text.fragments = kept;
            Ok(())
        })?;
        debug!("event=fragment_remove module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Marks one fragment as highlighted in its fragmentable.
    pub fn set_highlighted_fragment(
        &mut self,
        identifier: &DocumentIdentifier,
    ) -> DocumentServiceResult<()> {
        let text = self.fragmentable_mut(&identifier.block_id, &identifier.fragmentable_id)?;
        if text.find_fragment(&identifier.fragment_id).is_none() {
            return Err(DocumentServiceError::FragmentNotFound(
                identifier.fragment_id.clone(),
            ));
        }
        text.highlighted_fragment = Some(identifier.fragment_id.clone());
        Ok(())
    }

    /// Flips spelling display and returns the new value.
    pub fn toggle_spelling(
        &mut self,
        block_id: &Id,
        fragmentable_id: &Id,
    ) -> DocumentServiceResult<bool> {
        let text = self.fragmentable_mut(block_id, fragmentable_id)?;
        text.show_spelling = !text.show_spelling;
        Ok(text.show_spelling)
    }

    fn commit(&mut self, next: Document) -> DocumentServiceResult<()> {
        next.validate()?;
        self.document = next;
        Ok(())
    }

    fn fragmentable(&self, selection: &DocumentSelection) -> DocumentServiceResult<&FragmentableString> {
        let block = self
            .document
            .block(&selection.block_id)
            .ok_or_else(|| DocumentServiceError::BlockNotFound(selection.block_id.clone()))?;
        block.fragmentable(&selection.fragmentable_id).ok_or_else(|| {
            DocumentServiceError::FragmentableNotFound {
                block: selection.block_id.clone(),
                fragmentable: selection.fragmentable_id.clone(),
            }
        })
    }

    fn fragmentable_mut(
        &mut self,
        block_id: &Id,
        fragmentable_id: &Id,
    ) -> DocumentServiceResult<&mut FragmentableString> {
        let block = self
            .document
            .block_mut(block_id)
            .ok_or_else(|| DocumentServiceError::BlockNotFound(block_id.clone()))?;
        block.fragmentable_mut(fragmentable_id).ok_or_else(|| {
            DocumentServiceError::FragmentableNotFound {
                block: block_id.clone(),
                fragmentable: fragmentable_id.clone(),
            }
        })
    }

    /// Edits a copy of the addressed fragmentable and commits it only on success.
    fn update_fragmentable<F>(
        &mut self,
        selection: &DocumentSelection,
        edit: F,
    ) -> DocumentServiceResult<()>
    where
        F: FnOnce(&mut FragmentableString) -> DocumentServiceResult<()>,
    {
        let mut text = self.fragmentable(selection)?.clone();
        edit(&mut text)?;
        text.validate()?;
        *self.fragmentable_mut(&selection.block_id, &selection.fragmentable_id)? = text;
        Ok(())
    }
}

fn ensure_within_root(text: &FragmentableString, range: Range) -> DocumentServiceResult<()> {
    let root_len = text.char_len();
    if range.end > root_len {
        return Err(DocumentServiceError::SelectionOutOfBounds { range, root_len });
    }
    Ok(())
}
