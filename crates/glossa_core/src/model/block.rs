//! Document block records.
//!
//! Blocks are plain tagged records: each carries the fragmentable strings it
//! renders and refers to them by id.

use crate::model::fragment::FragmentableString;
use crate::model::id::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleConfig {
    pub size: u8,
    pub subtitle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlignment {
    Center,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub alignment: ImageAlignment,
}

/// One spoken line of a dialog block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogLine {
    pub speaker: String,
    /// Fragmentable holding the spoken text.
    pub speech: Id,
}

/// Type-specific block payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockKind {
    DocumentTitle {
        content: Id,
    },
    Title {
        content: Id,
        config: TitleConfig,
    },
    Paragraph {
        content: Id,
    },
    Dialog {
        lines: Vec<DialogLine>,
    },
    Image {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        config: ImageConfig,
    },
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentTitle { .. } => "DocumentTitle",
            Self::Title { .. } => "Title",
            Self::Paragraph { .. } => "Paragraph",
            Self::Dialog { .. } => "Dialog",
            Self::Image { .. } => "Image",
        }
    }

    /// Whether the block carries user-editable configuration.
    pub fn is_configurable(&self) -> bool {
        matches!(self, Self::Title { .. } | Self::Image { .. })
    }
}

/// Content block placed in the document grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBlock {
    pub id: Id,
    pub position: u32,
    pub fragmentables: Vec<FragmentableString>,
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl DocumentBlock {
    pub fn new(id: Id, kind: BlockKind, fragmentables: Vec<FragmentableString>) -> Self {
        Self {
            id,
            position: 0,
            fragmentables,
            kind,
        }
    }

    /// Fragmentable ids referenced by the payload, in display order.
    pub fn content_ids(&self) -> Vec<&Id> {
        match &self.kind {
            BlockKind::DocumentTitle { content }
            | BlockKind::Title { content, .. }
            | BlockKind::Paragraph { content } => vec![content],
            BlockKind::Dialog { lines } => lines.iter().map(|line| &line.speech).collect(),
            BlockKind::Image { .. } => Vec::new(),
        }
    }

    pub fn fragmentable(&self, id: &Id) -> Option<&FragmentableString> {
        self.fragmentables.iter().find(|text| &text.id == id)
    }

    pub fn fragmentable_mut(&mut self, id: &Id) -> Option<&mut FragmentableString> {
        self.fragmentables.iter_mut().find(|text| &text.id == id)
    }
}
