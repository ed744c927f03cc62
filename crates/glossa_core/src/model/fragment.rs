//! Fragment domain model.
//!
//! # Responsibility
//! - Define ranges, typed fragments and the fragmentable string they annotate.
//! - Validate persisted fragment shapes at the deserialization boundary.
//!
//! # Invariants
//! - `Range` is half-open and never inverted (`start <= end`).
//! - A fragment's type is derived from its payload; the wire `type` tag must agree.
//! - Sentence word ranges are local to the sentence: within `[0, sentence.len())`.
//! - Offsets count `char`s of the root string, not bytes.

use crate::fragment::{
    get_fragments_in_range, push_fragment, remove_fragments_in_range, FragmentIntersection,
};
use crate::model::id::Id;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Half-open character interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

#[derive(Deserialize)]
struct RawRange {
    start: usize,
    end: usize,
}

impl TryFrom<RawRange> for Range {
    type Error = RangeError;

    fn try_from(value: RawRange) -> Result<Self, Self::Error> {
        Self::try_new(value.start, value.end)
    }
}

/// Rejected range input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    Inverted { start: usize, end: usize },
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inverted { start, end } => {
                write!(f, "range end ({end}) must be >= range start ({start})")
            }
        }
    }
}

impl Error for RangeError {}

impl Range {
    /// Builds a range from trusted input.
    ///
    /// Callers holding untrusted offsets should use [`Range::try_new`].
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "range start {start} must be <= end {end}");
        Self { start, end }
    }

    /// Builds a range, rejecting `end < start`.
    pub fn try_new(start: usize, end: usize) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open containment: `start <= target < end`.
    pub fn contains(&self, target: usize) -> bool {
        target >= self.start && target < self.end
    }

    /// Last offset covered by the range, `None` when `end == 0`.
    pub fn last(&self) -> Option<usize> {
        self.end.checked_sub(1)
    }

    /// Moves the range right by `base`.
    ///
    /// Used to lift sentence-local word ranges into root coordinates.
    pub fn shifted(&self, base: usize) -> Self {
        Self {
            start: self.start + base,
            end: self.end + base,
        }
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Closed set of fragment categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FragmentType {
    Mark,
    Sentence,
    Word,
    Note,
    Highlight,
    Background,
}

impl FragmentType {
    pub const ALL: [FragmentType; 6] = [
        Self::Mark,
        Self::Sentence,
        Self::Word,
        Self::Note,
        Self::Highlight,
        Self::Background,
    ];

    /// Stable string id, identical to the wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mark => "Mark",
            Self::Sentence => "Sentence",
            Self::Word => "Word",
            Self::Note => "Note",
            Self::Highlight => "Highlight",
            Self::Background => "Background",
        }
    }
}

impl Display for FragmentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific fragment payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FragmentData {
    /// Colored mark with an optional comment.
    Mark {
        color: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    },
    /// Sentence gloss with sentence-local word fragments.
    Sentence {
        translation: String,
        words: Vec<Fragment>,
    },
    /// Dictionary lookup.
    Word {
        #[serde(rename = "dictId")]
        dict_id: Id,
    },
    /// Free-form note.
    Note { note: String },
    Highlight,
    Background,
}

impl FragmentData {
    pub fn kind(&self) -> FragmentType {
        match self {
            Self::Mark { .. } => FragmentType::Mark,
            Self::Sentence { .. } => FragmentType::Sentence,
            Self::Word { .. } => FragmentType::Word,
            Self::Note { .. } => FragmentType::Note,
            Self::Highlight => FragmentType::Highlight,
            Self::Background => FragmentType::Background,
        }
    }
}

/// Which side of a collision a split piece came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentSide {
    Left,
    Right,
}

/// Typed annotation over a sub-range of a root string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FragmentWire", into = "FragmentWire")]
pub struct Fragment {
    pub id: Id,
    pub range: Range,
    /// Set on pieces produced by split-on-insert.
    pub fragmented: Option<FragmentSide>,
    pub data: FragmentData,
}

#[derive(Serialize, Deserialize)]
struct FragmentWire {
    id: Id,
    range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fragmented: Option<FragmentSide>,
    #[serde(rename = "type")]
    kind: FragmentType,
    data: FragmentData,
}

impl TryFrom<FragmentWire> for Fragment {
    type Error = FragmentValidationError;

    fn try_from(value: FragmentWire) -> Result<Self, Self::Error> {
        if value.kind != value.data.kind() {
            return Err(FragmentValidationError::TypeMismatch {
                id: value.id,
                declared: value.kind,
                payload: value.data.kind(),
            });
        }
        let fragment = Fragment {
            id: value.id,
            range: value.range,
            fragmented: value.fragmented,
            data: value.data,
        };
        fragment.validate()?;
        Ok(fragment)
    }
}

impl From<Fragment> for FragmentWire {
    fn from(value: Fragment) -> Self {
        Self {
            kind: value.data.kind(),
            id: value.id,
            range: value.range,
            fragmented: value.fragmented,
            data: value.data,
        }
    }
}

/// Fragment shape violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentValidationError {
    /// Fragment covers no characters.
    EmptyRange { id: Id },
    /// Fragment reaches past the end of its root string.
    OutOfBounds { id: Id, range: Range, root_len: usize },
    /// Wire `type` tag disagrees with the payload tag.
    TypeMismatch {
        id: Id,
        declared: FragmentType,
        payload: FragmentType,
    },
    /// Sentence contains a nested fragment that is not a word.
    NestedNotWord { sentence: Id, nested: Id },
    /// Nested word lies outside its sentence-local bounds.
    WordOutsideSentence { sentence: Id, word: Id, range: Range },
}

impl Display for FragmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRange { id } => write!(f, "fragment {id} has an empty range"),
            Self::OutOfBounds {
                id,
                range,
                root_len,
            } => write!(
                f,
                "fragment {id} range {range} exceeds root length {root_len}"
            ),
            Self::TypeMismatch {
                id,
                declared,
                payload,
            } => write!(
                f,
                "fragment {id} declares type {declared} but carries {payload} data"
            ),
            Self::NestedNotWord { sentence, nested } => write!(
                f,
                "sentence {sentence} contains non-word fragment {nested}"
            ),
            Self::WordOutsideSentence {
                sentence,
                word,
                range,
            } => write!(
                f,
                "word {word} range {range} lies outside sentence {sentence}"
            ),
        }
    }
}

impl Error for FragmentValidationError {}

impl Fragment {
    pub fn new(id: Id, range: Range, data: FragmentData) -> Self {
        Self {
            id,
            range,
            fragmented: None,
            data,
        }
    }

    pub fn kind(&self) -> FragmentType {
        self.data.kind()
    }

    /// Sentence-local word fragments, empty for every other type.
    pub fn words(&self) -> &[Fragment] {
        match &self.data {
            FragmentData::Sentence { words, .. } => words,
            _ => &[],
        }
    }

    /// Checks root-independent invariants.
    ///
    /// # Errors
    /// - `EmptyRange` when the fragment covers nothing.
    /// - `NestedNotWord` / `WordOutsideSentence` for malformed sentence children.
    pub fn validate(&self) -> Result<(), FragmentValidationError> {
        if self.range.is_empty() {
            return Err(FragmentValidationError::EmptyRange {
                id: self.id.clone(),
            });
        }
        if let FragmentData::Sentence { words, .. } = &self.data {
            let local_len = self.range.len();
            for word in words {
                if word.kind() != FragmentType::Word {
                    return Err(FragmentValidationError::NestedNotWord {
                        sentence: self.id.clone(),
                        nested: word.id.clone(),
                    });
                }
                if word.range.is_empty() || word.range.end > local_len {
                    return Err(FragmentValidationError::WordOutsideSentence {
                        sentence: self.id.clone(),
                        word: word.id.clone(),
                        range: word.range,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Root text plus the fragments annotating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentableString {
    pub id: Id,
    root: String,
    pub fragments: Vec<Fragment>,
    pub show_spelling: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_fragment: Option<Id>,
}

impl FragmentableString {
    /// Creates an unannotated string. The root is fixed for this value's lifetime.
    pub fn new(id: Id, root: impl Into<String>) -> Self {
        Self {
            id,
            root: root.into(),
            fragments: Vec::new(),
            show_spelling: true,
            highlighted_fragment: None,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Root length in characters, the unit of every range.
    pub fn char_len(&self) -> usize {
        self.root.chars().count()
    }

    pub fn find_fragment(&self, id: &Id) -> Option<&Fragment> {
        self.fragments.iter().find(|fragment| &fragment.id == id)
    }

    /// Checks that every fragment fits the root and is well formed.
    pub fn validate(&self) -> Result<(), FragmentValidationError> {
        let root_len = self.char_len();
        for fragment in &self.fragments {
            fragment.validate()?;
            if fragment.range.end > root_len {
                return Err(FragmentValidationError::OutOfBounds {
                    id: fragment.id.clone(),
                    range: fragment.range,
                    root_len,
                });
            }
        }
        Ok(())
    }

    /// Returns a copy with `target` inserted through split-on-collision.
    pub fn with_fragment(&self, target: Fragment) -> Self {
        Self {
            fragments: push_fragment(target, &self.fragments),
            ..self.clone()
        }
    }

    /// Returns a copy without the fragments touching `range`.
    pub fn without_fragments_in(&self, range: Range, filter: Option<FragmentType>) -> Self {
        Self {
            fragments: remove_fragments_in_range(range, &self.fragments, filter),
            ..self.clone()
        }
    }

    /// Fragments touching `range`, with sentence words expanded one level.
    pub fn fragments_in_range(&self, range: Range) -> Vec<FragmentIntersection<'_>> {
        get_fragments_in_range(range, &self.fragments)
    }
}
