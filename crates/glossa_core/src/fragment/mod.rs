//! Fragment range engine.
//!
//! # Responsibility
//! - Classify how a character range touches existing fragments.
//! - Insert fragments with deterministic split-on-collision.
//! - Remove fragments touching a range.
//!
//! # Invariants
//! - Every function is pure: inputs are borrowed, results are freshly built.
//! - Containment is half-open everywhere (`is_between`), so adjacent ranges
//!   never share an offset.
//! - Sentence words are expanded one level only and keep their local ranges.

mod edit;
mod intersect;
mod text;

pub use edit::{push_fragment, remove_fragments_in_range};
pub use intersect::{
    check_fragment_in_range, check_selection_for_type, get_fragment_types_in_selection,
    get_fragments_in_range, get_intersecting_fragments, is_between, normalize_range,
    FragmentIntersection, IntersectType,
};
pub use text::{char_slice, excerpt_around, resolve_fragment, resolve_sentence_words, ResolvedFragment};
