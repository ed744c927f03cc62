//! Fragment insertion and removal.

use crate::fragment::intersect::{get_intersecting_fragments, IntersectType};
use crate::model::fragment::{Fragment, FragmentData, FragmentSide, FragmentType, Range};

/// Appends `target`, splitting it when it collides with an existing fragment.
///
/// Only the first intersection (in list order) is considered:
/// - `Inside` / `Enclosed` / none: `target` is appended as is.
/// - `LeftAnchor`: the part of `target` left of the existing fragment is appended.
/// - `RightAnchor`: the part of `target` right of the existing fragment is appended.
///
/// Split pieces keep `target.id` and never have `start > end`. A split
/// sentence keeps only the words lying wholly inside the piece, rebased to the
/// piece start. Existing fragments are returned untouched.
pub fn push_fragment(target: Fragment, fragments: &[Fragment]) -> Vec<Fragment> {
    debug_assert!(target.range.start <= target.range.end);

    let piece = match get_intersecting_fragments(target.range, fragments, None).first() {
        Some(hit) => split_against(target, hit.fragment.range, hit.intersect_type),
        None => target,
    };

    let mut next = Vec::with_capacity(fragments.len() + 1);
    next.extend_from_slice(fragments);
    next.push(piece);
    next
}

fn split_against(target: Fragment, existing: Range, intersect_type: IntersectType) -> Fragment {
    let (range, side) = match intersect_type {
        IntersectType::LeftAnchor => (
            Range::new(target.range.start, existing.start),
            FragmentSide::Left,
        ),
        IntersectType::RightAnchor => (
            Range::new(existing.end, target.range.end),
            FragmentSide::Right,
        ),
        IntersectType::Inside | IntersectType::Enclosed => return target,
    };
    let old_start = target.range.start;
    let mut piece = Fragment {
        range,
        fragmented: Some(side),
        ..target
    };
    if let FragmentData::Sentence { words, .. } = &mut piece.data {
        *words = rebase_words(words, old_start, range);
    }
    piece
}

/// Re-expresses sentence-local words relative to `piece.start`.
///
/// Words not fully inside `piece` are dropped, never clipped.
fn rebase_words(words: &[Fragment], old_start: usize, piece: Range) -> Vec<Fragment> {
    words
        .iter()
        .filter_map(|word| {
            let absolute = word.range.shifted(old_start);
            if absolute.start < piece.start || absolute.end > piece.end {
                return None;
            }
            Some(Fragment {
                range: Range::new(absolute.start - piece.start, absolute.end - piece.start),
                ..word.clone()
            })
        })
        .collect()
}

/// Returns `fragments` without every fragment (optionally of one type) touching `range`.
///
/// Matching is by element identity, so equal-but-distinct fragments are kept
/// apart.
pub fn remove_fragments_in_range(
    range: Range,
    fragments: &[Fragment],
    filter: Option<FragmentType>,
) -> Vec<Fragment> {
    let hits = get_intersecting_fragments(range, fragments, filter);
    fragments
        .iter()
        .filter(|fragment| !hits.iter().any(|hit| std::ptr::eq(hit.fragment, *fragment)))
        .cloned()
        .collect()
}
