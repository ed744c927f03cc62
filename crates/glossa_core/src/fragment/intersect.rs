//! Range/fragment intersection queries.

use crate::model::fragment::{Fragment, FragmentType, Range};

/// How a query range touches an existing fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectType {
    /// The query's right edge overlaps the fragment's left side.
    LeftAnchor,
    /// The fragment fully contains the query.
    Inside,
    /// The query fully contains the fragment.
    Enclosed,
    /// The query's left edge overlaps the fragment's right side.
    RightAnchor,
}

/// One fragment touched by a query, plus nested word hits for sentences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentIntersection<'a> {
    pub fragment: &'a Fragment,
    pub intersect_type: IntersectType,
    /// Word hits inside a sentence fragment. Always empty below the first level.
    pub children: Vec<FragmentIntersection<'a>>,
}

/// Half-open containment test shared by every query.
pub fn is_between(target: usize, range: Range) -> bool {
    range.contains(target)
}

/// Re-expresses `target` relative to `normalizer.start`.
///
/// Returns `None` when `target` starts before the normalizer, which has no
/// unsigned local representation.
pub fn normalize_range(normalizer: Range, target: Range) -> Option<Range> {
    let start = target.start.checked_sub(normalizer.start)?;
    let end = target.end.checked_sub(normalizer.start)?;
    Some(Range::new(start, end))
}

/// Returns whether either endpoint of `fragment` lies inside `range`.
pub fn check_fragment_in_range(range: Range, fragment: &Fragment) -> bool {
    range_touches(range, fragment.range)
}

fn range_touches(range: Range, covered: Range) -> bool {
    is_between(covered.start, range) || covered.last().is_some_and(|last| is_between(last, range))
}

fn classify(range: Range, covered: Range) -> Option<IntersectType> {
    let left_in = is_between(range.start, covered);
    let right_in = range.last().is_some_and(|last| is_between(last, covered));

    match (left_in, right_in) {
        (false, true) => Some(IntersectType::LeftAnchor),
        (true, true) => Some(IntersectType::Inside),
        (true, false) => Some(IntersectType::RightAnchor),
        (false, false) if range_touches(range, covered) => Some(IntersectType::Enclosed),
        (false, false) => None,
    }
}

/// Classifies every fragment (optionally of one type) touched by `range`.
///
/// Order follows `fragments`. An empty result means nothing intersects.
pub fn get_intersecting_fragments(
    range: Range,
    fragments: &[Fragment],
    filter: Option<FragmentType>,
) -> Vec<FragmentIntersection<'_>> {
    intersect_with_base(range, fragments, filter, 0)
}

/// Lifts each fragment range by `base` before classifying.
///
/// Equivalent to classifying against `range` normalized by `base`, without
/// going below zero when the query starts before `base`.
fn intersect_with_base(
    range: Range,
    fragments: &[Fragment],
    filter: Option<FragmentType>,
    base: usize,
) -> Vec<FragmentIntersection<'_>> {
    fragments
        .iter()
        .filter(|fragment| filter.map_or(true, |kind| fragment.kind() == kind))
        .filter_map(|fragment| {
            classify(range, fragment.range.shifted(base)).map(|intersect_type| {
                FragmentIntersection {
                    fragment,
                    intersect_type,
                    children: Vec::new(),
                }
            })
        })
        .collect()
}

/// Like [`get_intersecting_fragments`], expanding sentence hits one level.
///
/// Sentence words are matched against the same query in the sentence's local
/// coordinate space and attached as `children`.
pub fn get_fragments_in_range(range: Range, fragments: &[Fragment]) -> Vec<FragmentIntersection<'_>> {
    let mut selection = get_intersecting_fragments(range, fragments, None);
    for hit in &mut selection {
        if hit.fragment.kind() == FragmentType::Sentence {
            hit.children = intersect_with_base(
                range,
                hit.fragment.words(),
                Some(FragmentType::Word),
                hit.fragment.range.start,
            );
        }
    }
    selection
}

/// Returns whether `kind` occurs in the selection or one level below.
pub fn check_selection_for_type(kind: FragmentType, selection: &[FragmentIntersection<'_>]) -> bool {
    selection.iter().any(|hit| {
        hit.fragment.kind() == kind || hit.children.iter().any(|child| child.fragment.kind() == kind)
    })
}

/// Distinct fragment types in the selection, first occurrence first.
pub fn get_fragment_types_in_selection(
    selection: &[FragmentIntersection<'_>],
) -> Vec<FragmentType> {
    let mut found = Vec::new();
    let nested = selection
        .iter()
        .flat_map(|hit| std::iter::once(hit).chain(hit.children.iter()));
    for hit in nested {
        let kind = hit.fragment.kind();
        if !found.contains(&kind) {
            found.push(kind);
        }
    }
    found
}
