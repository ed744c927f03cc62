//! Text lookups over a root string: covered values and excerpts.

use crate::model::fragment::{Fragment, Range};

/// Fragment paired with the text it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFragment<'a> {
    pub fragment: &'a Fragment,
    /// Range in root coordinates; differs from `fragment.range` for sentence words.
    pub absolute_range: Range,
    pub value: &'a str,
}

/// Slices `root` by character offsets. `None` when the range exceeds the root.
pub fn char_slice(root: &str, range: Range) -> Option<&str> {
    let mut boundaries = root
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(root.len()));
    let start = boundaries.nth(range.start)?;
    let end = match range.len() {
        0 => start,
        len => boundaries.nth(len - 1)?,
    };
    Some(&root[start..end])
}

/// Resolves a top-level fragment against its root.
pub fn resolve_fragment<'a>(root: &'a str, fragment: &'a Fragment) -> Option<ResolvedFragment<'a>> {
    let value = char_slice(root, fragment.range)?;
    Some(ResolvedFragment {
        fragment,
        absolute_range: fragment.range,
        value,
    })
}

/// Resolves the words of a sentence fragment, lifting their local ranges.
///
/// Words that fall outside the root are skipped.
pub fn resolve_sentence_words<'a>(root: &'a str, sentence: &'a Fragment) -> Vec<ResolvedFragment<'a>> {
    sentence
        .words()
        .iter()
        .filter_map(|word| {
            let absolute_range = word.range.shifted(sentence.range.start);
            char_slice(root, absolute_range).map(|value| ResolvedFragment {
                fragment: word,
                absolute_range,
                value,
            })
        })
        .collect()
}

/// Returns the line around `index` inside a window of about `length` chars.
///
/// The window is shifted to stay within the root; the line is cut at the
/// window edges.
pub fn excerpt_around(root: &str, length: usize, index: usize) -> String {
    let chars: Vec<char> = root.chars().collect();
    let total = chars.len();
    let index = index.min(total);

    let end = (index.saturating_sub(length / 2) + length).min(total);
    let start = end.saturating_sub(length);
    let window: String = chars[start..end].iter().collect();
    let local = index - start;

    let mut consumed = 0;
    for line in window.split('\n') {
        let line_len = line.chars().count();
        if local <= consumed + line_len {
            return line.to_string();
        }
        consumed += line_len + 1;
    }
    String::new()
}
