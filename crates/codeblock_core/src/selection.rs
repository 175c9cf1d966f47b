//! Selection → logical-line translation for gutter highlighting.

use crate::text::line_index::LineIndex;
use std::collections::BTreeSet;

/// Caret or range selection in char offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub len: usize,
}

impl Selection {
    /// Collapsed selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            len: 0,
        }
    }

    /// Selection spanning `start..end`, normalizing direction.
    pub fn between(anchor: usize, head: usize) -> Self {
        let (start, end) = if anchor <= head {
            (anchor, head)
        } else {
            (head, anchor)
        };
        Self {
            start,
            len: end - start,
        }
    }

    /// End offset (exclusive).
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    /// Returns `true` for a bare caret.
    pub fn is_caret(&self) -> bool {
        self.len == 0
    }

    /// Clamps the selection into a buffer of `char_len` chars.
    pub fn clamped(self, char_len: usize) -> Self {
        let start = self.start.min(char_len);
        let end = self.end().min(char_len);
        Self {
            start,
            len: end - start,
        }
    }
}

/// Set of 1-based logical line numbers touched by a selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedLines(BTreeSet<usize>);

impl SelectedLines {
    /// Returns `true` when `line` is selected.
    pub fn contains(&self, line: usize) -> bool {
        self.0.contains(&line)
    }

    /// Number of selected lines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no line is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates line numbers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Lowest and highest selected line.
    pub fn bounds(&self) -> Option<(usize, usize)> {
        Some((*self.0.first()?, *self.0.last()?))
    }
}

impl FromIterator<usize> for SelectedLines {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Translates a selection into the logical lines it spans.
///
/// A caret selects the line it sits on. A range selects every line from its
/// start through its end, except that a range ending right after a line
/// break does not select the (untouched) line that follows.
///
/// Offsets past the end of `text` are clamped to the end.
pub fn compute_selected_lines(
    text: &str,
    selection_start: usize,
    selection_len: usize,
) -> SelectedLines {
    let index = LineIndex::new(text);
    let start = selection_start.min(index.char_len());
    let start_line = index.line_of_offset(start);
    let end = selection_start
        .saturating_add(selection_len)
        .min(index.char_len());
    if selection_len == 0 || end <= start {
        return SelectedLines::from_iter([start_line]);
    }

    let mut end_line = index.line_of_offset(end);
    // An end offset at the start of a later line sits right after its break.
    if end_line > start_line && index.line_start(end_line) == Some(end) {
        end_line -= 1;
    }
    debug_assert!(
        end_line >= start_line,
        "selection end line {} precedes start line {}",
        end_line,
        start_line
    );
    (start_line..=end_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str, start: usize, len: usize) -> Vec<usize> {
        compute_selected_lines(text, start, len).iter().collect()
    }

    #[test]
    fn caret_selects_its_line() {
        assert_eq!(lines("abc", 0, 0), vec![1]);
        assert_eq!(lines("ab\ncd", 4, 0), vec![2]);
        assert_eq!(lines("ab\ncd", 3, 0), vec![2]);
        assert_eq!(lines("ab\ncd", 2, 0), vec![1]);
    }

    #[test]
    fn range_ending_on_line_break_excludes_next_line() {
        assert_eq!(lines("ab\ncd", 0, 3), vec![1]);
        assert_eq!(lines("a\n\nb", 0, 3), vec![1, 2]);
    }

    #[test]
    fn range_spanning_middle_lines() {
        // "b\nc" sits at offsets 2..5 of "a\nb\nc\nd".
        assert_eq!(lines("a\nb\nc\nd", 2, 3), vec![2, 3]);
        assert_eq!(lines("a\nb\nc\nd", 0, 7), vec![1, 2, 3, 4]);
    }

    #[test]
    fn range_selecting_only_a_break_stays_on_its_line() {
        assert_eq!(lines("ab\ncd", 2, 1), vec![1]);
    }

    #[test]
    fn out_of_range_offsets_are_clamped() {
        assert_eq!(lines("ab\ncd", 50, 0), vec![2]);
        assert_eq!(lines("ab\ncd", 1, 50), vec![1, 2]);
        assert_eq!(lines("ab\n", 50, 5), vec![2]);
    }

    #[test]
    fn overlong_range_matches_its_clamped_equivalent() {
        assert_eq!(lines("ab\n", 1, 2), vec![1]);
        assert_eq!(lines("ab\n", 1, 50), vec![1]);
        assert_eq!(lines("a\nb\n", 0, usize::MAX), lines("a\nb\n", 0, 4));
    }

    #[test]
    fn selection_helpers_normalize_and_clamp() {
        assert_eq!(Selection::between(8, 3), Selection { start: 3, len: 5 });
        assert_eq!(Selection::caret(4).end(), 4);
        assert_eq!(
            Selection { start: 2, len: 10 }.clamped(5),
            Selection { start: 2, len: 3 }
        );
        let selected = compute_selected_lines("a\nb\nc", 0, 3);
        assert_eq!(selected.bounds(), Some((1, 2)));
        assert!(selected.contains(2));
        assert!(!selected.contains(3));
    }
}
