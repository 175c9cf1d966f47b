//! Logical-line boundaries for a text buffer.
//!
//! Every component that needs to know where a line starts or ends goes
//! through this module, so the gutter, the height reconciler and the
//! selection translator cannot disagree. A logical line is delimited by
//! [`LINE_BREAK`] only; a bare `\r` is ordinary text.
//!
//! Offsets are char (Unicode scalar) offsets and line numbers are 1-based.

use std::ops::Range;

/// The single line-break character recognized by the editor core.
pub const LINE_BREAK: char = '\n';

/// Counts logical lines in `text`.
///
/// # Returns
/// `count('\n') + 1`; an empty buffer has exactly one line.
pub fn compute_line_count(text: &str) -> usize {
    text.matches(LINE_BREAK).count() + 1
}

/// Returns the 1-based logical line containing char offset `offset`.
///
/// Counts the line breaks strictly before `offset`. Offsets past the end of
/// `text` are clamped to the end.
pub fn line_number_at(text: &str, offset: usize) -> usize {
    text.chars()
        .take(offset)
        .filter(|ch| *ch == LINE_BREAK)
        .count()
        + 1
}

/// Returns the char span of every logical line, excluding the break itself.
pub fn line_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::with_capacity(compute_line_count(text));
    let mut start = 0usize;
    let mut offset = 0usize;
    for ch in text.chars() {
        if ch == LINE_BREAK {
            spans.push(start..offset);
            start = offset + 1;
        }
        offset += 1;
    }
    spans.push(start..offset);
    spans
}

/// Precomputed line starts for a text snapshot.
///
/// Answers repeated offset → line queries in `O(log n)`; agrees with the
/// free functions in this module on every input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    char_len: usize,
}

impl Default for LineIndex {
    fn default() -> Self {
        Self {
            starts: vec![0],
            char_len: 0,
        }
    }
}

impl LineIndex {
    /// Builds an index for `text`.
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0usize];
        let mut char_len = 0usize;
        for ch in text.chars() {
            char_len += 1;
            if ch == LINE_BREAK {
                starts.push(char_len);
            }
        }
        Self { starts, char_len }
    }

    /// Number of logical lines (always at least one).
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Length of the indexed text in chars.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Char span of the 1-based `line`, excluding its trailing break.
    pub fn span(&self, line: usize) -> Option<Range<usize>> {
        let idx = line.checked_sub(1)?;
        let start = *self.starts.get(idx)?;
        let end = match self.starts.get(idx + 1) {
            Some(next) => next - 1,
            None => self.char_len,
        };
        Some(start..end)
    }

    /// First char offset of the 1-based `line`.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line.checked_sub(1)?).copied()
    }

    /// 1-based line containing char offset `offset` (clamped to the end).
    pub fn line_of_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.char_len);
        // `starts[0] == 0`, so the partition point is always at least 1.
        self.starts.partition_point(|start| *start <= offset)
    }
}
