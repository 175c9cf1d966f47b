//! Per-logical-line heights reconciled from wrapped visual rows.

use super::fragment::VisualFragment;
use crate::text::line_index::{compute_line_count, LINE_BREAK};
use std::ops::Index;
use std::str::Chars;
use tracing::warn;

/// Rendered height of every logical line, in line order.
///
/// Always holds exactly one positive entry per logical line of the buffer
/// it was computed for.
#[derive(Clone, Debug, PartialEq)]
pub struct LineHeights {
    heights: Vec<f32>,
}

impl LineHeights {
    /// `line_count` entries of `default_line_height`.
    pub fn uniform(line_count: usize, default_line_height: f32) -> Self {
        Self {
            heights: vec![default_line_height; line_count.max(1)],
        }
    }

    /// Number of entries (equals the logical line count).
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Heights as a slice indexed by `line - 1`.
    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }

    /// Height of the 1-based `line`.
    pub fn get(&self, line: usize) -> Option<f32> {
        line.checked_sub(1)
            .and_then(|idx| self.heights.get(idx))
            .copied()
    }

    /// Iterates `(line_number, height)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.heights
            .iter()
            .enumerate()
            .map(|(idx, height)| (idx + 1, *height))
    }

    /// Sum of all line heights.
    pub fn total(&self) -> f32 {
        self.heights.iter().sum()
    }

    /// Top offset of the 1-based `line` relative to the first line.
    pub fn line_top(&self, line: usize) -> f32 {
        let end = line.saturating_sub(1).min(self.heights.len());
        self.heights[..end].iter().sum()
    }

    /// Pads or truncates to `line_count` entries, padding with
    /// `default_line_height`. Used between a mutation and its layout pass.
    pub fn resize(&mut self, line_count: usize, default_line_height: f32) {
        self.heights.resize(line_count.max(1), default_line_height);
    }
}

impl Index<usize> for LineHeights {
    type Output = f32;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.heights[idx]
    }
}

/// Walks the buffer once, answering whether successive fragment ranges
/// contain a line break.
struct BreakScanner<'a> {
    chars: Chars<'a>,
    offset: usize,
}

impl<'a> BreakScanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
            offset: 0,
        }
    }

    fn range_has_break(&mut self, start: usize, end: usize) -> bool {
        if start < self.offset {
            // Overlapping rows are only scanned once.
            warn!(
                start,
                scanned = self.offset,
                "visual fragment starts before previous fragment end"
            );
        }
        while self.offset < start {
            if self.chars.next().is_none() {
                return false;
            }
            self.offset += 1;
        }
        let mut found = false;
        while self.offset < end {
            match self.chars.next() {
                Some(ch) => {
                    found |= ch == LINE_BREAK;
                    self.offset += 1;
                }
                None => break,
            }
        }
        found
    }
}

/// Reconciles visual rows into one height per logical line.
///
/// Row heights accumulate until a row whose text contains a line break
/// closes the current logical line. A final line without a break is closed
/// by the end of the row stream. Lines that no row reported (a trailing
/// empty line, or everything when layout has not happened yet) get
/// `default_line_height`.
///
/// # Returns
/// Heights whose length always equals [`compute_line_count`] of `text`.
pub fn compute_heights<I>(text: &str, fragments: I, default_line_height: f32) -> LineHeights
where
    I: IntoIterator<Item = VisualFragment>,
{
    let line_count = compute_line_count(text);
    let mut heights = Vec::with_capacity(line_count);
    let mut scanner = BreakScanner::new(text);
    let mut accumulated = 0.0f32;

    for fragment in fragments {
        accumulated += fragment.height;
        if scanner.range_has_break(fragment.chars.start, fragment.chars.end) {
            heights.push(if accumulated > 0.0 {
                accumulated
            } else {
                default_line_height
            });
            accumulated = 0.0;
        }
    }
    if accumulated > 0.0 {
        heights.push(accumulated);
    }

    // Each closed line consumed a distinct break from `text`.
    debug_assert!(heights.len() <= line_count);
    heights.resize(line_count, default_line_height);
    LineHeights { heights }
}
