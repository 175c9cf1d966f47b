//! Fixed-advance measurement service for headless layout.
//!
//! Wraps the way a monospace text view does: a row holds as many display
//! columns as fit in the wrap width, wide glyphs take two columns, and the
//! trailing line break rides on the last row of its line. Like most native
//! text systems it reports no row for the empty line after a final `\n`.

use super::fragment::{MeasurementService, VisualFragment, WrapWidth};
use crate::text::line_index::{compute_line_count, LINE_BREAK};
use unicode_width::UnicodeWidthChar;

/// Measurement service with a fixed glyph advance and row height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasurement {
    char_width: f32,
    line_height: f32,
}

impl MonospaceMeasurement {
    /// Creates a service with the given advance width and row height.
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width: char_width.max(1.0),
            line_height: line_height.max(1.0),
        }
    }

    /// Number of display columns per row, or `None` when not wrapping.
    pub fn wrap_columns(&self, width: WrapWidth) -> Option<usize> {
        match width {
            WrapWidth::Unbounded => None,
            WrapWidth::Fixed(width) => {
                Some(((width.max(0.0) / self.char_width).floor() as usize).max(1))
            }
        }
    }
}

fn char_columns(ch: char) -> usize {
    if ch.is_ascii() {
        return 1;
    }
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

fn wrap_line(
    line: &str,
    start: usize,
    cols: Option<usize>,
    has_break: bool,
    height: f32,
) -> Vec<VisualFragment> {
    let break_len = usize::from(has_break);
    if line.is_empty() {
        return if has_break {
            vec![VisualFragment::new(start..start + 1, height)]
        } else {
            Vec::new()
        };
    }

    let mut rows = Vec::new();
    let mut row_start = start;
    let mut row_columns = 0usize;
    let mut offset = start;
    for ch in line.chars() {
        let width = char_columns(ch);
        if let Some(cols) = cols {
            if row_columns > 0 && row_columns + width > cols {
                rows.push(VisualFragment::new(row_start..offset, height));
                row_start = offset;
                row_columns = 0;
            }
        }
        row_columns += width;
        offset += 1;
    }
    rows.push(VisualFragment::new(row_start..offset + break_len, height));
    rows
}

impl MeasurementService for MonospaceMeasurement {
    fn layout<'a>(
        &'a self,
        text: &'a str,
        width: WrapWidth,
    ) -> impl Iterator<Item = VisualFragment> + 'a {
        let cols = self.wrap_columns(width);
        let height = self.line_height;
        let last_line = compute_line_count(text) - 1;
        let mut line_start = 0usize;
        text.split(LINE_BREAK)
            .enumerate()
            .flat_map(move |(idx, line)| {
                let has_break = idx < last_line;
                let start = line_start;
                let rows = wrap_line(line, start, cols, has_break, height);
                line_start = start + line.chars().count() + usize::from(has_break);
                rows
            })
    }

    fn default_line_height(&self) -> f32 {
        self.line_height
    }
}
