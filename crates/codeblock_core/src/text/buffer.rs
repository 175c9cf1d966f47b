//! Owned text storage for a code block.

use super::line_index::{compute_line_count, line_number_at};
use ropey::Rope;
use std::fmt;
use std::ops::Range;

/// Delta summary for a buffer mutation.
///
/// Line numbers are 1-based, matching the rest of the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditDelta {
    /// Line where the mutation started in the pre-edit buffer.
    pub start_line: usize,
    /// Last impacted line in the pre-edit buffer.
    pub old_end_line: usize,
    /// Last impacted line in the post-edit buffer.
    pub new_end_line: usize,
    /// Character delta (`new_chars - old_chars`) from the mutation.
    pub char_delta: isize,
    /// Char offset just past the inserted text in the post-edit buffer.
    pub inserted_end: usize,
}

/// A single replacement recovered from two text snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    /// Replaced char range in the old snapshot.
    pub range: Range<usize>,
    /// Text inserted in place of `range`.
    pub replacement: String,
}

/// Recovers the minimal single-range edit turning `old` into `new`.
///
/// Strips the common char prefix, then the common suffix of what remains.
///
/// # Returns
/// `None` when both snapshots are equal.
pub fn diff_snapshots(old: &str, new: &str) -> Option<TextEdit> {
    if old == new {
        return None;
    }
    let mut prefix_chars = 0usize;
    let mut prefix_bytes = 0usize;
    for (a, b) in old.chars().zip(new.chars()) {
        if a != b {
            break;
        }
        prefix_chars += 1;
        prefix_bytes += a.len_utf8();
    }

    let old_rest = &old[prefix_bytes..];
    let new_rest = &new[prefix_bytes..];
    let mut suffix_bytes = 0usize;
    for (a, b) in old_rest.chars().rev().zip(new_rest.chars().rev()) {
        if a != b {
            break;
        }
        suffix_bytes += a.len_utf8();
    }

    let removed = &old_rest[..old_rest.len() - suffix_bytes];
    let inserted = &new_rest[..new_rest.len() - suffix_bytes];
    let removed_chars = removed.chars().count();
    Some(TextEdit {
        range: prefix_chars..prefix_chars + removed_chars,
        replacement: inserted.to_string(),
    })
}

/// Returns `true` for spaces and tabs, but not for line-separating
/// whitespace such as `\n`, `\r` or U+2028.
pub fn is_inline_whitespace(ch: char) -> bool {
    ch == '\t' || (ch.is_whitespace() && !ch.is_control() && !matches!(ch, '\u{2028}' | '\u{2029}'))
}

/// Owned code-block text with a rope mirror for char-indexed edits.
#[derive(Clone, Default)]
pub struct CodeBuffer {
    text: String,
    rope: Rope,
    revision: u64,
    char_len: usize,
}

impl CodeBuffer {
    /// Creates a buffer from UTF-8 text.
    pub fn new(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let char_len = rope.len_chars();
        Self {
            text: text.to_string(),
            rope,
            revision: 0,
            char_len,
        }
    }

    /// Borrowed view of the buffer text.
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Monotonic revision, bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Content length in chars.
    pub fn len_chars(&self) -> usize {
        self.char_len
    }

    /// Returns `true` when the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Returns `true` when the buffer is empty or holds only spaces/tabs.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(is_inline_whitespace)
    }

    /// Number of logical lines.
    pub fn line_count(&self) -> usize {
        compute_line_count(&self.text)
    }

    /// Char at `offset`, if in range.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.char_len).then(|| self.rope.char(offset))
    }

    /// Returns a UTF-8 snapshot for the given char range (clamped).
    pub fn slice_chars(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.char_len);
        let end = range.end.min(self.char_len);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Replaces a char range with `text`.
    ///
    /// The range is clamped to the buffer.
    ///
    /// # Returns
    /// `None` when the edit would change nothing.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) -> Option<EditDelta> {
        let start = range.start.min(self.char_len);
        let end = range.end.min(self.char_len).max(start);
        if start == end && text.is_empty() {
            return None;
        }
        if self.slice_chars(start..end) == text {
            return None;
        }

        let start_line = line_number_at(&self.text, start);
        let old_end_line = line_number_at(&self.text, end);
        let start_byte = self.rope.char_to_byte(start);
        let end_byte = self.rope.char_to_byte(end);

        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        self.text.replace_range(start_byte..end_byte, text);

        let removed = (end - start) as isize;
        let inserted = text.chars().count();
        self.char_len = self.rope.len_chars();
        self.revision = self.revision.wrapping_add(1);
        let inserted_end = start + inserted;
        Some(EditDelta {
            start_line,
            old_end_line,
            new_end_line: line_number_at(&self.text, inserted_end),
            char_delta: inserted as isize - removed,
            inserted_end,
        })
    }

    /// Applies the minimal edit that turns the buffer into `snapshot`.
    pub fn apply_snapshot(&mut self, snapshot: &str) -> Option<EditDelta> {
        let edit = diff_snapshots(&self.text, snapshot)?;
        self.replace_range(edit.range, &edit.replacement)
    }

    /// Replaces the whole buffer and bumps the revision.
    ///
    /// # Returns
    /// `false` when `text` already equals the buffer.
    pub fn replace_all(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.rope = Rope::from_str(text);
        self.text = text.to_string();
        self.char_len = self.rope.len_chars();
        self.revision = self.revision.wrapping_add(1);
        true
    }
}

impl fmt::Display for CodeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text.as_str())
    }
}

impl fmt::Debug for CodeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeBuffer")
            .field("revision", &self.revision)
            .field("char_len", &self.char_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_range_returns_delta() {
        let mut buf = CodeBuffer::new("one\ntwo\nthree");
        let delta = buf.replace_range(4..7, "dos\nzwei").expect("delta");
        assert_eq!(delta.start_line, 2);
        assert_eq!(delta.old_end_line, 2);
        assert_eq!(delta.new_end_line, 3);
        assert_eq!(delta.char_delta, 5);
        assert_eq!(delta.inserted_end, 12);
        assert_eq!(buf.as_str(), "one\ndos\nzwei\nthree");
        assert_eq!(buf.line_count(), 4);
        assert_eq!(buf.revision(), 1);
    }

    #[test]
    fn replace_range_handles_multibyte_chars() {
        let mut buf = CodeBuffer::new("aé\nb");
        buf.replace_range(1..2, "ü").expect("delta");
        assert_eq!(buf.as_str(), "aü\nb");
        assert_eq!(buf.len_chars(), 4);
        assert_eq!(buf.char_at(2), Some('\n'));
        assert_eq!(buf.char_at(4), None);
    }

    #[test]
    fn noop_edits_do_not_bump_revision() {
        let mut buf = CodeBuffer::new("abc");
        assert!(buf.replace_range(1..1, "").is_none());
        assert!(buf.replace_range(0..1, "a").is_none());
        assert!(!buf.replace_all("abc"));
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn diff_snapshots_recovers_minimal_range() {
        assert_eq!(diff_snapshots("abc", "abc"), None);
        assert_eq!(
            diff_snapshots("let x = 1;", "let xy = 1;"),
            Some(TextEdit {
                range: 5..5,
                replacement: "y".to_string(),
            })
        );
        assert_eq!(
            diff_snapshots("ab\ncd", "abcd"),
            Some(TextEdit {
                range: 2..3,
                replacement: String::new(),
            })
        );
        assert_eq!(
            diff_snapshots("aaa", "aaaa"),
            Some(TextEdit {
                range: 3..3,
                replacement: "a".to_string(),
            })
        );
        assert_eq!(
            diff_snapshots("héllo", "hallo"),
            Some(TextEdit {
                range: 1..2,
                replacement: "a".to_string(),
            })
        );
    }

    #[test]
    fn apply_snapshot_matches_target_text() {
        let mut buf = CodeBuffer::new("fn main() {\n}\n");
        let target = "fn main() {\n    println!(\"hi\");\n}\n";
        let delta = buf.apply_snapshot(target).expect("delta");
        assert_eq!(buf.as_str(), target);
        assert_eq!(delta.start_line, 2);
        assert_eq!(delta.new_end_line, 3);
    }

    #[test]
    fn blank_detection_ignores_spaces_and_tabs_only() {
        assert!(CodeBuffer::new("").is_blank());
        assert!(CodeBuffer::new(" \t ").is_blank());
        assert!(!CodeBuffer::new("  a  ").is_blank());
        assert!(!CodeBuffer::new("\n").is_blank());
    }
}
