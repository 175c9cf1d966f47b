//! Text storage and logical-line math.

pub mod buffer;
pub mod line_index;

pub use buffer::{diff_snapshots, CodeBuffer, EditDelta, TextEdit};
pub use line_index::{compute_line_count, line_number_at, LineIndex, LINE_BREAK};
