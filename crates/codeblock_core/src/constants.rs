//! Shared constants used across the code-block crates.

/// Default window during which external content updates are ignored after a
/// local edit, in milliseconds.
pub const DEFAULT_EDIT_DEBOUNCE_MS: u64 = 50;

/// Default editor and gutter font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 13.0;

/// Line-height multiplier applied to the font size when no measured row is
/// available.
pub const DEFAULT_LINE_HEIGHT_FACTOR: f32 = 1.25;

/// Default syntect theme key used for highlighting.
pub const DEFAULT_THEME_KEY: &str = "base16-ocean.dark";

/// Language tag used when a block has no explicit language.
pub const PLAIN_TEXT_LANGUAGE: &str = "plaintext";

/// Display name for blocks without a known language.
pub const PLAIN_TEXT_LABEL: &str = "Plain Text";

/// Environment variable overriding the debounce window.
pub const ENV_DEBOUNCE_MS: &str = "CODEBLOCK_DEBOUNCE_MS";
/// Environment variable overriding the editor font size.
pub const ENV_FONT_SIZE: &str = "CODEBLOCK_FONT_SIZE";
/// Environment variable overriding the syntect theme key.
pub const ENV_THEME: &str = "CODEBLOCK_THEME";
/// Environment flag controlling initial gutter visibility.
pub const ENV_SHOW_LINE_NUMBERS: &str = "CODEBLOCK_SHOW_LINE_NUMBERS";
/// Environment flag enabling per-pass layout tracing.
pub const ENV_TRACE_LAYOUT: &str = "CODEBLOCK_TRACE_LAYOUT";
