//! UI-free core of the code-block editor (buffer, layout, session).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Test helpers for environment mutation.
pub mod env;
/// Error types.
pub mod error;
/// Language picker options.
pub mod language;
/// Line-height reconciliation from visual rows.
pub mod layout;
/// Serializable block model.
pub mod models;
/// Selection to gutter-line translation.
pub mod selection;
/// Per-block edit session.
pub mod session;
/// Text buffer and line index.
pub mod text;

pub use config::EditorConfig;
pub use error::CodeBlockError;
pub use language::{LanguageOption, LanguageTable};
pub use layout::{LineHeights, MeasurementService, VisualFragment, WrapWidth};
pub use models::CodeBlock;
pub use selection::{SelectedLines, Selection};
pub use session::{
    event_channel, BlockEvent, CommandOutcome, EditSession, EditorCommand, ExternalUpdate,
    SessionState,
};
