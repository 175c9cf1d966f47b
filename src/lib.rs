//! Root crate facade for the code-block editor.

pub use codeblock_core::{
    config, constants, error, event_channel, language, layout, models, selection, session, text,
    BlockEvent, CodeBlock, CodeBlockError, EditSession, EditorCommand, EditorConfig,
    ExternalUpdate, LanguageTable, LineHeights, MeasurementService, SessionState, WrapWidth,
};

#[cfg(feature = "gui")]
/// egui widget and demo window (feature-gated).
pub use codeblock_gui as gui;
