//! Events emitted by an edit session to its embedding container.

use crossbeam_channel::{Receiver, Sender};

/// Everything a block reports to the container that hosts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    /// The user edited the text; carries the full new content.
    ContentChanged(String),
    /// The block's text surface started editing.
    FocusGained,
    /// The user dismissed the block (escape) and gave up input focus.
    FocusLost,
    /// The block itself was selected in the container.
    Selected,
    /// Backspace in an empty block: the container should remove the block.
    RequestBlockDeletion,
    /// The user picked a different language.
    LanguageChanged(String),
}

impl BlockEvent {
    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ContentChanged(_) => "content_changed",
            Self::FocusGained => "focus_gained",
            Self::FocusLost => "focus_lost",
            Self::Selected => "selected",
            Self::RequestBlockDeletion => "request_block_deletion",
            Self::LanguageChanged(_) => "language_changed",
        }
    }
}

/// Creates the channel a container uses to subscribe to a block.
pub fn event_channel() -> (Sender<BlockEvent>, Receiver<BlockEvent>) {
    crossbeam_channel::unbounded()
}
