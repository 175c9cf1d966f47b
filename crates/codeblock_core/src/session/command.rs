//! Editor commands the session intercepts before the text surface sees them.

/// Commands routed to the session by the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    /// Escape / cancel-operation.
    Cancel,
    /// Backspace / delete-backward.
    DeleteBackward,
}

/// Whether the session consumed a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Consumed; the text surface must not act on it.
    Handled,
    /// Not consumed; the text surface performs its default behavior.
    Ignored,
}

impl CommandOutcome {
    /// Returns `true` for [`CommandOutcome::Handled`].
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}
