//! Input-event reducer for editor commands a block intercepts.

use codeblock_core::EditorCommand;
use eframe::egui;

/// Focus of a block's text edit around the start of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorFocus {
    /// The text edit ended the previous frame focused.
    pub held: bool,
    /// egui still reports the text edit focused this frame.
    pub current: bool,
}

/// Convert egui input events into the commands a focused block handles
/// before its text surface does.
///
/// egui drops widget focus on Escape before any widget runs, so `Cancel`
/// is keyed on the focus held at the end of the previous frame.
pub fn commands_from_events(events: &[egui::Event], focus: EditorFocus) -> Vec<EditorCommand> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key: egui::Key::Escape,
                pressed: true,
                ..
            } if focus.held || focus.current => Some(EditorCommand::Cancel),
            egui::Event::Key {
                key: egui::Key::Backspace,
                pressed: true,
                modifiers,
                ..
            } if focus.current && modifiers.is_none() => Some(EditorCommand::DeleteBackward),
            _ => None,
        })
        .collect()
}
