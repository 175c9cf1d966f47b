//! Edit-session state machine for a single block.

pub mod command;
pub mod controller;
pub mod events;
pub mod timer;

pub use command::{CommandOutcome, EditorCommand};
pub use controller::{EditSession, ExternalUpdate, SessionState};
pub use events::{event_channel, BlockEvent};
pub use timer::DebounceTimer;
