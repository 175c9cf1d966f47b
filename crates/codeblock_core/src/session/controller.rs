//! Per-block edit session: buffer ownership, debounce, layout scheduling.

use super::command::{CommandOutcome, EditorCommand};
use super::events::BlockEvent;
use super::timer::DebounceTimer;
use crate::config::EditorConfig;
use crate::error::CodeBlockError;
use crate::language::LanguageTable;
use crate::layout::fragment::{MeasurementService, WrapWidth};
use crate::layout::heights::{compute_heights, LineHeights};
use crate::models::CodeBlock;
use crate::selection::{compute_selected_lines, SelectedLines, Selection};
use crate::text::buffer::{CodeBuffer, EditDelta};
use crossbeam_channel::Sender;
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const SESSION_TARGET: &str = "codeblock_core::session";
const LAYOUT_TARGET: &str = "codeblock_core::layout";

/// Whether the user is actively typing into the block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    /// A local mutation happened within the debounce window.
    Editing,
}

/// Result of pushing container-side content into a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExternalUpdate {
    /// The buffer now holds the pushed content.
    Applied,
    /// The pushed content already matched the buffer.
    Unchanged,
    /// The user is editing; the buffer was left alone.
    Suppressed,
}

/// Live editing state for one code block.
///
/// The session is the single owner of the block's text while it is on
/// screen. Local edits go through [`EditSession::apply_local_edit`] or
/// [`EditSession::apply_local_snapshot`]; content pushed by the container
/// goes through [`EditSession::apply_external_content`], which is ignored
/// while the user is typing so a stale echo cannot clobber newer text.
#[derive(Debug)]
pub struct EditSession {
    block_id: String,
    indent: u32,
    buffer: CodeBuffer,
    language: String,
    languages: Arc<LanguageTable>,
    config: EditorConfig,
    state: SessionState,
    timer: DebounceTimer,
    selection: Selection,
    selected_lines: SelectedLines,
    line_count: usize,
    line_heights: LineHeights,
    default_line_height: f32,
    wrap_width: WrapWidth,
    layout_pending: bool,
    has_focus: bool,
    events: Sender<BlockEvent>,
}

impl EditSession {
    /// Starts a session for `block`, reporting to `events`.
    ///
    /// The caret starts at offset 0 and the first layout pass is scheduled;
    /// until it runs every line uses the configured fallback height.
    pub fn attach(
        block: CodeBlock,
        config: EditorConfig,
        languages: Arc<LanguageTable>,
        events: Sender<BlockEvent>,
    ) -> Self {
        let CodeBlock {
            id,
            language,
            content,
            indent,
        } = block;
        let buffer = CodeBuffer::new(&content);
        let line_count = buffer.line_count();
        let default_line_height = config.fallback_line_height();
        debug!(
            target: SESSION_TARGET,
            block_id = %id,
            lines = line_count,
            chars = buffer.len_chars(),
            "attached edit session"
        );
        Self {
            block_id: id,
            indent,
            buffer,
            language,
            languages,
            timer: DebounceTimer::new(config.debounce),
            config,
            state: SessionState::Idle,
            selection: Selection::caret(0),
            selected_lines: SelectedLines::default(),
            line_count,
            line_heights: LineHeights::uniform(line_count, default_line_height),
            default_line_height,
            wrap_width: WrapWidth::Unbounded,
            layout_pending: true,
            has_focus: false,
            events,
        }
    }

    /// Replaces `range` (char offsets) with `replacement`.
    ///
    /// # Returns
    /// The edit delta, or `None` when nothing changed.
    pub fn apply_local_edit(
        &mut self,
        range: Range<usize>,
        replacement: &str,
        now: Instant,
    ) -> Option<EditDelta> {
        let delta = self.buffer.replace_range(range, replacement)?;
        self.after_local_mutation(&delta, now);
        Some(delta)
    }

    /// Replaces the whole text with `snapshot` as a user edit.
    ///
    /// For text surfaces that mutate their own string and hand back the
    /// result; the changed range is recovered by diffing.
    pub fn apply_local_snapshot(&mut self, snapshot: &str, now: Instant) -> Option<EditDelta> {
        let delta = self.buffer.apply_snapshot(snapshot)?;
        self.after_local_mutation(&delta, now);
        Some(delta)
    }

    fn after_local_mutation(&mut self, delta: &EditDelta, now: Instant) {
        if self.state == SessionState::Idle {
            debug!(target: SESSION_TARGET, block_id = %self.block_id, "editing started");
        }
        self.state = SessionState::Editing;
        let generation = self.timer.arm(now);
        self.refresh_line_count();
        self.selection = Selection::caret(delta.inserted_end);
        self.selected_lines =
            compute_selected_lines(self.buffer.as_str(), self.selection.start, 0);
        debug!(
            target: SESSION_TARGET,
            block_id = %self.block_id,
            revision = self.buffer.revision(),
            generation,
            start_line = delta.start_line,
            old_end_line = delta.old_end_line,
            new_end_line = delta.new_end_line,
            char_delta = delta.char_delta,
            "local edit"
        );
        self.emit(BlockEvent::ContentChanged(self.buffer.as_str().to_string()));
    }

    /// Advances the debounce clock.
    ///
    /// # Returns
    /// `true` when this call ended an editing burst.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.timer.poll(now) {
            return false;
        }
        self.state = SessionState::Idle;
        debug!(
            target: SESSION_TARGET,
            block_id = %self.block_id,
            generation = self.timer.generation(),
            "editing settled"
        );
        true
    }

    /// Time until the current editing burst settles, if one is running.
    pub fn debounce_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Pushes container-side content into the session.
    ///
    /// Suppressed while the user is editing; otherwise the buffer takes the
    /// new text verbatim. The selection is clamped to the new length.
    pub fn apply_external_content(&mut self, text: &str, now: Instant) -> ExternalUpdate {
        self.tick(now);
        if self.state == SessionState::Editing {
            debug!(
                target: SESSION_TARGET,
                block_id = %self.block_id,
                remaining_ms = self
                    .timer
                    .remaining(now)
                    .map(|left| left.as_millis() as u64)
                    .unwrap_or(0),
                "external update suppressed while editing"
            );
            return ExternalUpdate::Suppressed;
        }
        if !self.buffer.replace_all(text) {
            return ExternalUpdate::Unchanged;
        }
        self.refresh_line_count();
        self.selection = self.selection.clamped(self.buffer.len_chars());
        if !self.selected_lines.is_empty() {
            self.recompute_selected_lines();
        }
        debug!(
            target: SESSION_TARGET,
            block_id = %self.block_id,
            revision = self.buffer.revision(),
            lines = self.line_count,
            "external content applied"
        );
        ExternalUpdate::Applied
    }

    /// Pushes a container-side copy of the whole block.
    ///
    /// The language is synced silently; content follows
    /// [`EditSession::apply_external_content`].
    pub fn apply_external_block(&mut self, block: &CodeBlock, now: Instant) -> ExternalUpdate {
        if block.language != self.language {
            self.language = block.language.clone();
        }
        self.indent = block.indent;
        self.apply_external_content(&block.content, now)
    }

    fn refresh_line_count(&mut self) {
        self.line_count = self.buffer.line_count();
        // Keep one entry per line until the next layout pass replaces them.
        self.line_heights
            .resize(self.line_count, self.default_line_height);
        self.layout_pending = true;
    }

    /// Sets the width the text wraps at; a change schedules a layout pass.
    pub fn set_wrap_width(&mut self, width: WrapWidth) {
        if width != self.wrap_width {
            self.wrap_width = width;
            self.layout_pending = true;
        }
    }

    /// Current wrap width.
    pub fn wrap_width(&self) -> WrapWidth {
        self.wrap_width
    }

    /// Lays the buffer out with `service` and reconciles line heights.
    pub fn run_layout<M: MeasurementService>(&mut self, service: &M) {
        let default_line_height = service.default_line_height();
        let heights = compute_heights(
            self.buffer.as_str(),
            service.layout(self.buffer.as_str(), self.wrap_width),
            default_line_height,
        );
        if self.config.trace_layout {
            debug!(
                target: LAYOUT_TARGET,
                block_id = %self.block_id,
                revision = self.buffer.revision(),
                lines = heights.len(),
                total_height = heights.total(),
                wrap_width = self.wrap_width.as_points(),
                "layout pass"
            );
        }
        self.line_heights = heights;
        self.default_line_height = default_line_height;
        self.layout_pending = false;
    }

    /// Runs the layout pass if a mutation or resize scheduled one.
    ///
    /// # Returns
    /// `true` when a pass ran.
    pub fn run_pending_layout<M: MeasurementService>(&mut self, service: &M) -> bool {
        if !self.layout_pending {
            return false;
        }
        self.run_layout(service);
        true
    }

    /// Records the text surface's selection (char offsets, clamped).
    pub fn set_selection(&mut self, start: usize, len: usize) {
        self.selection = Selection { start, len }.clamped(self.buffer.len_chars());
        self.recompute_selected_lines();
    }

    fn recompute_selected_lines(&mut self) {
        self.selected_lines = compute_selected_lines(
            self.buffer.as_str(),
            self.selection.start,
            self.selection.len,
        );
    }

    /// The block was selected in its container.
    pub fn select(&mut self) {
        self.emit(BlockEvent::Selected);
    }

    /// The text surface started editing. Emits `FocusGained` on the
    /// transition only.
    pub fn focus(&mut self) {
        if self.has_focus {
            return;
        }
        self.has_focus = true;
        self.emit(BlockEvent::FocusGained);
    }

    /// Focus moved elsewhere without the user dismissing the block.
    pub fn blur(&mut self) {
        self.has_focus = false;
    }

    /// Intercepts an editor command before the text surface handles it.
    pub fn handle_command(&mut self, command: EditorCommand) -> CommandOutcome {
        match command {
            EditorCommand::Cancel => {
                self.has_focus = false;
                self.emit(BlockEvent::FocusLost);
                CommandOutcome::Handled
            }
            EditorCommand::DeleteBackward => {
                if self.selection.start == 0 && self.selection.is_caret() && self.buffer.is_blank()
                {
                    debug!(
                        target: SESSION_TARGET,
                        block_id = %self.block_id,
                        "backspace in blank block"
                    );
                    self.emit(BlockEvent::RequestBlockDeletion);
                    CommandOutcome::Handled
                } else {
                    CommandOutcome::Ignored
                }
            }
        }
    }

    /// Switches the block's language from the picker.
    ///
    /// # Errors
    /// Returns [`CodeBlockError::UnknownLanguage`] when `tag` is not in the
    /// language table.
    pub fn set_language(&mut self, tag: &str) -> Result<(), CodeBlockError> {
        let tag = self.languages.resolve(tag)?.tag.clone();
        if tag != self.language {
            self.language = tag.clone();
            self.emit(BlockEvent::LanguageChanged(tag));
        }
        Ok(())
    }

    fn emit(&self, event: BlockEvent) {
        let kind = event.kind();
        if self.events.send(event).is_err() {
            debug!(
                target: SESSION_TARGET,
                block_id = %self.block_id,
                event = kind,
                "event receiver dropped"
            );
        }
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn line_heights(&self) -> &LineHeights {
        &self.line_heights
    }

    pub fn selected_lines(&self) -> &SelectedLines {
        &self.selected_lines
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_editing(&self) -> bool {
        self.state == SessionState::Editing
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn content(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn languages(&self) -> &LanguageTable {
        &self.languages
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Buffer revision; bumps on every effective mutation.
    pub fn revision(&self) -> u64 {
        self.buffer.revision()
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn layout_pending(&self) -> bool {
        self.layout_pending
    }

    /// Copy of the block as it currently stands.
    pub fn snapshot(&self) -> CodeBlock {
        CodeBlock {
            id: self.block_id.clone(),
            language: self.language.clone(),
            content: self.buffer.as_str().to_string(),
            indent: self.indent,
        }
    }

    /// Ends the session and hands the block back.
    pub fn detach(mut self) -> CodeBlock {
        self.timer.cancel();
        debug!(target: SESSION_TARGET, block_id = %self.block_id, "detached edit session");
        CodeBlock {
            id: self.block_id,
            language: self.language,
            content: self.buffer.to_string(),
            indent: self.indent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::monospace::MonospaceMeasurement;
    use crate::session::events::event_channel;
    use crossbeam_channel::Receiver;

    const WINDOW: Duration = Duration::from_millis(50);

    fn session_with(content: &str) -> (EditSession, Receiver<BlockEvent>) {
        let (tx, rx) = event_channel();
        let config = EditorConfig {
            debounce: WINDOW,
            ..EditorConfig::default()
        };
        let session = EditSession::attach(
            CodeBlock::new("swift", content),
            config,
            Arc::new(LanguageTable::default()),
            tx,
        );
        (session, rx)
    }

    fn drain(rx: &Receiver<BlockEvent>) -> Vec<BlockEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn attach_counts_lines_and_schedules_layout() {
        let (session, rx) = session_with("a\nb\nc");
        assert_eq!(session.line_count(), 3);
        assert_eq!(session.line_heights().len(), 3);
        assert!(session.layout_pending());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.selection(), Selection::caret(0));
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn local_edit_enters_editing_and_emits_content() {
        let (mut session, rx) = session_with("ab");
        let now = Instant::now();
        let delta = session.apply_local_edit(2..2, "\ncd", now).expect("delta");
        assert_eq!(delta.inserted_end, 5);
        assert!(session.is_editing());
        assert_eq!(session.line_count(), 2);
        assert_eq!(session.line_heights().len(), 2);
        assert_eq!(session.selection(), Selection::caret(5));
        assert_eq!(session.selected_lines().iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(
            drain(&rx),
            vec![BlockEvent::ContentChanged("ab\ncd".to_string())]
        );
    }

    #[test]
    fn no_op_edit_changes_nothing() {
        let (mut session, rx) = session_with("abc");
        let revision = session.revision();
        assert!(session.apply_local_edit(1..1, "", Instant::now()).is_none());
        assert!(session.apply_local_snapshot("abc", Instant::now()).is_none());
        assert_eq!(session.revision(), revision);
        assert!(!session.is_editing());
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn tick_settles_after_window() {
        let (mut session, _rx) = session_with("");
        let start = Instant::now();
        session.apply_local_snapshot("x", start);
        assert!(!session.tick(start + Duration::from_millis(10)));
        assert!(session.is_editing());
        assert!(session.tick(start + WINDOW));
        assert!(!session.is_editing());
        assert!(!session.tick(start + WINDOW * 2));
    }

    #[test]
    fn later_edit_extends_editing_window() {
        let (mut session, _rx) = session_with("");
        let start = Instant::now();
        session.apply_local_snapshot("a", start);
        session.apply_local_snapshot("ab", start + Duration::from_millis(40));
        assert!(!session.tick(start + Duration::from_millis(60)));
        assert!(session.is_editing());
        assert_eq!(
            session.debounce_remaining(start + Duration::from_millis(60)),
            Some(Duration::from_millis(30))
        );
        assert!(session.tick(start + Duration::from_millis(90)));
    }

    #[test]
    fn external_update_is_suppressed_while_editing() {
        let (mut session, _rx) = session_with("old");
        let start = Instant::now();
        session.apply_local_snapshot("local", start);

        let outcome = session.apply_external_content("old", start + Duration::from_millis(20));
        assert_eq!(outcome, ExternalUpdate::Suppressed);
        assert_eq!(session.content(), "local");

        let outcome = session.apply_external_content("remote\ntext", start + WINDOW);
        assert_eq!(outcome, ExternalUpdate::Applied);
        assert_eq!(session.content(), "remote\ntext");
        assert_eq!(session.line_count(), 2);
        assert!(session.layout_pending());
    }

    #[test]
    fn external_update_with_same_text_is_unchanged() {
        let (mut session, rx) = session_with("same");
        let revision = session.revision();
        assert_eq!(
            session.apply_external_content("same", Instant::now()),
            ExternalUpdate::Unchanged
        );
        assert_eq!(session.revision(), revision);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn external_update_clamps_selection() {
        let (mut session, _rx) = session_with("a\nb\nc");
        session.set_selection(2, 3);
        assert_eq!(session.selected_lines().iter().collect::<Vec<_>>(), vec![2, 3]);

        session.apply_external_content("a", Instant::now());
        assert_eq!(session.selection(), Selection { start: 1, len: 0 });
        assert_eq!(session.selected_lines().iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn external_block_syncs_language_without_event() {
        let (mut session, rx) = session_with("x");
        let mut block = session.snapshot();
        block.language = "rust".to_string();
        block.content = "fn main() {}".to_string();
        assert_eq!(
            session.apply_external_block(&block, Instant::now()),
            ExternalUpdate::Applied
        );
        assert_eq!(session.language(), "rust");
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn pending_layout_runs_once() {
        let (mut session, _rx) = session_with("abcdefghij\nk");
        let measure = MonospaceMeasurement::new(1.0, 10.0);
        session.set_wrap_width(WrapWidth::Fixed(6.0));
        assert!(session.run_pending_layout(&measure));
        assert!(!session.layout_pending());
        assert_eq!(session.line_heights().as_slice(), &[20.0, 10.0]);
        assert!(!session.run_pending_layout(&measure));

        session.set_wrap_width(WrapWidth::Fixed(6.0));
        assert!(!session.layout_pending());
        session.set_wrap_width(WrapWidth::Unbounded);
        assert!(session.layout_pending());
    }

    #[test]
    fn provisional_heights_track_line_count_until_layout() {
        let (mut session, _rx) = session_with("a");
        let measure = MonospaceMeasurement::new(1.0, 10.0);
        session.run_layout(&measure);
        session.apply_local_snapshot("a\nb\nc", Instant::now());
        assert!(session.layout_pending());
        assert_eq!(session.line_heights().as_slice(), &[10.0, 10.0, 10.0]);
    }

    #[test]
    fn focus_emits_on_transition_only() {
        let (mut session, rx) = session_with("");
        session.focus();
        session.focus();
        session.blur();
        session.focus();
        assert_eq!(
            drain(&rx),
            vec![BlockEvent::FocusGained, BlockEvent::FocusGained]
        );
    }

    #[test]
    fn cancel_drops_focus() {
        let (mut session, rx) = session_with("x");
        session.focus();
        assert_eq!(
            session.handle_command(EditorCommand::Cancel),
            CommandOutcome::Handled
        );
        assert!(!session.has_focus());
        assert_eq!(
            drain(&rx),
            vec![BlockEvent::FocusGained, BlockEvent::FocusLost]
        );
    }

    #[test]
    fn backspace_in_blank_block_requests_deletion() {
        for content in ["", "   ", "\t \t"] {
            let (mut session, rx) = session_with(content);
            assert!(session
                .handle_command(EditorCommand::DeleteBackward)
                .is_handled());
            assert_eq!(drain(&rx), vec![BlockEvent::RequestBlockDeletion]);
        }
    }

    #[test]
    fn backspace_is_ignored_otherwise() {
        let (mut session, rx) = session_with("  a  ");
        assert_eq!(
            session.handle_command(EditorCommand::DeleteBackward),
            CommandOutcome::Ignored
        );

        let (mut blank, _blank_rx) = session_with("   ");
        blank.set_selection(1, 0);
        assert_eq!(
            blank.handle_command(EditorCommand::DeleteBackward),
            CommandOutcome::Ignored
        );
        blank.set_selection(0, 2);
        assert_eq!(
            blank.handle_command(EditorCommand::DeleteBackward),
            CommandOutcome::Ignored
        );
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn set_language_validates_and_emits() {
        let (mut session, rx) = session_with("");
        session.set_language("Rust").expect("known language");
        assert_eq!(session.language(), "rust");
        session.set_language("rust").expect("same language");

        let err = session.set_language("brainfunk").expect_err("unknown");
        assert!(matches!(err, CodeBlockError::UnknownLanguage(ref tag) if tag == "brainfunk"));
        assert_eq!(session.language(), "rust");
        assert_eq!(
            drain(&rx),
            vec![BlockEvent::LanguageChanged("rust".to_string())]
        );
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (mut session, rx) = session_with("");
        drop(rx);
        session.select();
        session.apply_local_snapshot("x", Instant::now());
        assert_eq!(session.content(), "x");
    }

    #[test]
    fn detach_returns_current_block() {
        let (mut session, _rx) = session_with("old");
        let id = session.block_id().to_string();
        session.apply_local_snapshot("new", Instant::now());
        let block = session.detach();
        assert_eq!(block.id, id);
        assert_eq!(block.language, "swift");
        assert_eq!(block.content, "new");
    }
}
