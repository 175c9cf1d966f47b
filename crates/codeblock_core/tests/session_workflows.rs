//! End-to-end edit-session workflows as seen from an embedding container.

use codeblock_core::layout::heights::compute_heights;
use codeblock_core::layout::monospace::MonospaceMeasurement;
use codeblock_core::text::line_index::compute_line_count;
use codeblock_core::{
    event_channel, BlockEvent, CodeBlock, EditSession, EditorCommand, EditorConfig,
    ExternalUpdate, LanguageTable, MeasurementService, WrapWidth,
};
use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const WINDOW: Duration = Duration::from_millis(50);

fn test_config() -> EditorConfig {
    EditorConfig {
        debounce: WINDOW,
        ..EditorConfig::default()
    }
}

fn attach(block: CodeBlock) -> (EditSession, Receiver<BlockEvent>) {
    let (tx, rx) = event_channel();
    let session = EditSession::attach(block, test_config(), Arc::new(LanguageTable::default()), tx);
    (session, rx)
}

fn recv_event(rx: &Receiver<BlockEvent>) -> BlockEvent {
    rx.recv_timeout(Duration::from_secs(2))
        .expect("expected block event")
}

#[test]
fn typing_burst_shields_buffer_from_stale_echo() {
    let (mut session, rx) = attach(CodeBlock::new("swift", "let x = 1"));
    let start = Instant::now();

    session.focus();
    assert_eq!(recv_event(&rx), BlockEvent::FocusGained);

    session.apply_local_edit(9..9, "0", start);
    let echoed = match recv_event(&rx) {
        BlockEvent::ContentChanged(text) => text,
        other => panic!("expected content change, got {:?}", other),
    };
    assert_eq!(echoed, "let x = 10");

    // The container echoes an older copy back before the burst settles.
    let update = session.apply_external_content("let x = 1", start + Duration::from_millis(10));
    assert_eq!(update, ExternalUpdate::Suppressed);
    assert_eq!(session.content(), "let x = 10");

    // After the window a genuine external change lands verbatim.
    let update = session.apply_external_content("let y = 2\nlet z = 3", start + WINDOW);
    assert_eq!(update, ExternalUpdate::Applied);
    assert_eq!(session.content(), "let y = 2\nlet z = 3");
    assert_eq!(session.line_count(), 2);
}

#[test]
fn container_thread_drains_events_until_dismissed() {
    let (mut session, rx) = attach(CodeBlock::new("", ""));
    let container = thread::spawn(move || {
        let mut changes = Vec::new();
        loop {
            match recv_event(&rx) {
                BlockEvent::ContentChanged(text) => changes.push(text),
                BlockEvent::FocusLost => return changes,
                _ => {}
            }
        }
    });

    let start = Instant::now();
    session.focus();
    for (step, snapshot) in ["f", "fn", "fn\n", "fn\n}"].into_iter().enumerate() {
        session.apply_local_snapshot(snapshot, start + Duration::from_millis(step as u64 * 10));
    }
    session.handle_command(EditorCommand::Cancel);

    let changes = container.join().expect("container thread");
    assert_eq!(changes, vec!["f", "fn", "fn\n", "fn\n}"]);
}

#[test]
fn wrapped_layout_feeds_gutter_heights() {
    let (mut session, _rx) = attach(CodeBlock::new("swift", "short\nabcdefghijkl\n"));
    let measure = MonospaceMeasurement::new(1.0, 10.0);

    session.set_wrap_width(WrapWidth::Fixed(5.0));
    assert!(session.run_pending_layout(&measure));

    // 5 chars, 12 chars wrapped into three rows, trailing empty line.
    assert_eq!(session.line_count(), 3);
    assert_eq!(session.line_heights().as_slice(), &[10.0, 30.0, 10.0]);
    assert_eq!(session.line_heights().line_top(3), 40.0);

    session.set_selection(2, 6);
    assert_eq!(
        session.selected_lines().iter().collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn heights_always_match_line_count() {
    let measure = MonospaceMeasurement::new(1.0, 10.0);
    let samples = [
        "",
        "\n",
        "\n\n\n",
        "a\r\nb",
        "tail\n",
        "wide 漢字 text that wraps\nx",
    ];
    for sample in samples {
        for width in [WrapWidth::Unbounded, WrapWidth::Fixed(3.0)] {
            let heights = compute_heights(
                sample,
                measure.layout(sample, width),
                measure.default_line_height(),
            );
            assert_eq!(
                heights.len(),
                compute_line_count(sample),
                "sample {:?} at {:?}",
                sample,
                width
            );
        }
    }
}

#[test]
fn empty_block_backspace_asks_container_to_remove_it() {
    let (mut session, rx) = attach(CodeBlock::new("python", "  "));
    assert!(session
        .handle_command(EditorCommand::DeleteBackward)
        .is_handled());
    assert_eq!(recv_event(&rx), BlockEvent::RequestBlockDeletion);

    let (mut session, rx) = attach(CodeBlock::new("python", "  a  "));
    assert!(!session
        .handle_command(EditorCommand::DeleteBackward)
        .is_handled());
    assert!(rx.try_recv().is_err());
}

#[test]
fn detached_block_round_trips_through_json_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("block.json");

    let (mut session, rx) = attach(CodeBlock::new("swift", "print(1)"));
    session.set_language("rust").expect("known language");
    assert_eq!(
        recv_event(&rx),
        BlockEvent::LanguageChanged("rust".to_string())
    );
    session.apply_local_snapshot("println!(\"1\");", Instant::now());
    let block = session.detach();
    block.write_json(&path).expect("write block");

    let restored = CodeBlock::read_json(&path).expect("read block");
    assert_eq!(restored, block);

    let (session, _rx) = attach(restored);
    assert_eq!(session.language(), "rust");
    assert_eq!(session.content(), "println!(\"1\");");
}
