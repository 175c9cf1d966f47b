//! egui front end for the code-block editor.
//!
//! Exposes the block widget for embedding and a `run` helper that launches
//! the demo window.

mod app;
/// Code-block widget.
pub mod block_view;
/// Syntect highlighting and galley caching.
pub mod highlight;
/// Editor command mapping from egui input.
pub mod input;
/// Galley-backed measurement service.
pub mod measure;
/// Palette and style helpers.
pub mod style;

pub use app::CodeBlockDemoApp;
pub use block_view::{BlockViewOutput, CodeBlockView};
pub use highlight::SyntectSettings;

use codeblock_core::EditorConfig;
use eframe::egui;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "codeblock=warn,codeblock_core=warn,codeblock_gui=info";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A host may already have installed a subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init();
}

/// Start the demo window with tracing enabled.
///
/// Configuration is read from `CODEBLOCK_*` environment variables; a block
/// saved by a previous run is restored.
///
/// # Errors
/// Propagates any `eframe` initialization or runtime error.
pub fn run() -> eframe::Result<()> {
    init_tracing();
    let config = EditorConfig::from_env();
    tracing::info!(
        debounce_ms = config.debounce.as_millis() as u64,
        font_size = config.font_size,
        theme = %config.theme_key,
        "starting code block demo"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(app::DEFAULT_WINDOW_SIZE)
            .with_min_inner_size(app::MIN_WINDOW_SIZE)
            .with_title("Code Block Demo"),
        ..Default::default()
    };

    eframe::run_native(
        "codeblock-demo",
        options,
        Box::new(move |cc| {
            let stored = app::stored_block(cc.storage);
            Ok(Box::new(CodeBlockDemoApp::new(config, stored)))
        }),
    )
}
