//! Demo window hosting a single code block.

use crate::block_view::CodeBlockView;
use crate::highlight::SyntectSettings;
use crate::style::{self, COLOR_TEXT_MUTED};
use codeblock_core::{event_channel, BlockEvent, CodeBlock, EditorConfig, LanguageTable};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui::{self, RichText};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub(crate) const DEFAULT_WINDOW_SIZE: [f32; 2] = [760.0, 520.0];
pub(crate) const MIN_WINDOW_SIZE: [f32; 2] = [420.0, 260.0];
const STORAGE_KEY: &str = "codeblock_demo_block";
const MAX_BLOCK_WIDTH: f32 = 600.0;

pub(crate) const SAMPLE_CODE: &str = "func fibonacci(_ n: Int) -> Int {
    guard n > 1 else { return n }
    return fibonacci(n - 1) + fibonacci(n - 2)
}

print(fibonacci(10))";

/// Sample block shown on first launch.
pub(crate) fn sample_block() -> CodeBlock {
    CodeBlock::new("swift", SAMPLE_CODE)
}

/// Demo container: owns the document copy of the block and plays the
/// embedding role (applies change events, pushes the block back each frame).
pub struct CodeBlockDemoApp {
    config: EditorConfig,
    languages: Arc<LanguageTable>,
    settings: SyntectSettings,
    block: CodeBlock,
    view: Option<CodeBlockView>,
    events_tx: Sender<BlockEvent>,
    events_rx: Receiver<BlockEvent>,
    style_applied: bool,
}

impl CodeBlockDemoApp {
    pub fn new(config: EditorConfig, stored: Option<CodeBlock>) -> Self {
        let (events_tx, events_rx) = event_channel();
        let block = stored.unwrap_or_else(sample_block);
        let languages = Arc::new(LanguageTable::default());
        let view = CodeBlockView::new(
            block.clone(),
            config.clone(),
            languages.clone(),
            events_tx.clone(),
        );
        Self {
            config,
            languages,
            settings: SyntectSettings::default(),
            block,
            view: Some(view),
            events_tx,
            events_rx,
            style_applied: false,
        }
    }

    fn ensure_style(&mut self, ctx: &egui::Context) {
        if self.style_applied {
            return;
        }
        style::apply_style(ctx, self.config.font_size);
        self.style_applied = true;
    }

    /// Applies block events to the document copy.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                BlockEvent::ContentChanged(content) => {
                    debug!(chars = content.chars().count(), "content changed");
                    self.block.content = content;
                }
                BlockEvent::LanguageChanged(language) => {
                    info!(language = %language, "language changed");
                    self.block.language = language;
                }
                BlockEvent::FocusGained => info!("focused"),
                BlockEvent::FocusLost => info!("unfocused"),
                BlockEvent::Selected => info!("selected"),
                BlockEvent::RequestBlockDeletion => {
                    if let Some(view) = self.view.take() {
                        let removed = view.into_block();
                        info!(block_id = %removed.id, "block deleted");
                    }
                }
            }
        }
    }

    fn new_block(&mut self) {
        self.block = CodeBlock::new(self.block.language.clone(), "");
        self.view = Some(CodeBlockView::new(
            self.block.clone(),
            self.config.clone(),
            self.languages.clone(),
            self.events_tx.clone(),
        ));
    }

    fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Code Block Demo");
            });
            ui.add_space(12.0);
            let width = ui.available_width().min(MAX_BLOCK_WIDTH);
            ui.vertical_centered(|ui| {
                ui.set_max_width(width);
                match self.view.as_mut() {
                    Some(view) => {
                        view.apply_external_block(&self.block, Instant::now());
                        view.show(ui, &self.settings);
                    }
                    None => {
                        ui.label(RichText::new("Block deleted.").color(COLOR_TEXT_MUTED));
                        if ui.button("New block").clicked() {
                            self.new_block();
                        }
                    }
                }
            });
        });
    }
}

impl eframe::App for CodeBlockDemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_style(ctx);
        self.render(ctx);
        self.drain_events();
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, STORAGE_KEY, &self.block);
    }
}

/// Restores the block saved by a previous run, if any.
pub(crate) fn stored_block(storage: Option<&dyn eframe::Storage>) -> Option<CodeBlock> {
    storage.and_then(|storage| eframe::get_value(storage, STORAGE_KEY))
}
