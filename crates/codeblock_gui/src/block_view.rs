//! Code-block widget: language header, line-number gutter and highlighted
//! editor, driven by an [`EditSession`].

use crate::highlight::{BlockLayoutCache, BlockLayoutRequest, SyntectSettings, ThemeChoice};
use crate::input::{commands_from_events, EditorFocus};
use crate::measure::GalleyMeasurement;
use crate::style::{self, COLOR_BG_BLOCK, COLOR_BG_HEADER, COLOR_TEXT_MUTED, GUTTER_PADDING};
use codeblock_core::language::effective_language_tag;
use codeblock_core::{
    BlockEvent, CodeBlock, EditSession, EditorCommand, EditorConfig, ExternalUpdate,
    LanguageTable, Selection, WrapWidth,
};
use crossbeam_channel::Sender;
use eframe::egui::{self, CornerRadius, FontId, RichText};
use egui_extras::syntax_highlighting::CodeTheme;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// What a block did during one frame.
pub struct BlockViewOutput {
    /// Response covering the whole block frame.
    pub response: egui::Response,
    /// The user edited the text this frame.
    pub changed: bool,
    /// Line heights were recomputed this frame.
    pub layout_ran: bool,
}

/// One on-screen code block.
pub struct CodeBlockView {
    session: EditSession,
    text: String,
    synced_revision: u64,
    layout: BlockLayoutCache,
    theme: ThemeChoice,
    show_line_numbers: bool,
    hovered: bool,
    editor_id: egui::Id,
}

impl CodeBlockView {
    /// Attaches a session for `block` reporting to `events`.
    pub fn new(
        block: CodeBlock,
        config: EditorConfig,
        languages: Arc<LanguageTable>,
        events: Sender<BlockEvent>,
    ) -> Self {
        let editor_id = egui::Id::new(("codeblock_editor", block.id.as_str()));
        let show_line_numbers = config.show_line_numbers;
        let session = EditSession::attach(block, config, languages, events);
        Self {
            text: session.content().to_string(),
            synced_revision: session.revision(),
            session,
            layout: BlockLayoutCache::default(),
            theme: ThemeChoice::default(),
            show_line_numbers,
            hovered: false,
            editor_id,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    /// Id of the embedded text edit, for focus requests.
    pub fn editor_id(&self) -> egui::Id {
        self.editor_id
    }

    pub fn show_line_numbers(&self) -> bool {
        self.show_line_numbers
    }

    pub fn set_show_line_numbers(&mut self, show: bool) {
        self.show_line_numbers = show;
    }

    /// Pushes a container-side copy of the block; see
    /// [`EditSession::apply_external_block`].
    pub fn apply_external_block(&mut self, block: &CodeBlock, now: Instant) -> ExternalUpdate {
        self.session.apply_external_block(block, now)
    }

    /// Ends the session and hands the block back.
    pub fn into_block(self) -> CodeBlock {
        self.session.detach()
    }

    fn sync_text(&mut self) {
        if self.synced_revision != self.session.revision() {
            self.text.clear();
            self.text.push_str(self.session.content());
            self.synced_revision = self.session.revision();
        }
    }

    /// Routes intercepted commands to the session before the text edit runs.
    fn handle_commands(&mut self, ui: &mut egui::Ui) {
        let focus = EditorFocus {
            held: self.session.has_focus(),
            current: ui.memory(|m| m.has_focus(self.editor_id)),
        };
        let events = ui.input(|i| i.events.clone());
        for command in commands_from_events(&events, focus) {
            if !self.session.handle_command(command).is_handled() {
                continue;
            }
            match command {
                EditorCommand::Cancel => {
                    ui.memory_mut(|m| m.surrender_focus(self.editor_id));
                }
                EditorCommand::DeleteBackward => {
                    ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace));
                }
            }
        }
    }

    /// Draws the block and feeds everything the user did back into the
    /// session.
    pub fn show(&mut self, ui: &mut egui::Ui, settings: &SyntectSettings) -> BlockViewOutput {
        let now = Instant::now();
        self.session.tick(now);
        self.sync_text();
        self.handle_commands(ui);

        let font = style::editor_font(self.session.config().font_size);
        let frame = egui::Frame::default()
            .fill(COLOR_BG_BLOCK)
            .stroke(style::block_stroke(self.session.has_focus()))
            .corner_radius(CornerRadius::same(style::BLOCK_CORNER_RADIUS))
            .inner_margin(egui::Margin::same(8));
        let inner = frame.show(ui, |ui| {
            self.show_header(ui);
            ui.add_space(4.0);
            ui.horizontal_top(|ui| {
                if self.show_line_numbers {
                    self.show_gutter(ui, &font);
                }
                self.show_editor(ui, settings, &font, now)
            })
            .inner
        });
        let (changed, layout_ran) = inner.inner;
        let response = inner.response;

        self.hovered = ui.rect_contains_pointer(response.rect);
        if self.hovered && ui.input(|i| i.pointer.primary_clicked()) {
            self.session.select();
        }
        if let Some(left) = self.session.debounce_remaining(Instant::now()) {
            ui.ctx().request_repaint_after(left);
        }

        BlockViewOutput {
            response,
            changed,
            layout_ran,
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        let show_toggle = self.hovered || self.session.has_focus();
        let mut picked = None;
        let mut toggled = false;
        egui::Frame::default()
            .fill(COLOR_BG_HEADER)
            .corner_radius(CornerRadius::same(4))
            .inner_margin(egui::Margin::symmetric(6, 2))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let languages = self.session.languages();
                    let current = self.session.language();
                    egui::ComboBox::from_id_salt(self.editor_id.with("language"))
                        .selected_text(
                            RichText::new(languages.display_name(current))
                                .small()
                                .color(COLOR_TEXT_MUTED),
                        )
                        .show_ui(ui, |ui| {
                            for option in languages.options() {
                                let selected = option.tag.eq_ignore_ascii_case(current.trim());
                                if ui.selectable_label(selected, &option.label).clicked() {
                                    picked = Some(option.tag.clone());
                                }
                            }
                        });
                    if show_toggle {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let label = if self.show_line_numbers {
                                "Hide Lines"
                            } else {
                                "Show Lines"
                            };
                            toggled = ui.small_button(label).clicked();
                        });
                    }
                });
            });

        if toggled {
            self.show_line_numbers = !self.show_line_numbers;
        }
        if let Some(tag) = picked {
            if let Err(err) = self.session.set_language(&tag) {
                warn!(language = %tag, error = %err, "language pick rejected");
            }
        }
    }

    fn show_gutter(&self, ui: &mut egui::Ui, font: &FontId) {
        let heights = self.session.line_heights();
        let widest = ui
            .fonts_mut(|f| {
                f.layout_no_wrap(
                    heights.len().max(10).to_string(),
                    font.clone(),
                    ui.visuals().text_color(),
                )
                .size()
                .x
            })
            .ceil();
        let width = widest + GUTTER_PADDING;
        ui.vertical(|ui| {
            ui.spacing_mut().item_spacing.y = 0.0;
            for (line, height) in heights.iter() {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
                ui.painter().text(
                    egui::pos2(rect.right() - GUTTER_PADDING, rect.top()),
                    egui::Align2::RIGHT_TOP,
                    line.to_string(),
                    font.clone(),
                    style::gutter_color(self.session.selected_lines().contains(line)),
                );
            }
        });
    }

    fn show_editor(
        &mut self,
        ui: &mut egui::Ui,
        settings: &SyntectSettings,
        font: &FontId,
        now: Instant,
    ) -> (bool, bool) {
        self.session
            .set_wrap_width(WrapWidth::from_points(ui.available_width()));
        let language = effective_language_tag(self.session.language()).to_string();
        let code_theme = CodeTheme::from_memory(ui.ctx(), ui.style());
        let theme_key = self
            .theme
            .resolve(settings, &self.session.config().theme_key, &code_theme)
            .to_string();

        let cache = &mut self.layout;
        let mut layouter = |ui: &egui::Ui, text: &dyn egui::TextBuffer, wrap_width: f32| {
            cache.layout(BlockLayoutRequest {
                ui,
                text: text.as_str(),
                wrap_width,
                language: &language,
                theme_key: &theme_key,
                font,
                settings,
            })
        };
        let output = egui::TextEdit::multiline(&mut self.text)
            .id(self.editor_id)
            .font(font.clone())
            .frame(false)
            .margin(egui::Margin::ZERO)
            .lock_focus(true)
            .desired_width(f32::INFINITY)
            .desired_rows(1)
            .layouter(&mut layouter)
            .show(ui);

        if output.response.has_focus() {
            self.session.focus();
        } else if self.session.has_focus() {
            self.session.blur();
        }

        let mut changed = false;
        if self.text != self.session.content() {
            changed = self.session.apply_local_snapshot(&self.text, now).is_some();
            self.synced_revision = self.session.revision();
        }
        if let Some(range) = output.cursor_range {
            let selection = Selection::between(range.primary.index, range.secondary.index);
            if selection != self.session.selection() || self.session.selected_lines().is_empty()
            {
                self.session.set_selection(selection.start, selection.len);
            }
        }

        let measure = GalleyMeasurement::from_galley(
            &output.galley,
            self.session.config().fallback_line_height(),
        );
        let layout_ran = self.session.run_pending_layout(&measure);
        if layout_ran {
            // Gutter rows for this frame were sized before the pass.
            ui.ctx().request_repaint();
        }
        (changed, layout_ran)
    }
}
