//! Syntect-backed highlighting and galley caching for code blocks.

mod syntax;

use eframe::egui::{
    self,
    text::{LayoutJob, LayoutSection, TextFormat},
    Color32, FontId, Stroke,
};
use egui_extras::syntax_highlighting::CodeTheme;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;
use syntect::highlighting::{
    FontStyle, HighlightState, Highlighter, RangedHighlightIterator, Style, ThemeSet,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::warn;

pub use syntax::{is_plain_text_tag, resolve_syntax};

/// Syntax and theme sets shared by every block in a window.
pub struct SyntectSettings {
    pub ps: SyntaxSet,
    pub ts: ThemeSet,
}

impl Default for SyntectSettings {
    fn default() -> Self {
        Self {
            ps: SyntaxSet::load_defaults_newlines(),
            ts: ThemeSet::load_defaults(),
        }
    }
}

impl SyntectSettings {
    /// Picks the configured theme when bundled, otherwise one matching the
    /// egui light/dark mode.
    pub fn theme_key<'a>(&self, configured: &'a str, code_theme: &CodeTheme) -> &'a str {
        if self.ts.themes.contains_key(configured) {
            configured
        } else {
            fallback_theme_key(code_theme)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedTheme {
    configured: String,
    dark: bool,
    key: String,
}

/// Theme key resolved once per configured name and light/dark mode.
#[derive(Debug, Default)]
pub struct ThemeChoice {
    resolved: Option<ResolvedTheme>,
}

impl ThemeChoice {
    /// Returns the syntect theme key, resolving it only when the configured
    /// name or the egui mode changed since the last call.
    pub fn resolve(
        &mut self,
        settings: &SyntectSettings,
        configured: &str,
        code_theme: &CodeTheme,
    ) -> &str {
        let dark = code_theme.is_dark();
        let stale = self
            .resolved
            .as_ref()
            .map_or(true, |resolved| {
                resolved.dark != dark || resolved.configured != configured
            });
        if stale {
            let key = settings.theme_key(configured, code_theme);
            if key != configured {
                warn!(
                    theme = configured,
                    fallback = key,
                    "unknown syntect theme; using mode default"
                );
            }
            self.resolved = Some(ResolvedTheme {
                configured: configured.to_string(),
                dark,
                key: key.to_string(),
            });
        }
        self.resolved
            .as_ref()
            .map(|resolved| resolved.key.as_str())
            .unwrap_or_else(|| fallback_theme_key(code_theme))
    }
}

/// Syntect theme matching the current light/dark mode.
pub fn fallback_theme_key(theme: &CodeTheme) -> &'static str {
    if theme.is_dark() {
        "base16-mocha.dark"
    } else {
        "Solarized (light)"
    }
}

#[derive(Clone, PartialEq, Eq)]
struct LineStates {
    parse: ParseState,
    highlight: HighlightState,
}

#[derive(Clone)]
struct CachedLine {
    hash: u64,
    start: LineStates,
    end: LineStates,
    sections: Vec<LayoutSection>,
}

fn hash_line(line: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    line.hash(&mut hasher);
    hasher.finish()
}

/// Per-line highlight results, reused while a line and its start state are
/// unchanged.
///
/// Cleared whenever the language or theme changes.
#[derive(Default)]
pub struct HighlightCache {
    language: String,
    theme_key: String,
    lines: Vec<CachedLine>,
    last_reused: usize,
}

impl HighlightCache {
    fn clear_if_mismatch(&mut self, language: &str, theme_key: &str) {
        if self.language != language || self.theme_key != theme_key {
            self.language = language.to_string();
            self.theme_key = theme_key.to_string();
            self.lines.clear();
        }
    }

    /// Number of cached lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines taken from the cache by the most recent `layout_job` call.
    pub fn last_reused(&self) -> usize {
        self.last_reused
    }

    /// Builds a highlighted layout job for `text`.
    ///
    /// Falls back to a plain job when the theme is missing or a line fails to
    /// parse.
    pub fn layout_job(
        &mut self,
        settings: &SyntectSettings,
        text: &str,
        language: &str,
        theme_key: &str,
        font: &FontId,
        default_color: Color32,
    ) -> LayoutJob {
        self.last_reused = 0;
        if is_plain_text_tag(language) {
            self.lines.clear();
            return plain_layout_job(text, font, default_color);
        }
        self.clear_if_mismatch(language, theme_key);
        let Some(theme) = settings.ts.themes.get(theme_key) else {
            return plain_layout_job(text, font, default_color);
        };

        let syntax = resolve_syntax(&settings.ps, language);
        let highlighter = Highlighter::new(theme);
        let mut states = LineStates {
            parse: ParseState::new(syntax),
            highlight: HighlightState::new(&highlighter, ScopeStack::new()),
        };
        let mut old_lines = std::mem::take(&mut self.lines).into_iter();
        let mut new_lines = Vec::new();
        let mut job = LayoutJob {
            text: text.to_owned(),
            ..Default::default()
        };
        let mut line_start = 0usize;

        for line in LinesWithEndings::from(text) {
            let hash = hash_line(line);
            let reusable = old_lines
                .next()
                .filter(|cached| cached.hash == hash && cached.start == states);
            let cached = match reusable {
                Some(cached) => {
                    self.last_reused += 1;
                    cached
                }
                None => {
                    let start = states.clone();
                    let ops = match states.parse.parse_line(line, &settings.ps) {
                        Ok(ops) => ops,
                        Err(err) => {
                            warn!(
                                language,
                                error = %err,
                                "highlight parse failed; using plain text"
                            );
                            return plain_layout_job(text, font, default_color);
                        }
                    };
                    let mut sections = Vec::new();
                    for (style, _token, range) in RangedHighlightIterator::new(
                        &mut states.highlight,
                        &ops[..],
                        line,
                        &highlighter,
                    ) {
                        if let Some(range) = clamp_byte_range_to_char_boundaries(line, range) {
                            sections.push(LayoutSection {
                                leading_space: 0.0,
                                byte_range: range,
                                format: syntect_style_to_format(style, font),
                            });
                        }
                    }
                    CachedLine {
                        hash,
                        start,
                        end: states.clone(),
                        sections,
                    }
                }
            };
            states = cached.end.clone();
            push_line_sections(
                &mut job,
                line_start,
                line.len(),
                &cached.sections,
                font,
                default_color,
            );
            line_start += line.len();
            new_lines.push(cached);
        }

        self.lines = new_lines;
        job
    }
}

/// Layout job rendering `text` in one color.
pub fn plain_layout_job(text: &str, font: &FontId, color: Color32) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.append(
        text,
        0.0,
        TextFormat {
            font_id: font.clone(),
            color,
            ..Default::default()
        },
    );
    job
}

fn syntect_style_to_format(style: Style, font: &FontId) -> TextFormat {
    let color = Color32::from_rgb(style.foreground.r, style.foreground.g, style.foreground.b);
    TextFormat {
        font_id: font.clone(),
        color,
        italics: style.font_style.contains(FontStyle::ITALIC),
        underline: if style.font_style.contains(FontStyle::UNDERLINE) {
            Stroke::new(1.0, color)
        } else {
            Stroke::NONE
        },
        ..Default::default()
    }
}

fn clamp_byte_range_to_char_boundaries(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    if range.start >= range.end {
        return None;
    }
    let mut start = range.start.min(text.len());
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = range.end.min(text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    (start < end).then_some(start..end)
}

/// Appends one line's sections at `offset`, filling unstyled gaps with the
/// default color so every byte of the line is covered.
fn push_line_sections(
    job: &mut LayoutJob,
    offset: usize,
    line_len: usize,
    sections: &[LayoutSection],
    font: &FontId,
    default_color: Color32,
) {
    let default_format = TextFormat {
        font_id: font.clone(),
        color: default_color,
        ..Default::default()
    };
    let mut push = |range: Range<usize>, format: TextFormat| {
        job.sections.push(LayoutSection {
            leading_space: 0.0,
            byte_range: offset + range.start..offset + range.end,
            format,
        });
    };
    let mut cursor = 0usize;
    for section in sections {
        let start = section.byte_range.start.max(cursor);
        let end = section.byte_range.end.min(line_len);
        if start >= end {
            continue;
        }
        if start > cursor {
            push(cursor..start, default_format.clone());
        }
        push(start..end, section.format.clone());
        cursor = end;
    }
    if cursor < line_len {
        push(cursor..line_len, default_format);
    }
}

/// Last galley produced for a block, reused while nothing it depends on
/// has changed.
#[derive(Default)]
pub struct BlockLayoutCache {
    text: String,
    language: String,
    theme_key: String,
    wrap_width: f32,
    font: Option<FontId>,
    pixels_per_point: f32,
    galley: Option<Arc<egui::Galley>>,
    highlight: HighlightCache,
}

/// Inputs for [`BlockLayoutCache::layout`].
pub struct BlockLayoutRequest<'a> {
    pub ui: &'a egui::Ui,
    pub text: &'a str,
    pub wrap_width: f32,
    pub language: &'a str,
    pub theme_key: &'a str,
    pub font: &'a FontId,
    pub settings: &'a SyntectSettings,
}

impl BlockLayoutCache {
    /// Highlight cache backing this block.
    pub fn highlight(&self) -> &HighlightCache {
        &self.highlight
    }

    /// Returns the galley for `request`, rebuilding only on change.
    pub fn layout(&mut self, request: BlockLayoutRequest<'_>) -> Arc<egui::Galley> {
        let pixels_per_point = request.ui.ctx().pixels_per_point();
        let wrap_width = request.wrap_width.max(0.0).round();
        if let Some(galley) = self.galley.as_ref() {
            if self.text == request.text
                && self.language == request.language
                && self.theme_key == request.theme_key
                && self.wrap_width == wrap_width
                && self.pixels_per_point == pixels_per_point
                && self.font.as_ref() == Some(request.font)
            {
                return galley.clone();
            }
        }

        let mut job = self.highlight.layout_job(
            request.settings,
            request.text,
            request.language,
            request.theme_key,
            request.font,
            request.ui.visuals().text_color(),
        );
        job.wrap.max_width = wrap_width;
        let galley = request.ui.fonts_mut(|fonts| fonts.layout_job(job));

        self.text.clear();
        self.text.push_str(request.text);
        self.language = request.language.to_string();
        self.theme_key = request.theme_key.to_string();
        self.wrap_width = wrap_width;
        self.pixels_per_point = pixels_per_point;
        self.font = Some(request.font.clone());
        self.galley = Some(galley.clone());
        galley
    }
}
