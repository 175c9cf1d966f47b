//! Language options offered by the block's language picker.

use crate::constants::{PLAIN_TEXT_LABEL, PLAIN_TEXT_LANGUAGE};
use crate::error::CodeBlockError;

/// Built-in `(tag, label)` pairs, in picker order. The empty tag is plain text.
pub const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    ("", PLAIN_TEXT_LABEL),
    ("swift", "Swift"),
    ("python", "Python"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("java", "Java"),
    ("cpp", "C++"),
    ("c", "C"),
    ("csharp", "C#"),
    ("go", "Go"),
    ("rust", "Rust"),
    ("ruby", "Ruby"),
    ("php", "PHP"),
    ("kotlin", "Kotlin"),
    ("scala", "Scala"),
    ("sql", "SQL"),
    ("bash", "Bash"),
    ("shell", "Shell"),
    ("json", "JSON"),
    ("xml", "XML"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("markdown", "Markdown"),
];

/// One selectable language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOption {
    pub tag: String,
    pub label: String,
}

/// Immutable table of selectable languages.
///
/// Shared by every block in a window; construct once and pass it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTable {
    options: Vec<LanguageOption>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_LANGUAGES
                .iter()
                .map(|(tag, label)| LanguageOption {
                    tag: (*tag).to_string(),
                    label: (*label).to_string(),
                })
                .collect(),
        )
    }
}

/// Maps an empty tag to the plain-text tag understood by highlighters.
pub fn effective_language_tag(tag: &str) -> &str {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        PLAIN_TEXT_LANGUAGE
    } else {
        trimmed
    }
}

fn same_tag(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl LanguageTable {
    /// Builds a table from `options`, adding a plain-text entry first when
    /// none has an empty tag.
    pub fn new(mut options: Vec<LanguageOption>) -> Self {
        if !options.iter().any(|option| option.tag.trim().is_empty()) {
            options.insert(
                0,
                LanguageOption {
                    tag: String::new(),
                    label: PLAIN_TEXT_LABEL.to_string(),
                },
            );
        }
        Self { options }
    }

    /// Options in picker order.
    pub fn options(&self) -> &[LanguageOption] {
        &self.options
    }

    /// Looks up an option by tag (trimmed, case-insensitive).
    pub fn find(&self, tag: &str) -> Option<&LanguageOption> {
        self.options.iter().find(|option| same_tag(&option.tag, tag))
    }

    /// Like [`Self::find`], failing on unknown tags.
    ///
    /// # Errors
    /// Returns [`CodeBlockError::UnknownLanguage`] when `tag` is not listed.
    pub fn resolve(&self, tag: &str) -> Result<&LanguageOption, CodeBlockError> {
        self.find(tag)
            .ok_or_else(|| CodeBlockError::UnknownLanguage(tag.trim().to_string()))
    }

    /// Label shown in the picker for `tag`, plain text when unknown.
    pub fn display_name(&self, tag: &str) -> &str {
        self.find(tag)
            .map(|option| option.label.as_str())
            .unwrap_or(PLAIN_TEXT_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_starts_with_plain_text() {
        let table = LanguageTable::default();
        assert_eq!(table.options().len(), DEFAULT_LANGUAGES.len());
        assert_eq!(table.options()[0].tag, "");
        assert_eq!(table.options()[0].label, PLAIN_TEXT_LABEL);
    }

    #[test]
    fn display_name_falls_back_to_plain_text() {
        let table = LanguageTable::default();
        assert_eq!(table.display_name("rust"), "Rust");
        assert_eq!(table.display_name(" CPP "), "C++");
        assert_eq!(table.display_name(""), PLAIN_TEXT_LABEL);
        assert_eq!(table.display_name("brainfuck"), PLAIN_TEXT_LABEL);
    }

    #[test]
    fn resolve_rejects_unknown_tags() {
        let table = LanguageTable::default();
        assert_eq!(table.resolve("swift").expect("swift").label, "Swift");
        match table.resolve(" cobol ") {
            Err(CodeBlockError::UnknownLanguage(tag)) => assert_eq!(tag, "cobol"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn custom_tables_gain_plain_text_entry() {
        let table = LanguageTable::new(vec![LanguageOption {
            tag: "lua".to_string(),
            label: "Lua".to_string(),
        }]);
        assert_eq!(table.options().len(), 2);
        assert!(table.find("").is_some());
        assert!(table.find("rust").is_none());
    }

    #[test]
    fn effective_tag_maps_empty_to_plaintext() {
        assert_eq!(effective_language_tag(""), PLAIN_TEXT_LANGUAGE);
        assert_eq!(effective_language_tag("  "), PLAIN_TEXT_LANGUAGE);
        assert_eq!(effective_language_tag(" go "), "go");
    }
}
