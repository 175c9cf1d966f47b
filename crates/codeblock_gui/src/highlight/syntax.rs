//! Language tag to syntect grammar resolution.

use syntect::parsing::{SyntaxReference, SyntaxSet};

fn normalized_syntax_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn find_candidate<'a>(ps: &'a SyntaxSet, candidate: &str) -> Option<&'a SyntaxReference> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(syntax) = ps
        .find_syntax_by_name(trimmed)
        .or_else(|| ps.find_syntax_by_extension(trimmed))
    {
        return Some(syntax);
    }

    let normalized = normalized_syntax_key(trimmed);
    ps.syntaxes().iter().find(|syntax| {
        normalized_syntax_key(&syntax.name) == normalized
            || syntax
                .file_extensions
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(trimmed))
    })
}

/// Grammars tried, in order, when a tag has no bundled grammar of its own.
fn fallback_candidates(tag: &str) -> &'static [&'static str] {
    match tag {
        "csharp" => &["C#", "cs"],
        "bash" | "shell" => &["Bourne Again Shell (bash)", "bash", "sh"],
        "cpp" => &["C++", "cpp", "cc"],
        "typescript" => &["TypeScript", "ts", "JavaScript", "js"],
        "kotlin" => &["Kotlin", "kt", "Java", "java"],
        "swift" => &["Swift", "swift", "Rust", "rs", "Go"],
        "markdown" => &["Markdown", "md"],
        _ => &[],
    }
}

/// Returns `true` when `tag` names plain text.
pub fn is_plain_text_tag(tag: &str) -> bool {
    let trimmed = tag.trim();
    trimmed.is_empty()
        || ["text", "txt", "plain", "plaintext"]
            .iter()
            .any(|plain| trimmed.eq_ignore_ascii_case(plain))
}

/// Resolves the grammar used to highlight a block tagged `tag`.
///
/// Tries the tag as a grammar name or extension, then a per-language
/// fallback list, and finally plain text.
pub fn resolve_syntax<'a>(ps: &'a SyntaxSet, tag: &str) -> &'a SyntaxReference {
    if is_plain_text_tag(tag) {
        return ps.find_syntax_plain_text();
    }
    let lower = tag.trim().to_ascii_lowercase();
    find_candidate(ps, &lower)
        .or_else(|| {
            fallback_candidates(&lower)
                .iter()
                .find_map(|candidate| find_candidate(ps, candidate))
        })
        .unwrap_or_else(|| ps.find_syntax_plain_text())
}
