//! Query text helpers shared by the backends and the controller.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Characters that turn a query into a wildcard (full-text only) query.
pub const WILDCARD_CHARS: [char; 2] = ['*', '?'];

pub fn has_wildcard(query: &str) -> bool {
    query.contains(WILDCARD_CHARS)
}

/// True when the query is exactly one whitespace-delimited token.
pub fn is_single_token(query: &str) -> bool {
    let mut tokens = query.split_whitespace();
    tokens.next().is_some() && tokens.next().is_none()
}

/// Normalizes a headword or query into index-key form.
///
/// Diacritics are stripped, case is folded, characters that are neither
/// alphanumeric nor whitespace are dropped, and whitespace runs collapse to a
/// single space.
pub fn normalize_index_key(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
        } else if c.is_alphanumeric() {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// Cuts selected text to `max_chars`, dropping the trailing partial word.
///
/// Text within the limit is only trimmed.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let head: String = text.chars().take(max_chars).collect();
    let head = head.trim_end();
    match head.rfind(char::is_whitespace) {
        Some(idx) => head[..idx].trim_end().to_string(),
        None => head.to_string(),
    }
}

/// Turns raw clipboard contents into a single-line query of at most `max_chars`.
pub fn clipboard_query(text: &str, max_chars: usize) -> String {
    let head: String = text.chars().take(max_chars).collect();
    head.lines().collect::<Vec<_>>().join(" ").trim().to_string()
}
