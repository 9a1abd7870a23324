//! Cheap checks that decide whether a cell's text is worth parsing.

/// Clean `text` for parsing, or `None` when the cell should be skipped.
///
/// Brackets become spaces. Text without an ASCII letter, or with more than
/// `max_words` space-separated tokens, is skipped. Tokens are counted by
/// splitting on single spaces, so runs of spaces count as extra tokens.
pub fn prefilter(text: &str, max_words: usize) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    let cleaned: String = text
        .chars()
        .map(|c| if matches!(c, '(' | ')' | '[' | ']') { ' ' } else { c })
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if cleaned.split(' ').count() > max_words {
        return None;
    }

    Some(cleaned)
}
