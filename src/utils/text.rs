/// Cut `text` to at most `max_chars` characters, appending "..." when
/// anything was removed. Counts characters, not bytes.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
