use std::collections::BTreeSet;

/// Normalized tokens extracted from a text. Recomputed on every comparison.
pub type KeywordSet = BTreeSet<String>;

/// Lower-case `text`, blank out everything except ASCII letters, digits and
/// whitespace, then split on whitespace runs.
pub fn tokenize(text: &str) -> KeywordSet {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
