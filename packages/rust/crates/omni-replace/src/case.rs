//! Case adjustment for replacements.
//!
//! Heuristic, not grapheme-aware: classification compares the matched text
//! against its own `to_uppercase`/`to_lowercase`, so scripts without case and
//! characters whose case mapping expands (e.g. `ß`) follow Rust's standard
//! case tables.

/// Give `replacement` the casing style of `original`.
///
/// - all uppercase (and not caseless) -> uppercase replacement
/// - all lowercase (and not caseless) -> lowercase replacement
/// - first character uppercase, rest lowercase -> title-cased replacement
/// - anything else, including empty `original` -> replacement unchanged
///
/// Only the first character is inspected for title case: `"Hello World"`
/// has an uppercase letter in its tail and is passed through unchanged.
#[must_use]
pub fn adjust_case(original: &str, replacement: &str) -> String {
    let mut chars = original.chars();
    let Some(first) = chars.next() else {
        return replacement.to_string();
    };

    let upper = original.to_uppercase();
    let lower = original.to_lowercase();

    if original == upper && original != lower {
        return replacement.to_uppercase();
    }
    if original == lower && original != upper {
        return replacement.to_lowercase();
    }

    let rest = chars.as_str();
    if first.to_uppercase().eq(std::iter::once(first)) && rest == rest.to_lowercase() {
        return title_case(replacement);
    }

    replacement.to_string()
}

/// Uppercase the first character, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}
