//! Replacement template expansion.
//!
//! Templates use the vault UI's `String.replace` syntax:
//! - `$$` -> literal `$`
//! - `$&` -> whole match
//! - `$1`..`$99` -> numbered group; the two-digit form wins when that group exists
//! - `$<name>` -> named group (only when the pattern declares named groups)
//!
//! Anything else after `$` is kept literally, including `${name}`, as are
//! group numbers the pattern does not have. Groups that did not participate expand to `""`.

use fancy_regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Whole,
    Group(usize),
    Named(String),
}

/// A template parsed against one compiled pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementTemplate {
    segments: Vec<Segment>,
}

impl ReplacementTemplate {
    /// Parse `template` for use with `regex`.
    ///
    /// The pattern's group count and names decide how ambiguous references
    /// such as `$12` or `$<x>` are read.
    #[must_use]
    pub fn parse(template: &str, regex: &Regex) -> Self {
        let group_count = regex.captures_len().saturating_sub(1);
        let has_names = regex.capture_names().flatten().next().is_some();

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            match parse_reference(after, group_count, has_names) {
                Some((Segment::Literal(text), consumed)) => {
                    literal.push_str(&text);
                    rest = &after[consumed..];
                }
                Some((segment, consumed)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &after[consumed..];
                }
                None => {
                    literal.push('$');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// True for the empty template.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Expand against one occurrence.
    #[must_use]
    pub fn expand(&self, caps: &Captures<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            let piece = match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Whole => caps.get(0).map_or("", |m| m.as_str()),
                Segment::Group(index) => caps.get(*index).map_or("", |m| m.as_str()),
                Segment::Named(name) => caps.name(name).map_or("", |m| m.as_str()),
            };
            out.push_str(piece);
        }
        out
    }
}

/// Parse the reference following a `$`; returns the segment and the number
/// of bytes it consumed from `after`.
fn parse_reference(after: &str, group_count: usize, has_names: bool) -> Option<(Segment, usize)> {
    let bytes = after.as_bytes();
    match *bytes.first()? {
        b'$' => Some((Segment::Literal("$".to_string()), 1)),
        b'&' => Some((Segment::Whole, 1)),
        first @ b'0'..=b'9' => {
            let valid = |n: usize| (1..=group_count).contains(&n);
            let one = usize::from(first - b'0');
            if let Some(&second) = bytes.get(1)
                && second.is_ascii_digit()
            {
                let two = one * 10 + usize::from(second - b'0');
                if valid(two) {
                    return Some((Segment::Group(two), 2));
                }
            }
            valid(one).then_some((Segment::Group(one), 1))
        }
        b'<' if has_names => {
            let end = after.find('>')?;
            Some((Segment::Named(after[1..end].to_string()), end + 1))
        }
        _ => None,
    }
}
