//! Pattern compilation, validation and the explicit search cursor.
//!
//! Flags use the JavaScript-style letters the vault UI accepts (`"gim"`).
//! Global search is always on: callers iterate every occurrence through
//! [`next_match`], which takes the search offset as an argument instead of
//! keeping it inside the matcher.
//!
//! Patterns compile with `fancy-regex`, so lookahead, lookbehind and
//! backreferences work as they do in the vault UI.

use std::str::FromStr;

use fancy_regex::{Captures, Regex};

use crate::case::adjust_case;
use crate::error::ReplaceError;
use crate::template::ReplacementTemplate;
use crate::types::PatternSpec;

/// Parsed flag string.
///
/// `g`, `u`, `d` and `y` are accepted but carry no setting: every search is
/// global from the cursor, the engine is always Unicode-aware and match
/// offsets are always reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    /// `i` - case-insensitive matching.
    pub case_insensitive: bool,
    /// `m` - `^`/`$` match at line boundaries.
    pub multi_line: bool,
    /// `s` - `.` matches `\n`.
    pub dot_matches_new_line: bool,
    /// `x` - ignore whitespace and allow `#` comments.
    pub ignore_whitespace: bool,
}

impl FromStr for RegexFlags {
    type Err = ReplaceError;

    fn from_str(flags: &str) -> Result<Self, Self::Err> {
        let mut parsed = Self::default();
        for flag in flags.chars() {
            match flag {
                'g' | 'u' | 'd' | 'y' => {}
                'i' => parsed.case_insensitive = true,
                'm' => parsed.multi_line = true,
                's' => parsed.dot_matches_new_line = true,
                'x' => parsed.ignore_whitespace = true,
                other => return Err(ReplaceError::InvalidFlag(other)),
            }
        }
        Ok(parsed)
    }
}

impl RegexFlags {
    /// Inline flag group such as `(?im)`, empty when no flag is set.
    fn inline_group(self) -> String {
        let letters: String = [
            (self.case_insensitive, 'i'),
            (self.multi_line, 'm'),
            (self.dot_matches_new_line, 's'),
            (self.ignore_whitespace, 'x'),
        ]
        .iter()
        .filter_map(|&(on, letter)| on.then_some(letter))
        .collect();

        if letters.is_empty() {
            letters
        } else {
            format!("(?{letters})")
        }
    }

    /// Compile `pattern` with these flags.
    ///
    /// # Errors
    /// `ReplaceError::Pattern` with the engine's message on invalid syntax.
    pub fn build(&self, pattern: &str) -> Result<Regex, ReplaceError> {
        let source = format!("{}{pattern}", self.inline_group());
        Regex::new(&source).map_err(|e| ReplaceError::Pattern(e.to_string()))
    }
}

/// Compile `pattern` with a flag string.
///
/// # Errors
/// `InvalidFlag` for an unknown flag letter, `Pattern` for invalid syntax.
pub fn compile(pattern: &str, flags: &str) -> Result<Regex, ReplaceError> {
    let flags: RegexFlags = flags.parse()?;
    flags.build(pattern)
}

/// Check whether `pattern` compiles with default flags.
///
/// Never panics. The empty pattern is valid.
#[must_use]
pub fn validate(pattern: &str) -> bool {
    compile(pattern, "").is_ok()
}

/// Find the next occurrence at or after byte offset `start`.
///
/// Returns the captures and the offset to resume from. A zero-width match
/// resumes one character past its start, so every position is reported at
/// most once and the search always terminates. Returns `None` once `start`
/// runs past the end of `haystack`, or when the engine gives up on the
/// line (backtrack limit).
#[must_use]
pub fn next_match<'h>(
    regex: &Regex,
    haystack: &'h str,
    start: usize,
) -> Option<(Captures<'h>, usize)> {
    if start > haystack.len() {
        return None;
    }
    let caps = match regex.captures_from_pos(haystack, start) {
        Ok(caps) => caps?,
        Err(err) => {
            tracing::warn!(pattern = %regex.as_str(), error = %err, "match aborted");
            return None;
        }
    };
    let whole = caps.get(0)?;
    let next = if whole.start() == whole.end() {
        let step = haystack[whole.start()..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        whole.start() + step
    } else {
        whole.end()
    };
    Some((caps, next))
}

/// Iterator over every occurrence in a haystack, driven by [`next_match`].
pub struct Occurrences<'r, 'h> {
    regex: &'r Regex,
    haystack: &'h str,
    cursor: usize,
}

impl<'r, 'h> Occurrences<'r, 'h> {
    /// Start at the beginning of `haystack`.
    #[must_use]
    pub fn new(regex: &'r Regex, haystack: &'h str) -> Self {
        Self {
            regex,
            haystack,
            cursor: 0,
        }
    }
}

impl<'h> Iterator for Occurrences<'_, 'h> {
    type Item = Captures<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        let (caps, next) = next_match(self.regex, self.haystack, self.cursor)?;
        self.cursor = next;
        Some(caps)
    }
}

/// A [`PatternSpec`] compiled once and shared by scanning and replacing.
#[derive(Debug, Clone)]
pub(crate) struct CompiledSpec {
    pub(crate) regex: Regex,
    pub(crate) template: ReplacementTemplate,
    pub(crate) adjust_case: bool,
}

impl CompiledSpec {
    /// Compile pattern, flags and template.
    ///
    /// An empty pattern means "no search active" and is reported as
    /// `EmptyPattern` even though it would compile.
    pub(crate) fn new(spec: &PatternSpec) -> Result<Self, ReplaceError> {
        if spec.pattern.is_empty() {
            return Err(ReplaceError::EmptyPattern);
        }
        let regex = compile(&spec.pattern, &spec.flags)?;
        let template = ReplacementTemplate::parse(&spec.replacement, &regex);
        Ok(Self {
            regex,
            template,
            adjust_case: spec.adjust_case,
        })
    }

    /// Compile, logging why no search will run when compilation fails.
    pub(crate) fn for_run(spec: &PatternSpec, operation: &str) -> Option<Self> {
        match Self::new(spec) {
            Ok(compiled) => Some(compiled),
            Err(ReplaceError::EmptyPattern) => {
                tracing::debug!(operation, "empty pattern; nothing to do");
                None
            }
            Err(err) => {
                tracing::warn!(
                    operation,
                    pattern = %spec.pattern,
                    flags = %spec.flags,
                    error = %err,
                    "pattern rejected; returning empty result"
                );
                None
            }
        }
    }

    /// Template expansion for one occurrence, case-harmonized if requested.
    pub(crate) fn replacement_for(&self, caps: &Captures<'_>) -> String {
        let expanded = self.template.expand(caps);
        if self.adjust_case {
            let matched = caps.get(0).map_or("", |m| m.as_str());
            adjust_case(matched, &expanded)
        } else {
            expanded
        }
    }
}
