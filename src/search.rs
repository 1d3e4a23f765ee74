//! Pattern matching for filter find strings.
//!
//! A filter's find string is interpreted according to its [`FindMode`]:
//!
//! | Mode | Save key | Behavior |
//! |------|----------|----------|
//! | [`Literal`](FindMode::Literal) | `literal` | Character-for-character match |
//! | [`UpperLower`](FindMode::UpperLower) | `upperlower` | Literal, ignoring case |
//! | [`Regex`](FindMode::Regex) | `regex` | Full regular expression |
//!
//! Matching always runs against a line's plain-text projection. A find
//! string that fails to compile never aborts the pipeline: [`find_first`]
//! and [`find_all`] report "no match" and log the failure at debug level.
//!
//! # Example
//!
//! ```
//! use chatsieve::search::{find_first, FindMode};
//!
//! let result = find_first("Steve died", r"(\w+) died", FindMode::Regex);
//! assert!(result.found());
//! assert_eq!(result.expand("$1 perished"), "Steve perished");
//! ```

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

/// How a filter's find string locates a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindMode {
    /// Match the find string exactly.
    #[default]
    Literal,

    /// Match the find string exactly, ignoring case.
    UpperLower,

    /// Interpret the find string as a regular expression.
    Regex,
}

impl FindMode {
    /// Returns the stable save key used in persisted filters.
    pub fn save_key(self) -> &'static str {
        match self {
            FindMode::Literal => "literal",
            FindMode::UpperLower => "upperlower",
            FindMode::Regex => "regex",
        }
    }

    /// Resolves a save key back to a mode.
    ///
    /// Unknown keys resolve to `None`; persisted-filter loading keeps the
    /// constructor default in that case.
    pub fn from_save_key(key: &str) -> Option<Self> {
        match key {
            "literal" => Some(FindMode::Literal),
            "upperlower" => Some(FindMode::UpperLower),
            "regex" => Some(FindMode::Regex),
            _ => None,
        }
    }

    /// Returns all modes in save-key order.
    pub fn all() -> &'static [FindMode] {
        &[FindMode::Literal, FindMode::UpperLower, FindMode::Regex]
    }
}

impl std::fmt::Display for FindMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.save_key())
    }
}

impl std::str::FromStr for FindMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FindMode::from_save_key(&s.to_lowercase()).ok_or_else(|| {
            format!(
                "Unknown find mode: '{}'. Expected one of: literal, upperlower, regex",
                s
            )
        })
    }
}

/// One captured group: byte offsets into the searched text plus the
/// matched text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringMatch {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// The matched text
    pub text: String,
}

impl StringMatch {
    /// Creates a match from offsets and text.
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// The outcome of matching a pattern against a line's plain text.
///
/// Group indices are 0-based: group 0 is the whole match, groups 1..N are
/// regex capture groups. Out-of-range group references expand to the
/// empty string, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    groups: Vec<StringMatch>,
}

impl SearchResult {
    /// The no-match result.
    pub fn no_match() -> Self {
        Self::default()
    }

    /// Builds a result from captured groups.
    pub fn from_groups(groups: Vec<StringMatch>) -> Self {
        Self { groups }
    }

    /// Returns `true` if the pattern matched.
    pub fn found(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Returns the captured groups (empty if no match).
    pub fn groups(&self) -> &[StringMatch] {
        &self.groups
    }

    /// Returns group `index`, if captured.
    pub fn group(&self, index: usize) -> Option<&StringMatch> {
        self.groups.get(index)
    }

    /// Expands a replacement template, substituting `$N` tokens with
    /// group N's text.
    ///
    /// `$N` with no such group expands to the empty string. `$$` produces
    /// a literal `$`. A trailing or non-numeric `$` is kept as-is.
    pub fn expand(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    out.push('$');
                }
                Some(d) if d.is_ascii_digit() => {
                    let mut index = 0usize;
                    while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                        chars.next();
                        index = index.saturating_mul(10).saturating_add(d as usize - '0' as usize);
                    }
                    if let Some(group) = self.group(index) {
                        out.push_str(&group.text);
                    }
                }
                _ => out.push('$'),
            }
        }
        out
    }
}

/// Compiles a find string for the given mode.
///
/// Literal modes escape regex metacharacters; [`FindMode::UpperLower`]
/// additionally folds case.
///
/// # Errors
///
/// Returns [`SieveError::InvalidPattern`] if a [`FindMode::Regex`] string
/// does not compile. Literal modes cannot fail.
pub fn compile(pattern: &str, mode: FindMode) -> Result<Regex> {
    let source = match mode {
        FindMode::Literal | FindMode::UpperLower => regex::escape(pattern),
        FindMode::Regex => pattern.to_string(),
    };
    RegexBuilder::new(&source)
        .case_insensitive(mode == FindMode::UpperLower)
        .build()
        .map_err(|source| SieveError::invalid_pattern(pattern, source))
}

/// Finds the first match of `pattern` in `text`.
///
/// For literal modes the result carries a single group (the whole match).
/// For [`FindMode::Regex`] it carries group 0 plus every capture group of
/// the first match; capture groups that did not participate report an
/// empty match at the match start.
///
/// A pattern that fails to compile yields [`SearchResult::no_match`].
pub fn find_first(text: &str, pattern: &str, mode: FindMode) -> SearchResult {
    let regex = match compile(pattern, mode) {
        Ok(regex) => regex,
        Err(err) => {
            log::debug!("pattern '{pattern}' did not compile: {err}");
            return SearchResult::no_match();
        }
    };
    first_match(&regex, text)
}

/// Finds the first match of an already-compiled pattern in `text`.
///
/// Callers that evaluate the same pattern repeatedly (the engine caches a
/// compiled pattern per filter) use this to skip recompilation.
pub fn first_match(regex: &Regex, text: &str) -> SearchResult {
    let Some(captures) = regex.captures(text) else {
        return SearchResult::no_match();
    };
    let Some(whole) = captures.get(0) else {
        return SearchResult::no_match();
    };
    let groups = (0..captures.len())
        .map(|i| match captures.get(i) {
            Some(m) => StringMatch::new(m.start(), m.end(), m.as_str()),
            None => StringMatch::new(whole.start(), whole.start(), ""),
        })
        .collect();
    SearchResult::from_groups(groups)
}

/// Finds every non-overlapping match of `pattern` in `text`.
///
/// Each match contributes its whole-match span (group 0 of successive
/// matches); capture groups are not expanded here. Used by consumers that
/// highlight or count occurrences rather than rewrite.
pub fn find_all(text: &str, pattern: &str, mode: FindMode) -> SearchResult {
    let regex = match compile(pattern, mode) {
        Ok(regex) => regex,
        Err(err) => {
            log::debug!("pattern '{pattern}' did not compile: {err}");
            return SearchResult::no_match();
        }
    };
    let groups = regex
        .find_iter(text)
        .map(|m| StringMatch::new(m.start(), m.end(), m.as_str()))
        .collect();
    SearchResult::from_groups(groups)
}
