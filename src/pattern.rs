//! Sieve match-type patterns (RFC 5228 §2.7.1).
//!
//! | Match type | Comparison |
//! |------------|------------|
//! | [`MatchType::Is`]       | whole-string equality, `i;ascii-casemap` |
//! | [`MatchType::Contains`] | substring search, `i;ascii-casemap`      |
//! | [`MatchType::Matches`]  | wildcard match: `*` any run, `?` any char |
//!
//! `:matches` is what feeds the variable subsystem: each `*`/`?` becomes a
//! capture group, and on success the ordered groups are handed to
//! [`crate::engine::FilterContext::bind_match_captures`] to become
//! `${1}`…`${9}`. Wildcards translate to an anchored, case-insensitive
//! regex — `*` is greedy, so `coyote@**.com` against
//! `coyote@ACME.Example.COM` puts `ACME.Example` in the first group and the
//! empty string in the second. `\x` in a pattern is the literal `x`.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// Which comparison a [`SievePattern`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Is,
    Contains,
    Matches,
}

/// Error returned when a match pattern cannot be compiled.
#[derive(Debug)]
pub enum PatternError {
    InvalidMatchPattern(regex::Error),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::InvalidMatchPattern(e) => write!(f, "match pattern error: {e}"),
        }
    }
}

impl std::error::Error for PatternError {}

/// A compiled test pattern ready for matching.
// Arc makes Clone a cheap reference-count increment instead of a recompile.
#[derive(Clone)]
pub struct SievePattern {
    src: String,
    match_type: MatchType,
    /// Present for `Matches` only; `Is`/`Contains` compare directly.
    compiled: Option<Arc<Regex>>,
}

impl fmt::Debug for SievePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SievePattern")
            .field("src", &self.src)
            .field("match_type", &self.match_type)
            .finish()
    }
}

impl SievePattern {
    /// Compile `src` for `match_type`.
    pub fn new(src: &str, match_type: MatchType) -> Result<Self, PatternError> {
        let compiled = match match_type {
            MatchType::Matches => Some(Arc::new(compile_wildcards(src)?)),
            MatchType::Is | MatchType::Contains => None,
        };
        Ok(Self {
            src: src.to_owned(),
            match_type,
            compiled,
        })
    }

    /// The original pattern string.
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// Returns `true` if this pattern matches `text`.
    pub fn matches(&self, text: &str) -> bool {
        match self.match_type {
            MatchType::Is => {
                text.len() == self.src.len()
                    && text
                        .as_bytes()
                        .iter()
                        .zip(self.src.as_bytes())
                        .all(|(&a, &b)| a.eq_ignore_ascii_case(&b))
            }
            MatchType::Contains => contains_ascii_ci(text, &self.src),
            MatchType::Matches => match &self.compiled {
                Some(re) => re.is_match(text),
                None => false,
            },
        }
    }

    /// Attempt a match, returning the wildcard capture groups on success.
    ///
    /// `:is` and `:contains` can succeed but never produce groups.
    pub fn find(&self, text: &str) -> Option<MatchCaptures> {
        match self.match_type {
            MatchType::Matches => {
                let caps = self.compiled.as_ref()?.captures(text)?;
                let groups = (1..caps.len())
                    .map(|i| caps.get(i).map(|m| m.as_str().to_owned()).unwrap_or_default())
                    .collect();
                Some(MatchCaptures { groups })
            }
            MatchType::Is | MatchType::Contains => {
                self.matches(text).then(MatchCaptures::default)
            }
        }
    }
}

/// The ordered wildcard groups of a successful `:matches` test.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchCaptures {
    groups: Vec<String>,
}

impl MatchCaptures {
    /// All groups in wildcard order; `groups()[0]` backs `${1}`.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// The nth group, 1-based like `${n}`.
    pub fn group(&self, n: usize) -> Option<&str> {
        self.groups.get(n.checked_sub(1)?).map(String::as_str)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn into_groups(self) -> Vec<String> {
        self.groups
    }
}

// ── Wildcard compilation ──────────────────────────────────────────────────────

/// Translate a Sieve `:matches` pattern into an anchored regex with one
/// group per wildcard.
fn compile_wildcards(pattern: &str) -> Result<Regex, PatternError> {
    let mut src = String::with_capacity(pattern.len() * 2 + 2);
    src.push('^');
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '*' => src.push_str("(.*)"),
            '?' => src.push_str("(.)"),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_literal(&mut src, escaped);
                }
            }
            other => push_literal(&mut src, other),
        }
    }
    src.push('$');
    regex::RegexBuilder::new(&src)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(PatternError::InvalidMatchPattern)
}

/// Append one pattern character as a regex literal.
fn push_literal(dst: &mut String, ch: char) {
    // ASCII punctuation is backslash-escaped wholesale; escaping an ASCII
    // letter or digit would be rejected by the regex parser, and non-ASCII
    // characters are never regex metacharacters.
    if ch.is_ascii() && !ch.is_ascii_alphanumeric() {
        dst.push('\\');
    }
    dst.push(ch);
}

/// ASCII-case-insensitive substring search (the `i;ascii-casemap`
/// comparator). O(n·m) is fine for single header-test patterns.
fn contains_ascii_ci(text: &str, pattern: &str) -> bool {
    let tb = text.as_bytes();
    let pb = pattern.as_bytes();
    if pb.is_empty() {
        return true;
    }
    'outer: for i in 0..=tb.len().saturating_sub(pb.len()) {
        for (j, &p) in pb.iter().enumerate() {
            if !tb[i + j].eq_ignore_ascii_case(&p) {
                continue 'outer;
            }
        }
        return true;
    }
    false
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // -- :matches -------------------------------------------------------------

    #[test]
    fn star_matches_anything_and_captures_it() {
        let p = SievePattern::new("*", MatchType::Matches).unwrap();
        let caps = p.find("hello version 1.0 is out").unwrap();
        assert_eq!(caps.group(1), Some("hello version 1.0 is out"));
        assert!(p.matches(""));
    }

    #[test]
    fn greedy_double_star() {
        // First `*` grabs as much as it can; the second gets the rest.
        let p = SievePattern::new("coyote@**.com", MatchType::Matches).unwrap();
        let caps = p.find("coyote@ACME.Example.COM").unwrap();
        assert_eq!(caps.group(1), Some("ACME.Example"));
        assert_eq!(caps.group(2), Some(""));
        assert_eq!(caps.group_count(), 2);
    }

    #[test]
    fn matches_is_case_insensitive() {
        let p = SievePattern::new("*@example.com", MatchType::Matches).unwrap();
        assert!(p.matches("test1@EXAMPLE.COM"));
    }

    #[test]
    fn question_mark_captures_single_char() {
        let p = SievePattern::new("h?llo", MatchType::Matches).unwrap();
        let caps = p.find("hello").unwrap();
        assert_eq!(caps.group(1), Some("e"));
        assert!(!p.matches("hllo"));
        assert!(!p.matches("heello"));
    }

    #[test]
    fn literal_dot_is_not_a_wildcard() {
        let p = SievePattern::new("*.com", MatchType::Matches).unwrap();
        assert!(p.matches("example.com"));
        assert!(!p.matches("examplexcom"));
    }

    #[test]
    fn escaped_star_is_literal() {
        let p = SievePattern::new("a\\*b", MatchType::Matches).unwrap();
        assert!(p.matches("a*b"));
        assert!(!p.matches("axb"));
        // No wildcard, no group.
        assert_eq!(p.find("a*b").unwrap().group_count(), 0);
    }

    #[test]
    fn matches_is_anchored() {
        let p = SievePattern::new("test", MatchType::Matches).unwrap();
        assert!(p.matches("test"));
        assert!(!p.matches("a test b"));
    }

    #[test]
    fn non_ascii_literal() {
        let p = SievePattern::new("*おしらせ*", MatchType::Matches).unwrap();
        let caps = p.find("[おしらせ] 本日のニュース").unwrap();
        assert_eq!(caps.group(1), Some("["));
    }

    // -- :is / :contains ------------------------------------------------------

    #[test]
    fn is_whole_string_ascii_casemap() {
        let p = SievePattern::new("Joe", MatchType::Is).unwrap();
        assert!(p.matches("joe"));
        assert!(p.matches("JOE"));
        assert!(!p.matches("Joe Smith"));
    }

    #[test]
    fn contains_substring_ascii_casemap() {
        let p = SievePattern::new("hello", MatchType::Contains).unwrap();
        assert!(p.matches("Subject: HELLO version 1.0 is out"));
        assert!(!p.matches("goodbye"));
    }

    #[test]
    fn contains_empty_pattern_matches_all() {
        let p = SievePattern::new("", MatchType::Contains).unwrap();
        assert!(p.matches("anything"));
        assert!(p.matches(""));
    }

    #[test]
    fn is_and_contains_produce_no_groups() {
        let p = SievePattern::new("test", MatchType::Contains).unwrap();
        let caps = p.find("a test").unwrap();
        assert_eq!(caps.group_count(), 0);
        assert_eq!(caps.group(1), None);
    }
}
