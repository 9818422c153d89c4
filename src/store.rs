//! Per-evaluation variable store.
//!
//! Holds the flat name→value table written by `set` commands plus the
//! positional captures (`${1}`…`${9}`) produced by the most recent
//! successful `:matches` test. One store is created empty at the start of
//! evaluating one script against one message, mutated in script execution
//! order, and discarded when evaluation finishes. There is no block-local
//! scoping: a `set` inside a test block writes the same table.

use std::collections::HashMap;

/// Highest addressable positional capture (`${9}`).
///
/// RFC 5229 restricts numeric variable references to a single digit, so a
/// match test producing more groups than this has the excess dropped.
pub const MAX_MATCH_CAPTURES: usize = 9;

/// Flat, case-insensitive name→value table plus the capture sequence.
#[derive(Debug, Default)]
pub struct VariableStore {
    vars: HashMap<String, String>,
    captures: Vec<String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or overwrite) a named variable.
    ///
    /// Lookup is case-insensitive, so the name is folded on the way in;
    /// the original spelling is never needed again. Dots are ordinary name
    /// characters — `"a.b"` is a literal key, not a namespace path.
    pub fn bind(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_lowercase(), value.into());
    }

    /// Replace the positional-capture sequence with the groups from the
    /// most recent successful match test.
    ///
    /// The whole sequence is swapped atomically: indices beyond the new
    /// group count become unresolved again rather than going stale. Groups
    /// past `${9}` are not stored.
    pub fn bind_captures<I, S>(&mut self, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.captures.clear();
        self.captures
            .extend(groups.into_iter().take(MAX_MATCH_CAPTURES).map(Into::into));
    }

    /// Look up a variable by name, case-insensitively.
    ///
    /// All-digit names are positional: only the single digits `"0"`–`"9"`
    /// are addressable, and `"1"`–`"9"` resolve against the capture
    /// sequence before falling back to an explicit binding of that digit
    /// name. A multi-digit all-numeric name never resolves, even if a
    /// binding by that literal key exists — this mirrors the single-digit
    /// capture addressing limit and must be preserved exactly.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            if name.len() != 1 {
                return None;
            }
            let idx = (name.as_bytes()[0] - b'0') as usize;
            if (1..=MAX_MATCH_CAPTURES).contains(&idx) {
                if let Some(group) = self.captures.get(idx - 1) {
                    return Some(group);
                }
            }
            return self.vars.get(name).map(String::as_str);
        }
        self.vars.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Number of positional captures currently bound.
    pub fn capture_count(&self) -> usize {
        self.captures.len()
    }

    /// Clear both the name table and the capture sequence.
    ///
    /// Called once per message evaluation, never mid-evaluation.
    pub fn reset(&mut self) {
        self.vars.clear();
        self.captures.clear();
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty() && self.captures.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_and_lookup() {
        let mut store = VariableStore::new();
        store.bind("var", "hello");
        assert_eq!(store.lookup("var"), Some("hello"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut store = VariableStore::new();
        store.bind("uppercase", "upper case");
        assert_eq!(store.lookup("upperCase"), Some("upper case"));
        assert_eq!(store.lookup("UPPERCASE"), Some("upper case"));
        assert_eq!(store.lookup("uppercase"), Some("upper case"));
    }

    #[test]
    fn bind_overwrites() {
        let mut store = VariableStore::new();
        store.bind("x", "old");
        store.bind("X", "new"); // same normalized key
        assert_eq!(store.lookup("x"), Some("new"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn dotted_name_is_a_literal_key() {
        let mut store = VariableStore::new();
        store.bind("a.b", "おしらせ");
        assert_eq!(store.lookup("a.b"), Some("おしらせ"));
        assert_eq!(store.lookup("a"), None);
        assert_eq!(store.lookup("b"), None);
    }

    #[test]
    fn multi_digit_numeric_name_never_resolves() {
        let mut store = VariableStore::new();
        store.bind("23", "twenty three");
        assert_eq!(store.lookup("23"), None);
        assert_eq!(store.lookup("123"), None);
    }

    #[test]
    fn single_digit_falls_back_to_explicit_binding() {
        let mut store = VariableStore::new();
        store.bind("1", "One");
        assert_eq!(store.lookup("1"), Some("One"));
    }

    #[test]
    fn captures_win_over_explicit_digit_binding() {
        let mut store = VariableStore::new();
        store.bind("1", "One");
        store.bind_captures(["first"]);
        assert_eq!(store.lookup("1"), Some("first"));
    }

    #[test]
    fn new_captures_replace_old_ones_entirely() {
        let mut store = VariableStore::new();
        store.bind_captures(["a", "b", "c"]);
        assert_eq!(store.lookup("3"), Some("c"));
        store.bind_captures(["only"]);
        assert_eq!(store.lookup("1"), Some("only"));
        // Old index 3 is unresolved again, not stale.
        assert_eq!(store.lookup("3"), None);
    }

    #[test]
    fn captures_beyond_nine_are_dropped() {
        let mut store = VariableStore::new();
        let groups: Vec<String> = (1..=12).map(|n| format!("g{n}")).collect();
        store.bind_captures(groups);
        assert_eq!(store.capture_count(), MAX_MATCH_CAPTURES);
        assert_eq!(store.lookup("9"), Some("g9"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = VariableStore::new();
        store.bind("var", "hello");
        store.bind_captures(["g1"]);
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.lookup("var"), None);
        assert_eq!(store.lookup("1"), None);
    }
}
