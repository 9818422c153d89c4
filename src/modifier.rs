//! Value modifiers for the `set` command (RFC 5229 §4.1, RFC 5435 §5).
//!
//! A `set` may carry any combination of modifier tags; they are applied in
//! a **canonical order independent of the order written in the script**:
//!
//! | Order | Modifier        | Effect                                        |
//! |-------|-----------------|-----------------------------------------------|
//! | 1     | `quotewildcard` | backslash-escape `\`, `*`, `?`                |
//! | 2     | `lower`         | lower-case the whole value                    |
//! | 3     | `upper`         | upper-case the whole value                    |
//! | 4     | `lowerfirst`    | lower-case the first character only           |
//! | 5     | `upperfirst`    | upper-case the first character only           |
//! | 6     | `encodeurl`     | form-urlencode (space encodes to `+`)         |
//! | 7     | `length`        | replace the value with its character count    |
//!
//! `length` always fires last, so it measures the value *after* every other
//! enabled transform has run. Case modifiers compose: `lower` + `upperfirst`
//! yields "first char upper, rest lower".
//!
//! Unknown modifier keywords are rejected during `set` validation
//! ([`crate::set_cmd`]); this pipeline only ever sees validated flags.

use std::fmt;

/// One known `set` modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    QuoteWildcard,
    Lower,
    Upper,
    LowerFirst,
    UpperFirst,
    EncodeUrl,
    Length,
}

/// The fixed application order. Iterated by [`apply_modifiers`]; the
/// position in this array is also each modifier's [`ModifierSet`] slot.
pub const CANONICAL_ORDER: [Modifier; 7] = [
    Modifier::QuoteWildcard,
    Modifier::Lower,
    Modifier::Upper,
    Modifier::LowerFirst,
    Modifier::UpperFirst,
    Modifier::EncodeUrl,
    Modifier::Length,
];

impl Modifier {
    /// Parse a modifier keyword, case-insensitively (`:UPPERFIRST` is as
    /// valid as `:upperfirst`). Returns `None` for unknown keywords.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "quotewildcard" => Some(Modifier::QuoteWildcard),
            "lower" => Some(Modifier::Lower),
            "upper" => Some(Modifier::Upper),
            "lowerfirst" => Some(Modifier::LowerFirst),
            "upperfirst" => Some(Modifier::UpperFirst),
            "encodeurl" => Some(Modifier::EncodeUrl),
            "length" => Some(Modifier::Length),
            _ => None,
        }
    }

    /// The canonical script keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::QuoteWildcard => "quotewildcard",
            Modifier::Lower => "lower",
            Modifier::Upper => "upper",
            Modifier::LowerFirst => "lowerfirst",
            Modifier::UpperFirst => "upperfirst",
            Modifier::EncodeUrl => "encodeurl",
            Modifier::Length => "length",
        }
    }

    fn slot(self) -> usize {
        match self {
            Modifier::QuoteWildcard => 0,
            Modifier::Lower => 1,
            Modifier::Upper => 2,
            Modifier::LowerFirst => 3,
            Modifier::UpperFirst => 4,
            Modifier::EncodeUrl => 5,
            Modifier::Length => 6,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Fixed-size set of enabled modifiers, one slot per known modifier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierSet {
    flags: [bool; CANONICAL_ORDER.len()],
}

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, modifier: Modifier) {
        self.flags[modifier.slot()] = true;
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.flags[modifier.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.flags.iter().all(|&f| !f)
    }
}

/// Apply every enabled modifier to `value`, in canonical order.
pub fn apply_modifiers(value: &str, set: ModifierSet) -> String {
    let mut out = value.to_owned();
    for modifier in CANONICAL_ORDER {
        if set.contains(modifier) {
            out = apply_one(&out, modifier);
        }
    }
    out
}

fn apply_one(value: &str, modifier: Modifier) -> String {
    match modifier {
        Modifier::QuoteWildcard => {
            let mut out = String::with_capacity(value.len());
            for ch in value.chars() {
                if matches!(ch, '\\' | '*' | '?') {
                    out.push('\\');
                }
                out.push(ch);
            }
            out
        }
        Modifier::Lower => value.to_lowercase(),
        Modifier::Upper => value.to_uppercase(),
        Modifier::LowerFirst => case_first(value, false),
        Modifier::UpperFirst => case_first(value, true),
        Modifier::EncodeUrl => form_urlencoded::byte_serialize(value.as_bytes()).collect(),
        Modifier::Length => value.chars().count().to_string(),
    }
}

/// Change the case of the first character only; the rest is untouched.
fn case_first(value: &str, upper: bool) -> String {
    let mut chars = value.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut out = String::with_capacity(value.len());
            if upper {
                out.extend(first.to_uppercase());
            } else {
                out.extend(first.to_lowercase());
            }
            out.push_str(chars.as_str());
            out
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
