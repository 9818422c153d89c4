//! `${...}` reference expansion (RFC 5229 §3).
//!
//! A single, non-recursive left-to-right pass over the input. At each `${`
//! the scanner tries the **shortest** well-formed reference — the text up to
//! the first following `}` must be a valid reference body. On success the
//! bound value is substituted (verbatim — never re-expanded), or the empty
//! string if the name is unbound. On failure only the `$` is emitted and
//! the scan resumes at the very next character, so a well-formed reference
//! nested inside a malformed one is still found:
//!
//! | Input                  | Output (`company=ACME`) |
//! |------------------------|-------------------------|
//! | `${company}`           | `ACME`                  |
//! | `${full}` (unbound)    | `` (empty)              |
//! | `${${company}}`        | `${ACME}`               |
//! | `${BAD${Company}`      | `${BADACME`             |
//! | `${company` (no `}`)   | `${company`             |
//! | `${}` / `${doh!}`      | literal pass-through    |
//! | `${23}` (multi-digit)  | `${23}` literal         |
//!
//! A reference body is a non-empty run of ASCII letters, digits, `_` and
//! `.`; a backslash escapes the next character, which then counts as body
//! data whatever it is. The unescaped body must not begin with more than
//! one digit (`${1}` is a positional reference, `${123}` is not a reference
//! at all). Outside a reference, `\\` collapses to one literal backslash
//! and a backslash directly before `$` is deleted without suppressing the
//! reference; any other backslash is literal text.
//!
//! Expansion is total: it never fails, and input with no valid reference
//! comes back unchanged.

use crate::store::VariableStore;

/// Expand every `${...}` reference in `input` against `store`.
pub fn expand(input: &str, store: &VariableStore) -> String {
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => match bytes.get(i + 1) {
                // `\\` → one literal backslash.
                Some(b'\\') => {
                    out.push('\\');
                    i += 2;
                }
                // `\$` → drop the backslash; the `$` is still a candidate
                // reference start on the next iteration.
                Some(b'$') => {
                    i += 1;
                }
                // Lone backslash before anything else is literal.
                _ => {
                    out.push('\\');
                    i += 1;
                }
            },
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                match parse_reference(&input[i..]) {
                    Some((name, consumed)) => {
                        if let Some(value) = store.lookup(&name) {
                            // Substituted verbatim: a `${...}` inside the
                            // value is not re-expanded.
                            out.push_str(value);
                        }
                        i += consumed;
                    }
                    None => {
                        // Not a reference. Emit the `$` alone and retry from
                        // the `{`, so a nested `${...}` further inside the
                        // rejected span still gets its chance.
                        out.push('$');
                        i += 1;
                    }
                }
            }
            _ => {
                // Ordinary text; copy one character (possibly multi-byte).
                let rest = &input[i..];
                let ch_len = rest.chars().next().map_or(1, char::len_utf8);
                out.push_str(&rest[..ch_len]);
                i += ch_len;
            }
        }
    }

    out
}

/// Try to read a syntactically valid reference at the start of `s`, which
/// is known to begin with `${`. Returns the unescaped variable name and
/// the number of bytes consumed, including the closing `}`.
fn parse_reference(s: &str) -> Option<(String, usize)> {
    let close = s.find('}')?;
    let name = parse_body(&s[2..close])?;
    Some((name, close + 1))
}

/// Validate and unescape a reference body.
///
/// Plain characters must be ASCII letters, digits, `_` or `.`; `\c` makes
/// any character acceptable body data (so `${fo\o}` names `foo` and
/// `${fo\\o}` names `fo\o`). A trailing lone backslash, an empty body, and
/// an unescaped body starting with two or more digits are all invalid.
fn parse_body(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let mut name = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            name.push(chars.next()?);
        } else if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
            name.push(ch);
        } else {
            return None;
        }
    }
    // Numeric addressing is single-digit only: a name opening with a
    // multi-digit run (`23`, `123`, `12a`) is not a reference.
    let leading_digits = name.bytes().take_while(|b| b.is_ascii_digit()).count();
    if leading_digits > 1 {
        return None;
    }
    Some(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
