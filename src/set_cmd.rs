//! The `set` command: argument/modifier validation.
//!
//! `set [:modifier ...] <name> <value>` binds a variable. Validation runs
//! at script-load time and is the only place this subsystem can fail:
//! too few plain arguments or an unknown modifier keyword abort the script
//! for the current message with a [`SyntaxError`] naming the offender.
//! Execution (expand the value, run the modifier pipeline, bind) is driven
//! by [`crate::engine::FilterContext`] and only ever sees validated flags.

use std::fmt;

use crate::modifier::{Modifier, ModifierSet};

/// A fatal script syntax error from a malformed `set` invocation.
///
/// Carries the literal offending token or argument list so scripts can be
/// debugged from the message alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    message: String,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error: {}", self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// A parsed `set` invocation: the `:modifier` tags in script order plus
/// the plain arguments (variable name, then value).
#[derive(Debug, Clone, Default)]
pub struct SetCommand {
    pub modifier_tokens: Vec<String>,
    pub args: Vec<String>,
}

impl SetCommand {
    pub fn new<M, A>(modifier_tokens: M, args: A) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            modifier_tokens: modifier_tokens.into_iter().map(Into::into).collect(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate arity and modifier keywords, producing the flag set for the
    /// pipeline.
    ///
    /// Modifier keywords match case-insensitively; script order is
    /// irrelevant since application order is canonical.
    pub fn validate(&self) -> Result<ModifierSet, SyntaxError> {
        if self.args.len() < 2 {
            return Err(SyntaxError::new(format!(
                "set requires at least 2 arguments (name, value); found arguments: {:?}",
                self.args
            )));
        }
        let mut set = ModifierSet::new();
        for token in &self.modifier_tokens {
            match Modifier::from_keyword(token) {
                Some(modifier) => set.enable(modifier),
                None => {
                    return Err(SyntaxError::new(format!(
                        "invalid variable modifier: {token}"
                    )))
                }
            }
        }
        Ok(set)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
