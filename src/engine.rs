//! Per-message filter evaluation context.
//!
//! The rule engine creates one [`FilterContext`] per message delivery and
//! threads it through the script strictly in execution order: it calls
//! [`FilterContext::bind_match_captures`] after each successful match test,
//! [`FilterContext::eval_set`] on each `set` command, and
//! [`FilterContext::expand`] wherever the script computes a string an
//! action consumes (tag name, folder path, log text, header value).
//!
//! The context exclusively owns its [`VariableStore`]; a second evaluation
//! gets a second context. Everything here is synchronous in-memory string
//! work — any cross-message isolation is the rule engine's problem.
//!
//! A per-server feature flag gates the whole subsystem. When disabled,
//! `set` commands bind nothing and `${name}` text passes through with the
//! braces intact rather than raising an error.

use log::{debug, trace};

use crate::expand;
use crate::modifier::apply_modifiers;
use crate::set_cmd::{SetCommand, SyntaxError};
use crate::store::VariableStore;

/// One script evaluation's variable state plus the feature flag.
#[derive(Debug, Default)]
pub struct FilterContext {
    store: VariableStore,
    variables_enabled: bool,
}

impl FilterContext {
    /// Create a fresh context for one message evaluation.
    ///
    /// `variables_enabled` comes from the server/account configuration and
    /// is immutable for the lifetime of the evaluation.
    pub fn new(variables_enabled: bool) -> Self {
        Self {
            store: VariableStore::new(),
            variables_enabled,
        }
    }

    pub fn variables_enabled(&self) -> bool {
        self.variables_enabled
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    /// Evaluate one `set` command: validate, expand the value argument,
    /// run the modifier pipeline, bind.
    ///
    /// Validation failures are script-load errors and surface even when the
    /// variables feature is disabled; with the feature off a valid `set`
    /// binds nothing.
    pub fn eval_set(&mut self, cmd: &SetCommand) -> Result<(), SyntaxError> {
        let flags = cmd.validate()?;
        if !self.variables_enabled {
            debug!("variables disabled; ignoring set \"{}\"", cmd.args[0]);
            return Ok(());
        }
        let value = expand::expand(&cmd.args[1], &self.store);
        let value = apply_modifiers(&value, flags);
        self.store.bind(&cmd.args[0], value);
        Ok(())
    }

    /// Record the capture groups of the most recent successful match test
    /// (the sequence may be empty). Replaces any previous captures.
    pub fn bind_match_captures<I, S>(&mut self, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.variables_enabled {
            return;
        }
        self.store.bind_captures(groups);
        trace!("bound {} match capture(s)", self.store.capture_count());
    }

    /// Expand `${...}` references in a string consumed by an action.
    ///
    /// With the feature disabled the input is returned completely
    /// untouched, braces and all.
    pub fn expand(&self, input: &str) -> String {
        if !self.variables_enabled {
            return input.to_owned();
        }
        expand::expand(input, &self.store)
    }

    /// Clear all bindings and captures, for callers that reuse a context
    /// across evaluations instead of constructing a fresh one.
    pub fn reset(&mut self) {
        self.store.reset();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_expand() {
        let mut ctx = FilterContext::new(true);
        ctx.eval_set(&SetCommand::new([] as [&str; 0], ["var", "hello"]))
            .unwrap();
        assert_eq!(ctx.expand("${var}"), "hello");
    }

    #[test]
    fn set_expands_its_value_argument() {
        let mut ctx = FilterContext::new(true);
        ctx.eval_set(&SetCommand::new([] as [&str; 0], ["company", "ACME"]))
            .unwrap();
        ctx.eval_set(&SetCommand::new(
            [] as [&str; 0],
            ["combination", "Hello ${company}!!"],
        ))
        .unwrap();
        assert_eq!(ctx.expand("${combination}"), "Hello ACME!!");
    }

    #[test]
    fn set_applies_modifiers_after_expansion() {
        let mut ctx = FilterContext::new(true);
        ctx.eval_set(&SetCommand::new([] as [&str; 0], ["a", "juMBlEd lETteRS"]))
            .unwrap();
        ctx.eval_set(&SetCommand::new(["length"], ["b", "${a}"])).unwrap();
        assert_eq!(ctx.expand("${b}"), "15");
    }

    #[test]
    fn capture_binding_feeds_expansion() {
        let mut ctx = FilterContext::new(true);
        ctx.bind_match_captures(["ACME.Example", ""]);
        assert_eq!(ctx.expand("${1}"), "ACME.Example");
    }

    #[test]
    fn disabled_set_is_a_noop() {
        let mut ctx = FilterContext::new(false);
        ctx.eval_set(&SetCommand::new([] as [&str; 0], ["var", "hello"]))
            .unwrap();
        assert!(ctx.store().is_empty());
    }

    #[test]
    fn disabled_expand_is_verbatim() {
        let mut ctx = FilterContext::new(false);
        ctx.bind_match_captures(["ignored"]);
        assert_eq!(ctx.expand("${var}"), "${var}");
        assert_eq!(ctx.expand("${1}"), "${1}");
    }

    #[test]
    fn disabled_set_still_reports_syntax_errors() {
        let mut ctx = FilterContext::new(false);
        let err = ctx
            .eval_set(&SetCommand::new(["lownner"], ["var", "hello"]))
            .expect_err("validation is load-time");
        assert!(err.message().contains("lownner"));
    }

    #[test]
    fn reset_gives_a_clean_slate() {
        let mut ctx = FilterContext::new(true);
        ctx.eval_set(&SetCommand::new([] as [&str; 0], ["var", "hello"]))
            .unwrap();
        ctx.bind_match_captures(["g1"]);
        ctx.reset();
        assert_eq!(ctx.expand("${var}${1}"), "");
    }
}
