//! Variable binding and `${...}` template expansion for Sieve-style mail
//! filter scripts — the "variables" extension of RFC 5229, as used by a
//! rule engine evaluating one script against one incoming message.
//!
//! What this crate covers:
//!
//! - [`store::VariableStore`] — case-insensitive name→value table plus the
//!   positional captures `${1}`…`${9}` of the most recent match test
//! - [`expand::expand`] — single-pass, non-recursive `${...}` substitution
//!   with least-greedy reference resolution
//! - [`modifier`] — the `set` value modifiers (`:lower`, `:upperfirst`,
//!   `:quotewildcard`, `:encodeurl`, `:length`, …) applied in canonical
//!   order regardless of script order
//! - [`set_cmd::SetCommand`] — `set` validation and the syntax errors it
//!   can raise
//! - [`pattern::SievePattern`] — `:is`/`:contains`/`:matches` comparisons,
//!   with `:matches` wildcards producing the capture groups
//! - [`engine::FilterContext`] — the per-message facade the rule engine
//!   drives, including the per-server feature flag that turns the whole
//!   subsystem into a pass-through
//!
//! The script grammar, message model, and delivery actions live in the
//! surrounding rule engine; this crate is pure in-memory string work.
//!
//! # Quick start
//!
//! ```rust
//! use sieve_vars::{FilterContext, MatchType, SetCommand, SievePattern};
//!
//! let mut ctx = FilterContext::new(true);
//! ctx.eval_set(&SetCommand::new(["upper"], ["var", "test"])).unwrap();
//!
//! // if header :matches "Subject" "*" { tag "${var}" }
//! let subject = SievePattern::new("*", MatchType::Matches).unwrap();
//! if let Some(caps) = subject.find("Hello World") {
//!     ctx.bind_match_captures(caps.into_groups());
//!     assert_eq!(ctx.expand("${var}"), "TEST");
//!     assert_eq!(ctx.expand("subject was: ${1}"), "subject was: Hello World");
//! }
//! ```

pub mod engine;
pub mod expand;
pub mod modifier;
pub mod pattern;
pub mod set_cmd;
pub mod store;

// Re-exports for convenience.
pub use engine::FilterContext;
pub use expand::expand;
pub use modifier::{apply_modifiers, Modifier, ModifierSet};
pub use pattern::{MatchCaptures, MatchType, PatternError, SievePattern};
pub use set_cmd::{SetCommand, SyntaxError};
pub use store::VariableStore;
