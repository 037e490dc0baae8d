//! Error taxonomy.
//!
//! Only compile-time parsing/resource errors are modeled as `Result`s.
//! Operational termination (deadline/output cap) is not an error; it is
//! represented by `combo::SearchStatus`. Programming-contract violations
//! (null/empty invariants the caller is responsible for upholding) are
//! `debug_assert!`/`assert!` panics, not recoverable errors, matching the
//! engine's fatal-assertion posture for contract violations.

use thiserror::Error;

/// Errors produced while compiling an NX expression into an `Nfa`.
/// No `Nfa` is ever partially constructed when one of these is returned;
/// compilation builds into a scratch buffer and only commits on success.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CompileError {
    #[error("empty NX expression")]
    EmptyExpression,

    #[error("unterminated '[' character class")]
    UnterminatedBracket,

    #[error("unterminated '(' group")]
    UnterminatedGroup,

    #[error("unexpected ')' with no matching '('")]
    UnbalancedGroup,

    #[error("'{0}' with nothing to repeat")]
    DanglingRepetition(char),

    #[error("illegal character '{0}' inside a character class")]
    IllegalClassChar(char),

    #[error("empty character class '[]'")]
    EmptyClass,

    #[error("invalid repetition bound {{{0},{1}}}")]
    InvalidRepetitionBound(u32, u32),

    #[error("compiled expression needs more than {max} states (limit is fixed at compile time)")]
    StateOverflow { max: usize },

    #[error("fuzz budget {requested} exceeds the maximum of {max}")]
    FuzzBudgetExceeded { requested: u8, max: u8 },
}
