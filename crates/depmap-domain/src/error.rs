//! Error types for the elicitation model.

use crate::pair::Pair;
use crate::session::Phase;
use thiserror::Error;

/// Errors produced by interview state transitions and validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElicitError {
    /// Fewer than two variables were submitted
    #[error("need at least 2 variables, got {0}")]
    InsufficientVariables(usize),

    /// A variable name was empty or whitespace-only
    #[error("variable names must not be empty")]
    EmptyVariableName,

    /// The same variable name was submitted twice (exact, case-sensitive match)
    #[error("duplicate variable name: {0}")]
    DuplicateVariable(String),

    /// The cursor is already past the last pair; advancing further is a
    /// caller bug, not a user-facing condition
    #[error("pair sequence exhausted")]
    CursorExhausted,

    /// An answer referred to a pair other than the one under the cursor.
    /// Guards against stale or replayed client state.
    #[error("pair mismatch: expected {expected}, got {got}")]
    PairMismatch {
        /// The pair currently under the cursor
        expected: Pair,
        /// The pair the caller sent
        got: Pair,
    },

    /// The operation is not valid in the session's current lifecycle phase
    #[error("operation requires phase {expected}, session is in {actual}")]
    PhaseViolation {
        /// Phase the operation requires
        expected: Phase,
        /// Phase the session is actually in
        actual: Phase,
    },
}

impl ElicitError {
    /// Whether this error is a submission-validation failure (recovered by
    /// re-prompting the user) as opposed to a protocol/state error.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ElicitError::InsufficientVariables(_)
                | ElicitError::EmptyVariableName
                | ElicitError::DuplicateVariable(_)
        )
    }
}
