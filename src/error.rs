use std::num::ParseIntError;

use thiserror::Error;

/// Why a derivation tree, or a trace that should become one, was rejected.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DerivationError {
    #[error("rule {rule} does not apply to `{command}`")]
    WrongRule { rule: &'static str, command: String },

    #[error("guard `{guard}` is {actual} in {state}")]
    GuardMismatch {
        guard: String,
        state: String,
        actual: bool,
    },

    #[error("premise about `{premise}` from {premise_initial} cannot support `{command}` from {initial}")]
    PremiseMismatch {
        command: String,
        initial: String,
        premise: String,
        premise_initial: String,
    },

    #[error("`{command}` concludes {claimed}, but the rule yields {expected}")]
    WrongResult {
        command: String,
        claimed: String,
        expected: String,
    },

    #[error("`{from}` does not step to `{to}`")]
    InvalidStep { from: String, to: String },

    #[error("trace stops at `{command}` instead of skip")]
    Unterminated { command: String },
}

/// Bad invocation of the command line driver.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("budget must be a non-negative number, got '{input}'")]
    InvalidBudget {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("unexpected arguments; usage: imp [budget]")]
    TooManyArguments,
}
