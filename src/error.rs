// SPDX-FileCopyrightText: 2025 stfnw
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Everything that can go wrong while applying closures or driving a chain of
/// stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("cannot apply {value} to {remaining} remaining argument(s)")]
    NotAFunction { value: String, remaining: usize },

    #[error("argument list exhausted after {consumed} argument(s) while a function still expects one")]
    MissingArgument { consumed: usize },

    #[error("expected a natural number, found {found}")]
    NotANumber { found: String },

    #[error("incrementing {value} overflows")]
    Overflow { value: u64 },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: usize },

    #[error("unbound variable `{name}`")]
    UnboundVariable { name: String },
}

pub type Result<T> = std::result::Result<T, EvalError>;
