// SPDX-FileCopyrightText: 2025 stfnw
// SPDX-License-Identifier: MIT

//! Church-encoded natural numbers built from nested unary closures, together
//! with a small stage evaluator that forces such closure chains down to a
//! concrete value.

pub mod church;
pub mod error;
pub mod eval;
pub mod format;
pub mod term;
pub mod value;

pub use error::{EvalError, Result};
pub use eval::{evaluate, evaluate_, ArgumentPolicy, EvalConfig, EvalResult};
pub use value::{Stage, Value};
