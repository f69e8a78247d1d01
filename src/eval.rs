// SPDX-FileCopyrightText: 2025 stfnw
// SPDX-License-Identifier: MIT

//! Stage evaluator: drives a curried chain of closures to a value by feeding it
//! one argument whenever the current stage expects one, and by forcing it
//! whenever the current stage is a suspended computation.

use crate::error::{EvalError, Result};
use crate::value::{Stage, Value};

use tracing::{debug, trace};

/// What to do when the argument list runs out while the current stage still
/// awaits an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentPolicy {
    /// Stop and hand back the pending stage as a function value (partial
    /// application).
    #[default]
    Partial,
    /// Fail with `EvalError::MissingArgument`.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalConfig {
    pub policy: ArgumentPolicy,
    /// Upper bound on the number of stage transitions; `None` means unlimited.
    pub max_steps: Option<usize>,
}

impl EvalConfig {
    pub fn strict() -> Self {
        EvalConfig {
            policy: ArgumentPolicy::Strict,
            ..Default::default()
        }
    }

    pub fn with_max_steps(self, max_steps: Option<usize>) -> Self {
        EvalConfig { max_steps, ..self }
    }
}

#[derive(Debug)]
pub struct EvalResult {
    /// Value the chain was driven to.
    pub value: Value,
    /// Number of stage transitions taken.
    pub steps: usize,
}

/// Evaluate with the default configuration (partial application, no step
/// limit) and return only the final value.
pub fn evaluate(stage: impl Into<Stage>, args: impl IntoIterator<Item = Value>) -> Result<Value> {
    evaluate_(stage, args, EvalConfig::default()).map(|res| res.value)
}

/// Drive `stage` to a value, consuming `args` one per argument-awaiting stage.
/// Besides the value, the number of performed stage transitions is counted
/// and returned.
pub fn evaluate_(
    stage: impl Into<Stage>,
    args: impl IntoIterator<Item = Value>,
    config: EvalConfig,
) -> Result<EvalResult> {
    let mut args = args.into_iter().peekable();
    let mut stage = stage.into();

    // Number of arguments handed to the chain so far.
    let mut consumed: usize = 0;
    let mut steps: usize = 0;

    loop {
        let next = match stage {
            Stage::Thunk(t) => t()?,

            Stage::NeedsArg(f) => match args.next() {
                Some(arg) => {
                    consumed += 1;
                    f(arg)?
                }
                None => match config.policy {
                    ArgumentPolicy::Partial => {
                        debug!(steps, consumed, "arguments exhausted, returning partial application");
                        return Ok(EvalResult {
                            value: Value::Func(f),
                            steps,
                        });
                    }
                    ArgumentPolicy::Strict => {
                        return Err(EvalError::MissingArgument { consumed });
                    }
                },
            },

            // A function delivered as a finished value still accepts the
            // remaining arguments, and under the strict policy it still
            // demands one.
            Stage::Done(Value::Func(f))
                if args.peek().is_some() || config.policy == ArgumentPolicy::Strict =>
            {
                stage = Stage::NeedsArg(f);
                continue;
            }

            Stage::Done(value) => {
                let remaining = args.count();
                if remaining > 0 {
                    return Err(EvalError::NotAFunction {
                        value: value.to_string(),
                        remaining,
                    });
                }
                debug!(steps, consumed, %value, "evaluation finished");
                return Ok(EvalResult { value, steps });
            }
        };

        stage = next;
        steps += 1;
        trace!(steps, consumed, stage = ?stage, "advanced");

        if let Some(limit) = config.max_steps {
            if steps > limit {
                return Err(EvalError::StepLimitExceeded { limit });
            }
        }
    }
}
