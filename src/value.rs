// SPDX-FileCopyrightText: 2025 stfnw
// SPDX-License-Identifier: MIT

//! Runtime values shared by the closure encoder, the term compiler and the
//! evaluator.
//!
//! A curried chain of unary functions is modelled with an explicit tag per
//! level (`Stage`) instead of inspecting the arity of a callable: each level is
//! either a suspended computation, a function still awaiting one argument, or
//! a finished value.

use crate::error::{EvalError, Result};

use std::fmt;
use std::rc::Rc;

// Closures are reference counted so that values can be captured by several
// nested closures at once; cloning a Value only bumps a counter.
// For Rc<T>, we use Rc::clone(T) explicitly, instead of calling it as `T.clone()`.

/// A unary function. Applying it yields the next stage of the chain.
pub type Func = Rc<dyn Fn(Value) -> Result<Stage>>;

/// A suspended computation, advanced by calling it without an argument.
pub type Thunk = Rc<dyn Fn() -> Result<Stage>>;

#[derive(Clone)]
pub enum Value {
    /// Concrete natural number.
    Nat(u64),
    /// Unary function.
    Func(Func),
}

impl Value {
    pub fn func(f: impl Fn(Value) -> Result<Stage> + 'static) -> Value {
        Value::Func(Rc::new(f))
    }

    pub fn as_nat(&self) -> Result<u64> {
        match self {
            Value::Nat(n) => Ok(*n),
            other => Err(EvalError::NotANumber {
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nat(n) => write!(f, "Nat({})", n),
            Value::Func(_) => write!(f, "Func(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nat(n) => write!(f, "{}", n),
            Value::Func(_) => write!(f, "<function>"),
        }
    }
}

/// One level of a curried function chain.
#[derive(Clone)]
pub enum Stage {
    Thunk(Thunk),
    NeedsArg(Func),
    Done(Value),
}

impl Stage {
    pub fn thunk(f: impl Fn() -> Result<Stage> + 'static) -> Stage {
        Stage::Thunk(Rc::new(f))
    }

    /// Run pending thunks until the stage is a value. A function still
    /// awaiting its argument counts as a value here.
    pub fn force(self) -> Result<Value> {
        let mut stage = self;
        loop {
            stage = match stage {
                Stage::Thunk(t) => t()?,
                Stage::NeedsArg(f) => return Ok(Value::Func(f)),
                Stage::Done(v) => return Ok(v),
            };
        }
    }
}

impl From<Value> for Stage {
    fn from(value: Value) -> Stage {
        match value {
            Value::Func(f) => Stage::NeedsArg(f),
            v => Stage::Done(v),
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Thunk(_) => write!(f, "Thunk(..)"),
            Stage::NeedsArg(_) => write!(f, "NeedsArg(..)"),
            Stage::Done(v) => write!(f, "Done({:?})", v),
        }
    }
}

/// Build a unary function whose body only runs once the stage returned by the
/// application is forced. Every application thereby shows up as a separate
/// `Thunk` step in the evaluator.
pub fn lambda(body: impl Fn(Value) -> Result<Stage> + 'static) -> Value {
    let body = Rc::new(body);
    Value::func(move |x| {
        let body = Rc::clone(&body);
        Ok(Stage::thunk(move || body(x.clone())))
    })
}

/// Apply `f` to `x`, returning the resulting stage without forcing it.
pub fn call(f: &Value, x: Value) -> Result<Stage> {
    match f {
        Value::Func(g) => g(x),
        other => Err(EvalError::NotAFunction {
            value: other.to_string(),
            remaining: 1,
        }),
    }
}

/// Apply `f` to `x` and force the result to a value.
pub fn apply(f: &Value, x: Value) -> Result<Value> {
    call(f, x)?.force()
}
