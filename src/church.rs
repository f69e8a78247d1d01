// SPDX-FileCopyrightText: 2025 stfnw
// SPDX-License-Identifier: MIT

//! Church numerals as nested unary closures.
//!
//! The numeral for n is the curried function `λf. λx. f (f (... (f x)))` with
//! n applications of `f`. Nothing stores the count; it is recovered only by
//! running the closure with an increment function and a starting value.

use crate::error::{EvalError, Result};
use crate::eval::{evaluate_, EvalConfig};
use crate::value::{apply, lambda, Stage, Value};

use tracing::trace;

/// `zero(f)(x) = x`
pub fn zero() -> Value {
    lambda(|_f| Ok(lambda(|x| Ok(x.into())).into()))
}

/// `one(f)(x) = f(x)`
pub fn one() -> Value {
    lambda(|f| Ok(lambda(move |x| apply(&f, x).map(Stage::from)).into()))
}

/// `two(f)(x) = f(f(x))`
pub fn two() -> Value {
    lambda(|f| {
        Ok(lambda(move |x| {
            let fx = apply(&f, x)?;
            apply(&f, fx).map(Stage::from)
        })
        .into())
    })
}

/// `succ(n)(f)(x) = f(n(f)(x))`
#[rustfmt::skip]
pub fn succ() -> Value {
    lambda(|n| Ok(lambda(move |f| {
        let n = n.clone();
        Ok(lambda(move |x| {
            let nfx = apply(&apply(&n, f.clone())?, x)?;
            apply(&f, nfx).map(Stage::from)
        }).into())
    }).into()))
}

/// `pred(n) = λf. λx. n (λg. λh. h (g f)) (λu. x) (λu. u)`
///
/// Each step of `n` wraps the result so far into a continuation that applies
/// `f` once more; the innermost step starts from the constant `λu. x`, which
/// swallows the first application. Forcing the chain with the identity
/// therefore yields `f` applied n-1 times, and `x` itself for zero.
#[rustfmt::skip]
pub fn pred() -> Value {
    lambda(|n| Ok(lambda(move |f| {
        let n = n.clone();
        Ok(lambda(move |x| {
            let f = f.clone();
            let step = lambda(move |g| {
                let f = f.clone();
                Ok(lambda(move |h| {
                    let gf = apply(&g, f.clone())?;
                    apply(&h, gf).map(Stage::from)
                }).into())
            });
            let constant = lambda(move |_u| Ok(x.clone().into()));
            let identity = lambda(|u| Ok(u.into()));

            let threaded = apply(&apply(&n, step)?, constant)?;
            apply(&threaded, identity).map(Stage::from)
        }).into())
    }).into()))
}

/// The unary function `x -> x + 1` on natural numbers.
pub fn increment() -> Value {
    lambda(|x| {
        let value = x.as_nat()?;
        let next = value
            .checked_add(1)
            .ok_or(EvalError::Overflow { value })?;
        Ok(Stage::Done(Value::Nat(next)))
    })
}

/// Build the numeral for n by applying `succ` to `zero` n times.
pub fn numeral(n: usize) -> Result<Value> {
    let succ = succ();
    (0..n).try_fold(zero(), |acc, _| apply(&succ, acc))
}

/// Recover the number a numeral stands for.
pub fn decode(value: &Value) -> Result<u64> {
    decode_(value, None)
}

/// Like `decode`, but gives up after `max_steps` evaluator transitions.
pub fn decode_(value: &Value, max_steps: Option<usize>) -> Result<u64> {
    let res = evaluate_(
        value.clone(),
        [increment(), Value::Nat(0)],
        EvalConfig::strict().with_max_steps(max_steps),
    )?;
    trace!(steps = res.steps, "decoded numeral");
    res.value.as_nat()
}
