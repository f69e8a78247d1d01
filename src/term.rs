// SPDX-FileCopyrightText: 2025 stfnw
// SPDX-License-Identifier: MIT

//! Church numerals and their operators as untyped lambda calculus terms, and a
//! compiler that interprets closed terms into the closure domain of
//! `crate::value`.

use crate::error::{EvalError, Result};
use crate::format::named;
use crate::value::{call, lambda, Stage, Value};

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, trace};

/// Identifiers: used to represent variable names.
// Use a newtype and not a type alias for proper separation of types / to
// prevent confusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

/// Untyped lambda calculus terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Variable.
    Var { name: Identifier },
    /// Application
    App { t1: Rc<Term>, t2: Rc<Term> },
    /// Abstraction.
    Abs { var: Identifier, t: Rc<Term> },
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", named::encode(self))
    }
}

/// Manually implementing Drop for Term is needed because otherwise we run into
/// a stack overflow when dropping large trees (e.g. numerals for big n),
/// because the drop propagates non-tail-recursively through the tree.
/// Subterms that are uniquely owned are detached and dropped from an explicit
/// stack instead.
impl Drop for Term {
    fn drop(&mut self) {
        fn detach(term: &mut Term, stack: &mut Vec<Rc<Term>>) {
            let dummy = || {
                Rc::new(Term::Var {
                    name: Identifier(String::new()),
                })
            };
            match term {
                Term::Var { name: _ } => {}
                Term::Abs { var: _, t } => stack.push(std::mem::replace(t, dummy())),
                Term::App { t1, t2 } => {
                    stack.push(std::mem::replace(t1, dummy()));
                    stack.push(std::mem::replace(t2, dummy()));
                }
            }
        }

        let mut stack: Vec<Rc<Term>> = Vec::new();
        detach(self, &mut stack);

        while let Some(term_rc) = stack.pop() {
            // Shared subterms are still referenced elsewhere and stay alive.
            if let Ok(mut term) = Rc::try_unwrap(term_rc) {
                detach(&mut term, &mut stack);
            }
        }
    }
}

// Short-hand function for constructing Term::Var.
pub fn var(v: &str) -> Term {
    Term::Var {
        name: Identifier(v.to_string()),
    }
}
// Short-hand function for constructing Term::Abs.
pub fn abs(var: &str, t: Term) -> Term {
    Term::Abs {
        var: Identifier(var.to_string()),
        t: Rc::new(t),
    }
}
// Short-hand function for constructing Term::App.
pub fn app(t1: Term, t2: Term) -> Term {
    Term::App {
        t1: Rc::new(t1),
        t2: Rc::new(t2),
    }
}

pub fn zero() -> Term {
    numeral(0)
}

pub fn one() -> Term {
    numeral(1)
}

pub fn two() -> Term {
    numeral(2)
}

#[rustfmt::skip]
pub fn succ() -> Term {
    abs("n", abs("f", abs("x",
        app(
            var("f"),
            app(app(var("n"), var("f")), var("x"))))))
}

#[rustfmt::skip]
pub fn pred() -> Term {
    abs("n", abs("f", abs("x",
        app(
            app(
                app(
                    var("n"),
                    abs("g", abs("h", app(var("h"), app(var("g"), var("f")))))),
                abs("u", var("x"))),
            abs("u", var("u"))))))
}

/// Build lambda term for n-th Church numeral, in normal form.
pub fn numeral(n: usize) -> Term {
    let mut body = var("x");

    // Apply f n times
    for _ in 0..n {
        body = app(var("f"), body);
    }

    abs("f", abs("x", body))
}

/// Decode a Church numeral term in normal form to its number.
pub fn church_decode(t: &Term) -> Option<usize> {
    let Term::Abs { var: f, t: body } = t else {
        return None;
    };
    let Term::Abs { var: x, t: body } = body.as_ref() else {
        return None;
    };
    // Both binders named the same would make `f` shadowed by `x`.
    if f == x {
        return None;
    }

    let mut count = 0;
    let mut cur = body.as_ref();

    loop {
        match cur {
            Term::Var { name } if name == x => return Some(count),
            Term::App { t1, t2 } => match t1.as_ref() {
                Term::Var { name } if name == f => {
                    count += 1;
                    cur = t2.as_ref();
                }
                _ => return None,
            },
            _ => return None,
        }
    }
}

/// Reduce a term to beta normal form in normal order (leftmost-outermost redex
/// first), giving up after `max_steps` contractions. Normal order finds the
/// normal form whenever one exists, e.g. `pred c_n` reduces to `c_(n-1)`.
pub fn reduce(term: &Term, max_steps: usize) -> Result<Term> {
    let mut cur = term.clone();
    let mut steps: usize = 0;

    while let Some(next) = reduce_step(&cur) {
        steps += 1;
        if steps > max_steps {
            return Err(EvalError::StepLimitExceeded { limit: max_steps });
        }
        trace!(steps, "contracted redex");
        cur = next;
    }

    debug!(steps, "reached normal form");
    Ok(cur)
}

/// Contract the leftmost-outermost redex, or return `None` for a term in
/// normal form.
fn reduce_step(term: &Term) -> Option<Term> {
    match term {
        Term::Var { name: _ } => None,
        Term::Abs { var, t } => reduce_step(t).map(|t| Term::Abs {
            var: var.clone(),
            t: Rc::new(t),
        }),
        Term::App { t1, t2 } => {
            if let Term::Abs { var, t } = t1.as_ref() {
                return Some(substitute(t, var, t2));
            }
            if let Some(t1) = reduce_step(t1) {
                return Some(Term::App {
                    t1: Rc::new(t1),
                    t2: Rc::clone(t2),
                });
            }
            reduce_step(t2).map(|t2| Term::App {
                t1: Rc::clone(t1),
                t2: Rc::new(t2),
            })
        }
    }
}

fn free_vars(term: &Term) -> HashSet<Identifier> {
    match term {
        Term::Var { name } => HashSet::from([name.clone()]),
        Term::Abs { var, t } => {
            let mut vars = free_vars(t);
            vars.remove(var);
            vars
        }
        Term::App { t1, t2 } => {
            let mut vars = free_vars(t1);
            vars.extend(free_vars(t2));
            vars
        }
    }
}

/// Capture-avoiding substitution `term[x := s]`. Binders that would capture a
/// free variable of `s` are renamed by appending primes.
fn substitute(term: &Term, x: &Identifier, s: &Rc<Term>) -> Term {
    match term {
        Term::Var { name } if name == x => (**s).clone(),
        Term::Var { name: _ } => term.clone(),
        Term::App { t1, t2 } => Term::App {
            t1: Rc::new(substitute(t1, x, s)),
            t2: Rc::new(substitute(t2, x, s)),
        },
        // x is shadowed below this binder.
        Term::Abs { var, t: _ } if var == x => term.clone(),
        Term::Abs { var, t } => {
            let fv = free_vars(s);
            if !fv.contains(var) {
                return Term::Abs {
                    var: var.clone(),
                    t: Rc::new(substitute(t, x, s)),
                };
            }

            let used = free_vars(t);
            let mut fresh = Identifier(format!("{}'", var.0));
            while fv.contains(&fresh) || used.contains(&fresh) || fresh == *x {
                fresh = Identifier(format!("{}'", fresh.0));
            }
            let renamed = substitute(
                t,
                var,
                &Rc::new(Term::Var {
                    name: fresh.clone(),
                }),
            );
            Term::Abs {
                var: fresh,
                t: Rc::new(substitute(&renamed, x, s)),
            }
        }
    }
}

/// Environments: persistent linked list of bindings, innermost first.
#[derive(Debug)]
enum Env {
    Nil,
    Bind(Identifier, Value, Rc<Env>),
}

impl Env {
    fn lookup(&self, name: &Identifier) -> Option<Value> {
        let mut cur = self;
        while let Env::Bind(var, value, rest) = cur {
            if var == name {
                return Some(value.clone());
            }
            cur = rest.as_ref();
        }
        None
    }
}

/// Interpret a closed lambda term as a closure value.
///
/// Abstractions become functions that capture their environment, applications
/// become thunks, so the compiled value is driven by the evaluator exactly like
/// the hand-written closures of `crate::church`.
pub fn compile(term: &Term) -> Result<Value> {
    compile_(term, &Rc::new(Env::Nil))?.force()
}

fn compile_(term: &Term, env: &Rc<Env>) -> Result<Stage> {
    match term {
        Term::Var { name } => env
            .lookup(name)
            .map(Stage::from)
            .ok_or_else(|| EvalError::UnboundVariable {
                name: name.0.clone(),
            }),

        Term::Abs { var, t } => {
            let (var, t, env) = (var.clone(), Rc::clone(t), Rc::clone(env));
            Ok(lambda(move |x| {
                let env = Rc::new(Env::Bind(var.clone(), x, Rc::clone(&env)));
                compile_(&t, &env)
            })
            .into())
        }

        Term::App { t1, t2 } => {
            let (t1, t2, env) = (Rc::clone(t1), Rc::clone(t2), Rc::clone(env));
            Ok(Stage::thunk(move || {
                let f = compile_(&t1, &env)?.force()?;
                let x = compile_(&t2, &env)?.force()?;
                call(&f, x)
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::church;
    use crate::eval::evaluate;

    struct TermTestCase<'a> {
        comment: &'a str,
        term: Term,
        encoded: &'a str,
        value: u64,
    }

    #[test]
    fn test_numeral_terms() {
        let cases = [
            TermTestCase {
                comment: "zero",
                term: zero(),
                encoded: "(λf. (λx. x))",
                value: 0,
            },
            TermTestCase {
                comment: "one",
                term: one(),
                encoded: "(λf. (λx. (f x)))",
                value: 1,
            },
            TermTestCase {
                comment: "two",
                term: two(),
                encoded: "(λf. (λx. (f (f x))))",
                value: 2,
            },
            TermTestCase {
                comment: "succ two",
                term: app(succ(), two()),
                encoded: "((λn. (λf. (λx. (f ((n f) x))))) (λf. (λx. (f (f x)))))",
                value: 3,
            },
            TermTestCase {
                comment: "pred two",
                term: app(pred(), two()),
                encoded: "((λn. (λf. (λx. (((n (λg. (λh. (h (g f))))) (λu. x)) (λu. u))))) (λf. (λx. (f (f x)))))",
                value: 1,
            },
        ];

        for case in cases {
            println!("comment {}", case.comment);
            println!("term    {}", case.term);
            assert_eq!(case.encoded, named::encode(&case.term));

            let compiled = compile(&case.term).unwrap();
            assert_eq!(case.value, church::decode(&compiled).unwrap());
        }
    }

    #[test]
    fn test_church_decode() {
        for n in 0..10 {
            assert_eq!(Some(n), church_decode(&numeral(n)));
        }

        // Not in normal form.
        assert_eq!(None, church_decode(&app(succ(), zero())));
        // Wrong function applied.
        assert_eq!(None, church_decode(&abs("f", abs("x", app(var("x"), var("x"))))));
        // Identical binders.
        assert_eq!(None, church_decode(&abs("x", abs("x", var("x")))));
        assert_eq!(None, church_decode(&var("f")));
    }

    /// Compiled terms and hand-written closures agree, and can be mixed.
    #[test]
    fn test_compiled_operators_agree_with_closures() {
        let succ = compile(&succ()).unwrap();
        let pred = compile(&pred()).unwrap();

        for n in 0..10 {
            let closure = church::numeral(n).unwrap();
            let compiled = compile(&numeral(n)).unwrap();
            assert_eq!(n as u64, church::decode(&compiled).unwrap());

            let s = evaluate(succ.clone(), [closure.clone()]).unwrap();
            assert_eq!(n as u64 + 1, church::decode(&s).unwrap());

            let p = evaluate(pred.clone(), [compiled]).unwrap();
            assert_eq!(n.saturating_sub(1) as u64, church::decode(&p).unwrap());

            let p = evaluate(church::pred(), [closure]).unwrap();
            assert_eq!(n.saturating_sub(1) as u64, church::decode(&p).unwrap());
        }
    }

    #[test]
    fn test_reduce_to_numeral() {
        for n in 0..10 {
            let succ_n = reduce(&app(succ(), numeral(n)), 10_000).unwrap();
            println!("succ {} reduces to {}", n, succ_n);
            assert_eq!(Some(n + 1), church_decode(&succ_n));

            let pred_n = reduce(&app(pred(), numeral(n)), 10_000).unwrap();
            println!("pred {} reduces to {}", n, pred_n);
            assert_eq!(Some(n.saturating_sub(1)), church_decode(&pred_n));
        }

        let res = reduce(&app(pred(), app(succ(), two())), 10_000).unwrap();
        assert_eq!(two(), res);
    }

    /// Test correct handling of step limit by trying to reduce ω ω.
    #[test]
    fn test_reduce_step_limit_handling() {
        let omega = || abs("x", app(var("x"), var("x")));
        let term = app(omega(), omega());
        assert_eq!(
            Some(EvalError::StepLimitExceeded { limit: 100 }),
            reduce(&term, 100).err()
        );

        // Normal order discards the diverging argument: K I (ω ω) reduces.
        let k = abs("a", abs("b", var("a")));
        let term = app(app(k, abs("y", var("y"))), term);
        assert_eq!(abs("y", var("y")), reduce(&term, 100).unwrap());
    }

    #[test]
    fn test_reduce_avoids_capture() {
        // (λx. λy. x) y must not turn into λy. y.
        let term = app(abs("x", abs("y", var("x"))), var("y"));
        let res = reduce(&term, 10).unwrap();
        assert_eq!("(λy'. y)", named::encode(&res));

        // Terms in normal form take no steps.
        assert_eq!(numeral(3), reduce(&numeral(3), 0).unwrap());
    }

    #[test]
    fn test_compile_unbound_variable() {
        assert_eq!(
            Some(EvalError::UnboundVariable {
                name: "y".to_string()
            }),
            compile(&var("y")).err()
        );

        // Free variables inside an abstraction only fail once it is applied.
        let f = compile(&abs("x", var("y"))).unwrap();
        assert_eq!(
            Some(EvalError::UnboundVariable {
                name: "y".to_string()
            }),
            evaluate(f, [Value::Nat(0)]).err()
        );
    }
}
