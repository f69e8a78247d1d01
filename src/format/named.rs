// SPDX-FileCopyrightText: 2025 stfnw
// SPDX-License-Identifier: MIT

//! This module implements encoding routines for lambda terms in typical text
//! notation with named variables, with every abstraction and application
//! explicitly parenthesized.

use crate::term::Term;

/// Print a lambda term to its string representation with named variables.
/// (Pre-order tree-traversal, explicitly iterative to prevent stack overflow
/// for large terms).
pub fn encode(term: &Term) -> String {
    enum Instr<'a> {
        T(&'a Term),
        Print(&'static str),
    }
    let mut stack: Vec<Instr> = Vec::new();
    let mut result = String::new();

    stack.push(Instr::T(term));

    while let Some(instr) = stack.pop() {
        match instr {
            Instr::Print(s) => result.push_str(s),
            Instr::T(Term::Var { name }) => result.push_str(&name.0),
            Instr::T(Term::Abs { var, t }) => {
                result.push_str(&format!("(λ{}. ", var.0));
                stack.push(Instr::Print(")"));
                stack.push(Instr::T(t));
            }
            Instr::T(Term::App { t1, t2 }) => {
                stack.push(Instr::Print(")"));
                stack.push(Instr::T(t2));
                stack.push(Instr::Print(" "));
                stack.push(Instr::T(t1));
                stack.push(Instr::Print("("));
            }
        }
    }

    result
}
