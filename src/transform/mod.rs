/*
    This module drives the normalization pipeline
*/

pub mod chomsky;
pub mod epsilon;
pub mod greibach;
pub mod names;
pub mod unit;
pub mod useless;

use std::fmt::Display;

use crate::grammar::{dedup_productions, Grammar, Symbol};
use crate::trace::Trace;
use names::NameGenerator;

#[derive(Debug, PartialEq)]
pub enum TransformError {
    // A grammar violating the model invariants reached the core
    MalformedGrammar(String),
    // Helper-name bookkeeping produced a colliding variable name
    NamingInvariantViolation(String),
}

impl Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::MalformedGrammar(detail) => {
                write!(f, "Malformed grammar: {}", detail)
            }
            TransformError::NamingInvariantViolation(name) => {
                write!(f, "Helper name `{}` collides with an existing variable", name)
            }
        }
    }
}

impl std::error::Error for TransformError {}

// Fail-fast check on grammars handed to the core. The parser never produces
// a violating grammar, but hand-built ones can.
fn check_well_formed(grammar: &Grammar) -> Result<(), TransformError> {
    let malformed = |detail: String| Err(TransformError::MalformedGrammar(detail));

    if !grammar.variables.contains(&grammar.start) {
        return malformed(format!("start symbol `{}` is not a variable", grammar.start));
    }

    for p in &grammar.productions {
        if !grammar.variables.contains(&p.head) {
            return malformed(format!("head `{}` is not a variable", p.head));
        }
        if p.body.is_empty() {
            return malformed(format!("`{}` has an empty body", p.head));
        }
        if p.body.contains(&Symbol::Epsilon) && !p.is_epsilon() {
            return malformed(format!("epsilon inside a longer body of `{}`", p.head));
        }
        for symbol in &p.body {
            match symbol {
                Symbol::Variable(v) if !grammar.variables.contains(v) => {
                    return malformed(format!("body references undeclared variable `{}`", v));
                }
                Symbol::Terminal(t) if !grammar.alphabet.contains(t) => {
                    return malformed(format!("body references undeclared terminal `{}`", t));
                }
                _ => {}
            }
        }
    }

    Ok(())
}

// Epsilon, unit, and useless elimination, shared by both normal forms
fn simplify(grammar: &Grammar, trace: &mut impl Trace) -> Grammar {
    let stripped = Grammar {
        variables: grammar.variables.clone(),
        alphabet: grammar.alphabet.clone(),
        start: grammar.start.clone(),
        productions: dedup_productions(epsilon::remove_epsilon_productions(&grammar.productions)),
    };
    trace.record("epsilon productions removed", &stripped);

    let without_units = unit::remove_unit_productions(&stripped);
    trace.record("unit productions removed", &without_units);

    let reduced = useless::remove_useless_symbols(&without_units);
    trace.record("useless symbols removed", &reduced);

    reduced
}

pub fn normalize_to_cnf(
    grammar: &Grammar,
    trace: &mut impl Trace,
) -> Result<Grammar, TransformError> {
    check_well_formed(grammar)?;
    trace.record("original grammar", grammar);

    let mut names = NameGenerator::new();
    let simplified = simplify(grammar, trace);
    let result = chomsky::convert_terminals_and_binarize(&simplified, &mut names)?;
    trace.record("chomsky normal form", &result);

    Ok(result)
}

pub fn normalize_to_gnf(
    grammar: &Grammar,
    trace: &mut impl Trace,
) -> Result<Grammar, TransformError> {
    check_well_formed(grammar)?;
    trace.record("original grammar", grammar);

    let mut names = NameGenerator::new();
    let simplified = simplify(grammar, trace);

    let renamed = greibach::rename_variables(&simplified);
    trace.record("variables renamed", &renamed);

    let eliminated = greibach::eliminate_ordered(&renamed, &mut names)?;
    trace.record("left recursion eliminated", &eliminated);

    let result = greibach::terminal_leading_closure(&eliminated);
    trace.record("greibach normal form", &result);

    Ok(result)
}
