/*
    This module derives random strings from a grammar, as a spot check that
    a normalized grammar still produces plausible output
*/

use rand::prelude::*;
use std::fmt::Display;

use crate::grammar::{Grammar, Production, Symbol};

// Recursive normal-form grammars need not terminate, so every variable
// expansion spends one unit of budget
pub const DEFAULT_BUDGET: usize = 10_000;

#[derive(Debug, PartialEq)]
pub enum SampleError {
    // A variable with no productions was reached
    UndefinedVariable(String),
    // The expansion budget ran out before the derivation finished
    BudgetExhausted,
}

impl Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleError::UndefinedVariable(variable) => {
                write!(f, "No production for variable `{}`", variable)
            }
            SampleError::BudgetExhausted => write!(f, "Derivation budget exhausted"),
        }
    }
}

impl std::error::Error for SampleError {}

pub fn derive(
    grammar: &Grammar,
    rng: &mut impl Rng,
    budget: usize,
) -> Result<String, SampleError> {
    let mut remaining = budget;
    expand_variable(&grammar.start, grammar, rng, &mut remaining)
}

fn expand_variable(
    variable: &str,
    grammar: &Grammar,
    rng: &mut impl Rng,
    remaining: &mut usize,
) -> Result<String, SampleError> {
    if *remaining == 0 {
        return Err(SampleError::BudgetExhausted);
    }
    *remaining -= 1;

    let alternatives: Vec<&Production> = grammar
        .productions
        .iter()
        .filter(|p| p.head == variable)
        .collect();
    let chosen = alternatives
        .choose(rng)
        .ok_or_else(|| SampleError::UndefinedVariable(variable.to_string()))?;

    let mut result = String::new();
    for symbol in &chosen.body {
        match symbol {
            Symbol::Terminal(text) => result.push_str(text),
            Symbol::Variable(name) => {
                result.push_str(&expand_variable(name, grammar, rng, remaining)?)
            }
            Symbol::Epsilon => {}
        }
    }

    return Ok(result);
}

#[cfg(test)]
mod tests {
    use crate::grammar::Production;
    use super::*;

    fn v(name: &str) -> Symbol {
        Symbol::Variable(name.to_string())
    }

    fn t(name: &str) -> Symbol {
        Symbol::Terminal(name.to_string())
    }

    fn grammar(variables: &[&str], alphabet: &[&str], productions: Vec<Production>) -> Grammar {
        Grammar {
            variables: variables.iter().map(|s| s.to_string()).collect(),
            alphabet: alphabet.iter().map(|s| s.to_string()).collect(),
            start: variables[0].to_string(),
            productions,
        }
    }

    #[test]
    fn single_derivation_grammar_is_deterministic() {
        let input = grammar(&["S", "A"], &["a", "b"], vec![
            Production::new("S", vec![t("a"), v("A")]),
            Production::new("A", vec![t("b")]),
        ]);
        let mut rng = StdRng::seed_from_u64(17);

        assert_eq!(derive(&input, &mut rng, DEFAULT_BUDGET), Ok("ab".to_string()));
    }

    #[test]
    fn epsilon_body_derives_empty_string() {
        let input = grammar(&["S"], &[], vec![
            Production::new("S", vec![Symbol::Epsilon]),
        ]);
        let mut rng = StdRng::seed_from_u64(17);

        assert_eq!(derive(&input, &mut rng, DEFAULT_BUDGET), Ok(String::new()));
    }

    #[test]
    fn undefined_variable_is_reported() {
        let input = grammar(&["S", "A"], &["a"], vec![
            Production::new("S", vec![t("a"), v("A")]),
        ]);
        let mut rng = StdRng::seed_from_u64(17);

        assert_eq!(
            derive(&input, &mut rng, DEFAULT_BUDGET),
            Err(SampleError::UndefinedVariable("A".to_string()))
        );
    }

    #[test]
    fn unbounded_recursion_hits_the_budget() {
        let input = grammar(&["S"], &["a"], vec![
            Production::new("S", vec![t("a"), v("S")]),
        ]);
        let mut rng = StdRng::seed_from_u64(17);

        assert_eq!(
            derive(&input, &mut rng, 100),
            Err(SampleError::BudgetExhausted)
        );
    }
}
