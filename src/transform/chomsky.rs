/*
    The last two Chomsky steps: terminal isolation and binarization
*/

use std::collections::HashMap;

use crate::grammar::{Grammar, Production, Symbol};
use super::names::{claim_variable, NameGenerator};
use super::TransformError;

// Expects a grammar already free of epsilon, unit, and useless productions.
// Pass 1 replaces terminals inside bodies of length >= 2 with memoized T_
// helpers; pass 2 peels bodies longer than two into chains of fresh C_
// helpers, one chain per production.
pub fn convert_terminals_and_binarize(
    grammar: &Grammar,
    names: &mut NameGenerator,
) -> Result<Grammar, TransformError> {
    let mut variables = grammar.variables.clone();
    let mut helper_rules: Vec<Production> = Vec::new();
    let mut helper_for_terminal: HashMap<String, String> = HashMap::new();

    // Pass 1: terminal isolation. One helper per distinct terminal, reused
    // for every occurrence across the whole grammar.
    let mut isolated = Vec::new();
    for p in &grammar.productions {
        if p.body.len() < 2 {
            isolated.push(p.clone());
            continue;
        }

        let mut body = Vec::with_capacity(p.body.len());
        for symbol in &p.body {
            match symbol {
                Symbol::Terminal(terminal) => {
                    let helper = match helper_for_terminal.get(terminal).cloned() {
                        Some(existing) => existing,
                        None => {
                            let name = names.fresh("T_", &variables);
                            let index = variables.len();
                            claim_variable(&mut variables, index, name.clone())?;
                            helper_for_terminal.insert(terminal.clone(), name.clone());
                            helper_rules.push(Production::new(
                                &name,
                                vec![Symbol::Terminal(terminal.clone())],
                            ));
                            name
                        }
                    };
                    body.push(Symbol::Variable(helper));
                }
                other => body.push(other.clone()),
            }
        }
        isolated.push(Production::new(&p.head, body));
    }

    // Pass 2: binarization. Helpers are never shared between long bodies.
    let mut productions = helper_rules;
    for p in isolated {
        if p.body.len() <= 2 {
            productions.push(p);
            continue;
        }

        let mut head = p.head.clone();
        let mut rest = p.body.as_slice();
        while rest.len() > 2 {
            let helper = names.fresh("C_", &variables);
            let index = variables.len();
            claim_variable(&mut variables, index, helper.clone())?;
            productions.push(Production::new(
                &head,
                vec![rest[0].clone(), Symbol::Variable(helper.clone())],
            ));
            head = helper;
            rest = &rest[1..];
        }
        productions.push(Production::new(&head, rest.to_vec()));
    }

    variables.sort();

    Ok(Grammar {
        variables,
        alphabet: grammar.alphabet.clone(),
        start: grammar.start.clone(),
        productions,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

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

    fn rendered(grammar: &Grammar) -> HashSet<String> {
        grammar.productions.iter().map(|p| p.to_string()).collect()
    }

    fn assert_chomsky_shape(grammar: &Grammar) {
        for p in &grammar.productions {
            match p.body.len() {
                1 => assert!(p.body[0].is_terminal(), "lone symbol not terminal: {}", p),
                2 => assert!(
                    p.body.iter().all(|s| matches!(s, Symbol::Variable(_))),
                    "binary body with a terminal: {}",
                    p
                ),
                n => panic!("body of length {}: {}", n, p),
            }
        }
    }

    #[test]
    fn isolates_interspersed_terminals() {
        let input = grammar(&["S", "A", "B"], &["a", "b", "x", "y"], vec![
            Production::new("S", vec![t("a"), v("A"), t("b"), v("B")]),
            Production::new("A", vec![t("x")]),
            Production::new("B", vec![t("y")]),
        ]);

        let result = convert_terminals_and_binarize(&input, &mut NameGenerator::new()).unwrap();
        let set = rendered(&result);

        assert_chomsky_shape(&result);
        assert!(!set.contains("S -> a A b B"));
        assert!(set.contains("T_1 -> a"));
        assert!(set.contains("T_2 -> b"));
    }

    #[test]
    fn reuses_helper_for_repeated_terminal() {
        let input = grammar(&["S"], &["a"], vec![
            Production::new("S", vec![t("a"), t("a"), t("a")]),
        ]);

        let result = convert_terminals_and_binarize(&input, &mut NameGenerator::new()).unwrap();

        let terminal_helpers: Vec<_> = result
            .productions
            .iter()
            .filter(|p| p.body.len() == 1)
            .collect();
        assert_eq!(terminal_helpers.len(), 1);
        assert_eq!(terminal_helpers[0].to_string(), "T_1 -> a");
    }

    #[test]
    fn binarizes_long_body_into_chain() {
        let input = grammar(&["S", "A", "B", "C", "D", "E"], &["a", "b", "c", "d", "e"], vec![
            Production::new("S", vec![v("A"), v("B"), v("C"), v("D"), v("E")]),
            Production::new("A", vec![t("a")]),
            Production::new("B", vec![t("b")]),
            Production::new("C", vec![t("c")]),
            Production::new("D", vec![t("d")]),
            Production::new("E", vec![t("e")]),
        ]);

        let result = convert_terminals_and_binarize(&input, &mut NameGenerator::new()).unwrap();
        let set = rendered(&result);

        assert_chomsky_shape(&result);
        assert!(set.contains("S -> A C_1"));
        assert!(set.contains("C_1 -> B C_2"));
        assert!(set.contains("C_2 -> C C_3"));
        assert!(set.contains("C_3 -> D E"));
    }

    #[test]
    fn chains_are_not_shared_between_bodies() {
        let input = grammar(&["S", "A", "B", "C"], &["a", "b", "c"], vec![
            Production::new("S", vec![v("A"), v("B"), v("C")]),
            Production::new("S", vec![v("C"), v("B"), v("A")]),
            Production::new("A", vec![t("a")]),
            Production::new("B", vec![t("b")]),
            Production::new("C", vec![t("c")]),
        ]);

        let result = convert_terminals_and_binarize(&input, &mut NameGenerator::new()).unwrap();
        let set = rendered(&result);

        assert!(set.contains("S -> A C_1"));
        assert!(set.contains("C_1 -> B C"));
        assert!(set.contains("S -> C C_2"));
        assert!(set.contains("C_2 -> B A"));
    }

    #[test]
    fn already_chomsky_grammar_is_unchanged_up_to_naming() {
        let input = grammar(&["S", "A"], &["a", "b"], vec![
            Production::new("S", vec![v("A"), v("A")]),
            Production::new("A", vec![t("a")]),
            Production::new("S", vec![t("b")]),
        ]);

        let result = convert_terminals_and_binarize(&input, &mut NameGenerator::new()).unwrap();

        assert_eq!(rendered(&result), rendered(&input));
    }
}
