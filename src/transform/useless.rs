/*
    Useless-symbol elimination
*/

use std::collections::HashSet;

use crate::grammar::{Grammar, Production, Symbol};

fn body_generating(body: &[Symbol], alphabet: &[String], generating: &HashSet<String>) -> bool {
    body.iter().all(|s| match s {
        Symbol::Terminal(t) => alphabet.iter().any(|a| a == t),
        Symbol::Variable(v) => generating.contains(v),
        Symbol::Epsilon => true,
    })
}

// Two-stage pruning: first drop variables that cannot derive any terminal
// string, then drop everything unreachable from the start symbol. A start
// symbol that generates nothing leaves a grammar with no productions, which
// is the empty language and a valid outcome.
pub fn remove_useless_symbols(grammar: &Grammar) -> Grammar {
    // Stage 1: terminal-generating closure
    let mut generating: HashSet<String> = HashSet::new();
    let mut changed = true;
    while changed {
        changed = false;
        for p in &grammar.productions {
            if generating.contains(&p.head) {
                continue;
            }
            if body_generating(&p.body, &grammar.alphabet, &generating) {
                generating.insert(p.head.clone());
                changed = true;
            }
        }
    }

    let stage1: Vec<&Production> = grammar
        .productions
        .iter()
        .filter(|p| {
            generating.contains(&p.head)
                && body_generating(&p.body, &grammar.alphabet, &generating)
        })
        .collect();

    // Stage 2: start-reachability closure over the surviving productions
    let mut reachable: HashSet<String> = HashSet::new();
    reachable.insert(grammar.start.clone());
    changed = true;
    while changed {
        changed = false;
        for p in &stage1 {
            if !reachable.contains(&p.head) {
                continue;
            }
            for s in &p.body {
                if let Symbol::Variable(v) = s {
                    if reachable.insert(v.clone()) {
                        changed = true;
                    }
                }
            }
        }
    }

    let mut productions = Vec::new();
    let mut variables = HashSet::new();
    let mut terminals = HashSet::new();
    for p in stage1 {
        if !reachable.contains(&p.head) {
            continue;
        }
        productions.push(p.clone());
        variables.insert(p.head.clone());
        for s in &p.body {
            match s {
                Symbol::Variable(v) => {
                    if reachable.contains(v) {
                        variables.insert(v.clone());
                    }
                }
                Symbol::Terminal(t) => {
                    terminals.insert(t.clone());
                }
                Symbol::Epsilon => {}
            }
        }
    }

    // The start symbol stays declared even when the language is empty
    variables.insert(grammar.start.clone());

    let mut variables: Vec<String> = variables.into_iter().collect();
    variables.sort();
    let mut alphabet: Vec<String> = terminals.into_iter().collect();
    alphabet.sort();

    Grammar {
        variables,
        alphabet,
        start: grammar.start.clone(),
        productions,
    }
}
