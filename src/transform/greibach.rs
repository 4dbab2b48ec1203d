/*
    Greibach construction: renaming, ordered elimination, terminal-leading
    closure.

    Known limitation carried over from the system this reimplements: the
    final pass strips helper epsilon baselines (Z -> &) for every head except
    the start symbol. A grammar whose empty string was lost earlier in the
    pipeline is not recovered here.
*/

use std::collections::{HashMap, HashSet};

use crate::grammar::{dedup_productions, Grammar, Production, Symbol};
use super::names::{claim_variable, NameGenerator};
use super::TransformError;

// Renames variables to A1..An with A1 fixed to the start symbol; the rest
// keep their declaration order
pub fn rename_variables(grammar: &Grammar) -> Grammar {
    let mut ordered = vec![grammar.start.clone()];
    ordered.extend(
        grammar
            .variables
            .iter()
            .filter(|v| **v != grammar.start)
            .cloned(),
    );

    let mapping: HashMap<String, String> = ordered
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), format!("A{}", i + 1)))
        .collect();
    let renamed = |name: &String| mapping.get(name).cloned().unwrap_or_else(|| name.clone());

    let productions = grammar
        .productions
        .iter()
        .map(|p| Production {
            head: renamed(&p.head),
            body: p
                .body
                .iter()
                .map(|s| match s {
                    Symbol::Variable(v) => Symbol::Variable(renamed(v)),
                    other => other.clone(),
                })
                .collect(),
        })
        .collect();

    Grammar {
        variables: (1..=ordered.len()).map(|i| format!("A{}", i)).collect(),
        alphabet: grammar.alphabet.clone(),
        start: "A1".to_string(),
        productions,
    }
}

// Inlines a replacement body at the front of a production; an epsilon body
// contributes only the tail
fn splice(replacement: &[Symbol], tail: &[Symbol]) -> Vec<Symbol> {
    if replacement == [Symbol::Epsilon] {
        if tail.is_empty() {
            return vec![Symbol::Epsilon];
        }
        return tail.to_vec();
    }
    let mut body = replacement.to_vec();
    body.extend(tail.iter().cloned());
    body
}

// Replaces every production of `target` whose body begins with `lower` by
// the Cartesian expansion over `lower`'s current bodies
pub fn substitute_leading(
    productions: &[Production],
    target: &str,
    lower: &str,
) -> Vec<Production> {
    let lower_bodies: Vec<&Vec<Symbol>> = productions
        .iter()
        .filter(|p| p.head == lower)
        .map(|p| &p.body)
        .collect();

    let mut result = Vec::new();
    for p in productions {
        let leads_with_lower =
            p.head == target && p.body.first() == Some(&Symbol::Variable(lower.to_string()));
        if !leads_with_lower {
            result.push(p.clone());
            continue;
        }
        for body in &lower_bodies {
            result.push(Production::new(target, splice(body, &p.body[1..])));
        }
    }

    dedup_productions(result)
}

// Eliminates immediate left recursion on one variable, minting at most one
// fresh Z helper. Returns the rewritten productions and the helper, if any.
pub fn eliminate_immediate_left_recursion(
    productions: &[Production],
    variable: &str,
    names: &mut NameGenerator,
    taken: &[String],
) -> (Vec<Production>, Option<String>) {
    let recursive = |p: &Production| {
        p.head == variable && p.body.first() == Some(&Symbol::Variable(variable.to_string()))
    };

    let alphas: Vec<Vec<Symbol>> = productions
        .iter()
        .filter(|p| recursive(p))
        .map(|p| p.body[1..].to_vec())
        .collect();
    if alphas.is_empty() {
        return (productions.to_vec(), None);
    }
    let betas: Vec<Vec<Symbol>> = productions
        .iter()
        .filter(|p| p.head == variable && !recursive(p))
        .map(|p| p.body.clone())
        .collect();

    let helper = names.fresh("Z", taken);

    let mut result: Vec<Production> = productions
        .iter()
        .filter(|p| p.head != variable)
        .cloned()
        .collect();
    for beta in betas {
        if beta == [Symbol::Epsilon] {
            result.push(Production::new(variable, vec![Symbol::Variable(helper.clone())]));
        } else {
            let mut body = beta;
            body.push(Symbol::Variable(helper.clone()));
            result.push(Production::new(variable, body));
        }
    }
    for alpha in alphas {
        let mut body = alpha;
        body.push(Symbol::Variable(helper.clone()));
        result.push(Production::new(&helper, body));
    }
    result.push(Production::new(&helper, vec![Symbol::Epsilon]));

    (dedup_productions(result), Some(helper))
}

// The classical i = 1..n loop over the renamed roster. Helpers join the
// roster directly after their parent and are processed by later iterations;
// mutual left recursion must already have been flattened into immediate
// recursion by the time step 2 runs, which is why the order is strict.
pub fn eliminate_ordered(
    grammar: &Grammar,
    names: &mut NameGenerator,
) -> Result<Grammar, TransformError> {
    let mut roster = grammar.variables.clone();
    let mut productions = grammar.productions.clone();

    let mut i = 0;
    while i < roster.len() {
        let current = roster[i].clone();
        for j in 0..i {
            let lower = roster[j].clone();
            productions = substitute_leading(&productions, &current, &lower);
        }

        let (rewritten, helper) =
            eliminate_immediate_left_recursion(&productions, &current, names, &roster);
        productions = rewritten;
        if let Some(name) = helper {
            claim_variable(&mut roster, i + 1, name)?;
        }

        i += 1;
    }

    Ok(Grammar {
        variables: roster,
        alphabet: grammar.alphabet.clone(),
        start: grammar.start.clone(),
        productions,
    })
}

// Sweeps the roster from the highest index down, repeatedly: every variable
// whose bodies all begin with a terminal (or are epsilon) is inlined into
// every body that leads with it. A variable with zero bodies inlines as zero
// replacements, dropping its dependents. Epsilon bodies are then stripped
// everywhere except on the start symbol.
pub fn terminal_leading_closure(grammar: &Grammar) -> Grammar {
    let roster = grammar.variables.clone();
    let mut bodies: HashMap<String, Vec<Vec<Symbol>>> =
        roster.iter().map(|v| (v.clone(), Vec::new())).collect();
    for p in &grammar.productions {
        bodies.entry(p.head.clone()).or_default().push(p.body.clone());
    }

    let mut changed = true;
    while changed {
        changed = false;
        for i in (0..roster.len()).rev() {
            let source = &roster[i];
            let ready = bodies[source].iter().all(|b| {
                matches!(b.first(), Some(Symbol::Terminal(_))) || b.as_slice() == [Symbol::Epsilon]
            });
            if !ready {
                continue;
            }
            let replacements = bodies[source].clone();
            let leading = Symbol::Variable(source.clone());

            for other in &roster {
                if other == source {
                    continue;
                }
                let current = &bodies[other];
                if !current.iter().any(|b| b.first() == Some(&leading)) {
                    continue;
                }

                let mut rewritten = Vec::new();
                for body in current {
                    if body.first() == Some(&leading) {
                        for replacement in &replacements {
                            rewritten.push(splice(replacement, &body[1..]));
                        }
                    } else {
                        rewritten.push(body.clone());
                    }
                }
                let mut seen = HashSet::new();
                rewritten.retain(|b| seen.insert(b.clone()));
                bodies.insert(other.clone(), rewritten);
                changed = true;
            }
        }
    }

    let mut productions = Vec::new();
    for variable in &roster {
        for body in &bodies[variable] {
            if body.as_slice() == [Symbol::Epsilon] && variable != &grammar.start {
                continue;
            }
            productions.push(Production::new(variable, body.clone()));
        }
    }
    let productions = dedup_productions(productions);

    let variables: Vec<String> = roster
        .into_iter()
        .filter(|v| v == &grammar.start || productions.iter().any(|p| &p.head == v))
        .collect();

    Grammar {
        variables,
        alphabet: grammar.alphabet.clone(),
        start: grammar.start.clone(),
        productions,
    }
}
