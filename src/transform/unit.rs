/*
    Unit-production elimination
*/

use std::collections::{HashMap, HashSet, VecDeque};

use crate::grammar::{dedup_productions, Grammar, Production, Symbol};

// Variables reachable from each variable over unit edges, including the
// variable itself, in BFS discovery order. The visited set makes unit
// cycles terminate.
fn unit_reachability(grammar: &Grammar) -> HashMap<String, Vec<String>> {
    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    for p in &grammar.productions {
        if !p.is_unit() {
            continue;
        }
        if let Symbol::Variable(target) = &p.body[0] {
            let targets = edges.entry(p.head.as_str()).or_default();
            if !targets.contains(&target.as_str()) {
                targets.push(target.as_str());
            }
        }
    }

    let mut reach = HashMap::new();
    for variable in &grammar.variables {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(variable.as_str());
        queue.push_back(variable.as_str());
        while let Some(current) = queue.pop_front() {
            order.push(current.to_string());
            for &target in edges.get(current).into_iter().flatten() {
                if visited.insert(target) {
                    queue.push_back(target);
                }
            }
        }

        reach.insert(variable.clone(), order);
    }

    reach
}

// Replaces every A -> B by copies of B's non-unit productions under head A,
// for every B unit-reachable from A
pub fn remove_unit_productions(grammar: &Grammar) -> Grammar {
    let reach = unit_reachability(grammar);
    let non_unit: Vec<&Production> = grammar
        .productions
        .iter()
        .filter(|p| !p.is_unit())
        .collect();

    let mut rewritten = Vec::new();
    for variable in &grammar.variables {
        for target in &reach[variable] {
            for p in non_unit.iter().filter(|p| &p.head == target) {
                rewritten.push(Production::new(variable, p.body.clone()));
            }
        }
    }

    Grammar {
        variables: grammar.variables.clone(),
        alphabet: grammar.alphabet.clone(),
        start: grammar.start.clone(),
        productions: dedup_productions(rewritten),
    }
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

    #[test]
    fn resolves_unit_chain() {
        let input = grammar(&["S", "A", "B"], &["b"], vec![
            Production::new("S", vec![v("A")]),
            Production::new("A", vec![v("B")]),
            Production::new("B", vec![t("b")]),
        ]);

        let result = rendered(&remove_unit_productions(&input));

        assert!(result.contains("S -> b"));
        assert!(result.contains("A -> b"));
        assert!(result.contains("B -> b"));
        assert!(!result.contains("S -> A"));
        assert!(!result.contains("A -> B"));
    }

    #[test]
    fn terminates_on_unit_cycle() {
        let input = grammar(&["S", "A", "B", "C"], &["a"], vec![
            Production::new("S", vec![v("A")]),
            Production::new("A", vec![v("B")]),
            Production::new("B", vec![v("C")]),
            Production::new("C", vec![v("A")]),
            Production::new("A", vec![t("a")]),
        ]);

        let result = remove_unit_productions(&input);
        let set = rendered(&result);

        assert!(set.contains("S -> a"));
        assert!(set.contains("A -> a"));
        assert!(set.contains("B -> a"));
        assert!(set.contains("C -> a"));
        assert!(result.productions.iter().all(|p| !p.is_unit()));
    }

    #[test]
    fn keeps_non_unit_bodies_intact() {
        let input = grammar(&["S", "A"], &["a", "b"], vec![
            Production::new("S", vec![v("A")]),
            Production::new("A", vec![t("a"), v("A"), t("b")]),
            Production::new("A", vec![t("a")]),
        ]);

        let result = rendered(&remove_unit_productions(&input));

        assert!(result.contains("S -> a A b"));
        assert!(result.contains("A -> a A b"));
        assert!(result.contains("S -> a"));
    }
}
