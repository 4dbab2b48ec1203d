/*
    Epsilon-production elimination
*/

use itertools::Itertools;

use crate::grammar::{dedup_productions, Production, Symbol};

// Computes the nullable closure: heads of epsilon productions, plus any
// variable whose entire body is already nullable
fn nullable_variables(productions: &[Production]) -> Vec<String> {
    let mut nullable: Vec<String> = Vec::new();
    for p in productions {
        if p.is_epsilon() && !nullable.contains(&p.head) {
            nullable.push(p.head.clone());
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for p in productions {
            if nullable.contains(&p.head) {
                continue;
            }
            let all_nullable = p
                .body
                .iter()
                .all(|s| matches!(s, Symbol::Variable(v) if nullable.contains(v)));
            if all_nullable {
                nullable.push(p.head.clone());
                changed = true;
            }
        }
    }

    nullable
}

// Rewrites the production set so no epsilon production remains. Every subset
// of nullable occurrence positions in a body (by index, since the same
// nullable variable may occur more than once) yields one derived production
// with those positions removed. Originals are kept verbatim, epsilon bodies
// are dropped at the end, and duplicates collapse.
//
// Note the start symbol gets no special treatment: if the original language
// contained the empty string, the rewritten grammar loses it.
pub fn remove_epsilon_productions(productions: &[Production]) -> Vec<Production> {
    let nullable = nullable_variables(productions);

    let mut result: Vec<Production> = productions
        .iter()
        .filter(|p| !p.is_epsilon())
        .cloned()
        .collect();

    for p in productions.iter().filter(|p| !p.is_epsilon()) {
        let positions: Vec<usize> = p
            .body
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Symbol::Variable(v) if nullable.contains(v)))
            .map(|(i, _)| i)
            .collect();

        for size in 1..=positions.len() {
            for subset in positions.iter().copied().combinations(size) {
                let body: Vec<Symbol> = p
                    .body
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !subset.contains(i))
                    .map(|(_, s)| s.clone())
                    .collect();

                if body.is_empty() {
                    result.push(Production::new(&p.head, vec![Symbol::Epsilon]));
                } else {
                    result.push(Production::new(&p.head, body));
                }
            }
        }
    }

    dedup_productions(result.into_iter().filter(|p| !p.is_epsilon()).collect())
}
