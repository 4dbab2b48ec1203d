use crate::error_handling::Location;
use super::{CompileError, CompileErrorType, CompileErrors, FileResult, RawProduction};

// The declarations and raw productions as collected from the file, before
// names are classified
pub struct IntermediateGrammar<'a> {
    pub variables: &'a [String],
    pub alphabet: &'a [String],
    pub start: &'a str,
    pub productions: &'a [RawProduction],
    pub file_location: Location,
}

fn declared(grammar: &IntermediateGrammar, name: &str) -> bool {
    grammar.variables.iter().any(|v| v == name) || grammar.alphabet.iter().any(|t| t == name)
}

fn get_declaration_errors(grammar: &IntermediateGrammar) -> CompileErrors {
    // Epsilon used as a declared name, then names declared on both sides
    let epsilon_names = grammar
        .variables
        .iter()
        .chain(grammar.alphabet)
        .filter(|name| *name == "&" || *name == "ε")
        .map(|_| CompileError {
            location: grammar.file_location.clone(),
            error: CompileErrorType::EpsilonAsName,
        });

    let ambiguous_names = grammar
        .variables
        .iter()
        .filter(|name| grammar.alphabet.contains(name))
        .map(|name| CompileError {
            location: grammar.file_location.clone(),
            error: CompileErrorType::AmbiguousName(name.clone()),
        });

    epsilon_names.chain(ambiguous_names).collect()
}

fn get_start_errors(grammar: &IntermediateGrammar) -> CompileErrors {
    if grammar.variables.iter().any(|v| v == grammar.start) {
        return Vec::new();
    }
    vec![CompileError {
        location: grammar.file_location.clone(),
        error: CompileErrorType::UndeclaredStart(grammar.start.to_string()),
    }]
}

fn get_production_errors(production: &RawProduction, grammar: &IntermediateGrammar) -> CompileErrors {
    let head_errors = (!grammar.variables.contains(&production.head))
        .then(|| CompileErrorType::UndeclaredHead(production.head.clone()));

    let symbol_errors = production
        .body
        .iter()
        .filter(|symbol| *symbol != "&" && !declared(grammar, symbol))
        .map(|symbol| CompileErrorType::UndeclaredSymbol(symbol.clone()));

    let epsilon_errors = (production.body.len() > 1
        && production.body.iter().any(|symbol| symbol == "&"))
    .then(|| CompileErrorType::MisplacedEpsilon);

    head_errors
        .into_iter()
        .chain(symbol_errors)
        .chain(epsilon_errors)
        .map(|error| CompileError {
            location: production.location.clone(),
            error,
        })
        .collect()
}

pub fn verify(grammar: &IntermediateGrammar) -> FileResult<()> {
    let mut errors = get_declaration_errors(grammar);
    errors.extend(get_start_errors(grammar));
    errors.extend(
        grammar
            .productions
            .iter()
            .flat_map(|production| get_production_errors(production, grammar)),
    );

    if errors.len() > 0 {
        Err(errors)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn raw(head: &str, body: &[&str], line: usize) -> RawProduction {
        RawProduction {
            head: head.to_string(),
            body: names(body),
            location: Location {
                file: PathBuf::new(),
                line,
            },
        }
    }

    fn kinds(errors: CompileErrors) -> Vec<CompileErrorType> {
        errors.into_iter().map(|e| e.error).collect()
    }

    #[test]
    fn accepts_consistent_grammar() {
        let variables = names(&["S", "A"]);
        let alphabet = names(&["a"]);
        let productions = vec![raw("S", &["a", "A"], 1), raw("A", &["&"], 2)];

        let result = verify(&IntermediateGrammar {
            variables: &variables,
            alphabet: &alphabet,
            start: "S",
            productions: &productions,
            file_location: Location::file_only(PathBuf::new()),
        });

        assert!(result.is_ok());
    }

    #[test]
    fn flags_misplaced_epsilon() {
        let variables = names(&["S"]);
        let alphabet = names(&["a"]);
        let productions = vec![raw("S", &["a", "&"], 3)];

        let errors = verify(&IntermediateGrammar {
            variables: &variables,
            alphabet: &alphabet,
            start: "S",
            productions: &productions,
            file_location: Location::file_only(PathBuf::new()),
        })
        .unwrap_err();

        assert_eq!(errors[0].location.line, 3);
        assert_eq!(kinds(errors), vec![CompileErrorType::MisplacedEpsilon]);
    }

    #[test]
    fn flags_every_problem_at_once() {
        let variables = names(&["S", "a"]);
        let alphabet = names(&["a"]);
        let productions = vec![raw("B", &["x"], 2)];

        let errors = verify(&IntermediateGrammar {
            variables: &variables,
            alphabet: &alphabet,
            start: "T",
            productions: &productions,
            file_location: Location::file_only(PathBuf::new()),
        })
        .unwrap_err();

        assert_eq!(kinds(errors), vec![
            CompileErrorType::AmbiguousName("a".to_string()),
            CompileErrorType::UndeclaredStart("T".to_string()),
            CompileErrorType::UndeclaredHead("B".to_string()),
            CompileErrorType::UndeclaredSymbol("x".to_string()),
        ]);
    }

    #[test]
    fn flags_epsilon_declared_as_name() {
        let variables = names(&["S"]);
        let alphabet = names(&["&"]);
        let productions = vec![raw("S", &["&"], 1)];

        let errors = verify(&IntermediateGrammar {
            variables: &variables,
            alphabet: &alphabet,
            start: "S",
            productions: &productions,
            file_location: Location::file_only(PathBuf::new()),
        })
        .unwrap_err();

        assert_eq!(kinds(errors), vec![CompileErrorType::EpsilonAsName]);
    }
}
