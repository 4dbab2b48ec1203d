/*
    Fresh helper-variable names, one counter per prefix
*/

use std::collections::HashMap;

use super::TransformError;

// Synthesizes helper names like T_1, C_1, Z1. Each prefix advances its own
// counter, so terminal-isolation, binarization, and left-recursion helpers
// number independently within one pipeline run.
pub struct NameGenerator {
    counters: HashMap<String, u32>,
}

impl NameGenerator {
    pub fn new() -> Self {
        NameGenerator {
            counters: HashMap::new(),
        }
    }

    // Returns the next name for the prefix that is not already taken
    pub fn fresh(&mut self, prefix: &str, taken: &[String]) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let name = format!("{}{}", prefix, counter);
            if !taken.iter().any(|existing| existing == &name) {
                return name;
            }
        }
    }
}

// Registers a helper in the variable list at the given index. A collision
// here means the fresh-name bookkeeping is broken, which is fatal.
pub fn claim_variable(
    variables: &mut Vec<String>,
    index: usize,
    name: String,
) -> Result<(), TransformError> {
    if variables.contains(&name) {
        return Err(TransformError::NamingInvariantViolation(name));
    }
    variables.insert(index, name);
    Ok(())
}
