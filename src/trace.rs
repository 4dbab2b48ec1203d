/*
    This module records named grammar snapshots as the pipeline runs
*/

use crate::grammar::Grammar;

// Write-only sink for per-phase snapshots. Recording happens strictly after
// a phase completes and never feeds back into the transformation.
pub trait Trace {
    fn record(&mut self, name: &str, grammar: &Grammar);
}

// Keeps every snapshot in pipeline order
pub struct Transcript {
    steps: Vec<(String, Grammar)>,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript { steps: Vec::new() }
    }

    pub fn steps(&self) -> &[(String, Grammar)] {
        &self.steps
    }
}

impl Trace for Transcript {
    fn record(&mut self, name: &str, grammar: &Grammar) {
        self.steps.push((name.to_string(), grammar.clone()));
    }
}

// Discards everything
pub struct Silent;

impl Trace for Silent {
    fn record(&mut self, _name: &str, _grammar: &Grammar) {}
}
