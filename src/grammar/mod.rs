/*
    This module is for storing and manipulating context-free grammars
*/

use std::collections::HashSet;
use std::fmt::Display;

// The base unit in a production body. A name is classified as a variable or
// a terminal by grammar membership when the grammar is assembled; Epsilon is
// the universal empty-string sentinel.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Symbol {
    Variable(String),
    Terminal(String),
    Epsilon,
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Variable(name) => write!(f, "{}", name),
            Symbol::Terminal(name) => write!(f, "{}", name),
            Symbol::Epsilon => write!(f, "&"),
        }
    }
}

// A single rewrite rule. The body is either exactly [Epsilon] or a non-empty
// sequence containing no Epsilon.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Production {
    pub head: String,
    pub body: Vec<Symbol>,
}

impl Production {
    pub fn new(head: &str, body: Vec<Symbol>) -> Self {
        Production {
            head: head.to_string(),
            body,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.body == [Symbol::Epsilon]
    }

    pub fn is_unit(&self) -> bool {
        self.body.len() == 1 && matches!(self.body[0], Symbol::Variable(_))
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ->", self.head)?;
        for symbol in &self.body {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    pub variables: Vec<String>,
    pub alphabet: Vec<String>,
    pub start: String,
    pub productions: Vec<Production>,
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Start: {}", self.start)?;
        writeln!(f, "Variables: {{{}}}", self.variables.join(", "))?;
        writeln!(f, "Alphabet: {{{}}}", self.alphabet.join(", "))?;
        write!(f, "Productions:")?;
        for production in &self.productions {
            write!(f, "\n  {}", production)?;
        }
        Ok(())
    }
}

// Collapses structurally equal (head, body) pairs, keeping the first
// occurrence so production order stays insertion-stable
pub fn dedup_productions(productions: Vec<Production>) -> Vec<Production> {
    let mut seen = HashSet::new();
    productions
        .into_iter()
        .filter(|p| seen.insert((p.head.clone(), p.body.clone())))
        .collect()
}
