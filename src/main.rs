mod cli;
mod error_handling;
mod grammar;
mod parser;
mod sample;
mod trace;
mod transform;

use std::process::exit;

use clap::Parser;
use rand::thread_rng;

use cli::{Cli, Form};
use grammar::Grammar;
use trace::{Silent, Trace, Transcript};
use transform::TransformError;

fn normalize(grammar: &Grammar, form: Form, trace: &mut impl Trace) -> Result<Grammar, TransformError> {
    match form {
        Form::Cnf => transform::normalize_to_cnf(grammar, trace),
        Form::Gnf => transform::normalize_to_gnf(grammar, trace),
    }
}

fn main() {
    let args = Cli::parse();

    let grammar = match parser::parse_file(&args.file) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error);
            }
            exit(1);
        }
    };

    let form = args.form.unwrap_or(Form::Cnf);
    let result = if args.steps {
        let mut transcript = Transcript::new();
        normalize(&grammar, form, &mut transcript).map(|normalized| {
            for (name, snapshot) in transcript.steps() {
                println!("==== {} ====", name);
                println!("{}\n", snapshot);
            }
            normalized
        })
    } else {
        normalize(&grammar, form, &mut Silent).map(|normalized| {
            println!("{}", normalized);
            normalized
        })
    };
    let normalized = match result {
        Ok(normalized) => normalized,
        Err(error) => {
            eprintln!("{}", error);
            exit(1);
        }
    };

    if let Some(amount) = args.sample {
        let mut rng = thread_rng();
        for _ in 0..amount {
            match sample::derive(&normalized, &mut rng, sample::DEFAULT_BUDGET) {
                Ok(text) => println!("sample: {:?}", text),
                Err(error) => eprintln!("{}", error),
            }
        }
    }
}
