use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, PartialEq, Debug, ValueEnum)]
pub enum Form {
    Cnf,
    Gnf,
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Target normal form (default: cnf)
    #[arg(short, long, value_enum)]
    pub form: Option<Form>,

    /// Print every intermediate grammar, not just the result
    #[arg(long)]
    pub steps: bool,

    /// Amount of sample derivations to print (default: none)
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub sample: Option<u32>,
}
