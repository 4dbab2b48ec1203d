/*
    This module parses grammar declaration files
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::PathBuf;

use crate::error_handling::*;
use crate::grammar::*;
use itertools::Itertools;
use lexer::Token;
use verifier::IntermediateGrammar;

#[derive(Debug)]
pub enum CompileErrorType {
    // A production line does not start with `head ->`
    MissingHead,
    // A production line has a second arrow
    UnexpectedArrow,
    // A `-` or `>` that does not form `->`
    MalformedArrow,
    // A production line with no alternatives at all
    MissingBody,
    // A declaration key other than Variables/Alphabet/Start
    UnknownDeclaration(String),
    // A `{` without its `}` (or the other way around)
    UnterminatedSet,
    // A declaration line that does not fit `Key = {...}`
    MalformedDeclaration,
    // A production head that is not a declared variable
    UndeclaredHead(String),
    // A body symbol that is neither a variable nor a terminal
    UndeclaredSymbol(String),
    // A start symbol that is not a declared variable
    UndeclaredStart(String),
    // Epsilon inside a body of length greater than one
    MisplacedEpsilon,
    // Epsilon declared as a variable or terminal name
    EpsilonAsName,
    // A name declared both as a variable and as a terminal
    AmbiguousName(String),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        if let CompileErrorType::FileError(a) = self {
            if let CompileErrorType::FileError(b) = other {
                return a.kind() == b.kind();
            }
        }
        if let (CompileErrorType::UndeclaredSymbol(a), CompileErrorType::UndeclaredSymbol(b)) =
            (self, other)
        {
            return a == b;
        }
        return std::mem::discriminant(self) == std::mem::discriminant(other);
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingHead => write!(f, "Expected a single head symbol before `->`"),
            CompileErrorType::UnexpectedArrow => write!(f, "Unexpected second `->` encountered"),
            CompileErrorType::MalformedArrow => write!(f, "Expected `->`"),
            CompileErrorType::MissingBody => write!(f, "Production has no alternatives"),
            CompileErrorType::UnknownDeclaration(key) => write!(f, "Unknown declaration `{}`", key),
            CompileErrorType::UnterminatedSet => write!(f, "Unbalanced braces in set"),
            CompileErrorType::MalformedDeclaration => write!(f, "Expected `Key = {{names}}`"),
            CompileErrorType::UndeclaredHead(head) => write!(f, "Head `{}` is not a declared variable", head),
            CompileErrorType::UndeclaredSymbol(symbol) => write!(f, "Symbol `{}` is not declared", symbol),
            CompileErrorType::UndeclaredStart(start) => write!(f, "Start symbol `{}` is not a declared variable", start),
            CompileErrorType::MisplacedEpsilon => write!(f, "Epsilon inside a longer body"),
            CompileErrorType::EpsilonAsName => write!(f, "Epsilon cannot be declared as a name"),
            CompileErrorType::AmbiguousName(name) => write!(f, "`{}` is declared both as a variable and a terminal", name),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> CompileError {
    CompileError {
        location: Location::file_only(file),
        error: CompileErrorType::FileError(error),
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

// A production as written in the file, before names are classified into
// variables and terminals. An epsilon body is exactly ["&"].
#[derive(PartialEq, Debug)]
pub struct RawProduction {
    pub head: String,
    pub body: Vec<String>,
    pub location: Location,
}

#[derive(PartialEq, Debug)]
enum Declaration {
    Variables(Vec<String>),
    Alphabet(Vec<String>),
    Start(String),
}

#[derive(PartialEq, Debug)]
enum Line {
    Declaration(Declaration),
    Productions(Vec<RawProduction>),
    // Banners like `Rules:` carry no content
    Ignored,
}

// Reads the names out of `{A, B}` (or a bare `A, B`)
fn parse_set(tokens: &[Token]) -> Result<Vec<String>> {
    let inner = match (tokens.first(), tokens.last()) {
        (Some(Token::OpenBrace), Some(Token::CloseBrace)) => &tokens[1..tokens.len() - 1],
        (Some(Token::OpenBrace), _) | (_, Some(Token::CloseBrace)) => {
            return Err(CompileErrorType::UnterminatedSet)
        }
        _ => tokens,
    };

    inner
        .iter()
        .filter(|t| **t != Token::Comma)
        .map(|t| match t {
            Token::Ident(name) => Ok(name.clone()),
            Token::Epsilon => Ok("&".to_string()),
            Token::OpenBrace | Token::CloseBrace => Err(CompileErrorType::UnterminatedSet),
            _ => Err(CompileErrorType::MalformedDeclaration),
        })
        .collect()
}

fn parse_declaration(tokens: &[Token]) -> Result<Declaration> {
    let key = match tokens.first() {
        Some(Token::Ident(key)) => key,
        _ => return Err(CompileErrorType::MalformedDeclaration),
    };
    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MalformedDeclaration);
    }

    let names = parse_set(&tokens[2..])?;

    match key.to_lowercase().as_str() {
        "variables" => Ok(Declaration::Variables(names)),
        "alphabet" => Ok(Declaration::Alphabet(names)),
        "start" => match names.into_iter().next() {
            Some(name) => Ok(Declaration::Start(name)),
            None => Err(CompileErrorType::MalformedDeclaration),
        },
        _ => Err(CompileErrorType::UnknownDeclaration(key.clone())),
    }
}

// Splits one alternative into its symbols. Heads and declaration names are
// kept whole, but body idents follow the one-character-per-symbol
// convention, so `aAb` is three symbols.
fn alternative_symbols(tokens: &[Token]) -> Result<Vec<String>> {
    let mut symbols = Vec::new();
    for token in tokens {
        match token {
            Token::Ident(text) => symbols.extend(text.chars().map(String::from)),
            Token::Epsilon => symbols.push("&".to_string()),
            Token::Comma => symbols.push(",".to_string()),
            Token::Equals => symbols.push("=".to_string()),
            Token::OpenBrace | Token::CloseBrace => {}
            Token::Pipe | Token::Arrow => return Err(CompileErrorType::UnexpectedArrow),
        }
    }
    Ok(symbols)
}

fn parse_productions(tokens: &[Token], location: &Location) -> Result<Vec<RawProduction>> {
    let head = match tokens.first() {
        Some(Token::Ident(name)) => name.clone(),
        _ => return Err(CompileErrorType::MissingHead),
    };
    if tokens.get(1) != Some(&Token::Arrow) {
        return Err(CompileErrorType::MissingHead);
    }
    if tokens[2..].contains(&Token::Arrow) {
        return Err(CompileErrorType::UnexpectedArrow);
    }

    let productions = tokens[2..]
        .split(|t| *t == Token::Pipe)
        .map(alternative_symbols)
        .filter_ok(|symbols| !symbols.is_empty())
        .map_ok(|body| RawProduction {
            head: head.clone(),
            body,
            location: location.clone(),
        })
        .collect::<Result<Vec<_>>>()?;

    if productions.is_empty() {
        return Err(CompileErrorType::MissingBody);
    }
    Ok(productions)
}

fn parse_line(tokens: &[Token], location: &Location) -> Result<Line> {
    if tokens.contains(&Token::Arrow) {
        return Ok(Line::Productions(parse_productions(tokens, location)?));
    }
    if tokens.contains(&Token::Equals) {
        return Ok(Line::Declaration(parse_declaration(tokens)?));
    }
    Ok(Line::Ignored)
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Line> {
    lexer::lex_line(line)
        .and_then(|tokens| parse_line(&tokens, &location))
        .map_err(|error| CompileError { location, error })
}

fn is_grammar_line(line: &String) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

// Returns an iterator over the lines of a file, with the io errors wrapped
// in CompileError and enumerated
fn file_line_nums<'a>(
    file: File,
    path: &'a PathBuf,
) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    std::io::BufReader::new(file)
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path.clone())))
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_grammar_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

fn classify(name: &str, variables: &[String]) -> Symbol {
    if name == "&" {
        Symbol::Epsilon
    } else if variables.iter().any(|v| v == name) {
        Symbol::Variable(name.to_string())
    } else {
        Symbol::Terminal(name.to_string())
    }
}

// Fills in missing declarations, verifies consistency, and classifies names
fn assemble(
    path: &PathBuf,
    raw_productions: Vec<RawProduction>,
    declared_variables: Option<Vec<String>>,
    declared_alphabet: Option<Vec<String>>,
    declared_start: Option<String>,
) -> FileResult<Grammar> {
    // Inference fallbacks: heads in first-appearance order, then the sorted
    // set of non-variable body symbols, then the first head
    let variables = declared_variables.unwrap_or_else(|| {
        raw_productions
            .iter()
            .map(|p| p.head.clone())
            .unique()
            .collect_vec()
    });
    let variables = variables.into_iter().unique().collect_vec();

    let alphabet = declared_alphabet.unwrap_or_else(|| {
        raw_productions
            .iter()
            .flat_map(|p| &p.body)
            .filter(|s| *s != "&" && !variables.contains(s))
            .unique()
            .cloned()
            .sorted()
            .collect_vec()
    });
    let alphabet = alphabet.into_iter().unique().collect_vec();

    let start = declared_start.unwrap_or_else(|| {
        raw_productions
            .first()
            .map(|p| p.head.clone())
            .unwrap_or_default()
    });

    verifier::verify(&IntermediateGrammar {
        variables: &variables,
        alphabet: &alphabet,
        start: &start,
        productions: &raw_productions,
        file_location: Location::file_only(path.clone()),
    })?;

    let productions = raw_productions
        .into_iter()
        .map(|p| Production {
            body: p.body.iter().map(|s| classify(s, &variables)).collect(),
            head: p.head,
        })
        .collect();

    Ok(Grammar {
        variables,
        alphabet,
        start,
        productions,
    })
}

pub fn parse_file(path: &PathBuf) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.clone())])?;
    let lines = file_line_nums(file, path);

    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| {
            parse_lex_line(&line, Location {
                file: path.clone(),
                line: num,
            })
        })
    });

    let (lines, errors): (Vec<_>, Vec<_>) = parsed_lines.partition(LineResult::is_ok);
    if errors.len() > 0 {
        return Err(errors.into_iter().map(LineResult::unwrap_err).collect_vec());
    }

    let mut raw_productions = Vec::new();
    let mut declared_variables = None;
    let mut declared_alphabet = None;
    let mut declared_start = None;
    for line in lines.into_iter().map(LineResult::unwrap) {
        match line {
            Line::Productions(productions) => raw_productions.extend(productions),
            Line::Declaration(Declaration::Variables(names)) => declared_variables = Some(names),
            Line::Declaration(Declaration::Alphabet(names)) => declared_alphabet = Some(names),
            Line::Declaration(Declaration::Start(name)) => declared_start = Some(name),
            Line::Ignored => {}
        }
    }

    return assemble(path, raw_productions, declared_variables, declared_alphabet, declared_start);
}
