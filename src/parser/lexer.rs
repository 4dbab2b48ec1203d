use itertools::{Itertools, PeekingNext};

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Arrow,
    Pipe,
    Equals,
    OpenBrace,
    CloseBrace,
    Comma,
    Epsilon,
    Ident(String),
}

fn is_special(c: char) -> bool {
    matches!(c, '=' | '|' | '{' | '}' | ',' | '-' | '>' | '&' | 'ε') || c.is_whitespace()
}

pub fn lex_arrow(line: &mut impl Iterator<Item = char>) -> Result<Token> {
    line.next(); // Consume the dash
    if line.next() != Some('>') {
        return Err(CompileErrorType::MalformedArrow);
    }
    Ok(Token::Arrow)
}

pub fn lex_ident(line: &mut impl PeekingNext<Item = char>) -> Token {
    Token::Ident(line.peeking_take_while(|&c| !is_special(c)).collect())
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == '-' || *c == '>' {
            tokens.push(lex_arrow(&mut line_chars)?);
        } else if *c == '=' {
            line_chars.next();
            tokens.push(Token::Equals);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Pipe);
        } else if *c == '{' {
            line_chars.next();
            tokens.push(Token::OpenBrace);
        } else if *c == '}' {
            line_chars.next();
            tokens.push(Token::CloseBrace);
        } else if *c == ',' {
            line_chars.next();
            tokens.push(Token::Comma);
        } else if *c == '&' || *c == 'ε' {
            line_chars.next();
            tokens.push(Token::Epsilon);
        } else if !c.is_whitespace() {
            tokens.push(lex_ident(&mut line_chars));
        } else {
            line_chars.next();
        }
    }

    return Ok(tokens);
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn lex_normal_ident() {
        let lines = vec![
            "alpha bravo charlie",
            "S2 -> a",
            "T_1,rest"
        ];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (Token::Ident("alpha".to_string()), " bravo charlie"),
            (Token::Ident("S2".to_string()), " -> a"),
            (Token::Ident("T_1".to_string()), ",rest")
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_ident(&mut chars), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_broken_arrow() {
        let lines = vec![
            "- b",
            "-",
            "> x"
        ];

        for line in lines {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_arrow(&mut chars).unwrap_err(), CompileErrorType::MalformedArrow);
        }
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "S -> aA | b | &",
            "Variables = {S, A}",
            "Inicial -> ε"
        ];
        let answers = vec![
            vec![
                Token::Ident("S".to_string()),
                Token::Arrow,
                Token::Ident("aA".to_string()),
                Token::Pipe,
                Token::Ident("b".to_string()),
                Token::Pipe,
                Token::Epsilon
            ],
            vec![
                Token::Ident("Variables".to_string()),
                Token::Equals,
                Token::OpenBrace,
                Token::Ident("S".to_string()),
                Token::Comma,
                Token::Ident("A".to_string()),
                Token::CloseBrace
            ],
            vec![
                Token::Ident("Inicial".to_string()),
                Token::Arrow,
                Token::Epsilon
            ]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line).unwrap(), answer)
        }
    }
}
