//! Tokenizer for CQL query strings.

use std::iter::Peekable;
use std::str::CharIndices;

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    LParen,
    RParen,
    Slash,
    /// One of `=`, `==`, `<>`, `<`, `>`, `<=`, `>=`.
    Comparitor(String),
    /// An unquoted character sequence.
    Word(String),
    /// A double-quoted string with `\"` and `\\` resolved.
    Quoted(String),
}

impl Token {
    /// Returns the token text when it can act as a search term.
    pub(crate) fn as_term(&self) -> Option<&str> {
        match self {
            Self::Word(text) | Self::Quoted(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the word text if the token is an unquoted word.
    pub(crate) fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(text) => Some(text),
            _ => None,
        }
    }
}

/// Splits `input` into tokens.
///
/// Returns a message describing the first lexical error.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut chars = input.char_indices().peekable();
    let mut tokens = Vec::new();
    while let Some(&(offset, c)) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '=' | '<' | '>' => tokens.push(Token::Comparitor(comparitor(&mut chars))),
            '"' => {
                chars.next();
                tokens.push(Token::Quoted(quoted(&mut chars, offset)?));
            }
            _ => tokens.push(Token::Word(word(&mut chars))),
        }
    }
    Ok(tokens)
}

fn comparitor(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut text = String::new();
    if let Some((_, first)) = chars.next() {
        text.push(first);
        let pair = matches!(
            (first, chars.peek().map(|&(_, next)| next)),
            ('=', Some('=')) | ('<', Some('=' | '>')) | ('>', Some('='))
        );
        if pair {
            if let Some((_, second)) = chars.next() {
                text.push(second);
            }
        }
    }
    text
}

fn quoted(chars: &mut Peekable<CharIndices<'_>>, start: usize) -> Result<String, String> {
    let mut text = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '"' => return Ok(text),
            '\\' => match chars.next() {
                Some((_, escaped @ ('"' | '\\'))) => text.push(escaped),
                Some((_, other)) => {
                    text.push('\\');
                    text.push(other);
                }
                None => text.push('\\'),
            },
            _ => text.push(c),
        }
    }
    Err(format!("unterminated quoted string starting at offset {start}"))
}

fn word(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut text = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_whitespace() || matches!(c, '(' | ')' | '/' | '=' | '<' | '>' | '"') {
            break;
        }
        text.push(c);
        chars.next();
    }
    text
}
