//! Recursive-descent CQL parser.

use super::ast::{
    BooleanOperator, CqlNode, CqlQuery, Modifier, PrefixAssignment, Relation, SearchClause,
    SortKey,
};
use super::lexer::{Token, tokenize};

/// Reasons a query string is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CqlSyntax {
    /// The query is malformed.
    Invalid(String),
    /// The query uses a construct this parser does not accept.
    Unsupported(String),
}

type ParseResult<T> = Result<T, CqlSyntax>;

/// Deepest parenthesis nesting accepted.
pub(crate) const MAX_NESTING: usize = 64;

/// Most boolean operators accepted in one query.
///
/// The boolean tree is left-deep, so this also bounds the recursion of its
/// drop and of XCQL serialization.
pub(crate) const MAX_BOOLEAN_OPERATORS: usize = 256;

/// Parses a complete query string.
pub(crate) fn parse_cql(input: &str) -> ParseResult<CqlQuery> {
    let tokens = tokenize(input).map_err(CqlSyntax::Invalid)?;
    let mut cursor = Cursor {
        tokens,
        position: 0,
        depth: 0,
        operators: 0,
    };
    let prefixes = cursor.prefix_assignments()?;
    let root = cursor.scoped_clause()?;
    let sort_keys = cursor.sort_spec()?;
    match cursor.peek() {
        None => Ok(CqlQuery {
            prefixes,
            root,
            sort_keys,
        }),
        Some(token) => Err(CqlSyntax::Invalid(format!(
            "unexpected {} after end of query",
            describe(token)
        ))),
    }
}

struct Cursor {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    operators: usize,
}

impl Cursor {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_second(&self) -> Option<&Token> {
        self.tokens.get(self.position.saturating_add(1))
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position = self.position.saturating_add(1);
        }
        token
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .and_then(Token::as_word)
            .is_some_and(|word| word.eq_ignore_ascii_case(keyword))
    }

    fn prefix_assignments(&mut self) -> ParseResult<Vec<PrefixAssignment>> {
        let mut prefixes = Vec::new();
        while matches!(self.peek(), Some(Token::Comparitor(symbol)) if symbol == ">") {
            self.advance();
            let first = self.term("prefix assignment")?;
            if matches!(self.peek(), Some(Token::Comparitor(symbol)) if symbol == "=") {
                self.advance();
                let identifier = self.term("prefix identifier")?;
                prefixes.push(PrefixAssignment {
                    name: Some(first),
                    identifier,
                });
            } else {
                prefixes.push(PrefixAssignment {
                    name: None,
                    identifier: first,
                });
            }
        }
        Ok(prefixes)
    }

    fn scoped_clause(&mut self) -> ParseResult<CqlNode> {
        let mut left = self.search_clause()?;
        while let Some(operator) = self
            .peek()
            .and_then(Token::as_word)
            .and_then(BooleanOperator::from_keyword)
        {
            self.operators = self.operators.saturating_add(1);
            if self.operators > MAX_BOOLEAN_OPERATORS {
                return Err(CqlSyntax::Unsupported(format!(
                    "more than {MAX_BOOLEAN_OPERATORS} boolean operators"
                )));
            }
            self.advance();
            let modifiers = self.modifiers()?;
            let right = self.search_clause()?;
            left = CqlNode::Boolean {
                operator,
                modifiers,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn search_clause(&mut self) -> ParseResult<CqlNode> {
        if self.peek() == Some(&Token::LParen) {
            if self.depth >= MAX_NESTING {
                return Err(CqlSyntax::Unsupported("query nesting too deep".to_owned()));
            }
            self.advance();
            if matches!(self.peek(), Some(Token::Comparitor(symbol)) if symbol == ">") {
                return Err(CqlSyntax::Unsupported(
                    "prefix assignments inside parentheses".to_owned(),
                ));
            }
            self.depth = self.depth.saturating_add(1);
            let inner = self.scoped_clause()?;
            self.depth = self.depth.saturating_sub(1);
            return match self.advance() {
                Some(Token::RParen) => Ok(inner),
                Some(token) => Err(CqlSyntax::Invalid(format!(
                    "expected ')' but found {}",
                    describe(&token)
                ))),
                None => Err(CqlSyntax::Invalid("missing ')'".to_owned())),
            };
        }

        let first = self.term("search term")?;
        if !self.relation_follows() {
            return Ok(CqlNode::Clause(SearchClause::bare(first)));
        }
        let base = match self.advance() {
            Some(Token::Comparitor(symbol)) => symbol,
            Some(Token::Word(name)) => name,
            _ => return Err(CqlSyntax::Invalid("expected a relation".to_owned())),
        };
        let modifiers = self.modifiers()?;
        let term = self.term("search term")?;
        Ok(CqlNode::Clause(SearchClause {
            index: first,
            relation: Relation { base, modifiers },
            term,
        }))
    }

    /// After a term, a comparitor or a word that is neither a boolean nor
    /// `sortBy` introduces a relation.
    fn relation_follows(&self) -> bool {
        match self.peek() {
            Some(Token::Comparitor(_)) => true,
            Some(Token::Word(word)) => {
                BooleanOperator::from_keyword(word).is_none()
                    && !word.eq_ignore_ascii_case("sortby")
                    && self.peek_second().is_some()
            }
            _ => false,
        }
    }

    fn term(&mut self, context: &str) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Word(text) | Token::Quoted(text)) => Ok(text),
            Some(token) => Err(CqlSyntax::Invalid(format!(
                "expected {context} but found {}",
                describe(&token)
            ))),
            None => Err(CqlSyntax::Invalid(format!(
                "expected {context} but reached end of query"
            ))),
        }
    }

    fn modifiers(&mut self) -> ParseResult<Vec<Modifier>> {
        let mut modifiers = Vec::new();
        while self.peek() == Some(&Token::Slash) {
            self.advance();
            let name = self.term("modifier name")?;
            let value = if let Some(Token::Comparitor(symbol)) = self.peek().cloned() {
                self.advance();
                Some((symbol, self.term("modifier value")?))
            } else {
                None
            };
            modifiers.push(Modifier { name, value });
        }
        Ok(modifiers)
    }

    fn sort_spec(&mut self) -> ParseResult<Vec<SortKey>> {
        if !self.peek_keyword("sortby") {
            return Ok(Vec::new());
        }
        self.advance();
        let mut keys = Vec::new();
        while self.peek().and_then(Token::as_term).is_some() {
            let index = self.term("sort index")?;
            let modifiers = self.modifiers()?;
            keys.push(SortKey { index, modifiers });
        }
        if keys.is_empty() {
            return Err(CqlSyntax::Invalid("sortBy without sort keys".to_owned()));
        }
        Ok(keys)
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::LParen => "'('".to_owned(),
        Token::RParen => "')'".to_owned(),
        Token::Slash => "'/'".to_owned(),
        Token::Comparitor(symbol) => format!("'{symbol}'"),
        Token::Word(word) => format!("'{word}'"),
        Token::Quoted(text) => format!("\"{text}\""),
    }
}
