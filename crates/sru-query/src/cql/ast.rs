//! CQL syntax tree.

use std::fmt;

/// Index used for a bare search term.
pub const SERVER_CHOICE_INDEX: &str = "cql.serverChoice";

/// Relation used for a bare search term.
pub const DEFAULT_RELATION: &str = "=";

/// A parsed CQL query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CqlQuery {
    /// Prefix assignments declared at the start of the query.
    pub prefixes: Vec<PrefixAssignment>,
    /// The boolean tree of search clauses.
    pub root: CqlNode,
    /// Sort keys from a trailing `sortBy` clause.
    pub sort_keys: Vec<SortKey>,
}

/// A node of the boolean tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CqlNode {
    /// Two operands joined by a boolean operator.
    Boolean {
        /// The operator.
        operator: BooleanOperator,
        /// Modifiers attached to the operator.
        modifiers: Vec<Modifier>,
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// A single search clause.
    Clause(SearchClause),
}

/// Boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    /// Both operands match.
    And,
    /// Either operand matches.
    Or,
    /// The left operand matches and the right does not.
    Not,
    /// Both operands match within a proximity window.
    Prox,
}

impl BooleanOperator {
    /// Recognises an operator keyword, ignoring case.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        [Self::And, Self::Or, Self::Not, Self::Prox]
            .into_iter()
            .find(|operator| operator.as_str().eq_ignore_ascii_case(word))
    }

    /// Returns the canonical keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Prox => "prox",
        }
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `index relation term`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchClause {
    /// The index searched.
    pub index: String,
    /// The relation between index and term.
    pub relation: Relation,
    /// The search term.
    pub term: String,
}

impl SearchClause {
    /// A bare term searched in the server's default index.
    #[must_use]
    pub fn bare(term: impl Into<String>) -> Self {
        Self {
            index: SERVER_CHOICE_INDEX.to_owned(),
            relation: Relation::new(DEFAULT_RELATION),
            term: term.into(),
        }
    }
}

/// A relation with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Comparitor symbol or named relation (`=`, `any`, `within`).
    pub base: String,
    /// Relation modifiers.
    pub modifiers: Vec<Modifier>,
}

impl Relation {
    /// A relation without modifiers.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            modifiers: Vec::new(),
        }
    }
}

/// `/name` or `/name comparison value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    /// Modifier name.
    pub name: String,
    /// Comparison and value, when the modifier carries one.
    pub value: Option<(String, String)>,
}

/// `> prefix = "identifier"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixAssignment {
    /// Short name, absent for the default context set.
    pub name: Option<String>,
    /// Context set identifier.
    pub identifier: String,
}

/// One key of a `sortBy` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Index to sort on.
    pub index: String,
    /// Sort modifiers such as `descending`.
    pub modifiers: Vec<Modifier>,
}
