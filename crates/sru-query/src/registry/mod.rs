//! Query parser registry and dispatch.
//!
//! The [`QueryParserRegistry`] maps query-type tags to parsers. It is
//! populated once at startup and then shared read-only across requests.
//! Duplicate registrations for the same tag are rejected.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use sru_core::{DiagnosticCode, Diagnostics, ProtocolVersion};
use tracing::debug;

use crate::cql::{CQL_QUERY_TYPE, CqlParser};
use crate::error::QueryRegistryError;
use crate::parser::{QueryParameters, QueryParser};
use crate::query::SruQuery;
use crate::terms::SearchTermsParser;

/// Tracing target for query dispatch.
pub(crate) const REGISTRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::registry");

/// Query type used when a request does not name one.
pub const DEFAULT_QUERY_TYPE: &str = CQL_QUERY_TYPE;

/// Returns `true` if `query_type` is a syntactically valid tag.
///
/// Tags consist of ASCII letters, digits, `-` and `_`, and must start with a
/// letter or digit.
///
/// # Example
///
/// ```
/// use sru_query::is_valid_query_type;
///
/// assert!(is_valid_query_type("cql"));
/// assert!(is_valid_query_type("search_terms-2"));
/// assert!(!is_valid_query_type("-cql"));
/// assert!(!is_valid_query_type("c ql"));
/// ```
#[must_use]
pub fn is_valid_query_type(query_type: &str) -> bool {
    let mut chars = query_type.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Outcome of [`QueryParserRegistry::dispatch`].
#[derive(Debug, Default)]
pub struct QueryDispatch {
    /// The parsed query, when gathering and parsing both succeeded.
    pub query: Option<SruQuery>,
    /// Request parameters claimed by the selected parser.
    pub consumed: Vec<String>,
}

/// Registry of available query parsers.
///
/// # Example
///
/// ```
/// use sru_core::{Diagnostics, ProtocolVersion};
/// use sru_query::QueryParserRegistry;
///
/// let registry = QueryParserRegistry::with_defaults();
/// let mut diagnostics = Diagnostics::new();
/// let dispatch = registry.dispatch(
///     ProtocolVersion::V2_0,
///     "cql",
///     |name| (name == "query").then_some("dc.title = fish"),
///     &mut diagnostics,
/// );
/// assert!(dispatch.query.is_some());
/// assert_eq!(dispatch.consumed, ["query"]);
/// ```
#[derive(Clone, Default)]
pub struct QueryParserRegistry {
    parsers: HashMap<String, Arc<dyn QueryParser>>,
}

impl fmt::Debug for QueryParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("QueryParserRegistry")
            .field("query_types", &tags)
            .finish()
    }
}

impl QueryParserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the bundled `cql` and `searchTerms`
    /// parsers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for parser in [
            Arc::new(CqlParser) as Arc<dyn QueryParser>,
            Arc::new(SearchTermsParser),
        ] {
            registry
                .parsers
                .insert(parser.query_type().to_owned(), parser);
        }
        registry
    }

    /// Registers a parser under its query-type tag.
    ///
    /// # Errors
    ///
    /// Returns [`QueryRegistryError::InvalidQueryType`] if the tag is not
    /// valid and [`QueryRegistryError::Duplicate`] if a parser with the same
    /// tag is already registered.
    pub fn register(&mut self, parser: impl QueryParser + 'static) -> Result<(), QueryRegistryError> {
        let query_type = parser.query_type().to_owned();
        if !is_valid_query_type(&query_type) {
            return Err(QueryRegistryError::InvalidQueryType { query_type });
        }
        if self.parsers.contains_key(&query_type) {
            return Err(QueryRegistryError::Duplicate { query_type });
        }
        self.parsers.insert(query_type, Arc::new(parser));
        Ok(())
    }

    /// Looks up a parser by query-type tag.
    #[must_use]
    pub fn find(&self, query_type: &str) -> Option<&dyn QueryParser> {
        self.parsers.get(query_type).map(|parser| &**parser)
    }

    /// Returns the number of registered parsers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Returns `true` when no parsers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Gathers the parameters the parser for `query_type` needs and parses
    /// them.
    ///
    /// Values are trimmed and empty values count as missing. If any
    /// parameter is missing, one
    /// [`MandatoryParameterNotSupplied`](DiagnosticCode::MandatoryParameterNotSupplied)
    /// diagnostic is recorded per missing name and the parser is not
    /// invoked. An unknown or malformed tag records an
    /// [`UnsupportedParameterValue`](DiagnosticCode::UnsupportedParameterValue)
    /// diagnostic naming `queryType`.
    ///
    /// All parameter names of the selected parser are reported as consumed
    /// whether or not parsing succeeds.
    pub fn dispatch<'a>(
        &self,
        version: ProtocolVersion,
        query_type: &str,
        lookup: impl Fn(&str) -> Option<&'a str>,
        diagnostics: &mut Diagnostics,
    ) -> QueryDispatch {
        let Some(parser) = is_valid_query_type(query_type)
            .then(|| self.find(query_type))
            .flatten()
        else {
            debug!(target: REGISTRY_TARGET, query_type, "unsupported query type");
            diagnostics.add(
                DiagnosticCode::UnsupportedParameterValue,
                Some("queryType"),
                Some(&format!("unsupported query type '{query_type}'")),
            );
            return QueryDispatch::default();
        };

        let names = parser.parameter_names();
        let mut gathered = QueryParameters::new();
        let mut complete = true;
        for &name in names {
            match lookup(name).map(str::trim).filter(|value| !value.is_empty()) {
                Some(value) => {
                    gathered.insert(name.to_owned(), value.to_owned());
                }
                None => {
                    complete = false;
                    diagnostics.add(DiagnosticCode::MandatoryParameterNotSupplied, Some(name), None);
                }
            }
        }
        let consumed = names.iter().map(|&name| name.to_owned()).collect();
        if !complete {
            debug!(target: REGISTRY_TARGET, query_type, "query parameters incomplete");
            return QueryDispatch {
                query: None,
                consumed,
            };
        }

        let query = parser.parse(version, &gathered, diagnostics);
        debug!(
            target: REGISTRY_TARGET,
            query_type,
            parsed = query.is_some(),
            "query dispatched"
        );
        QueryDispatch { query, consumed }
    }
}

#[cfg(test)]
mod tests;
