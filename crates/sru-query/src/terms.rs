//! The bundled `searchTerms` query type: a whitespace-separated term list.

use std::any::Any;

use sru_core::{Diagnostics, ProtocolVersion};

use crate::parser::{QueryParameters, QueryParser};
use crate::query::{QueryAst, SruQuery};

/// Query-type tag of the search-terms parser.
pub const SEARCH_TERMS_QUERY_TYPE: &str = "searchTerms";

/// A list of terms with no further structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    terms: Vec<String>,
}

impl SearchTerms {
    /// Splits `input` on whitespace.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self {
            terms: input.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// The terms in input order.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl QueryAst for SearchTerms {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Parser for the `searchTerms` query type.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchTermsParser;

impl QueryParser for SearchTermsParser {
    fn query_type(&self) -> &str {
        SEARCH_TERMS_QUERY_TYPE
    }

    fn parameter_names(&self) -> &[&str] {
        &["query"]
    }

    fn parse(
        &self,
        _version: ProtocolVersion,
        parameters: &QueryParameters,
        _diagnostics: &mut Diagnostics,
    ) -> Option<SruQuery> {
        let raw = parameters.get("query")?;
        Some(SruQuery::new(
            SEARCH_TERMS_QUERY_TYPE,
            raw.as_str(),
            SearchTerms::parse(raw),
        ))
    }
}
