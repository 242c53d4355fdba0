//! The contract implemented by pluggable query parsers.

use std::collections::BTreeMap;

use sru_core::{Diagnostics, ProtocolVersion};

use crate::query::SruQuery;

/// Gathered request parameters handed to a parser, keyed by name.
pub type QueryParameters = BTreeMap<String, String>;

/// A query language the server can accept.
///
/// Parsers are registered once at startup in a
/// [`QueryParserRegistry`](crate::QueryParserRegistry) and shared across
/// requests.
pub trait QueryParser: Send + Sync {
    /// The query-type tag clients select this parser with.
    fn query_type(&self) -> &str;

    /// Request parameters this parser needs, in order. All of them must be
    /// present before [`parse`](Self::parse) is called.
    fn parameter_names(&self) -> &[&str];

    /// Parses the gathered parameters.
    ///
    /// On failure, pushes one or more diagnostics and returns `None`.
    fn parse(
        &self,
        version: ProtocolVersion,
        parameters: &QueryParameters,
        diagnostics: &mut Diagnostics,
    ) -> Option<SruQuery>;
}
