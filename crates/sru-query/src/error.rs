//! Errors raised while configuring the query registry.

use thiserror::Error;

/// Errors arising from query parser registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryRegistryError {
    /// A parser for the same query type is already registered.
    #[error("query type '{query_type}' is already registered")]
    Duplicate {
        /// The conflicting query-type tag.
        query_type: String,
    },

    /// The query-type tag contains characters outside the permitted set.
    #[error("invalid query type '{query_type}'")]
    InvalidQueryType {
        /// The rejected tag.
        query_type: String,
    },
}
