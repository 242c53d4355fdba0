//! Pluggable query languages for the search/retrieve server.
//!
//! Query parsers implement [`QueryParser`] and are registered by query-type
//! tag in a [`QueryParserRegistry`]. At request time the registry gathers
//! the parameters a parser declares, invokes it, and reports which request
//! parameters it consumed. Parsed queries travel through the server as
//! [`SruQuery`] values wrapping an opaque [`QueryAst`].
//!
//! Two parsers are bundled: [`CqlParser`] (`cql`, the default) and
//! [`SearchTermsParser`] (`searchTerms`).

pub mod cql;
pub mod error;
pub mod parser;
pub mod query;
pub mod registry;
pub mod terms;

#[cfg(test)]
mod tests;

pub use self::cql::{CQL_QUERY_TYPE, CqlParser, CqlQuery};
pub use self::error::QueryRegistryError;
pub use self::parser::{QueryParameters, QueryParser};
pub use self::query::{QueryAst, SruQuery};
pub use self::registry::{
    DEFAULT_QUERY_TYPE, QueryDispatch, QueryParserRegistry, is_valid_query_type,
};
pub use self::terms::{SEARCH_TERMS_QUERY_TYPE, SearchTerms, SearchTermsParser};
