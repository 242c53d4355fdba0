//! The bundled CQL query language.
//!
//! Supports prefix assignments, boolean operators with modifiers, index and
//! relation qualifiers with modifiers, parenthesised sub-queries, quoted
//! terms, and a trailing `sortBy` clause. Parsed queries serialize to XCQL
//! for echoed requests.

mod ast;
mod lexer;
mod parser;
mod xcql;

use std::any::Any;

use sru_core::{DiagnosticCode, Diagnostics, ProtocolVersion};
use sru_xml::{XmlTreeVisitor, XmlWriterError};

pub use self::ast::{
    BooleanOperator, CqlNode, CqlQuery, DEFAULT_RELATION, Modifier, PrefixAssignment, Relation,
    SERVER_CHOICE_INDEX, SearchClause, SortKey,
};
use self::parser::{CqlSyntax, parse_cql};
use self::xcql::XcqlWriter;
use crate::parser::{QueryParameters, QueryParser};
use crate::query::{QueryAst, SruQuery};

/// Query-type tag of the CQL parser.
pub const CQL_QUERY_TYPE: &str = "cql";

/// Parameter the CQL parser reads its query from.
pub const QUERY_PARAMETER: &str = "query";

impl CqlQuery {
    /// Parses a CQL query string.
    ///
    /// # Errors
    ///
    /// Returns a [`QuerySyntaxError`](DiagnosticCode::QuerySyntaxError)
    /// diagnostic for malformed input and a
    /// [`QueryFeatureUnsupported`](DiagnosticCode::QueryFeatureUnsupported)
    /// diagnostic for constructs this parser does not accept.
    pub fn parse(input: &str) -> Result<Self, sru_core::Diagnostic> {
        parse_cql(input).map_err(|syntax| match syntax {
            CqlSyntax::Invalid(details) => {
                sru_core::Diagnostic::new(DiagnosticCode::QuerySyntaxError).with_details(details)
            }
            CqlSyntax::Unsupported(details) => {
                sru_core::Diagnostic::new(DiagnosticCode::QueryFeatureUnsupported)
                    .with_details(details)
            }
        })
    }
}

impl QueryAst for CqlQuery {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn write_xcql(
        &self,
        visitor: &mut dyn XmlTreeVisitor,
        namespace: &str,
    ) -> Result<bool, XmlWriterError> {
        XcqlWriter::new(visitor, namespace).query(self)?;
        Ok(true)
    }
}

/// Parser for the `cql` query type.
#[derive(Debug, Clone, Copy, Default)]
pub struct CqlParser;

impl QueryParser for CqlParser {
    fn query_type(&self) -> &str {
        CQL_QUERY_TYPE
    }

    fn parameter_names(&self) -> &[&str] {
        &[QUERY_PARAMETER]
    }

    fn parse(
        &self,
        _version: ProtocolVersion,
        parameters: &QueryParameters,
        diagnostics: &mut Diagnostics,
    ) -> Option<SruQuery> {
        let raw = parameters.get(QUERY_PARAMETER)?;
        match CqlQuery::parse(raw) {
            Ok(query) => Some(SruQuery::new(CQL_QUERY_TYPE, raw.as_str(), query)),
            Err(diagnostic) => {
                diagnostics.push(diagnostic);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
