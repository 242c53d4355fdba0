//! Parsed queries as seen by the rest of the server.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use sru_xml::{XmlTreeVisitor, XmlWriterError};

/// The syntax tree produced by a query parser.
///
/// The server treats trees as opaque. Backends downcast through
/// [`as_any`](Self::as_any) (or [`SruQuery::downcast_ref`]) to the concrete
/// type of the parser they expect.
pub trait QueryAst: fmt::Debug + Send + Sync + 'static {
    /// Returns `self` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Writes the XCQL form of the tree into `visitor`, with elements in
    /// `namespace`.
    ///
    /// Returns `Ok(false)` when the query language has no XCQL form.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by the visitor.
    fn write_xcql(
        &self,
        _visitor: &mut dyn XmlTreeVisitor,
        _namespace: &str,
    ) -> Result<bool, XmlWriterError> {
        Ok(false)
    }
}

/// A query together with its source text and query-type tag.
#[derive(Debug, Clone)]
pub struct SruQuery {
    query_type: String,
    raw: String,
    ast: Arc<dyn QueryAst>,
}

impl SruQuery {
    /// Wraps a parsed tree.
    #[must_use]
    pub fn new(query_type: impl Into<String>, raw: impl Into<String>, ast: impl QueryAst) -> Self {
        Self {
            query_type: query_type.into(),
            raw: raw.into(),
            ast: Arc::new(ast),
        }
    }

    /// The query-type tag of the parser that produced this query.
    #[must_use]
    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    /// The query text as supplied by the client.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The opaque syntax tree.
    #[must_use]
    pub fn ast(&self) -> &dyn QueryAst {
        self.ast.as_ref()
    }

    /// Downcasts the syntax tree to a concrete parser output type.
    #[must_use]
    pub fn downcast_ref<T: QueryAst>(&self) -> Option<&T> {
        self.ast.as_any().downcast_ref()
    }

    /// Writes the XCQL form of the query, if it has one.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by the visitor.
    pub fn write_xcql(
        &self,
        visitor: &mut dyn XmlTreeVisitor,
        namespace: &str,
    ) -> Result<bool, XmlWriterError> {
        self.ast.write_xcql(visitor, namespace)
    }
}
