//! Echoed request blocks.

use std::io::Write;

use sru_query::{CQL_QUERY_TYPE, SruQuery};
use sru_xml::{NamespaceCopier, XmlWriterError};

use super::ResponseWriter;
use crate::negotiate::ValidatedRequest;

/// Writes the echoed request element for the response's operation.
///
/// Only parameters the client supplied are repeated. CQL queries and scan
/// clauses are followed by their XCQL form.
pub(crate) fn write_echoed_request<W: Write>(
    writer: &mut ResponseWriter<W>,
    request: &ValidatedRequest,
    base_url: &str,
) -> Result<(), XmlWriterError> {
    writer.start(writer.operation().echoed_request_element())?;
    if writer.version().traits().echo_version {
        writer.text("version", writer.version().as_str())?;
    }
    for (name, value) in request.echoed_parameters() {
        writer.text(name, value)?;
        let xcql = match *name {
            "query" => request.query().map(|query| ("xQuery", query)),
            "scanClause" => request.scan_clause().map(|clause| ("xScanClause", clause)),
            _ => None,
        };
        if let Some((element, query)) = xcql {
            write_xcql(writer, element, query)?;
        }
    }
    writer.text("baseUrl", base_url)?;
    writer.end()
}

fn write_xcql<W: Write>(
    writer: &mut ResponseWriter<W>,
    element: &str,
    query: &SruQuery,
) -> Result<(), XmlWriterError> {
    if query.query_type() != CQL_QUERY_TYPE {
        return Ok(());
    }
    let profile = writer.profile();
    writer.start(element)?;
    let mut copier = NamespaceCopier::new(writer.xml(), profile);
    query.write_xcql(&mut copier, profile.xcql.uri)?;
    writer.end()
}
