//! Minimal error documents.

use std::io::Write;

use sru_core::{Diagnostics, Operation, ProtocolVersion, RecordXmlEscaping};
use sru_xml::XmlWriterError;

use super::explain::write_explain_record;
use super::{DocumentSettings, ResponseContext, ResponseWriter};

/// Writes the error document for `operation`.
///
/// Explain errors still carry the explain record; searchRetrieve errors
/// report zero records.
pub(crate) fn write_fatal<W: Write>(
    out: W,
    context: &ResponseContext<'_>,
    operation: Operation,
    version: ProtocolVersion,
    indent: Option<usize>,
    diagnostics: &Diagnostics,
) -> Result<(), XmlWriterError> {
    let settings = DocumentSettings {
        operation,
        version,
        escaping: RecordXmlEscaping::Xml,
        indent,
        stylesheet: None,
    };
    let mut writer = ResponseWriter::open(out, context, &settings)?;
    match operation {
        Operation::Explain => write_explain_record(&mut writer, context)?,
        Operation::SearchRetrieve => writer.text("numberOfRecords", "0")?,
        Operation::Scan => {}
    }
    writer.diagnostics(diagnostics)?;
    writer.finish()?;
    Ok(())
}
