//! Scan responses.

use std::io::Write;

use sru_core::{Diagnostics, SruError};
use tracing::{debug, warn};

use super::echo::write_echoed_request;
use super::{DocumentSettings, RESPONSE_TARGET, ResponseContext, ResponseWriter};
use crate::engine::{CloseOnDrop, ScanResultSet, SearchEngine};
use crate::negotiate::ValidatedRequest;

/// Answers a scan request.
///
/// The `terms` wrapper is opened on the first term the cursor produces, so
/// an empty scan writes no wrapper at all.
pub(crate) fn scan<W: Write>(
    out: W,
    context: &ResponseContext<'_>,
    engine: &dyn SearchEngine,
    request: &ValidatedRequest,
    diagnostics: &mut Diagnostics,
) -> Result<(), SruError> {
    let mut cursor = engine.scan(request, diagnostics)?.map(CloseOnDrop::new);
    let settings = DocumentSettings {
        operation: request.operation(),
        version: request.version(),
        escaping: request.escaping(),
        indent: request.indent(),
        stylesheet: request.stylesheet(),
    };
    let mut writer = ResponseWriter::open(out, context, &settings)?;

    let mut written = 0_u32;
    if let Some(terms) = cursor.as_mut() {
        while terms.next_term()? {
            if request.maximum_terms().is_some_and(|limit| written >= limit) {
                warn!(
                    target: RESPONSE_TARGET,
                    limit = written,
                    "backend produced more terms than requested; truncating"
                );
                break;
            }
            if written == 0 {
                writer.start("terms")?;
            }
            write_term(&mut writer, &mut **terms)?;
            written = written.saturating_add(1);
        }
        if written > 0 {
            writer.end()?;
        }
    }

    if context.config.echo_requests {
        write_echoed_request(&mut writer, request, context.base_url)?;
    }
    writer.diagnostics(diagnostics)?;
    writer.extra_response_data(cursor.as_ref().and_then(|terms| terms.extra_response_data()))?;
    writer.finish()?;
    debug!(target: RESPONSE_TARGET, terms = written, "scan response written");
    Ok(())
}

fn write_term<W: Write>(
    writer: &mut ResponseWriter<W>,
    term: &mut dyn ScanResultSet,
) -> Result<(), SruError> {
    writer.start("term")?;
    writer.text("value", term.value())?;
    if let Some(count) = term.number_of_records() {
        writer.text("numberOfRecords", &count.to_string())?;
    }
    if let Some(display) = term.display_term() {
        writer.text("displayTerm", display)?;
    }
    if let Some(position) = term.where_in_list() {
        writer.text("whereInList", position.as_str())?;
    }
    if term.has_extra_term_data() {
        writer.start("extraTermData")?;
        term.write_extra_term_data(writer.xml())?;
        writer.end()?;
    }
    writer.end()?;
    Ok(())
}
