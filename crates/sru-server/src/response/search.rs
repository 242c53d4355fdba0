//! SearchRetrieve responses.

use std::io::Write;

use sru_core::{DIAGNOSTICS_RECORD_SCHEMA, DiagnosticCode, Diagnostics, SruError};
use tracing::{debug, warn};

use super::echo::write_echoed_request;
use super::{
    DocumentSettings, RESPONSE_TARGET, ResponseContext, ResponseWriter, write_diagnostic,
};
use crate::engine::{CloseOnDrop, SearchEngine, SearchResultSet};
use crate::negotiate::ValidatedRequest;

/// Answers a searchRetrieve request.
///
/// The start position is checked against the total before anything is
/// written; an out-of-range start is fatal.
pub(crate) fn search_retrieve<W: Write>(
    out: W,
    context: &ResponseContext<'_>,
    engine: &dyn SearchEngine,
    request: &ValidatedRequest,
    diagnostics: &mut Diagnostics,
) -> Result<(), SruError> {
    let mut result = CloseOnDrop::new(engine.search(request, diagnostics)?);
    let total = result.total_record_count();
    let start = u64::from(request.start_record());
    if start > 1 && start > total {
        debug!(target: RESPONSE_TARGET, start, total, "start record beyond result set");
        return Err(SruError::new(DiagnosticCode::FirstRecordPositionOutOfRange)
            .with_details(start.to_string()));
    }

    let settings = DocumentSettings {
        operation: request.operation(),
        version: request.version(),
        escaping: request.escaping(),
        indent: request.indent(),
        stylesheet: request.stylesheet(),
    };
    let mut writer = ResponseWriter::open(out, context, &settings)?;
    let traits = request.version().traits();

    writer.text("numberOfRecords", &total.to_string())?;
    if let Some(id) = result.result_set_id() {
        writer.text("resultSetId", id)?;
    }
    if let Some(ttl) = result.result_set_ttl() {
        writer.text(traits.result_set_ttl_element, &ttl.to_string())?;
    }

    let limit = request
        .maximum_records()
        .map_or(u64::MAX, u64::from)
        .min(result.record_count());
    let mut delivered = 0_u64;
    while result.next_record()? {
        if delivered >= limit {
            warn!(
                target: RESPONSE_TARGET,
                limit,
                reported = result.record_count(),
                "backend delivered more records than requested; truncating"
            );
            break;
        }
        if delivered == 0 {
            writer.start("records")?;
        }
        write_record(&mut writer, &mut *result, start.saturating_add(delivered))?;
        delivered = delivered.saturating_add(1);
    }
    if delivered > 0 {
        writer.end()?;
    }

    let next = start.saturating_add(delivered);
    if delivered > 0 && next <= total {
        writer.text("nextRecordPosition", &next.to_string())?;
    }
    if context.config.echo_requests {
        write_echoed_request(&mut writer, request, context.base_url)?;
    }
    writer.diagnostics(diagnostics)?;
    writer.extra_response_data(result.extra_response_data())?;
    if traits.result_count_precision
        && let Some(precision) = result.result_count_precision()
    {
        writer.text("resultCountPrecision", precision.uri())?;
    }
    writer.finish()?;
    debug!(target: RESPONSE_TARGET, total, delivered, "searchRetrieve response written");
    Ok(())
}

fn write_record<W: Write>(
    writer: &mut ResponseWriter<W>,
    record: &mut dyn SearchResultSet,
    position: u64,
) -> Result<(), SruError> {
    let traits = writer.version().traits();
    let profile = writer.profile();
    let surrogate = record.surrogate_diagnostic().cloned();
    let schema = match &surrogate {
        Some(_) => DIAGNOSTICS_RECORD_SCHEMA,
        None => record.record_schema_identifier(),
    };
    let escaping = writer.xml().escaping();

    writer.start("record")?;
    writer.text("recordSchema", schema)?;
    writer.text(traits.escaping_name, escaping.as_str())?;
    writer.start("recordData")?;
    let xml = writer.xml();
    xml.start_record()?;
    match &surrogate {
        Some(diagnostic) => write_diagnostic(&mut *xml, profile, diagnostic)?,
        None => record.write_record(&mut *xml)?,
    }
    xml.end_record()?;
    writer.end()?;
    if traits.record_identifier
        && let Some(identifier) = record.record_identifier()
    {
        writer.text("recordIdentifier", identifier)?;
    }
    writer.text("recordPosition", &position.to_string())?;
    if record.has_extra_record_data() {
        writer.start("extraRecordData")?;
        record.write_extra_record_data(writer.xml())?;
        writer.end()?;
    }
    writer.end()?;
    Ok(())
}
