//! Explain responses and the explain record.

use std::io::Write;

use sru_config::{DatabaseInfo, IndexInfo, LocalizedString, SchemaInfo, ServerDescription};
use sru_core::{Diagnostics, SruError};
use sru_xml::{XmlSink, XmlWriterError};
use tracing::debug;

use super::echo::write_echoed_request;
use super::{DocumentSettings, RESPONSE_TARGET, ResponseContext, ResponseWriter};
use crate::engine::SearchEngine;
use crate::negotiate::ValidatedRequest;

/// Answers an explain request.
pub(crate) fn explain<W: Write>(
    out: W,
    context: &ResponseContext<'_>,
    engine: &dyn SearchEngine,
    request: &ValidatedRequest,
    diagnostics: &mut Diagnostics,
) -> Result<(), SruError> {
    let extra = engine.explain(request, diagnostics)?;
    let settings = DocumentSettings {
        operation: request.operation(),
        version: request.version(),
        escaping: request.escaping(),
        indent: request.indent(),
        stylesheet: request.stylesheet(),
    };
    let mut writer = ResponseWriter::open(out, context, &settings)?;
    write_explain_record(&mut writer, context)?;
    if context.config.echo_requests {
        write_echoed_request(&mut writer, request, context.base_url)?;
    }
    writer.diagnostics(diagnostics)?;
    writer.extra_response_data(extra.as_deref())?;
    writer.finish()?;
    debug!(target: RESPONSE_TARGET, "explain response written");
    Ok(())
}

/// Writes the `record` holding the explain document.
pub(crate) fn write_explain_record<W: Write>(
    writer: &mut ResponseWriter<W>,
    context: &ResponseContext<'_>,
) -> Result<(), XmlWriterError> {
    let profile = writer.profile();
    let escaping = writer.xml().escaping();
    let version = writer.version();

    writer.start("record")?;
    writer.text("recordSchema", profile.explain.uri)?;
    writer.text(version.traits().escaping_name, escaping.as_str())?;
    writer.start("recordData")?;
    let xml = writer.xml();
    xml.start_record()?;
    ExplainDocument {
        sink: &mut *xml,
        prefix: profile.explain.prefix,
    }
    .write(context, profile.explain.uri, version.as_str())?;
    xml.end_record()?;
    writer.end()?;
    writer.text("recordPosition", "1")?;
    writer.end()
}

/// Writes the explain document in its own namespace.
struct ExplainDocument<'s> {
    sink: &'s mut dyn XmlSink,
    prefix: &'static str,
}

impl ExplainDocument<'_> {
    fn write(
        &mut self,
        context: &ResponseContext<'_>,
        namespace: &str,
        version: &str,
    ) -> Result<(), XmlWriterError> {
        let config = context.config;
        self.start("explain")?;
        self.sink.namespace(Some(self.prefix), namespace)?;

        self.start("serverInfo")?;
        self.sink.attribute("protocol", "SRU")?;
        self.sink.attribute("version", version)?;
        self.sink.attribute("transport", &config.transport)?;
        self.sink.attribute("method", "GET POST")?;
        self.text("host", &config.host)?;
        self.text("port", &config.port.to_string())?;
        self.text("database", &config.database)?;
        self.end()?;

        self.database_info(&context.description.database)?;
        self.index_info(context.description)?;
        self.schema_info(&context.description.schemas)?;

        self.start("configInfo")?;
        for (element, kind, value) in [
            ("default", "numberOfRecords", config.number_of_records),
            ("setting", "maximumRecords", config.maximum_records),
            ("default", "numberOfTerms", config.number_of_terms),
            ("setting", "maximumTerms", config.maximum_terms),
        ] {
            self.start(element)?;
            self.sink.attribute("type", kind)?;
            self.sink.characters(&value.to_string())?;
            self.end()?;
        }
        self.end()?;

        self.end()
    }

    fn database_info(&mut self, database: &DatabaseInfo) -> Result<(), XmlWriterError> {
        if database.is_empty() {
            return Ok(());
        }
        self.start("databaseInfo")?;
        self.localized("title", &database.titles)?;
        self.localized("description", &database.descriptions)?;
        if let Some(author) = &database.author {
            self.text("author", author)?;
        }
        if let Some(contact) = &database.contact {
            self.text("contact", contact)?;
        }
        self.localized("restrictions", &database.restrictions)?;
        self.end()
    }

    fn index_info(&mut self, description: &ServerDescription) -> Result<(), XmlWriterError> {
        if !description.has_index_info() {
            return Ok(());
        }
        self.start("indexInfo")?;
        for set in &description.index_sets {
            self.start("set")?;
            self.sink.attribute("identifier", &set.identifier)?;
            self.sink.attribute("name", &set.name)?;
            self.end()?;
        }
        for index in &description.indexes {
            self.index(index)?;
        }
        self.end()
    }

    fn index(&mut self, index: &IndexInfo) -> Result<(), XmlWriterError> {
        self.start("index")?;
        if let Some(id) = &index.id {
            self.sink.attribute("id", id)?;
        }
        self.sink.attribute("search", flag(index.searchable))?;
        self.sink.attribute("scan", flag(index.scanable))?;
        self.sink.attribute("sort", flag(index.sortable))?;
        self.localized("title", &index.titles)?;
        for map in &index.maps {
            self.start("map")?;
            if map.primary {
                self.sink.attribute("primary", "true")?;
            }
            self.start("name")?;
            self.sink.attribute("set", &map.set)?;
            self.sink.characters(&map.name)?;
            self.end()?;
            self.end()?;
        }
        self.end()
    }

    fn schema_info(&mut self, schemas: &[SchemaInfo]) -> Result<(), XmlWriterError> {
        if schemas.is_empty() {
            return Ok(());
        }
        self.start("schemaInfo")?;
        for schema in schemas {
            self.start("schema")?;
            self.sink.attribute("identifier", &schema.identifier)?;
            self.sink.attribute("name", &schema.name)?;
            if let Some(location) = &schema.location {
                self.sink.attribute("location", location)?;
            }
            self.sink.attribute("retrieve", flag(schema.retrieve))?;
            self.sink.attribute("sort", flag(schema.sort))?;
            self.localized("title", &schema.titles)?;
            self.end()?;
        }
        self.end()
    }

    fn localized(&mut self, local: &str, entries: &[LocalizedString]) -> Result<(), XmlWriterError> {
        for entry in entries {
            self.start(local)?;
            if let Some(lang) = &entry.lang {
                self.sink.attribute("lang", lang)?;
            }
            if entry.primary {
                self.sink.attribute("primary", "true")?;
            }
            self.sink.characters(&entry.value)?;
            self.end()?;
        }
        Ok(())
    }

    fn start(&mut self, local: &str) -> Result<(), XmlWriterError> {
        self.sink.start_element(Some(self.prefix), local)
    }

    fn end(&mut self) -> Result<(), XmlWriterError> {
        self.sink.end_element()
    }

    fn text(&mut self, local: &str, text: &str) -> Result<(), XmlWriterError> {
        self.sink.text_element(Some(self.prefix), local, text)
    }
}

const fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
