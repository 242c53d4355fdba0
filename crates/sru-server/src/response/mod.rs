//! Response assembly.
//!
//! Every response follows one template: XML declaration, optional
//! stylesheet instruction, root element with its namespace, `version`, the
//! operation body, then the echoed request, diagnostics and extra response
//! data when present. [`ResponseWriter`] owns the template; the operation
//! modules supply bodies.

mod echo;
mod explain;
mod fatal;
mod scan;
mod search;

use std::io::Write;

use sru_config::{Config, ServerDescription};
use sru_core::{
    Diagnostic, Diagnostics, NamespaceBinding, NamespaceProfile, Operation, ProtocolVersion,
    RecordXmlEscaping, SruError,
};
use sru_xml::{SruXmlWriter, XmlSink, XmlWriterError};

pub(crate) use self::explain::explain;
pub(crate) use self::fatal::write_fatal;
pub(crate) use self::scan::scan;
pub(crate) use self::search::search_retrieve;
use crate::engine::ExtraResponseData;

/// Tracing target for response assembly.
pub(crate) const RESPONSE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::response");

/// Server-wide values every response may need.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResponseContext<'a> {
    pub(crate) config: &'a Config,
    pub(crate) description: &'a ServerDescription,
    pub(crate) base_url: &'a str,
}

/// Shape of a response document.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentSettings<'a> {
    pub(crate) operation: Operation,
    pub(crate) version: ProtocolVersion,
    pub(crate) escaping: RecordXmlEscaping,
    pub(crate) indent: Option<usize>,
    pub(crate) stylesheet: Option<&'a str>,
}

/// Writes one response document in a fixed namespace profile.
pub(crate) struct ResponseWriter<W: Write> {
    xml: SruXmlWriter<W>,
    profile: &'static NamespaceProfile,
    binding: NamespaceBinding,
    version: ProtocolVersion,
    operation: Operation,
}

impl<W: Write> ResponseWriter<W> {
    /// Writes the prologue, opens the root element and writes `version`.
    pub(crate) fn open(
        out: W,
        context: &ResponseContext<'_>,
        settings: &DocumentSettings<'_>,
    ) -> Result<Self, XmlWriterError> {
        let profile =
            NamespaceProfile::select(settings.version, context.config.legacy_namespace_mode);
        let binding = match settings.operation {
            Operation::Scan => profile.scan,
            Operation::Explain | Operation::SearchRetrieve => profile.response,
        };
        let mut xml = SruXmlWriter::new(out, settings.escaping, settings.indent);
        xml.write_declaration()?;
        if let Some(href) = settings.stylesheet {
            xml.write_stylesheet(href)?;
        }
        xml.start_element(Some(binding.prefix), settings.operation.response_element())?;
        xml.namespace(Some(binding.prefix), binding.uri)?;

        let mut writer = Self {
            xml,
            profile,
            binding,
            version: settings.version,
            operation: settings.operation,
        };
        writer.text("version", settings.version.as_str())?;
        Ok(writer)
    }

    pub(crate) const fn profile(&self) -> &'static NamespaceProfile {
        self.profile
    }

    pub(crate) const fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub(crate) const fn operation(&self) -> Operation {
        self.operation
    }

    pub(crate) const fn xml(&mut self) -> &mut SruXmlWriter<W> {
        &mut self.xml
    }

    /// Opens an element in the root namespace.
    pub(crate) fn start(&mut self, local: &str) -> Result<(), XmlWriterError> {
        self.xml.start_element(Some(self.binding.prefix), local)
    }

    pub(crate) fn end(&mut self) -> Result<(), XmlWriterError> {
        self.xml.end_element()
    }

    /// Writes a text-only element in the root namespace.
    pub(crate) fn text(&mut self, local: &str, text: &str) -> Result<(), XmlWriterError> {
        self.xml.text_element(Some(self.binding.prefix), local, text)
    }

    /// Writes the `diagnostics` block, or nothing when the list is empty.
    pub(crate) fn diagnostics(&mut self, diagnostics: &Diagnostics) -> Result<(), XmlWriterError> {
        if diagnostics.is_empty() {
            return Ok(());
        }
        self.start("diagnostics")?;
        for diagnostic in diagnostics {
            write_diagnostic(&mut self.xml, self.profile, diagnostic)?;
        }
        self.end()
    }

    /// Writes `extraResponseData` when the backend supplied any.
    pub(crate) fn extra_response_data(
        &mut self,
        extra: Option<&dyn ExtraResponseData>,
    ) -> Result<(), SruError> {
        let Some(extra) = extra else {
            return Ok(());
        };
        self.start("extraResponseData")?;
        extra.write_extra_response_data(&mut self.xml)?;
        self.end()?;
        Ok(())
    }

    /// Closes the root element and flushes.
    pub(crate) fn finish(mut self) -> Result<W, XmlWriterError> {
        self.end()?;
        self.xml.flush()?;
        Ok(self.xml.into_inner())
    }
}

/// Writes one `diagnostic` element in the profile's diagnostic namespace.
pub(crate) fn write_diagnostic(
    sink: &mut dyn XmlSink,
    profile: &NamespaceProfile,
    diagnostic: &Diagnostic,
) -> Result<(), XmlWriterError> {
    let prefix = Some(profile.diagnostic.prefix);
    sink.start_element(prefix, "diagnostic")?;
    sink.namespace(prefix, profile.diagnostic.uri)?;
    sink.text_element(prefix, "uri", &diagnostic.uri())?;
    if let Some(details) = diagnostic.details() {
        sink.text_element(prefix, "details", details)?;
    }
    if let Some(message) = diagnostic.message() {
        sink.text_element(prefix, "message", message)?;
    }
    sink.end_element()
}
