//! The response writer used by response assembly.

use std::io::Write;

use sru_core::RecordXmlEscaping;

use crate::error::XmlWriterError;
use crate::indent::IndentingSink;
use crate::markup::MarkupWriter;
use crate::sink::XmlSink;

/// Depth at which the current record started.
#[derive(Debug, Clone, Copy)]
struct RecordFrame {
    depth: usize,
}

/// Streaming writer for protocol responses.
///
/// Composes [`MarkupWriter`] with [`IndentingSink`] and adds record
/// bracketing: between [`start_record`](Self::start_record) and
/// [`end_record`](Self::end_record) a record serializer writes ordinary
/// events, and when the escaping mode is [`RecordXmlEscaping::String`] they
/// come out as one escaped text node with indentation suspended.
///
/// # Example
///
/// ```
/// use sru_core::RecordXmlEscaping;
/// use sru_xml::{SruXmlWriter, XmlSink};
///
/// let mut writer = SruXmlWriter::new(Vec::new(), RecordXmlEscaping::String, None);
/// writer.start_element(None, "recordData")?;
/// writer.start_record()?;
/// writer.text_element(None, "title", "a & b")?;
/// writer.end_record()?;
/// writer.end_element()?;
/// let xml = String::from_utf8(writer.into_inner()).expect("utf-8");
/// assert_eq!(xml, "<recordData>&lt;title&gt;a &amp;amp; b&lt;/title&gt;</recordData>");
/// # Ok::<(), sru_xml::XmlWriterError>(())
/// ```
#[derive(Debug)]
pub struct SruXmlWriter<W: Write> {
    sink: IndentingSink<MarkupWriter<W>>,
    escaping: RecordXmlEscaping,
    record: Option<RecordFrame>,
}

impl<W: Write> SruXmlWriter<W> {
    /// Creates a writer. `indent` is the indentation width, or `None` for
    /// compact output.
    pub const fn new(out: W, escaping: RecordXmlEscaping, indent: Option<usize>) -> Self {
        Self {
            sink: IndentingSink::new(MarkupWriter::new(out), indent),
            escaping,
            record: None,
        }
    }

    /// Returns the record escaping mode.
    #[must_use]
    pub const fn escaping(&self) -> RecordXmlEscaping {
        self.escaping
    }

    /// Returns whether a record is currently being written.
    #[must_use]
    pub const fn in_record(&self) -> bool {
        self.record.is_some()
    }

    /// Number of currently open elements.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.sink.inner().depth()
    }

    /// Writes the XML declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    pub fn write_declaration(&mut self) -> Result<(), XmlWriterError> {
        self.sink
            .inner_mut()
            .raw(r#"<?xml version="1.0" encoding="UTF-8"?>"#)
    }

    /// Writes an `xml-stylesheet` processing instruction referencing `href`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    pub fn write_stylesheet(&mut self, href: &str) -> Result<(), XmlWriterError> {
        let href = quick_xml::escape::escape(href);
        self.sink
            .inner_mut()
            .raw(&format!(r#"<?xml-stylesheet type="text/xsl" href="{href}"?>"#))
    }

    /// Begins one record payload.
    ///
    /// # Errors
    ///
    /// Returns [`XmlWriterError::RecordAlreadyOpen`] if called twice without
    /// an intervening [`end_record`](Self::end_record).
    pub fn start_record(&mut self) -> Result<(), XmlWriterError> {
        if self.record.is_some() {
            return Err(XmlWriterError::RecordAlreadyOpen);
        }
        let markup = self.sink.inner_mut();
        markup.close_start_tag()?;
        self.record = Some(RecordFrame {
            depth: markup.depth(),
        });
        if self.escaping == RecordXmlEscaping::String {
            markup.set_escaping(true);
            self.sink.suspend();
        }
        Ok(())
    }

    /// Ends the record payload started by [`start_record`](Self::start_record).
    ///
    /// # Errors
    ///
    /// Returns [`XmlWriterError::NoOpenRecord`] without a matching start and
    /// [`XmlWriterError::UnbalancedRecord`] if the record serializer did not
    /// close exactly the elements it opened.
    pub fn end_record(&mut self) -> Result<(), XmlWriterError> {
        let frame = self.record.take().ok_or(XmlWriterError::NoOpenRecord)?;
        let markup = self.sink.inner_mut();
        let depth = markup.depth();
        if depth != frame.depth {
            let open = depth.cast_signed().saturating_sub(frame.depth.cast_signed());
            return Err(XmlWriterError::UnbalancedRecord { open });
        }
        if markup.is_escaping() {
            markup.set_escaping(false);
            self.sink.resume();
        }
        Ok(())
    }

    /// Flushes the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    pub fn flush(&mut self) -> Result<(), XmlWriterError> {
        self.sink.inner_mut().flush()
    }

    /// Borrows the underlying stream.
    pub const fn get_ref(&self) -> &W {
        self.sink.inner().get_ref()
    }

    /// Mutably borrows the underlying stream.
    pub const fn get_mut(&mut self) -> &mut W {
        self.sink.inner_mut().get_mut()
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> W {
        self.sink.into_inner().into_inner()
    }
}

impl<W: Write> XmlSink for SruXmlWriter<W> {
    fn start_element(&mut self, prefix: Option<&str>, local: &str) -> Result<(), XmlWriterError> {
        self.sink.start_element(prefix, local)
    }

    fn namespace(&mut self, prefix: Option<&str>, uri: &str) -> Result<(), XmlWriterError> {
        self.sink.namespace(prefix, uri)
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<(), XmlWriterError> {
        self.sink.attribute(name, value)
    }

    fn characters(&mut self, text: &str) -> Result<(), XmlWriterError> {
        self.sink.characters(text)
    }

    fn cdata(&mut self, text: &str) -> Result<(), XmlWriterError> {
        self.sink.cdata(text)
    }

    fn end_element(&mut self) -> Result<(), XmlWriterError> {
        self.sink.end_element()
    }
}
