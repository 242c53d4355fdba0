//! Plain markup emission onto a byte stream.

use std::io::Write;

use quick_xml::escape::{escape, partial_escape};

use crate::error::XmlWriterError;
use crate::sink::XmlSink;

/// Emits markup events as UTF-8 text.
///
/// Start tags are left open until the next content event so namespace
/// declarations and attributes can follow them. An element closed with no
/// content is written as an empty-element tag.
///
/// While escaping is enabled every byte of output, markup included, passes
/// through one more level of character escaping. This is how a record is
/// embedded as a string.
#[derive(Debug)]
pub struct MarkupWriter<W: Write> {
    out: W,
    open: Vec<String>,
    pending_start: bool,
    escaping: bool,
}

impl<W: Write> MarkupWriter<W> {
    /// Wraps a byte stream.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            open: Vec::new(),
            pending_start: false,
            escaping: false,
        }
    }

    /// Number of currently open elements.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Returns whether output is currently escaped.
    #[must_use]
    pub const fn is_escaping(&self) -> bool {
        self.escaping
    }

    /// Turns the extra escaping level on or off.
    pub const fn set_escaping(&mut self, escaping: bool) {
        self.escaping = escaping;
    }

    /// Finishes an open start tag, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    pub fn close_start_tag(&mut self) -> Result<(), XmlWriterError> {
        if self.pending_start {
            self.pending_start = false;
            self.put(">")?;
        }
        Ok(())
    }

    /// Writes markup verbatim outside any element, such as the XML
    /// declaration or a processing instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    pub fn raw(&mut self, markup: &str) -> Result<(), XmlWriterError> {
        self.close_start_tag()?;
        self.put(markup)
    }

    /// Flushes the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    pub fn flush(&mut self) -> Result<(), XmlWriterError> {
        self.out.flush()?;
        Ok(())
    }

    /// Borrows the underlying stream.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Mutably borrows the underlying stream.
    pub const fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn put(&mut self, markup: &str) -> Result<(), XmlWriterError> {
        if self.escaping {
            self.out.write_all(partial_escape(markup).as_bytes())?;
        } else {
            self.out.write_all(markup.as_bytes())?;
        }
        Ok(())
    }

    fn require_start_tag(&self, name: &str) -> Result<(), XmlWriterError> {
        if self.pending_start {
            Ok(())
        } else {
            Err(XmlWriterError::OutsideStartTag {
                name: name.to_owned(),
            })
        }
    }
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(bound) if !bound.is_empty() => format!("{bound}:{local}"),
        _ => local.to_owned(),
    }
}

impl<W: Write> XmlSink for MarkupWriter<W> {
    fn start_element(&mut self, prefix: Option<&str>, local: &str) -> Result<(), XmlWriterError> {
        self.close_start_tag()?;
        let name = qualified(prefix, local);
        self.put("<")?;
        self.put(&name)?;
        self.open.push(name);
        self.pending_start = true;
        Ok(())
    }

    fn namespace(&mut self, prefix: Option<&str>, uri: &str) -> Result<(), XmlWriterError> {
        let name = match prefix {
            Some(bound) if !bound.is_empty() => format!("xmlns:{bound}"),
            _ => String::from("xmlns"),
        };
        self.require_start_tag(&name)?;
        self.put(&format!(" {name}=\"{}\"", escape(uri)))
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<(), XmlWriterError> {
        self.require_start_tag(name)?;
        self.put(&format!(" {name}=\"{}\"", escape(value)))
    }

    fn characters(&mut self, text: &str) -> Result<(), XmlWriterError> {
        self.close_start_tag()?;
        self.put(&partial_escape(text))
    }

    fn cdata(&mut self, text: &str) -> Result<(), XmlWriterError> {
        self.close_start_tag()?;
        // A CDATA section cannot contain its own terminator; split it.
        let body = text.replace("]]>", "]]]]><![CDATA[>");
        self.put(&format!("<![CDATA[{body}]]>"))
    }

    fn end_element(&mut self) -> Result<(), XmlWriterError> {
        let name = self.open.pop().ok_or(XmlWriterError::NoOpenElement)?;
        if self.pending_start {
            self.pending_start = false;
            self.put("/>")
        } else {
            self.put(&format!("</{name}>"))
        }
    }
}
