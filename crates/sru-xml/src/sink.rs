//! The minimal markup event interface.

use crate::error::XmlWriterError;

/// A consumer of markup events.
///
/// Response assembly and backend record serializers write through this
/// trait, so the same serializer works unchanged whether its output is
/// embedded as structured markup or as an escaped string.
///
/// Namespace declarations and attributes are only legal directly after
/// [`start_element`](Self::start_element), before any content.
pub trait XmlSink {
    /// Opens an element. `prefix` is `None` for unprefixed names.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    fn start_element(&mut self, prefix: Option<&str>, local: &str) -> Result<(), XmlWriterError>;

    /// Declares a namespace on the element just opened. A `None` prefix
    /// declares the default namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if no start tag is open or the stream fails.
    fn namespace(&mut self, prefix: Option<&str>, uri: &str) -> Result<(), XmlWriterError>;

    /// Writes an attribute on the element just opened.
    ///
    /// # Errors
    ///
    /// Returns an error if no start tag is open or the stream fails.
    fn attribute(&mut self, name: &str, value: &str) -> Result<(), XmlWriterError>;

    /// Writes character data, escaping markup characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    fn characters(&mut self, text: &str) -> Result<(), XmlWriterError>;

    /// Writes a CDATA section.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    fn cdata(&mut self, text: &str) -> Result<(), XmlWriterError>;

    /// Closes the most recently opened element.
    ///
    /// # Errors
    ///
    /// Returns an error if no element is open or the stream fails.
    fn end_element(&mut self) -> Result<(), XmlWriterError>;

    /// Writes `<prefix:local>text</prefix:local>`.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying calls.
    fn text_element(
        &mut self,
        prefix: Option<&str>,
        local: &str,
        text: &str,
    ) -> Result<(), XmlWriterError> {
        self.start_element(prefix, local)?;
        self.characters(text)?;
        self.end_element()
    }
}

impl<S: XmlSink + ?Sized> XmlSink for &mut S {
    fn start_element(&mut self, prefix: Option<&str>, local: &str) -> Result<(), XmlWriterError> {
        (**self).start_element(prefix, local)
    }

    fn namespace(&mut self, prefix: Option<&str>, uri: &str) -> Result<(), XmlWriterError> {
        (**self).namespace(prefix, uri)
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<(), XmlWriterError> {
        (**self).attribute(name, value)
    }

    fn characters(&mut self, text: &str) -> Result<(), XmlWriterError> {
        (**self).characters(text)
    }

    fn cdata(&mut self, text: &str) -> Result<(), XmlWriterError> {
        (**self).cdata(text)
    }

    fn end_element(&mut self) -> Result<(), XmlWriterError> {
        (**self).end_element()
    }
}
