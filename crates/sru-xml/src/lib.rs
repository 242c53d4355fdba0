//! Streaming writer for search/retrieve protocol responses.
//!
//! The writer is built from small layers over the [`XmlSink`] event trait:
//!
//! - [`MarkupWriter`] turns events into UTF-8 markup and can add one extra
//!   level of escaping, used to embed a record as a string.
//! - [`IndentingSink`] pretty-prints without touching textual content.
//! - [`SruXmlWriter`] composes both and brackets record payloads with
//!   [`start_record`](SruXmlWriter::start_record) and
//!   [`end_record`](SruXmlWriter::end_record).
//! - [`NamespaceCopier`] replays namespace-resolved [`XmlTreeVisitor`] events
//!   through any sink, declaring namespaces at first use.
//!
//! # Example
//!
//! ```
//! use sru_core::RecordXmlEscaping;
//! use sru_xml::{SruXmlWriter, XmlSink};
//!
//! let mut writer = SruXmlWriter::new(Vec::new(), RecordXmlEscaping::Xml, Some(1));
//! writer.start_element(None, "terms")?;
//! writer.text_element(None, "value", "cat")?;
//! writer.end_element()?;
//! let xml = String::from_utf8(writer.into_inner()).expect("utf-8");
//! assert_eq!(xml, "<terms>\n <value>cat</value>\n</terms>");
//! # Ok::<(), sru_xml::XmlWriterError>(())
//! ```

mod copy;
mod error;
mod indent;
mod markup;
mod sink;
mod writer;

pub use copy::{NamespaceCopier, XML_NAMESPACE, XmlName, XmlTreeVisitor, copy_fragment};
pub use error::XmlWriterError;
pub use indent::IndentingSink;
pub use markup::MarkupWriter;
pub use sink::XmlSink;
pub use writer::SruXmlWriter;

#[cfg(test)]
mod tests;
