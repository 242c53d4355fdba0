//! Errors raised while emitting response markup.
//!
//! I/O errors are wrapped in `Arc` to satisfy the `result_large_err` Clippy
//! lint.

use std::sync::Arc;

use sru_core::SruError;
use thiserror::Error;

/// Errors arising from the streaming writer.
#[derive(Debug, Error)]
pub enum XmlWriterError {
    /// Writing to the underlying byte stream failed.
    #[error("failed to write response markup: {source}")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// An attribute or namespace declaration arrived after the start tag
    /// was closed.
    #[error("'{name}' written outside a start tag")]
    OutsideStartTag {
        /// Attribute or namespace name that could not be written.
        name: String,
    },

    /// An end tag was requested with no element open.
    #[error("no open element to close")]
    NoOpenElement,

    /// `start_record` was called while a record was already being written.
    #[error("a record is already being written")]
    RecordAlreadyOpen,

    /// `end_record` was called without a matching `start_record`.
    #[error("no record is being written")]
    NoOpenRecord,

    /// A record serializer left elements open, or closed elements it did not
    /// open.
    #[error("record left {open} element(s) unbalanced")]
    UnbalancedRecord {
        /// Element depth difference between record start and end.
        open: isize,
    },

    /// A serialized XML fragment could not be parsed for copying.
    #[error("malformed XML fragment: {message}")]
    MalformedFragment {
        /// Description of the parse failure.
        message: String,
    },
}

impl From<std::io::Error> for XmlWriterError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source: Arc::new(source),
        }
    }
}

impl From<quick_xml::Error> for XmlWriterError {
    fn from(error: quick_xml::Error) -> Self {
        Self::MalformedFragment {
            message: error.to_string(),
        }
    }
}

impl From<XmlWriterError> for SruError {
    fn from(error: XmlWriterError) -> Self {
        Self::system("response serialization failed", error)
    }
}
