//! Errors surfaced by the server outside the response body.

use std::io;
use std::sync::Arc;

use sru_config::{ConfigError, DescriptionError};
use sru_core::Diagnostic;
use sru_xml::XmlWriterError;
use thiserror::Error;

/// Failures that cannot be reported inside a response document.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The explain metadata could not be loaded.
    #[error(transparent)]
    Description(#[from] DescriptionError),

    /// Processing failed after part of the response reached the client.
    #[error("response failed after it was committed: {diagnostic}")]
    Committed {
        /// The diagnostic that could not be delivered.
        diagnostic: Diagnostic,
    },

    /// The error document itself could not be written.
    #[error("failed to write error document: {0}")]
    ErrorDocument(#[source] XmlWriterError),

    /// The transport rejected the response body.
    #[error("failed to deliver response: {0}")]
    Io(#[source] Arc<io::Error>),
}

impl From<io::Error> for ServerError {
    fn from(source: io::Error) -> Self {
        Self::Io(Arc::new(source))
    }
}
