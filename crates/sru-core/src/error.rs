//! Fatal processing errors.

use std::fmt;

use thiserror::Error;

use crate::diagnostic::{Diagnostic, DiagnosticCode};

/// A fatal diagnostic that aborts normal response construction.
///
/// Returning an `SruError` from any stage routes the request to the
/// fatal-error document, which renders the carried diagnostic after any
/// diagnostics collected so far.
///
/// # Example
///
/// ```
/// use sru_core::{DiagnosticCode, SruError};
///
/// let error = SruError::new(DiagnosticCode::FirstRecordPositionOutOfRange)
///     .with_details("50");
/// assert_eq!(error.diagnostic().details(), Some("50"));
/// ```
#[derive(Debug, Error)]
#[error("{diagnostic}")]
pub struct SruError {
    diagnostic: Diagnostic,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SruError {
    /// Creates a fatal error for a standard code.
    #[must_use]
    pub const fn new(code: DiagnosticCode) -> Self {
        Self {
            diagnostic: Diagnostic::new(code),
            source: None,
        }
    }

    /// Creates a general system error wrapping an underlying cause.
    #[must_use]
    pub fn system(
        message: impl fmt::Display,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            diagnostic: Diagnostic::new(DiagnosticCode::GeneralSystemError)
                .with_details(message.to_string()),
            source: Some(source.into()),
        }
    }

    /// Attaches a details string to the carried diagnostic.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.diagnostic = self.diagnostic.with_details(details);
        self
    }

    /// Attaches an explicit message to the carried diagnostic.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.diagnostic = self.diagnostic.with_message(message);
        self
    }

    /// Returns the carried diagnostic.
    #[must_use]
    pub const fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    /// Consumes the error, returning the carried diagnostic.
    #[must_use]
    pub fn into_diagnostic(self) -> Diagnostic {
        self.diagnostic
    }
}

impl From<Diagnostic> for SruError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostic,
            source: None,
        }
    }
}
