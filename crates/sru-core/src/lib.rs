//! Core data model for the search/retrieve protocol server.
//!
//! This crate holds the types every other crate in the workspace agrees on:
//! protocol versions and operations, the closed parameter vocabularies,
//! diagnostics, the fatal error value, and the namespace profiles used when
//! writing responses.
//!
//! # Core types
//!
//! - [`ProtocolVersion`] and [`Operation`]: what was negotiated
//! - [`VersionTraits`]: per-version element and parameter naming
//! - [`Diagnostic`], [`DiagnosticCode`], [`Diagnostics`]: protocol errors
//! - [`SruError`]: a fatal diagnostic
//! - [`NamespaceProfile`]: namespace URIs and prefixes for one response
//!
//! # Example
//!
//! ```
//! use sru_core::{DiagnosticCode, Diagnostics, ProtocolVersion};
//!
//! let mut diagnostics = Diagnostics::new();
//! diagnostics.add(DiagnosticCode::UnsupportedParameter, Some("sortKeys"), None);
//! assert!(ProtocolVersion::V1_2.is_within(ProtocolVersion::V1_1, ProtocolVersion::V2_0));
//! assert_eq!(diagnostics.len(), 1);
//! ```

mod diagnostic;
mod error;
mod namespace;
mod version;
mod vocabulary;

pub use diagnostic::{
    DIAGNOSTIC_URI_PREFIX, DIAGNOSTICS_RECORD_SCHEMA, Diagnostic, DiagnosticCode, DiagnosticId,
    Diagnostics,
};
pub use error::SruError;
pub use namespace::{
    LegacyNamespaceMode, LegacyNamespaceModeParseError, NamespaceBinding, NamespaceProfile,
};
pub use version::{Operation, ProtocolVersion, ProtocolVersionParseError, VersionTraits};
pub use vocabulary::{RecordPacking, RecordXmlEscaping, RenderBy, ResultCountPrecision, WhereInList};

#[cfg(test)]
mod tests;
