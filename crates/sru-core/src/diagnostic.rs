//! Diagnostic records in the protocol's own vocabulary.
//!
//! Every protocol-level problem is surfaced as a [`Diagnostic`].
//! Non-fatal diagnostics accumulate in a [`Diagnostics`] list and are
//! rendered together at the end of the response; fatal ones travel as an
//! [`SruError`](crate::SruError).

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// URI prefix of the standard diagnostic set.
pub const DIAGNOSTIC_URI_PREFIX: &str = "info:srw/diagnostic/1/";

/// Record schema identifier used for surrogate diagnostic records.
pub const DIAGNOSTICS_RECORD_SCHEMA: &str = "info:srw/schema/1/diagnostics-v1.1";

/// Standard diagnostic codes.
///
/// Each variant maps to a numeric code of the standard diagnostic set and a
/// canonical default message.
///
/// # Example
///
/// ```
/// use sru_core::DiagnosticCode;
///
/// let code = DiagnosticCode::MandatoryParameterNotSupplied;
/// assert_eq!(code.number(), 7);
/// assert_eq!(format!("{code}"), "info:srw/diagnostic/1/7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DiagnosticCode {
    /// 1: General system error.
    GeneralSystemError,
    /// 2: System temporarily unavailable.
    SystemTemporarilyUnavailable,
    /// 3: Authentication error.
    AuthenticationError,
    /// 4: Unsupported operation.
    UnsupportedOperation,
    /// 5: Unsupported version.
    UnsupportedVersion,
    /// 6: Unsupported parameter value.
    UnsupportedParameterValue,
    /// 7: Mandatory parameter not supplied.
    MandatoryParameterNotSupplied,
    /// 8: Unsupported parameter.
    UnsupportedParameter,
    /// 10: Query syntax error.
    QuerySyntaxError,
    /// 16: Unsupported index.
    UnsupportedIndex,
    /// 19: Unsupported relation.
    UnsupportedRelation,
    /// 37: Unsupported boolean operator.
    UnsupportedBooleanOperator,
    /// 48: Query feature unsupported.
    QueryFeatureUnsupported,
    /// 61: First record position out of range.
    FirstRecordPositionOutOfRange,
    /// 64: Record temporarily unavailable.
    RecordTemporarilyUnavailable,
    /// 65: Record does not exist.
    RecordDoesNotExist,
    /// 66: Unknown schema for retrieval.
    UnknownSchemaForRetrieval,
    /// 67: Record not available in this schema.
    RecordNotAvailableInThisSchema,
    /// 68: Not authorised to send record.
    NotAuthorisedToSendRecord,
    /// 70: Record too large to send.
    RecordTooLargeToSend,
    /// 71: Unsupported record packing.
    UnsupportedRecordPacking,
    /// 72: XPath retrieval unsupported.
    XPathRetrievalUnsupported,
    /// 80: Sort not supported.
    SortNotSupported,
    /// 110: Stylesheets not supported.
    StylesheetsNotSupported,
    /// 120: Response position out of range.
    ResponsePositionOutOfRange,
    /// 121: Too many terms requested.
    TooManyTermsRequested,
    /// 235: Database does not exist.
    DatabaseDoesNotExist,
}

impl DiagnosticCode {
    const ALL: [Self; 27] = [
        Self::GeneralSystemError,
        Self::SystemTemporarilyUnavailable,
        Self::AuthenticationError,
        Self::UnsupportedOperation,
        Self::UnsupportedVersion,
        Self::UnsupportedParameterValue,
        Self::MandatoryParameterNotSupplied,
        Self::UnsupportedParameter,
        Self::QuerySyntaxError,
        Self::UnsupportedIndex,
        Self::UnsupportedRelation,
        Self::UnsupportedBooleanOperator,
        Self::QueryFeatureUnsupported,
        Self::FirstRecordPositionOutOfRange,
        Self::RecordTemporarilyUnavailable,
        Self::RecordDoesNotExist,
        Self::UnknownSchemaForRetrieval,
        Self::RecordNotAvailableInThisSchema,
        Self::NotAuthorisedToSendRecord,
        Self::RecordTooLargeToSend,
        Self::UnsupportedRecordPacking,
        Self::XPathRetrievalUnsupported,
        Self::SortNotSupported,
        Self::StylesheetsNotSupported,
        Self::ResponsePositionOutOfRange,
        Self::TooManyTermsRequested,
        Self::DatabaseDoesNotExist,
    ];

    /// Returns the numeric code within the standard diagnostic set.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::GeneralSystemError => 1,
            Self::SystemTemporarilyUnavailable => 2,
            Self::AuthenticationError => 3,
            Self::UnsupportedOperation => 4,
            Self::UnsupportedVersion => 5,
            Self::UnsupportedParameterValue => 6,
            Self::MandatoryParameterNotSupplied => 7,
            Self::UnsupportedParameter => 8,
            Self::QuerySyntaxError => 10,
            Self::UnsupportedIndex => 16,
            Self::UnsupportedRelation => 19,
            Self::UnsupportedBooleanOperator => 37,
            Self::QueryFeatureUnsupported => 48,
            Self::FirstRecordPositionOutOfRange => 61,
            Self::RecordTemporarilyUnavailable => 64,
            Self::RecordDoesNotExist => 65,
            Self::UnknownSchemaForRetrieval => 66,
            Self::RecordNotAvailableInThisSchema => 67,
            Self::NotAuthorisedToSendRecord => 68,
            Self::RecordTooLargeToSend => 70,
            Self::UnsupportedRecordPacking => 71,
            Self::XPathRetrievalUnsupported => 72,
            Self::SortNotSupported => 80,
            Self::StylesheetsNotSupported => 110,
            Self::ResponsePositionOutOfRange => 120,
            Self::TooManyTermsRequested => 121,
            Self::DatabaseDoesNotExist => 235,
        }
    }

    /// Looks up a standard code by number.
    #[must_use]
    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.number() == number)
    }

    /// Returns the canonical message for this code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::GeneralSystemError => "General system error",
            Self::SystemTemporarilyUnavailable => "System temporarily unavailable",
            Self::AuthenticationError => "Authentication error",
            Self::UnsupportedOperation => "Unsupported operation",
            Self::UnsupportedVersion => "Unsupported version",
            Self::UnsupportedParameterValue => "Unsupported parameter value",
            Self::MandatoryParameterNotSupplied => "Mandatory parameter not supplied",
            Self::UnsupportedParameter => "Unsupported parameter",
            Self::QuerySyntaxError => "Query syntax error",
            Self::UnsupportedIndex => "Unsupported index",
            Self::UnsupportedRelation => "Unsupported relation",
            Self::UnsupportedBooleanOperator => "Unsupported boolean operator",
            Self::QueryFeatureUnsupported => "Query feature unsupported",
            Self::FirstRecordPositionOutOfRange => "First record position out of range",
            Self::RecordTemporarilyUnavailable => "Record temporarily unavailable",
            Self::RecordDoesNotExist => "Record does not exist",
            Self::UnknownSchemaForRetrieval => "Unknown schema for retrieval",
            Self::RecordNotAvailableInThisSchema => "Record not available in this schema",
            Self::NotAuthorisedToSendRecord => "Not authorised to send record",
            Self::RecordTooLargeToSend => "Record too large to send",
            Self::UnsupportedRecordPacking => "Unsupported record packing",
            Self::XPathRetrievalUnsupported => "XPath retrieval unsupported",
            Self::SortNotSupported => "Sort not supported",
            Self::StylesheetsNotSupported => "Stylesheets not supported",
            Self::ResponsePositionOutOfRange => "Response position out of range",
            Self::TooManyTermsRequested => "Too many terms requested",
            Self::DatabaseDoesNotExist => "Database does not exist",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DIAGNOSTIC_URI_PREFIX}{}", self.number())
    }
}

/// Identity of a diagnostic: a standard code or a caller-supplied URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticId {
    /// A code from the standard diagnostic set.
    Code(DiagnosticCode),
    /// A diagnostic outside the standard set, identified by its full URI.
    Uri(String),
}

/// A single diagnostic.
///
/// # Example
///
/// ```
/// use sru_core::{Diagnostic, DiagnosticCode};
///
/// let diag = Diagnostic::new(DiagnosticCode::UnsupportedParameter).with_details("sortKeys");
/// assert_eq!(diag.uri(), "info:srw/diagnostic/1/8");
/// assert_eq!(diag.details(), Some("sortKeys"));
/// assert_eq!(diag.message(), Some("Unsupported parameter"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    id: DiagnosticId,
    details: Option<String>,
    message: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic for a standard code with no details.
    #[must_use]
    pub const fn new(code: DiagnosticCode) -> Self {
        Self {
            id: DiagnosticId::Code(code),
            details: None,
            message: None,
        }
    }

    /// Creates a diagnostic identified by a full URI.
    ///
    /// URIs inside the standard set resolve to their [`DiagnosticCode`] so
    /// the default message table applies.
    #[must_use]
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let code = uri
            .strip_prefix(DIAGNOSTIC_URI_PREFIX)
            .and_then(|number| number.parse().ok())
            .and_then(DiagnosticCode::from_number);
        let id = match code {
            Some(code) => DiagnosticId::Code(code),
            None => DiagnosticId::Uri(uri),
        };
        Self {
            id,
            details: None,
            message: None,
        }
    }

    /// Attaches a details string.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attaches an explicit human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the identity of this diagnostic.
    #[must_use]
    pub const fn id(&self) -> &DiagnosticId {
        &self.id
    }

    /// Returns the standard code, if this diagnostic has one.
    #[must_use]
    pub const fn code(&self) -> Option<DiagnosticCode> {
        match self.id {
            DiagnosticId::Code(code) => Some(code),
            DiagnosticId::Uri(_) => None,
        }
    }

    /// Returns the identifying URI written into responses.
    #[must_use]
    pub fn uri(&self) -> Cow<'_, str> {
        match &self.id {
            DiagnosticId::Code(code) => Cow::Owned(code.to_string()),
            DiagnosticId::Uri(uri) => Cow::Borrowed(uri),
        }
    }

    /// Returns the details string, if any.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns the explicit message or the default for a standard code.
    ///
    /// Diagnostics identified by a non-standard URI have no default.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or_else(|| self.code().map(DiagnosticCode::default_message))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())?;
        if let Some(message) = self.message() {
            write!(f, " ({message})")?;
        }
        if let Some(details) = self.details() {
            write!(f, ": {details}")?;
        }
        Ok(())
    }
}

/// Ordered, append-only diagnostic list.
///
/// Diagnostics are never deduplicated; insertion order is the render order.
///
/// # Example
///
/// ```
/// use sru_core::{DiagnosticCode, Diagnostics};
///
/// let mut diagnostics = Diagnostics::new();
/// diagnostics.add(DiagnosticCode::UnsupportedParameter, Some("foo"), None);
/// diagnostics.add(DiagnosticCode::UnsupportedParameter, Some("foo"), None);
/// assert_eq!(diagnostics.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a standard diagnostic.
    pub fn add(&mut self, code: DiagnosticCode, details: Option<&str>, message: Option<&str>) {
        let mut diagnostic = Diagnostic::new(code);
        diagnostic.details = details.map(str::to_owned);
        diagnostic.message = message.map(str::to_owned);
        self.entries.push(diagnostic);
    }

    /// Appends a prepared diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Appends every diagnostic from `other`, preserving order.
    pub fn append(&mut self, other: &mut Self) {
        self.entries.append(&mut other.entries);
    }

    /// Returns the diagnostics in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Iterates over the diagnostics in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if any diagnostic carries the given code.
    #[must_use]
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.entries.iter().any(|d| d.code() == Some(code))
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(entries: Vec<Diagnostic>) -> Self {
        Self { entries }
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
