//! The typed product of negotiation.

use std::collections::BTreeMap;

use sru_core::{
    Diagnostics, Operation, ProtocolVersion, RecordPacking, RecordXmlEscaping, RenderBy,
};
use sru_query::SruQuery;

/// A request that passed negotiation and validation.
///
/// Built once by the [`Negotiator`](super::Negotiator) and read-only
/// afterwards. Counts are already clamped against the server ceilings.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub(crate) operation: Operation,
    pub(crate) version: ProtocolVersion,
    pub(crate) escaping: RecordXmlEscaping,
    pub(crate) packing: Option<RecordPacking>,
    pub(crate) query: Option<SruQuery>,
    pub(crate) start_record: u32,
    pub(crate) maximum_records: Option<u32>,
    pub(crate) record_schema: Option<String>,
    pub(crate) record_xpath: Option<String>,
    pub(crate) result_set_ttl: Option<u32>,
    pub(crate) sort_keys: Option<String>,
    pub(crate) stylesheet: Option<String>,
    pub(crate) rendered_by: Option<RenderBy>,
    pub(crate) http_accept: Option<String>,
    pub(crate) response_type: Option<String>,
    pub(crate) scan_clause: Option<SruQuery>,
    pub(crate) response_position: u32,
    pub(crate) maximum_terms: Option<u32>,
    pub(crate) indent: Option<usize>,
    pub(crate) extensions: BTreeMap<String, String>,
    pub(crate) echoed: Vec<(&'static str, String)>,
}

impl ValidatedRequest {
    /// The negotiated operation.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// The negotiated protocol version.
    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// How record payloads are embedded.
    #[must_use]
    pub const fn escaping(&self) -> RecordXmlEscaping {
        self.escaping
    }

    /// Requested record packing (2.0 only).
    #[must_use]
    pub const fn packing(&self) -> Option<RecordPacking> {
        self.packing
    }

    /// The parsed search query, for searchRetrieve.
    #[must_use]
    pub const fn query(&self) -> Option<&SruQuery> {
        self.query.as_ref()
    }

    /// The 1-based position of the first record to return.
    #[must_use]
    pub const fn start_record(&self) -> u32 {
        self.start_record
    }

    /// Records to return; `None` when unlimited.
    #[must_use]
    pub const fn maximum_records(&self) -> Option<u32> {
        self.maximum_records
    }

    /// Requested record schema identifier or short name.
    #[must_use]
    pub fn record_schema(&self) -> Option<&str> {
        self.record_schema.as_deref()
    }

    /// Requested record XPath (1.1 only).
    #[must_use]
    pub fn record_xpath(&self) -> Option<&str> {
        self.record_xpath.as_deref()
    }

    /// Requested result set time-to-live in seconds.
    #[must_use]
    pub const fn result_set_ttl(&self) -> Option<u32> {
        self.result_set_ttl
    }

    /// Requested sort keys (1.1 only).
    #[must_use]
    pub fn sort_keys(&self) -> Option<&str> {
        self.sort_keys.as_deref()
    }

    /// Stylesheet referenced from the response.
    #[must_use]
    pub fn stylesheet(&self) -> Option<&str> {
        self.stylesheet.as_deref()
    }

    /// Who renders the stylesheet (2.0 only).
    #[must_use]
    pub const fn rendered_by(&self) -> Option<RenderBy> {
        self.rendered_by
    }

    /// Requested response media type (2.0 only).
    #[must_use]
    pub fn http_accept(&self) -> Option<&str> {
        self.http_accept.as_deref()
    }

    /// Requested response schema (2.0 only).
    #[must_use]
    pub fn response_type(&self) -> Option<&str> {
        self.response_type.as_deref()
    }

    /// The parsed scan clause, for scan.
    #[must_use]
    pub const fn scan_clause(&self) -> Option<&SruQuery> {
        self.scan_clause.as_ref()
    }

    /// Position of the scan term within the returned list.
    #[must_use]
    pub const fn response_position(&self) -> u32 {
        self.response_position
    }

    /// Terms to return; `None` when unlimited.
    #[must_use]
    pub const fn maximum_terms(&self) -> Option<u32> {
        self.maximum_terms
    }

    /// Indentation width for the response, if indenting.
    #[must_use]
    pub const fn indent(&self) -> Option<usize> {
        self.indent
    }

    /// Returns the value of an extension parameter.
    #[must_use]
    pub fn extension(&self, name: &str) -> Option<&str> {
        self.extensions.get(name).map(String::as_str)
    }

    /// Iterates over extension parameters in name order.
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extensions
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Standard parameters as supplied by the client, in table order.
    #[must_use]
    pub const fn echoed_parameters(&self) -> &[(&'static str, String)] {
        self.echoed.as_slice()
    }
}

/// A request that failed negotiation.
///
/// Carries enough context to render the error document in the right shape
/// and namespace set.
#[derive(Debug, Clone)]
pub struct NegotiationFailure {
    pub(crate) operation: Operation,
    pub(crate) version: ProtocolVersion,
    pub(crate) indent: Option<usize>,
    pub(crate) diagnostics: Diagnostics,
}

impl NegotiationFailure {
    /// Operation the error document is shaped for.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Version the error document is written in.
    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Every diagnostic raised during negotiation, in order.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consumes the failure, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}
