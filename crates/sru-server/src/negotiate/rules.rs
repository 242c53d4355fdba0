//! Declarative parameter legality tables.
//!
//! Each operation has one table of [`ParameterRule`] rows. A row names a
//! logical parameter, whether it is mandatory, and the inclusive version
//! range in which it is legal. Wire names that differ between versions are
//! resolved through [`Parameter::name`].

use sru_core::{Operation, ProtocolVersion};

use ProtocolVersion::{V1_1, V1_2, V2_0};

/// Logical request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// `operation`.
    Operation,
    /// `version`.
    Version,
    /// `query`.
    Query,
    /// `queryType`.
    QueryType,
    /// `startRecord`.
    StartRecord,
    /// `maximumRecords`.
    MaximumRecords,
    /// Record escaping: `recordPacking` in 1.x, `recordXMLEscaping` in 2.0.
    RecordXmlEscaping,
    /// Record packing (`packed`/`unpacked`).
    RecordPacking,
    /// `recordSchema`.
    RecordSchema,
    /// `recordXPath`.
    RecordXPath,
    /// `resultSetTTL`.
    ResultSetTtl,
    /// `sortKeys`.
    SortKeys,
    /// `stylesheet`.
    Stylesheet,
    /// `renderedBy`.
    RenderedBy,
    /// `httpAccept`.
    HttpAccept,
    /// `responseType`.
    ResponseType,
    /// `scanClause`.
    ScanClause,
    /// `responsePosition`.
    ResponsePosition,
    /// `maximumTerms`.
    MaximumTerms,
}

impl Parameter {
    /// Returns the wire name of this parameter in `version`.
    #[must_use]
    pub const fn name(self, version: ProtocolVersion) -> &'static str {
        match self {
            Self::Operation => "operation",
            Self::Version => "version",
            Self::Query => "query",
            Self::QueryType => "queryType",
            Self::StartRecord => "startRecord",
            Self::MaximumRecords => "maximumRecords",
            Self::RecordXmlEscaping => version.traits().escaping_name,
            Self::RecordPacking => "recordPacking",
            Self::RecordSchema => "recordSchema",
            Self::RecordXPath => "recordXPath",
            Self::ResultSetTtl => "resultSetTTL",
            Self::SortKeys => "sortKeys",
            Self::Stylesheet => "stylesheet",
            Self::RenderedBy => "renderedBy",
            Self::HttpAccept => "httpAccept",
            Self::ResponseType => "responseType",
            Self::ScanClause => "scanClause",
            Self::ResponsePosition => "responsePosition",
            Self::MaximumTerms => "maximumTerms",
        }
    }

    /// Smallest legal integer value, for integer parameters.
    #[must_use]
    pub const fn minimum(self) -> Option<u32> {
        match self {
            Self::StartRecord | Self::MaximumTerms => Some(1),
            Self::MaximumRecords | Self::ResultSetTtl | Self::ResponsePosition => Some(0),
            _ => None,
        }
    }
}

/// One row of a legality table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterRule {
    /// The parameter governed by this row.
    pub parameter: Parameter,
    /// Whether the parameter must be supplied.
    pub mandatory: bool,
    /// First version in which the parameter is legal.
    pub min: ProtocolVersion,
    /// Last version in which the parameter is legal.
    pub max: ProtocolVersion,
}

impl ParameterRule {
    const fn optional(parameter: Parameter, min: ProtocolVersion, max: ProtocolVersion) -> Self {
        Self {
            parameter,
            mandatory: false,
            min,
            max,
        }
    }

    const fn mandatory(parameter: Parameter, min: ProtocolVersion, max: ProtocolVersion) -> Self {
        Self {
            parameter,
            mandatory: true,
            min,
            max,
        }
    }

    /// Returns `true` if the parameter may be supplied in `version`.
    #[must_use]
    pub fn is_legal(&self, version: ProtocolVersion) -> bool {
        version.is_within(self.min, self.max)
    }

    /// Returns the wire name of the parameter in `version`.
    #[must_use]
    pub const fn name(&self, version: ProtocolVersion) -> &'static str {
        self.parameter.name(version)
    }
}

const EXPLAIN_RULES: &[ParameterRule] = &[
    ParameterRule::optional(Parameter::Operation, V1_1, V1_2),
    ParameterRule::optional(Parameter::Version, V1_1, V1_2),
    ParameterRule::optional(Parameter::RecordXmlEscaping, V1_1, V2_0),
    ParameterRule::optional(Parameter::Stylesheet, V1_1, V2_0),
    ParameterRule::optional(Parameter::HttpAccept, V2_0, V2_0),
];

const SCAN_RULES: &[ParameterRule] = &[
    ParameterRule::mandatory(Parameter::Operation, V1_1, V1_2),
    ParameterRule::mandatory(Parameter::Version, V1_1, V1_2),
    ParameterRule::mandatory(Parameter::ScanClause, V1_1, V2_0),
    ParameterRule::optional(Parameter::ResponsePosition, V1_1, V2_0),
    ParameterRule::optional(Parameter::MaximumTerms, V1_1, V2_0),
    ParameterRule::optional(Parameter::Stylesheet, V1_1, V2_0),
    ParameterRule::optional(Parameter::RenderedBy, V2_0, V2_0),
    ParameterRule::optional(Parameter::HttpAccept, V2_0, V2_0),
];

const SEARCH_RETRIEVE_RULES: &[ParameterRule] = &[
    ParameterRule::mandatory(Parameter::Operation, V1_1, V1_2),
    ParameterRule::mandatory(Parameter::Version, V1_1, V1_2),
    ParameterRule::optional(Parameter::QueryType, V2_0, V2_0),
    ParameterRule::mandatory(Parameter::Query, V1_1, V2_0),
    ParameterRule::optional(Parameter::StartRecord, V1_1, V2_0),
    ParameterRule::optional(Parameter::MaximumRecords, V1_1, V2_0),
    ParameterRule::optional(Parameter::RecordXmlEscaping, V1_1, V2_0),
    ParameterRule::optional(Parameter::RecordPacking, V2_0, V2_0),
    ParameterRule::optional(Parameter::RecordSchema, V1_1, V2_0),
    ParameterRule::optional(Parameter::RecordXPath, V1_1, V1_1),
    ParameterRule::optional(Parameter::ResultSetTtl, V1_1, V2_0),
    ParameterRule::optional(Parameter::SortKeys, V1_1, V1_1),
    ParameterRule::optional(Parameter::Stylesheet, V1_1, V2_0),
    ParameterRule::optional(Parameter::RenderedBy, V2_0, V2_0),
    ParameterRule::optional(Parameter::HttpAccept, V2_0, V2_0),
    ParameterRule::optional(Parameter::ResponseType, V2_0, V2_0),
];

/// Returns the legality table for `operation`.
#[must_use]
pub const fn rules_for(operation: Operation) -> &'static [ParameterRule] {
    match operation {
        Operation::Explain => EXPLAIN_RULES,
        Operation::Scan => SCAN_RULES,
        Operation::SearchRetrieve => SEARCH_RETRIEVE_RULES,
    }
}
