//! Protocol versions, operations, and the per-version vocabulary table.
//!
//! Version-dependent naming lives in [`VersionTraits`] rows rather than in
//! scattered `match` arms, so supporting a new protocol revision means adding
//! a row here.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Wire versions of the search/retrieve protocol.
///
/// The declaration order defines the total order used for range checks.
///
/// # Example
///
/// ```
/// use sru_core::ProtocolVersion;
///
/// assert!(ProtocolVersion::V1_1 < ProtocolVersion::V2_0);
/// assert_eq!("1.2".parse::<ProtocolVersion>().ok(), Some(ProtocolVersion::V1_2));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    IntoStaticStr,
)]
pub enum ProtocolVersion {
    /// Version 1.1.
    #[serde(rename = "1.1")]
    #[strum(serialize = "1.1")]
    V1_1,
    /// Version 1.2.
    #[serde(rename = "1.2")]
    #[strum(serialize = "1.2")]
    V1_2,
    /// Version 2.0.
    #[serde(rename = "2.0")]
    #[strum(serialize = "2.0")]
    V2_0,
}

/// Errors encountered while parsing a [`ProtocolVersion`] from text.
pub type ProtocolVersionParseError = strum::ParseError;

impl ProtocolVersion {
    /// Returns the canonical wire form (`1.1`, `1.2`, `2.0`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Parses the value of a legacy `version` request parameter.
    ///
    /// Only the 1.x versions can be requested explicitly; 2.0 is selected by
    /// the absence of the parameter.
    #[must_use]
    pub fn from_legacy_parameter(value: &str) -> Option<Self> {
        match value {
            "1.1" => Some(Self::V1_1),
            "1.2" => Some(Self::V1_2),
            _ => None,
        }
    }

    /// Returns `true` when `min <= self <= max`.
    #[must_use]
    pub fn is_within(self, min: Self, max: Self) -> bool {
        min <= self && self <= max
    }

    /// Returns the vocabulary row for this version.
    #[must_use]
    pub const fn traits(self) -> &'static VersionTraits {
        match self {
            Self::V1_1 | Self::V1_2 => &VersionTraits::LEGACY,
            Self::V2_0 => &VersionTraits::OASIS,
        }
    }
}

/// Version-dependent element and parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionTraits {
    /// Request parameter and record element naming the escaping mode.
    pub escaping_name: &'static str,
    /// Element holding the result set time-to-live.
    pub result_set_ttl_element: &'static str,
    /// Whether records carry a `recordIdentifier` element.
    pub record_identifier: bool,
    /// Whether search responses carry a `resultCountPrecision` element.
    pub result_count_precision: bool,
    /// Whether echoed requests repeat the `version` element.
    pub echo_version: bool,
    /// Whether the record packing parameter (`packed`/`unpacked`) exists.
    pub record_packing: bool,
}

impl VersionTraits {
    const LEGACY: Self = Self {
        escaping_name: "recordPacking",
        result_set_ttl_element: "resultSetIdleTime",
        record_identifier: false,
        result_count_precision: false,
        echo_version: true,
        record_packing: false,
    };

    const OASIS: Self = Self {
        escaping_name: "recordXMLEscaping",
        result_set_ttl_element: "resultSetTTL",
        record_identifier: true,
        result_count_precision: true,
        echo_version: false,
        record_packing: true,
    };
}

/// Operations defined by the protocol.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Operation {
    /// Describe the server and its databases.
    Explain,
    /// Browse index terms.
    Scan,
    /// Run a query and retrieve records.
    SearchRetrieve,
}

impl Operation {
    /// Returns the wire value of the legacy `operation` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Returns the local name of the response root element.
    #[must_use]
    pub const fn response_element(self) -> &'static str {
        match self {
            Self::Explain => "explainResponse",
            Self::Scan => "scanResponse",
            Self::SearchRetrieve => "searchRetrieveResponse",
        }
    }

    /// Returns the local name of the echoed request element.
    #[must_use]
    pub const fn echoed_request_element(self) -> &'static str {
        match self {
            Self::Explain => "echoedExplainRequest",
            Self::Scan => "echoedScanRequest",
            Self::SearchRetrieve => "echoedSearchRetrieveRequest",
        }
    }
}
