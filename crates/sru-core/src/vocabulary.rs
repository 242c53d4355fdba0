//! Closed vocabularies used by request parameters and response elements.
//!
//! Each enum parses its wire form exactly (case-sensitive) through
//! `strum::EnumString`; unrecognised values are rejected so the negotiator
//! can report them as unsupported parameter values.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// How a record payload is embedded in the response.
///
/// # Example
///
/// ```
/// use sru_core::RecordXmlEscaping;
///
/// assert_eq!("string".parse::<RecordXmlEscaping>().ok(), Some(RecordXmlEscaping::String));
/// assert!("STRING".parse::<RecordXmlEscaping>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordXmlEscaping {
    /// The record is embedded as structured child markup.
    #[default]
    Xml,
    /// The record is embedded as an escaped text node.
    String,
}

impl RecordXmlEscaping {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Record packing requested through the 2.0 `recordPacking` parameter.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordPacking {
    /// Records are returned in the requested schema as-is.
    #[default]
    Packed,
    /// Record content may be spread across the response.
    Unpacked,
}

impl RecordPacking {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Who renders a stylesheet (`renderedBy`, 2.0 only).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RenderBy {
    /// The client applies the stylesheet.
    Client,
    /// The server applies the stylesheet.
    Server,
}

impl RenderBy {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Position marker for a scanned term.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WhereInList {
    /// First term of the list.
    First,
    /// Last term of the list.
    Last,
    /// The only term of the list.
    Only,
    /// Any other term.
    Inner,
}

impl WhereInList {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Precision of the reported total record count (2.0 only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCountPrecision {
    /// The count is exact.
    Exact,
    /// The count is unknown.
    Unknown,
    /// The count is an estimate.
    Estimate,
}

impl ResultCountPrecision {
    /// Returns the vocabulary URI written into the response.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Exact => "info:srw/vocabulary/resultCountPrecision/1/exact",
            Self::Unknown => "info:srw/vocabulary/resultCountPrecision/1/unknown",
            Self::Estimate => "info:srw/vocabulary/resultCountPrecision/1/estimate",
        }
    }
}
