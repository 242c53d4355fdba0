//! Namespace profiles for response documents.
//!
//! Exactly one profile applies to a response. It is selected from the
//! negotiated version and the configured legacy namespace mode, and stays
//! fixed for the life of that response.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::version::ProtocolVersion;

/// A namespace URI together with the prefix used when writing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceBinding {
    /// Prefix written on elements in this namespace.
    pub prefix: &'static str,
    /// Namespace URI.
    pub uri: &'static str,
}

impl NamespaceBinding {
    const fn new(prefix: &'static str, uri: &'static str) -> Self {
        Self { prefix, uri }
    }
}

/// Namespace set used for 1.x responses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LegacyNamespaceMode {
    /// Library of Congress namespaces (`http://www.loc.gov/zing/srw/`).
    #[default]
    Loc,
    /// OASIS namespaces.
    Oasis,
}

/// Errors encountered while parsing a [`LegacyNamespaceMode`] from text.
pub type LegacyNamespaceModeParseError = strum::ParseError;

/// The namespaces written into one response.
///
/// # Example
///
/// ```
/// use sru_core::{LegacyNamespaceMode, NamespaceProfile, ProtocolVersion};
///
/// let profile = NamespaceProfile::select(ProtocolVersion::V1_2, LegacyNamespaceMode::Loc);
/// assert_eq!(profile.response.uri, "http://www.loc.gov/zing/srw/");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceProfile {
    /// Root element namespace for explain and searchRetrieve responses.
    pub response: NamespaceBinding,
    /// Namespace of scan response elements.
    pub scan: NamespaceBinding,
    /// Namespace of diagnostic elements.
    pub diagnostic: NamespaceBinding,
    /// Namespace of the explain record.
    pub explain: NamespaceBinding,
    /// Namespace of XCQL query echoes.
    pub xcql: NamespaceBinding,
}

const EXPLAIN: NamespaceBinding = NamespaceBinding::new("zr", "http://explain.z3950.org/dtd/2.0/");

impl NamespaceProfile {
    /// Library of Congress profile for 1.x responses.
    pub const LOC: Self = Self {
        response: NamespaceBinding::new("sru", "http://www.loc.gov/zing/srw/"),
        scan: NamespaceBinding::new("sru", "http://www.loc.gov/zing/srw/"),
        diagnostic: NamespaceBinding::new("diag", "http://www.loc.gov/zing/srw/diagnostic/"),
        explain: EXPLAIN,
        xcql: NamespaceBinding::new("xcql", "http://www.loc.gov/zing/cql/xcql/"),
    };

    /// OASIS profile for 1.x responses in legacy `oasis` mode.
    pub const OASIS_LEGACY: Self = Self {
        response: NamespaceBinding::new(
            "sru",
            "http://docs.oasis-open.org/ns/search-ws/sruResponse",
        ),
        scan: NamespaceBinding::new("scan", "http://docs.oasis-open.org/ns/search-ws/scan"),
        diagnostic: NamespaceBinding::new(
            "diag",
            "http://docs.oasis-open.org/ns/search-ws/diagnostic",
        ),
        explain: EXPLAIN,
        xcql: NamespaceBinding::new("xcql", "http://docs.oasis-open.org/ns/search-ws/xcql"),
    };

    /// OASIS profile for 2.0 responses.
    pub const OASIS: Self = Self {
        response: NamespaceBinding::new(
            "sruResponse",
            "http://docs.oasis-open.org/ns/search-ws/sruResponse",
        ),
        scan: NamespaceBinding::new("scan", "http://docs.oasis-open.org/ns/search-ws/scan"),
        diagnostic: NamespaceBinding::new(
            "diag",
            "http://docs.oasis-open.org/ns/search-ws/diagnostic",
        ),
        explain: EXPLAIN,
        xcql: NamespaceBinding::new("xcql", "http://docs.oasis-open.org/ns/search-ws/xcql"),
    };

    /// Selects the profile for a negotiated version and legacy mode.
    #[must_use]
    pub const fn select(version: ProtocolVersion, mode: LegacyNamespaceMode) -> &'static Self {
        match (version, mode) {
            (ProtocolVersion::V2_0, _) => &Self::OASIS,
            (_, LegacyNamespaceMode::Loc) => &Self::LOC,
            (_, LegacyNamespaceMode::Oasis) => &Self::OASIS_LEGACY,
        }
    }

    /// Returns the prefix bound to `uri` in this profile, if any.
    #[must_use]
    pub fn prefix_for(&self, uri: &str) -> Option<&'static str> {
        [
            self.response,
            self.scan,
            self.diagnostic,
            self.explain,
            self.xcql,
        ]
        .into_iter()
        .find(|binding| binding.uri == uri)
        .map(|binding| binding.prefix)
    }
}
