//! Built-in configuration values.

use sru_core::{LegacyNamespaceMode, ProtocolVersion};

use crate::logging::LogFormat;

/// Transport advertised when none is configured.
pub const DEFAULT_TRANSPORT: &str = "http";

/// Host advertised when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Port advertised when none is configured.
pub const DEFAULT_PORT: u16 = 80;

/// Database path segment used when none is configured.
pub const DEFAULT_DATABASE: &str = "sru";

/// Default number of records returned by a search.
pub const DEFAULT_NUMBER_OF_RECORDS: u32 = 100;

/// Default ceiling on records returned by a search.
pub const DEFAULT_MAXIMUM_RECORDS: u32 = 250;

/// Default number of terms returned by a scan.
pub const DEFAULT_NUMBER_OF_TERMS: u32 = 250;

/// Default ceiling on terms returned by a scan.
pub const DEFAULT_MAXIMUM_TERMS: u32 = 500;

/// Indentation width meaning "do not indent".
pub const NO_INDENT: i32 = -1;

/// Bytes buffered before a response is committed to the transport.
pub const DEFAULT_RESPONSE_BUFFER_SIZE: usize = 64 * 1024;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Lowest protocol version served by default.
#[must_use]
pub const fn default_min_version() -> ProtocolVersion {
    ProtocolVersion::V1_1
}

/// Highest protocol version served by default.
#[must_use]
pub const fn default_max_version() -> ProtocolVersion {
    ProtocolVersion::V2_0
}

/// Version assumed for requests that do not state one.
#[must_use]
pub const fn default_version() -> ProtocolVersion {
    ProtocolVersion::V1_2
}

/// Namespace set used for 1.x responses by default.
#[must_use]
pub const fn default_legacy_namespace_mode() -> LegacyNamespaceMode {
    LegacyNamespaceMode::Loc
}

/// Owned transport value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_transport() -> String {
    DEFAULT_TRANSPORT.to_owned()
}

/// Owned host value used where allocation is required.
#[must_use]
pub fn default_host() -> String {
    DEFAULT_HOST.to_owned()
}

/// Owned database value used where allocation is required.
#[must_use]
pub fn default_database() -> String {
    DEFAULT_DATABASE.to_owned()
}

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default log output format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
