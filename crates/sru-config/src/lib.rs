//! Configuration for the search/retrieve protocol server.
//!
//! Values are layered by `ortho_config`: built-in defaults, then an optional
//! TOML file named by `--config-path`, then `SRU_*` environment variables,
//! then command-line flags.

mod defaults;
mod description;
mod error;
mod logging;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use sru_core::{LegacyNamespaceMode, ProtocolVersion};

pub use defaults::{
    DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_MAXIMUM_RECORDS,
    DEFAULT_MAXIMUM_TERMS, DEFAULT_NUMBER_OF_RECORDS, DEFAULT_NUMBER_OF_TERMS, DEFAULT_PORT,
    DEFAULT_RESPONSE_BUFFER_SIZE, DEFAULT_TRANSPORT, NO_INDENT, default_database, default_host,
    default_legacy_namespace_mode, default_log_filter, default_log_filter_string,
    default_log_format, default_max_version, default_min_version, default_transport,
    default_version,
};
pub use description::{
    DatabaseInfo, DescriptionError, IndexInfo, IndexMap, IndexSet, LocalizedString, SchemaInfo,
    ServerDescription,
};
pub use error::ConfigError;
pub use logging::{LogFormat, LogFormatParseError};

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_number_of_records() -> u32 {
    DEFAULT_NUMBER_OF_RECORDS
}

const fn default_maximum_records() -> u32 {
    DEFAULT_MAXIMUM_RECORDS
}

const fn default_number_of_terms() -> u32 {
    DEFAULT_NUMBER_OF_TERMS
}

const fn default_maximum_terms() -> u32 {
    DEFAULT_MAXIMUM_TERMS
}

const fn default_indent_response() -> i32 {
    NO_INDENT
}

const fn default_response_buffer_size() -> usize {
    DEFAULT_RESPONSE_BUFFER_SIZE
}

/// Server configuration shared by every request.
///
/// # Example
///
/// ```
/// use sru_config::Config;
///
/// let config = Config {
///     host: "search.example.org".to_owned(),
///     port: 8080,
///     ..Config::default()
/// };
/// assert_eq!(config.base_url(false), "http://search.example.org:8080/sru");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SRU")]
pub struct Config {
    /// Transport advertised in explain records and `baseUrl`.
    #[serde(default = "default_transport")]
    #[ortho_config(default = default_transport())]
    pub transport: String,
    /// Host advertised in explain records and `baseUrl`.
    #[serde(default = "default_host")]
    #[ortho_config(default = default_host())]
    pub host: String,
    /// Port advertised in explain records and `baseUrl`.
    #[serde(default = "default_port")]
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// Database path segment.
    #[serde(default = "default_database")]
    #[ortho_config(default = default_database())]
    pub database: String,
    /// Lowest protocol version served.
    #[serde(default = "default_min_version")]
    #[ortho_config(default = default_min_version())]
    pub min_version: ProtocolVersion,
    /// Highest protocol version served.
    #[serde(default = "default_max_version")]
    #[ortho_config(default = default_max_version())]
    pub max_version: ProtocolVersion,
    /// Version assumed for explain requests that do not state one.
    #[serde(default = "default_version")]
    #[ortho_config(default = default_version())]
    pub default_version: ProtocolVersion,
    /// Namespace set used for 1.x responses.
    #[serde(default = "default_legacy_namespace_mode")]
    #[ortho_config(default = default_legacy_namespace_mode())]
    pub legacy_namespace_mode: LegacyNamespaceMode,
    /// Records returned when `maximumRecords` is absent.
    #[serde(default = "default_number_of_records")]
    #[ortho_config(default = DEFAULT_NUMBER_OF_RECORDS)]
    pub number_of_records: u32,
    /// Ceiling applied to `maximumRecords`.
    #[serde(default = "default_maximum_records")]
    #[ortho_config(default = DEFAULT_MAXIMUM_RECORDS)]
    pub maximum_records: u32,
    /// Terms returned when `maximumTerms` is absent.
    #[serde(default = "default_number_of_terms")]
    #[ortho_config(default = DEFAULT_NUMBER_OF_TERMS)]
    pub number_of_terms: u32,
    /// Ceiling applied to `maximumTerms`.
    #[serde(default = "default_maximum_terms")]
    #[ortho_config(default = DEFAULT_MAXIMUM_TERMS)]
    pub maximum_terms: u32,
    /// Whether echoed request blocks are written.
    #[serde(default)]
    #[ortho_config(default = false)]
    pub echo_requests: bool,
    /// Indentation width; negative disables indentation.
    #[serde(default = "default_indent_response")]
    #[ortho_config(default = NO_INDENT)]
    pub indent_response: i32,
    /// Permits `x-unlimited-resultset=true`.
    #[serde(default)]
    #[ortho_config(default = false)]
    pub allow_override_maximum_records: bool,
    /// Permits `x-unlimited-termlist=true`.
    #[serde(default)]
    #[ortho_config(default = false)]
    pub allow_override_maximum_terms: bool,
    /// Permits `x-indent-response=<n>`.
    #[serde(default)]
    #[ortho_config(default = false)]
    pub allow_override_indent_response: bool,
    /// Bytes buffered before a response is committed to the transport.
    #[serde(default = "default_response_buffer_size")]
    #[ortho_config(default = DEFAULT_RESPONSE_BUFFER_SIZE)]
    pub response_buffer_size: usize,
    /// JSON file holding explain metadata.
    #[serde(default)]
    pub description_path: Option<Utf8PathBuf>,
    /// Tracing filter expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Tracing output format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            host: default_host(),
            port: default_port(),
            database: default_database(),
            min_version: default_min_version(),
            max_version: default_max_version(),
            default_version: default_version(),
            legacy_namespace_mode: default_legacy_namespace_mode(),
            number_of_records: default_number_of_records(),
            maximum_records: default_maximum_records(),
            number_of_terms: default_number_of_terms(),
            maximum_terms: default_maximum_terms(),
            echo_requests: false,
            indent_response: default_indent_response(),
            allow_override_maximum_records: false,
            allow_override_maximum_terms: false,
            allow_override_indent_response: false,
            response_buffer_size: default_response_buffer_size(),
            description_path: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the configured tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured tracing output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the indentation width, or `None` when indentation is off.
    #[must_use]
    pub fn indent_width(&self) -> Option<usize> {
        usize::try_from(self.indent_response).ok()
    }

    /// Returns the explain metadata file, if configured.
    #[must_use]
    pub fn description_path(&self) -> Option<&Utf8Path> {
        self.description_path.as_deref()
    }

    /// Checks that the configured ranges are consistent.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (setting, value) in [
            ("transport", &self.transport),
            ("host", &self.host),
            ("database", &self.database),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { setting });
            }
        }
        if self.min_version > self.max_version {
            return Err(ConfigError::VersionRange {
                min: self.min_version,
                max: self.max_version,
            });
        }
        if !self
            .default_version
            .is_within(self.min_version, self.max_version)
        {
            return Err(ConfigError::DefaultVersion {
                default: self.default_version,
                min: self.min_version,
                max: self.max_version,
            });
        }
        for (setting, default, maximum) in [
            ("numberOfRecords", self.number_of_records, self.maximum_records),
            ("numberOfTerms", self.number_of_terms, self.maximum_terms),
        ] {
            if default > maximum {
                return Err(ConfigError::DefaultAboveMaximum {
                    setting,
                    default,
                    maximum,
                });
            }
        }
        Ok(())
    }

    /// Builds the base URL echoed to clients.
    ///
    /// `secure` upgrades the scheme to its TLS form. The port is omitted
    /// when it matches the scheme default.
    #[must_use]
    pub fn base_url(&self, secure: bool) -> String {
        let scheme = match (self.transport.as_str(), secure) {
            ("http", true) => "https",
            (transport, _) => transport,
        };
        let default_port = match scheme {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };
        let database = self.database.trim_start_matches('/');
        if default_port == Some(self.port) {
            format!("{scheme}://{}/{database}", self.host)
        } else {
            format!("{scheme}://{}:{}/{database}", self.host, self.port)
        }
    }

    /// Loads the explain metadata named by `description_path`.
    ///
    /// Returns an empty description when no path is configured.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError`] if the file cannot be read or parsed.
    pub fn load_description(&self) -> Result<ServerDescription, DescriptionError> {
        self.description_path()
            .map_or_else(|| Ok(ServerDescription::default()), ServerDescription::load)
    }
}
