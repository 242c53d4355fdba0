//! Validation errors for loaded configuration.

use sru_core::ProtocolVersion;
use thiserror::Error;

/// A configuration that loaded but cannot be served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The minimum version exceeds the maximum.
    #[error("minimum version {min} is above maximum version {max}")]
    VersionRange {
        /// Configured minimum.
        min: ProtocolVersion,
        /// Configured maximum.
        max: ProtocolVersion,
    },

    /// The default version lies outside the supported range.
    #[error("default version {default} is outside {min}..={max}")]
    DefaultVersion {
        /// Configured default.
        default: ProtocolVersion,
        /// Configured minimum.
        min: ProtocolVersion,
        /// Configured maximum.
        max: ProtocolVersion,
    },

    /// A default count exceeds its ceiling.
    #[error("default {setting} of {default} exceeds the maximum of {maximum}")]
    DefaultAboveMaximum {
        /// Name of the offending setting.
        setting: &'static str,
        /// Configured default.
        default: u32,
        /// Configured ceiling.
        maximum: u32,
    },

    /// A required text setting is empty.
    #[error("{setting} must not be empty")]
    Empty {
        /// Name of the offending setting.
        setting: &'static str,
    },
}
