//! Request negotiation and validation.
//!
//! Negotiation runs in two phases. Detection settles the protocol version
//! and operation; a failure there is fatal and skips the rest. Validation
//! then walks the legality table for the operation, accumulating every
//! diagnostic rather than stopping at the first. The request succeeds only
//! when no diagnostic was raised.

mod request;
mod rules;
mod validate;

use sru_config::Config;
use sru_core::{Diagnostic, DiagnosticCode, Diagnostics, Operation, ProtocolVersion};
use sru_query::QueryParserRegistry;
use tracing::debug;

pub use self::request::{NegotiationFailure, ValidatedRequest};
pub use self::rules::{Parameter, ParameterRule, rules_for};
use self::validate::Validation;
use crate::transport::ParameterSource;

/// Tracing target for negotiation.
pub(crate) const NEGOTIATE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::negotiate");

/// Prefix reserved for extension parameters.
pub const EXTENSION_PREFIX: &str = "x-";

/// Extension lifting the record ceiling when the server allows it.
pub const X_UNLIMITED_RESULTSET: &str = "x-unlimited-resultset";

/// Extension lifting the term ceiling when the server allows it.
pub const X_UNLIMITED_TERMLIST: &str = "x-unlimited-termlist";

/// Extension overriding the indentation width when the server allows it.
pub const X_INDENT_RESPONSE: &str = "x-indent-response";

/// Turns raw request parameters into a [`ValidatedRequest`].
///
/// # Example
///
/// ```
/// use sru_config::Config;
/// use sru_core::{Operation, ProtocolVersion};
/// use sru_query::QueryParserRegistry;
/// use sru_server::{Negotiator, RawParameters};
///
/// let config = Config::default();
/// let registry = QueryParserRegistry::with_defaults();
/// let params = RawParameters::from_query("query=dog&maximumRecords=5");
/// let request = Negotiator::new(&config, &registry)
///     .negotiate(&params)
///     .expect("valid request");
/// assert_eq!(request.operation(), Operation::SearchRetrieve);
/// assert_eq!(request.version(), ProtocolVersion::V2_0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Negotiator<'a> {
    config: &'a Config,
    registry: &'a QueryParserRegistry,
}

impl<'a> Negotiator<'a> {
    /// Creates a negotiator for one server configuration.
    #[must_use]
    pub const fn new(config: &'a Config, registry: &'a QueryParserRegistry) -> Self {
        Self { config, registry }
    }

    /// Negotiates and validates one request.
    ///
    /// # Errors
    ///
    /// Returns a [`NegotiationFailure`] carrying every diagnostic raised
    /// when detection fails or any parameter is rejected.
    pub fn negotiate(
        &self,
        params: &dyn ParameterSource,
    ) -> Result<ValidatedRequest, NegotiationFailure> {
        let (operation, version) = self.detect(params)?;
        let outcome = Validation::new(self.config, self.registry, params, operation, version).run();
        match &outcome {
            Ok(_) => debug!(
                target: NEGOTIATE_TARGET,
                operation = operation.as_str(),
                version = version.as_str(),
                "request accepted"
            ),
            Err(failure) => debug!(
                target: NEGOTIATE_TARGET,
                operation = operation.as_str(),
                version = version.as_str(),
                diagnostics = failure.diagnostics().len(),
                "request rejected"
            ),
        }
        outcome
    }

    /// Settles the operation and version of a request.
    fn detect(
        &self,
        params: &dyn ParameterSource,
    ) -> Result<(Operation, ProtocolVersion), NegotiationFailure> {
        let supplied = |name: &str| {
            params
                .parameter(name)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };
        let explicit_version = supplied("version");

        if self.config.max_version >= ProtocolVersion::V2_0 && explicit_version.is_none() {
            let operation = if supplied("query").is_some() || supplied("queryType").is_some() {
                Operation::SearchRetrieve
            } else if supplied("scanClause").is_some() {
                Operation::Scan
            } else {
                Operation::Explain
            };
            return self.check_range(operation, ProtocolVersion::V2_0);
        }

        let parsed_version = explicit_version.map(ProtocolVersion::from_legacy_parameter);
        let operation = match supplied("operation") {
            None => Operation::Explain,
            Some(value) => match value.parse::<Operation>() {
                Ok(operation) => operation,
                Err(_) => {
                    debug!(target: NEGOTIATE_TARGET, operation = value, "unsupported operation");
                    let diagnostic = Diagnostic::new(DiagnosticCode::UnsupportedOperation)
                        .with_details(value);
                    return Err(self.fatal(
                        Operation::Explain,
                        parsed_version.flatten(),
                        diagnostic,
                    ));
                }
            },
        };

        let version = match (explicit_version, parsed_version.flatten()) {
            (_, Some(version)) => version,
            (None, None) => self.config.default_version,
            (Some(value), None) => {
                debug!(target: NEGOTIATE_TARGET, version = value, "unsupported version");
                let diagnostic = Diagnostic::new(DiagnosticCode::UnsupportedVersion)
                    .with_details(self.config.max_version.as_str())
                    .with_message(format!("version '{value}' is not supported"));
                return Err(self.fatal(operation, None, diagnostic));
            }
        };
        self.check_range(operation, version)
    }

    fn check_range(
        &self,
        operation: Operation,
        version: ProtocolVersion,
    ) -> Result<(Operation, ProtocolVersion), NegotiationFailure> {
        if version.is_within(self.config.min_version, self.config.max_version) {
            return Ok((operation, version));
        }
        debug!(
            target: NEGOTIATE_TARGET,
            version = version.as_str(),
            "version outside the supported range"
        );
        let diagnostic = Diagnostic::new(DiagnosticCode::UnsupportedVersion)
            .with_details(self.config.max_version.as_str())
            .with_message(format!("version {version} is not supported"));
        Err(self.fatal(operation, Some(version), diagnostic))
    }

    fn fatal(
        &self,
        operation: Operation,
        version: Option<ProtocolVersion>,
        diagnostic: Diagnostic,
    ) -> NegotiationFailure {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(diagnostic);
        NegotiationFailure {
            operation,
            version: self.response_version(version),
            indent: self.config.indent_width(),
            diagnostics,
        }
    }

    /// Picks a servable version for an error document.
    fn response_version(&self, candidate: Option<ProtocolVersion>) -> ProtocolVersion {
        candidate
            .unwrap_or(self.config.default_version)
            .max(self.config.min_version)
            .min(self.config.max_version)
    }
}
