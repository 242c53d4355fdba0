//! The request entry point.

use sru_config::{Config, ServerDescription};
use sru_core::{Diagnostics, Operation, SruError};
use sru_query::QueryParserRegistry;
use tracing::{debug, error, info};

use crate::engine::SearchEngine;
use crate::error::ServerError;
use crate::negotiate::{NegotiationFailure, Negotiator, ValidatedRequest};
use crate::response::{self, ResponseContext};
use crate::transport::{CONTENT_TYPE, ParameterSource, ResponseBuffer, ResponseTarget};

/// Tracing target for request handling.
pub(crate) const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Answers protocol requests against one backend.
///
/// The server holds no per-request state and can be shared across threads
/// when the engine allows it.
///
/// # Example
///
/// ```no_run
/// # use sru_config::Config;
/// # use sru_query::QueryParserRegistry;
/// # use sru_server::{RawParameters, SearchEngine, SruServer};
/// # fn demo(engine: impl SearchEngine) -> Result<(), sru_server::ServerError> {
/// let server = SruServer::new(Config::default(), QueryParserRegistry::with_defaults(), engine)?;
/// let body = server.handle_request(&RawParameters::from_query("query=dog"), Vec::new())?;
/// assert!(body.starts_with(b"<?xml"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SruServer<E> {
    config: Config,
    description: ServerDescription,
    registry: QueryParserRegistry,
    engine: E,
}

impl<E: SearchEngine> SruServer<E> {
    /// Validates `config`, loads its explain metadata and builds a server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] for inconsistent settings and
    /// [`ServerError::Description`] when the metadata file is unusable.
    pub fn new(
        config: Config,
        registry: QueryParserRegistry,
        engine: E,
    ) -> Result<Self, ServerError> {
        config.validate()?;
        let description = config.load_description()?;
        Ok(Self {
            config,
            description,
            registry,
            engine,
        })
    }

    /// Replaces the explain metadata.
    #[must_use]
    pub fn with_description(mut self, description: ServerDescription) -> Self {
        self.description = description;
        self
    }

    /// The server configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The explain metadata.
    #[must_use]
    pub const fn description(&self) -> &ServerDescription {
        &self.description
    }

    /// The query parsers accepted by this server.
    #[must_use]
    pub const fn registry(&self) -> &QueryParserRegistry {
        &self.registry
    }

    /// The backend.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Negotiates a request without answering it.
    ///
    /// # Errors
    ///
    /// Returns the diagnostics that reject the request.
    pub fn negotiate(
        &self,
        params: &dyn ParameterSource,
    ) -> Result<ValidatedRequest, NegotiationFailure> {
        Negotiator::new(&self.config, &self.registry).negotiate(params)
    }

    /// Answers one request, writing the body into `target`.
    ///
    /// Protocol problems are reported inside the body. A failure while
    /// nothing has been committed replaces the partial body with an error
    /// document.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Committed`] when processing failed after
    /// bytes reached the target, and [`ServerError::Io`] or
    /// [`ServerError::ErrorDocument`] when the body cannot be written.
    pub fn handle_request<T: ResponseTarget>(
        &self,
        params: &dyn ParameterSource,
        target: T,
    ) -> Result<T, ServerError> {
        let base_url = self.config.base_url(params.is_secure());
        let context = ResponseContext {
            config: &self.config,
            description: &self.description,
            base_url: &base_url,
        };
        let mut buffer = ResponseBuffer::new(target, self.config.response_buffer_size, CONTENT_TYPE);

        match self.negotiate(params) {
            Err(failure) => {
                info!(
                    target: SERVER_TARGET,
                    operation = failure.operation().as_str(),
                    diagnostics = failure.diagnostics().len(),
                    "request rejected"
                );
                response::write_fatal(
                    &mut buffer,
                    &context,
                    failure.operation(),
                    failure.version(),
                    failure.indent,
                    failure.diagnostics(),
                )
                .map_err(ServerError::ErrorDocument)?;
            }
            Ok(request) => {
                let mut diagnostics = Diagnostics::new();
                let engine: &dyn SearchEngine = &self.engine;
                let outcome = match request.operation() {
                    Operation::Explain => response::explain(
                        &mut buffer,
                        &context,
                        engine,
                        &request,
                        &mut diagnostics,
                    ),
                    Operation::Scan => {
                        response::scan(&mut buffer, &context, engine, &request, &mut diagnostics)
                    }
                    Operation::SearchRetrieve => response::search_retrieve(
                        &mut buffer,
                        &context,
                        engine,
                        &request,
                        &mut diagnostics,
                    ),
                };
                if let Err(failure) = outcome {
                    Self::recover(&mut buffer, &context, &request, diagnostics, failure)?;
                }
            }
        }
        Ok(buffer.finish()?)
    }

    /// Replaces a partial body with an error document, if still possible.
    fn recover<T: ResponseTarget>(
        buffer: &mut ResponseBuffer<T>,
        context: &ResponseContext<'_>,
        request: &ValidatedRequest,
        mut diagnostics: Diagnostics,
        failure: SruError,
    ) -> Result<(), ServerError> {
        if !buffer.reset() {
            error!(
                target: SERVER_TARGET,
                error = %failure,
                "response failed after it was committed"
            );
            return Err(ServerError::Committed {
                diagnostic: failure.into_diagnostic(),
            });
        }
        debug!(
            target: SERVER_TARGET,
            error = %failure,
            "routing to error document"
        );
        diagnostics.push(failure.into_diagnostic());
        response::write_fatal(
            buffer,
            context,
            request.operation(),
            request.version(),
            request.indent(),
            &diagnostics,
        )
        .map_err(ServerError::ErrorDocument)
    }
}
