//! Request handling for the search/retrieve protocol server.
//!
//! One call to [`SruServer::handle_request`] takes a request's parameters
//! from a [`ParameterSource`] and writes one XML response body:
//!
//! 1. The [`Negotiator`] settles the protocol version and operation, then
//!    validates every parameter against the legality table for that
//!    operation. Problems accumulate as diagnostics.
//! 2. A request with no diagnostics goes to the [`SearchEngine`]; any
//!    other request is answered with an error document.
//! 3. The response assembler streams the backend's results through the
//!    protocol writer into a [`ResponseBuffer`]. If the backend fails before
//!    the buffer commits, the partial body is replaced by an error document.
//!
//! Listening sockets, routing and TLS belong to the host transport.

mod engine;
mod error;
mod negotiate;
mod response;
mod server;
pub mod telemetry;
mod transport;

pub use self::engine::{
    ExtraResponseData, ResultCursor, ScanResultSet, SearchEngine, SearchResultSet,
};
pub use self::error::ServerError;
pub use self::negotiate::{
    EXTENSION_PREFIX, NegotiationFailure, Negotiator, Parameter, ParameterRule,
    ValidatedRequest, X_INDENT_RESPONSE, X_UNLIMITED_RESULTSET, X_UNLIMITED_TERMLIST, rules_for,
};
pub use self::server::SruServer;
pub use self::transport::{
    CONTENT_TYPE, ParameterSource, RawParameters, ResponseBuffer, ResponseTarget,
};

#[cfg(test)]
mod tests;
