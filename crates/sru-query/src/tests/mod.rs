//! Crate-level tests for query dispatch.
