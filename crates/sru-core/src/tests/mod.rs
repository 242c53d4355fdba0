//! Unit tests for `sru_core` types.
