//! Unit tests for the streaming writer.

mod support;

mod behaviour;
