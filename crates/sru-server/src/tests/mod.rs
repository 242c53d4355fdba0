//! Unit and behaviour tests for request handling.

mod search_tests;
mod support;

mod behaviour;
