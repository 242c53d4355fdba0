//! Behaviour-driven tests for request handling.

use std::cell::RefCell;
use std::str::FromStr;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sru_config::Config;

use super::support::{MemoryEngine, count, diagnostic_uri, diagnostic_uris, server, text, texts};
use crate::{RawParameters, ServerError};

/// A quoted string value from a Gherkin feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').to_owned()))
    }
}

#[derive(Default)]
struct World {
    config: Config,
    engine: MemoryEngine,
    outcome: Option<Result<String, ServerError>>,
}

impl World {
    fn body(&self) -> &str {
        match &self.outcome {
            Some(Ok(body)) => body,
            other => panic!("expected a response body, got {other:?}"),
        }
    }
}

#[fixture]
fn world() -> RefCell<World> {
    RefCell::new(World::default())
}

#[given("a backend holding {records} records")]
fn given_records(world: &RefCell<World>, records: usize) {
    world.borrow_mut().engine = MemoryEngine::with_records(records);
}

#[given("a backend that fails at record {position} of {records}")]
fn given_failing_records(world: &RefCell<World>, position: usize, records: usize) {
    world.borrow_mut().engine =
        MemoryEngine::with_records(records).failing_at(position.saturating_sub(1));
}

#[given("an index with no terms")]
fn given_no_terms(world: &RefCell<World>) {
    world.borrow_mut().engine = MemoryEngine::with_terms(&[]);
}

#[given("a response buffer of {size} bytes")]
fn given_buffer(world: &RefCell<World>, size: usize) {
    world.borrow_mut().config.response_buffer_size = size;
}

#[when("the client sends {query}")]
fn when_sent(world: &RefCell<World>, query: QuotedString) {
    let mut state = world.borrow_mut();
    let server = server(state.config.clone(), state.engine.clone());
    let outcome = server
        .handle_request(&RawParameters::from_query(&query.0), Vec::new())
        .map(|body| String::from_utf8(body).expect("utf-8 body"));
    state.outcome = Some(outcome);
}

#[then("the response reports {total} matching records")]
fn then_total(world: &RefCell<World>, total: u64) {
    let state = world.borrow();
    assert_eq!(text(state.body(), "numberOfRecords"), Some(total.to_string()));
}

#[then("the record positions are {positions}")]
fn then_positions(world: &RefCell<World>, positions: QuotedString) {
    let state = world.borrow();
    let expected: Vec<&str> = positions.0.split_whitespace().collect();
    assert_eq!(texts(state.body(), "recordPosition"), expected);
}

#[then("the next record position is {position}")]
fn then_next_position(world: &RefCell<World>, position: u64) {
    let state = world.borrow();
    assert_eq!(
        text(state.body(), "nextRecordPosition"),
        Some(position.to_string())
    );
}

#[then("diagnostic {number} is reported once")]
fn then_diagnostic(world: &RefCell<World>, number: u32) {
    let state = world.borrow();
    assert_eq!(diagnostic_uris(state.body()), [diagnostic_uri(number)]);
}

#[then("no records are returned")]
fn then_no_records(world: &RefCell<World>) {
    let state = world.borrow();
    assert_eq!(count(state.body(), "records"), 0);
    assert_eq!(text(state.body(), "numberOfRecords").as_deref(), Some("0"));
}

#[then("no term list is written")]
fn then_no_terms(world: &RefCell<World>) {
    let state = world.borrow();
    assert_eq!(count(state.body(), "terms"), 0);
    assert_eq!(count(state.body(), "term"), 0);
}

#[then("the response fails after it was committed")]
fn then_committed(world: &RefCell<World>) {
    let state = world.borrow();
    assert!(matches!(
        state.outcome,
        Some(Err(ServerError::Committed { .. }))
    ));
}

#[scenario(path = "tests/features/request_handling.feature")]
fn request_handling_behaviour(world: RefCell<World>) {
    let _ = world;
}
