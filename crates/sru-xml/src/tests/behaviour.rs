//! Behaviour-driven tests for the streaming writer.

use std::str::FromStr;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sru_core::RecordXmlEscaping;

use super::support::{structure, text_of};
use crate::{SruXmlWriter, XmlSink};

/// A quoted string value from a Gherkin feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').to_owned()))
    }
}

impl QuotedString {
    fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Default)]
struct TestWorld {
    escaping: RecordXmlEscaping,
    indent: Option<usize>,
    payload: String,
    output: Option<String>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

fn render(world: &TestWorld, indent: Option<usize>) -> String {
    let mut writer = SruXmlWriter::new(Vec::new(), world.escaping, indent);
    writer.start_element(None, "record").expect("record");
    writer.start_element(None, "recordData").expect("recordData");
    writer.start_record().expect("start record");
    writer
        .text_element(None, "note", &world.payload)
        .expect("payload");
    writer.end_record().expect("end record");
    writer.end_element().expect("recordData");
    writer.end_element().expect("record");
    String::from_utf8(writer.into_inner()).expect("utf-8 output")
}

#[given("records are escaped as {mode}")]
fn given_escaping(world: &mut TestWorld, mode: QuotedString) {
    world.escaping = mode.as_str().parse().expect("escaping mode");
}

#[given("an indentation width of {width}")]
fn given_indent(world: &mut TestWorld, width: usize) {
    world.indent = Some(width);
}

#[given("a record note containing {text}")]
fn given_payload(world: &mut TestWorld, text: QuotedString) {
    world.payload = text.as_str().to_owned();
}

#[when("the record is written")]
fn when_written(world: &mut TestWorld) {
    world.output = Some(render(world, world.indent));
}

#[then("the record data text is {expected}")]
fn then_record_text(world: &mut TestWorld, expected: QuotedString) {
    let output = world.output.as_ref().expect("output should be written");
    let text = text_of(output, "recordData").expect("recordData element");
    assert_eq!(text, expected.as_str());
}

#[then("the output has the same structure as compact output")]
fn then_same_structure(world: &mut TestWorld) {
    let output = world.output.as_ref().expect("output should be written");
    assert_eq!(structure(output), structure(&render(world, None)));
}

#[scenario(path = "tests/features/record_escaping.feature")]
fn record_escaping_behaviour(world: TestWorld) {
    let _ = world;
}
