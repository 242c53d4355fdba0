//! Unit tests for the query parser registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::{fixture, rstest};
use sru_core::Diagnostic;

use super::*;
use crate::cql::CqlQuery;

/// Parser needing two parameters that counts its invocations.
#[derive(Debug, Default)]
struct PairParser {
    calls: Arc<AtomicUsize>,
}

impl QueryParser for PairParser {
    fn query_type(&self) -> &str {
        "pair"
    }

    fn parameter_names(&self) -> &[&str] {
        &["left", "right"]
    }

    fn parse(
        &self,
        _version: ProtocolVersion,
        parameters: &QueryParameters,
        _diagnostics: &mut Diagnostics,
    ) -> Option<SruQuery> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let raw = format!("{} {}", parameters.get("left")?, parameters.get("right")?);
        Some(SruQuery::new("pair", raw.as_str(), CqlQuery::parse(&raw).ok()?))
    }
}

#[fixture]
fn registry() -> QueryParserRegistry {
    QueryParserRegistry::with_defaults()
}

fn lookup_in<'a>(
    values: &'a HashMap<&'static str, &'static str>,
) -> impl Fn(&str) -> Option<&'static str> + 'a {
    move |name| values.get(name).copied()
}

#[test]
fn new_registry_is_empty() {
    let registry = QueryParserRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.find("cql").is_none());
}

#[rstest]
fn defaults_include_cql_and_search_terms(registry: QueryParserRegistry) {
    assert_eq!(registry.len(), 2);
    assert!(registry.find("cql").is_some());
    assert!(registry.find("searchTerms").is_some());
}

#[rstest]
fn register_rejects_duplicate(mut registry: QueryParserRegistry) {
    let error = registry.register(CqlParser).expect_err("duplicate should fail");
    assert_eq!(
        error,
        QueryRegistryError::Duplicate {
            query_type: "cql".to_owned()
        }
    );
    assert!(error.to_string().contains("already registered"));
}

#[rstest]
fn register_accepts_new_tag(mut registry: QueryParserRegistry) {
    registry
        .register(PairParser::default())
        .expect("register pair");
    assert_eq!(registry.len(), 3);
}

#[rstest]
#[case("cql", true)]
#[case("x-custom_2", true)]
#[case("9lives", true)]
#[case("_cql", false)]
#[case("-cql", false)]
#[case("", false)]
#[case("cql!", false)]
#[case("c ql", false)]
fn query_type_charset(#[case] tag: &str, #[case] valid: bool) {
    assert_eq!(is_valid_query_type(tag), valid);
}

#[rstest]
fn missing_parameters_skip_parser(mut registry: QueryParserRegistry) {
    let calls = Arc::new(AtomicUsize::new(0));
    registry
        .register(PairParser {
            calls: Arc::clone(&calls),
        })
        .expect("register pair");
    let values = HashMap::from([("left", "dog"), ("right", "   ")]);
    let mut diagnostics = Diagnostics::new();

    let dispatch = registry.dispatch(
        ProtocolVersion::V2_0,
        "pair",
        lookup_in(&values),
        &mut diagnostics,
    );

    assert!(dispatch.query.is_none());
    assert_eq!(dispatch.consumed, ["left", "right"]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        diagnostics.as_slice(),
        [Diagnostic::new(DiagnosticCode::MandatoryParameterNotSupplied).with_details("right")]
    );
}

#[rstest]
fn one_diagnostic_per_missing_parameter(mut registry: QueryParserRegistry) {
    registry
        .register(PairParser::default())
        .expect("register pair");
    let values = HashMap::new();
    let mut diagnostics = Diagnostics::new();

    registry.dispatch(
        ProtocolVersion::V2_0,
        "pair",
        lookup_in(&values),
        &mut diagnostics,
    );

    let details: Vec<_> = diagnostics.iter().filter_map(Diagnostic::details).collect();
    assert_eq!(details, ["left", "right"]);
}

#[rstest]
fn complete_parameters_are_trimmed_and_parsed(registry: QueryParserRegistry) {
    let values = HashMap::from([("query", "  dc.title = fish  ")]);
    let mut diagnostics = Diagnostics::new();

    let dispatch = registry.dispatch(
        ProtocolVersion::V1_2,
        "cql",
        lookup_in(&values),
        &mut diagnostics,
    );

    let query = dispatch.query.expect("query parsed");
    assert_eq!(query.raw(), "dc.title = fish");
    assert!(query.downcast_ref::<CqlQuery>().is_some());
    assert!(diagnostics.is_empty());
}

#[rstest]
#[case("unknown")]
#[case("-bad")]
fn unknown_query_type_is_unsupported_value(registry: QueryParserRegistry, #[case] tag: &str) {
    let values = HashMap::from([("query", "dog")]);
    let mut diagnostics = Diagnostics::new();

    let dispatch = registry.dispatch(
        ProtocolVersion::V2_0,
        tag,
        lookup_in(&values),
        &mut diagnostics,
    );

    assert!(dispatch.query.is_none());
    assert!(dispatch.consumed.is_empty());
    assert!(diagnostics.contains(DiagnosticCode::UnsupportedParameterValue));
}

#[rstest]
fn syntax_errors_surface_as_diagnostics(registry: QueryParserRegistry) {
    let values = HashMap::from([("query", "dog and")]);
    let mut diagnostics = Diagnostics::new();

    let dispatch = registry.dispatch(
        ProtocolVersion::V2_0,
        "cql",
        lookup_in(&values),
        &mut diagnostics,
    );

    assert!(dispatch.query.is_none());
    assert_eq!(dispatch.consumed, ["query"]);
    assert!(diagnostics.contains(DiagnosticCode::QuerySyntaxError));
}
