//! Unit tests for the CQL parser.

use rstest::rstest;
use sru_core::{DiagnosticCode, NamespaceProfile};
use sru_xml::{MarkupWriter, NamespaceCopier};

use super::parser::{MAX_BOOLEAN_OPERATORS, MAX_NESTING};
use super::*;

fn clause(query: &CqlQuery) -> &SearchClause {
    match &query.root {
        CqlNode::Clause(clause) => clause,
        CqlNode::Boolean { .. } => panic!("expected a search clause"),
    }
}

#[test]
fn bare_term_uses_server_choice() {
    let query = CqlQuery::parse("dog").expect("parse");
    assert_eq!(clause(&query), &SearchClause::bare("dog"));
    assert_eq!(clause(&query).index, SERVER_CHOICE_INDEX);
}

#[rstest]
#[case("dc.title = fish", "dc.title", "=", "fish")]
#[case("dc.title==\"big fish\"", "dc.title", "==", "big fish")]
#[case("date <= 2001", "date", "<=", "2001")]
#[case("dc.title any \"a b\"", "dc.title", "any", "a b")]
#[case("title <> x", "title", "<>", "x")]
fn index_relation_term(
    #[case] input: &str,
    #[case] index: &str,
    #[case] relation: &str,
    #[case] term: &str,
) {
    let query = CqlQuery::parse(input).expect("parse");
    let parsed = clause(&query);
    assert_eq!(parsed.index, index);
    assert_eq!(parsed.relation.base, relation);
    assert_eq!(parsed.term, term);
}

#[test]
fn booleans_associate_left() {
    let query = CqlQuery::parse("a AND b or c").expect("parse");
    let CqlNode::Boolean {
        operator, left, ..
    } = &query.root
    else {
        panic!("expected boolean root");
    };
    assert_eq!(*operator, BooleanOperator::Or);
    assert!(matches!(
        left.as_ref(),
        CqlNode::Boolean {
            operator: BooleanOperator::And,
            ..
        }
    ));
}

#[test]
fn parentheses_group() {
    let query = CqlQuery::parse("a and (b or c)").expect("parse");
    let CqlNode::Boolean { right, .. } = &query.root else {
        panic!("expected boolean root");
    };
    assert!(matches!(
        right.as_ref(),
        CqlNode::Boolean {
            operator: BooleanOperator::Or,
            ..
        }
    ));
}

#[test]
fn modifiers_on_relation_and_boolean() {
    let query = CqlQuery::parse("title =/stem/locale=fr x prox/distance<3 y").expect("parse");
    let CqlNode::Boolean {
        modifiers, left, ..
    } = &query.root
    else {
        panic!("expected boolean root");
    };
    assert_eq!(
        modifiers,
        &[Modifier {
            name: "distance".to_owned(),
            value: Some(("<".to_owned(), "3".to_owned())),
        }]
    );
    let CqlNode::Clause(left_clause) = left.as_ref() else {
        panic!("expected clause");
    };
    let names: Vec<_> = left_clause
        .relation
        .modifiers
        .iter()
        .map(|modifier| modifier.name.as_str())
        .collect();
    assert_eq!(names, ["stem", "locale"]);
}

#[test]
fn prefixes_and_sort_keys() {
    let query = CqlQuery::parse("> dc = \"info:srw/cql-context-set/1/dc-v1.1\" dc.title = x sortBy dc.date/sort.descending")
        .expect("parse");
    assert_eq!(query.prefixes.len(), 1);
    assert_eq!(query.prefixes.first().and_then(|p| p.name.as_deref()), Some("dc"));
    assert_eq!(query.sort_keys.len(), 1);
    assert_eq!(
        query.sort_keys.first().map(|key| key.index.as_str()),
        Some("dc.date")
    );
}

#[rstest]
#[case("")]
#[case("(a and b")]
#[case("a and")]
#[case("a b")]
#[case("\"unterminated")]
#[case("a sortBy")]
fn malformed_queries_are_syntax_errors(#[case] input: &str) {
    let diagnostic = CqlQuery::parse(input).expect_err("should fail");
    assert_eq!(diagnostic.code(), Some(DiagnosticCode::QuerySyntaxError));
    assert!(diagnostic.details().is_some());
}

#[test]
fn nested_prefixes_are_unsupported() {
    let diagnostic = CqlQuery::parse("(> x = \"y\" a)").expect_err("should fail");
    assert_eq!(diagnostic.code(), Some(DiagnosticCode::QueryFeatureUnsupported));
}

#[test]
fn xcql_serialization() {
    let query = CqlQuery::parse("dc.title any/stem fish and cat").expect("parse");
    let mut markup = MarkupWriter::new(Vec::new());
    {
        let mut copier = NamespaceCopier::new(&mut markup, &NamespaceProfile::LOC);
        let written = query
            .write_xcql(&mut copier, NamespaceProfile::LOC.xcql.uri)
            .expect("xcql");
        assert!(written);
    }
    let xml = String::from_utf8(markup.into_inner()).expect("utf-8 output");
    assert_eq!(
        xml,
        "<xcql:triple xmlns:xcql=\"http://www.loc.gov/zing/cql/xcql/\">\
         <xcql:boolean><xcql:value>and</xcql:value></xcql:boolean>\
         <xcql:leftOperand><xcql:searchClause><xcql:index>dc.title</xcql:index>\
         <xcql:relation><xcql:value>any</xcql:value><xcql:modifiers><xcql:modifier>\
         <xcql:type>stem</xcql:type></xcql:modifier></xcql:modifiers></xcql:relation>\
         <xcql:term>fish</xcql:term></xcql:searchClause></xcql:leftOperand>\
         <xcql:rightOperand><xcql:searchClause><xcql:index>cql.serverChoice</xcql:index>\
         <xcql:relation><xcql:value>=</xcql:value></xcql:relation><xcql:term>cat</xcql:term>\
         </xcql:searchClause></xcql:rightOperand></xcql:triple>"
    );
}

#[test]
fn parser_reports_diagnostics() {
    let mut parameters = QueryParameters::new();
    parameters.insert(QUERY_PARAMETER.to_owned(), "(dog".to_owned());
    let mut diagnostics = Diagnostics::new();
    let query = CqlParser.parse(ProtocolVersion::V1_2, &parameters, &mut diagnostics);
    assert!(query.is_none());
    assert!(diagnostics.contains(DiagnosticCode::QuerySyntaxError));
}

fn nested(depth: usize) -> String {
    format!("{}dog{}", "(".repeat(depth), ")".repeat(depth))
}

fn chain(operators: usize) -> String {
    vec!["dog"; operators + 1].join(" and ")
}

#[test]
fn nesting_up_to_the_limit_parses() {
    let query = CqlQuery::parse(&nested(MAX_NESTING)).expect("parse");
    assert_eq!(clause(&query), &SearchClause::bare("dog"));
}

#[rstest]
#[case::just_over(MAX_NESTING + 1)]
#[case::far_over(5_000)]
fn deep_nesting_is_unsupported(#[case] depth: usize) {
    let diagnostic = CqlQuery::parse(&nested(depth)).expect_err("should fail");
    assert_eq!(diagnostic.code(), Some(DiagnosticCode::QueryFeatureUnsupported));
    assert_eq!(diagnostic.details(), Some("query nesting too deep"));
}

#[test]
fn boolean_chain_up_to_the_limit_parses() {
    let query = CqlQuery::parse(&chain(MAX_BOOLEAN_OPERATORS)).expect("parse");
    assert!(matches!(query.root, CqlNode::Boolean { .. }));
}

#[rstest]
#[case::just_over(MAX_BOOLEAN_OPERATORS + 1)]
#[case::far_over(200_000)]
fn long_boolean_chain_is_unsupported(#[case] operators: usize) {
    let diagnostic = CqlQuery::parse(&chain(operators)).expect_err("should fail");
    assert_eq!(diagnostic.code(), Some(DiagnosticCode::QueryFeatureUnsupported));
}

#[test]
fn operators_inside_parentheses_count_towards_the_limit() {
    let grouped = format!("({})", chain(MAX_BOOLEAN_OPERATORS));
    let query = format!("{grouped} or cat");
    let diagnostic = CqlQuery::parse(&query).expect_err("should fail");
    assert_eq!(diagnostic.code(), Some(DiagnosticCode::QueryFeatureUnsupported));
}
