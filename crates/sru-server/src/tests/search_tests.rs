//! Tests for searchRetrieve responses.

use rstest::rstest;
use sru_config::Config;
use sru_core::{DIAGNOSTICS_RECORD_SCHEMA, ProtocolVersion};

use super::support::{
    DC_SCHEMA, MemoryEngine, count, diagnostic_uri, diagnostic_uris, respond, server, text, texts,
    top_level,
};
use crate::{RawParameters, ServerError};

const OASIS_ROOT: &str = r#"<sruResponse:searchRetrieveResponse xmlns:sruResponse="http://docs.oasis-open.org/ns/search-ws/sruResponse">"#;
const LOC_ROOT: &str =
    r#"<sru:searchRetrieveResponse xmlns:sru="http://www.loc.gov/zing/srw/">"#;

fn echoing() -> Config {
    Config {
        echo_requests: true,
        ..Config::default()
    }
}

#[rstest]
fn two_zero_response_layout() {
    let server = server(Config::default(), MemoryEngine::with_records(3));
    let xml = respond(&server, "query=dog");
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(OASIS_ROOT));
    assert_eq!(
        top_level(&xml),
        ["version", "numberOfRecords", "records", "resultCountPrecision"]
    );
    assert_eq!(text(&xml, "version").as_deref(), Some("2.0"));
    assert_eq!(text(&xml, "numberOfRecords").as_deref(), Some("3"));
    assert_eq!(texts(&xml, "recordPosition"), ["1", "2", "3"]);
    assert_eq!(texts(&xml, "recordIdentifier"), ["rec-1", "rec-2", "rec-3"]);
    assert_eq!(texts(&xml, "recordXMLEscaping"), ["xml", "xml", "xml"]);
    assert_eq!(texts(&xml, "title"), ["Record 1", "Record 2", "Record 3"]);
    assert_eq!(
        text(&xml, "resultCountPrecision").as_deref(),
        Some("info:srw/vocabulary/resultCountPrecision/1/exact")
    );
}

#[rstest]
fn legacy_response_layout() {
    let server = server(Config::default(), MemoryEngine::with_records(2));
    let xml = respond(&server, "operation=searchRetrieve&version=1.2&query=dog");
    assert!(xml.contains(LOC_ROOT));
    assert_eq!(top_level(&xml), ["version", "numberOfRecords", "records"]);
    assert_eq!(texts(&xml, "recordPacking"), ["xml", "xml"]);
    assert_eq!(count(&xml, "recordIdentifier"), 0);
    assert!(texts(&xml, "recordSchema").iter().all(|schema| schema == DC_SCHEMA));
}

#[rstest]
fn legacy_oasis_mode_switches_namespaces() {
    let config = Config {
        legacy_namespace_mode: sru_core::LegacyNamespaceMode::Oasis,
        ..Config::default()
    };
    let server = server(config, MemoryEngine::with_records(1));
    let xml = respond(&server, "operation=searchRetrieve&version=1.1&query=dog");
    assert!(xml.contains(
        r#"<sru:searchRetrieveResponse xmlns:sru="http://docs.oasis-open.org/ns/search-ws/sruResponse">"#
    ));
}

#[rstest]
fn next_record_position_follows_the_window() {
    let server = server(Config::default(), MemoryEngine::with_records(12));
    let xml = respond(&server, "query=dog&maximumRecords=5");
    assert_eq!(texts(&xml, "recordPosition"), ["1", "2", "3", "4", "5"]);
    assert_eq!(text(&xml, "nextRecordPosition").as_deref(), Some("6"));
}

#[rstest]
fn last_window_has_no_next_position() {
    let server = server(Config::default(), MemoryEngine::with_records(12));
    let xml = respond(&server, "query=dog&startRecord=11&maximumRecords=5");
    assert_eq!(texts(&xml, "recordPosition"), ["11", "12"]);
    assert_eq!(count(&xml, "nextRecordPosition"), 0);
}

#[rstest]
fn zero_records_requested_writes_no_records() {
    let server = server(Config::default(), MemoryEngine::with_records(4));
    let xml = respond(&server, "query=dog&maximumRecords=0");
    assert_eq!(text(&xml, "numberOfRecords").as_deref(), Some("4"));
    assert_eq!(count(&xml, "records"), 0);
    assert_eq!(count(&xml, "nextRecordPosition"), 0);
}

#[rstest]
fn empty_result_set_accepts_first_position() {
    let server = server(Config::default(), MemoryEngine::with_records(0));
    let xml = respond(&server, "query=dog");
    assert_eq!(text(&xml, "numberOfRecords").as_deref(), Some("0"));
    assert!(diagnostic_uris(&xml).is_empty());
}

#[rstest]
fn start_beyond_total_is_fatal() {
    let engine = MemoryEngine::with_records(10);
    let server = server(Config::default(), engine.clone());
    let xml = respond(&server, "query=dog&startRecord=50");
    assert_eq!(diagnostic_uris(&xml), [diagnostic_uri(61)]);
    assert_eq!(text(&xml, "details").as_deref(), Some("50"));
    assert_eq!(text(&xml, "numberOfRecords").as_deref(), Some("0"));
    assert_eq!(count(&xml, "record"), 0);
    assert_eq!(engine.closed(), 1);
}

#[rstest]
fn over_delivery_is_truncated() {
    let server = server(
        Config::default(),
        MemoryEngine::with_records(10).over_delivering(),
    );
    let xml = respond(&server, "query=dog&maximumRecords=3");
    assert_eq!(count(&xml, "recordPosition"), 3);
    assert_eq!(text(&xml, "nextRecordPosition").as_deref(), Some("4"));
}

#[rstest]
fn surrogate_diagnostic_replaces_record_content() {
    let server = server(
        Config::default(),
        MemoryEngine::with_records(3).surrogate_at(1),
    );
    let xml = respond(&server, "query=dog");
    assert_eq!(
        texts(&xml, "recordSchema"),
        [DC_SCHEMA, DIAGNOSTICS_RECORD_SCHEMA, DC_SCHEMA]
    );
    assert_eq!(diagnostic_uris(&xml), [diagnostic_uri(64)]);
    assert_eq!(texts(&xml, "title"), ["Record 1", "Record 3"]);
    assert_eq!(count(&xml, "diagnostics"), 0);
}

#[rstest]
fn string_escaping_embeds_records_as_text() {
    let server = server(
        Config::default(),
        MemoryEngine::with_titles(["Fish & <Chips>"]),
    );
    let xml = respond(&server, "query=dog&recordXMLEscaping=string");
    assert_eq!(text(&xml, "recordXMLEscaping").as_deref(), Some("string"));
    assert_eq!(count(&xml, "title"), 0);
    let embedded = text(&xml, "recordData").expect("record data text");
    assert_eq!(
        embedded,
        r#"<dc:record xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Fish &amp; &lt;Chips&gt;</dc:title></dc:record>"#
    );
    assert_eq!(texts(&embedded, "title"), ["Fish & <Chips>"]);
}

#[rstest]
fn echo_repeats_supplied_parameters_and_base_url() {
    let server = server(echoing(), MemoryEngine::with_records(1));
    let xml = respond(&server, "query=dog&maximumRecords=5");
    assert_eq!(
        top_level(&xml),
        [
            "version",
            "numberOfRecords",
            "records",
            "echoedSearchRetrieveRequest",
            "resultCountPrecision"
        ]
    );
    assert_eq!(text(&xml, "query").as_deref(), Some("dog"));
    assert_eq!(text(&xml, "maximumRecords").as_deref(), Some("5"));
    assert_eq!(count(&xml, "startRecord"), 0);
    assert_eq!(count(&xml, "xQuery"), 1);
    assert_eq!(count(&xml, "version"), 1);
    assert_eq!(text(&xml, "baseUrl").as_deref(), Some("http://localhost/sru"));
}

#[rstest]
fn legacy_echo_repeats_version() {
    let server = server(echoing(), MemoryEngine::with_records(1));
    let xml = respond(&server, "operation=searchRetrieve&version=1.1&query=dog");
    assert_eq!(texts(&xml, "version"), ["1.1", "1.1"]);
    assert_eq!(count(&xml, "operation"), 0);
}

#[rstest]
fn search_terms_queries_have_no_xcql_echo() {
    let server = server(echoing(), MemoryEngine::with_records(1));
    let xml = respond(&server, "queryType=searchTerms&query=red+fish");
    assert_eq!(text(&xml, "queryType").as_deref(), Some("searchTerms"));
    assert_eq!(count(&xml, "xQuery"), 0);
}

#[rstest]
fn secure_requests_echo_secure_base_url() {
    let config = Config {
        port: 443,
        ..echoing()
    };
    let server = server(config, MemoryEngine::with_records(1));
    let body = server
        .handle_request(
            &RawParameters::from_query("query=dog").with_secure(true),
            Vec::new(),
        )
        .expect("response body");
    let xml = String::from_utf8(body).expect("utf-8");
    assert_eq!(text(&xml, "baseUrl").as_deref(), Some("https://localhost/sru"));
}

#[rstest]
fn stylesheet_instruction_precedes_root() {
    let server = server(Config::default(), MemoryEngine::with_records(1));
    let xml = respond(&server, "query=dog&stylesheet=/style.xsl");
    let instruction = r#"<?xml-stylesheet type="text/xsl" href="/style.xsl"?>"#;
    let position = xml.find(instruction).expect("stylesheet instruction");
    let root = xml.find("<sruResponse:").expect("root element");
    assert!(position < root);
}

#[rstest]
fn rejected_request_reports_zero_records() {
    let server = server(Config::default(), MemoryEngine::with_records(3));
    let xml = respond(&server, "query=dog&startRecord=0&colour=blue");
    assert_eq!(top_level(&xml), ["version", "numberOfRecords", "diagnostics"]);
    assert_eq!(text(&xml, "numberOfRecords").as_deref(), Some("0"));
    assert_eq!(diagnostic_uris(&xml), [diagnostic_uri(6), diagnostic_uri(8)]);
    assert_eq!(server.engine().closed(), 0);
}

#[rstest]
fn late_failure_is_replaced_by_error_document() {
    let engine = MemoryEngine::with_records(5).failing_at(2);
    let server = server(Config::default(), engine.clone());
    let xml = respond(&server, "query=dog");
    assert_eq!(top_level(&xml), ["version", "numberOfRecords", "diagnostics"]);
    assert_eq!(text(&xml, "numberOfRecords").as_deref(), Some("0"));
    assert_eq!(diagnostic_uris(&xml), [diagnostic_uri(1)]);
    assert_eq!(count(&xml, "record"), 0);
    assert_eq!(engine.closed(), 1);
}

#[rstest]
fn failure_after_commit_is_surfaced() {
    let config = Config {
        response_buffer_size: 32,
        ..Config::default()
    };
    let engine = MemoryEngine::with_records(5).failing_at(3);
    let server = server(config, engine.clone());
    let outcome = server.handle_request(&RawParameters::from_query("query=dog"), Vec::new());
    match outcome {
        Err(ServerError::Committed { diagnostic }) => {
            assert_eq!(diagnostic.details(), Some("backend failed"));
        }
        other => panic!("expected a committed failure, got {other:?}"),
    }
    assert_eq!(engine.closed(), 1);
}

#[rstest]
fn indentation_changes_whitespace_only() {
    let compact = respond(
        &server(echoing(), MemoryEngine::with_records(2)),
        "query=dog",
    );
    let indented_config = Config {
        indent_response: 2,
        ..echoing()
    };
    let indented = respond(
        &server(indented_config, MemoryEngine::with_records(2)),
        "query=dog",
    );
    assert!(!compact.contains('\n'));
    assert!(indented.contains("\n  <sruResponse:version>"));
    assert_eq!(
        super::support::structure(&compact),
        super::support::structure(&indented)
    );
}

#[rstest]
#[case::one_one("1.1", ProtocolVersion::V1_1)]
#[case::one_two("1.2", ProtocolVersion::V1_2)]
fn version_element_matches_negotiated_version(
    #[case] requested: &str,
    #[case] version: ProtocolVersion,
) {
    let server = server(Config::default(), MemoryEngine::with_records(1));
    let xml = respond(
        &server,
        &format!("operation=searchRetrieve&version={requested}&query=dog"),
    );
    assert_eq!(text(&xml, "version").as_deref(), Some(version.as_str()));
}
