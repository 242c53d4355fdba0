//! In-memory backend and XML inspection helpers shared by server tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use quick_xml::Reader;
use quick_xml::events::Event;
use sru_config::Config;
use sru_core::{
    Diagnostic, DiagnosticCode, Diagnostics, ResultCountPrecision, SruError, WhereInList,
};
use sru_query::QueryParserRegistry;
use sru_xml::XmlSink;

use crate::{
    RawParameters, ResultCursor, ScanResultSet, SearchEngine, SearchResultSet, SruServer,
    ValidatedRequest,
};

pub(crate) const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
pub(crate) const DC_SCHEMA: &str = "info:srw/schema/1/dc-v1.1";

/// A backend serving a fixed list of titles and index terms.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryEngine {
    titles: Vec<String>,
    terms: Vec<(String, u64)>,
    fail_at: Option<usize>,
    surrogate_at: Option<usize>,
    over_deliver: bool,
    closed: Arc<AtomicUsize>,
}

impl MemoryEngine {
    /// Serves `count` records titled `Record 1`, `Record 2`, ...
    pub(crate) fn with_records(count: usize) -> Self {
        Self::with_titles((1..=count).map(|n| format!("Record {n}")))
    }

    pub(crate) fn with_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn with_terms(terms: &[(&str, u64)]) -> Self {
        Self {
            terms: terms
                .iter()
                .map(|(value, count)| ((*value).to_owned(), *count))
                .collect(),
            ..Self::default()
        }
    }

    /// Fails when the cursor is advanced onto the `index`th delivered record.
    pub(crate) const fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Replaces the `index`th delivered record with a surrogate diagnostic.
    pub(crate) const fn surrogate_at(mut self, index: usize) -> Self {
        self.surrogate_at = Some(index);
        self
    }

    /// Reports the requested window but yields every remaining record.
    pub(crate) const fn over_delivering(mut self) -> Self {
        self.over_deliver = true;
        self
    }

    /// Number of cursors closed so far.
    pub(crate) fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl SearchEngine for MemoryEngine {
    fn search(
        &self,
        request: &ValidatedRequest,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Box<dyn SearchResultSet>, SruError> {
        let skip = usize::try_from(request.start_record().saturating_sub(1)).unwrap_or(usize::MAX);
        let window: Vec<(String, String)> = self
            .titles
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(index, title)| (format!("rec-{}", index + 1), title.clone()))
            .collect();
        let limit = request
            .maximum_records()
            .map_or(window.len(), |max| {
                window.len().min(usize::try_from(max).unwrap_or(usize::MAX))
            });
        let records = if self.over_deliver {
            window
        } else {
            window.into_iter().take(limit).collect()
        };
        Ok(Box::new(MemoryResultSet {
            total: u64::try_from(self.titles.len()).expect("record count fits"),
            reported: u64::try_from(limit).expect("record count fits"),
            records,
            position: None,
            fail_at: self.fail_at,
            surrogate_at: self.surrogate_at,
            surrogate: Diagnostic::new(DiagnosticCode::RecordTemporarilyUnavailable),
            closed: Arc::clone(&self.closed),
        }))
    }

    fn scan(
        &self,
        request: &ValidatedRequest,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Option<Box<dyn ScanResultSet>>, SruError> {
        let limit = request
            .maximum_terms()
            .map_or(self.terms.len(), |max| {
                self.terms.len().min(usize::try_from(max).unwrap_or(usize::MAX))
            });
        Ok(Some(Box::new(MemoryTerms {
            terms: self.terms.iter().take(limit).cloned().collect(),
            position: None,
            closed: Arc::clone(&self.closed),
        })))
    }
}

struct MemoryResultSet {
    total: u64,
    reported: u64,
    records: Vec<(String, String)>,
    position: Option<usize>,
    fail_at: Option<usize>,
    surrogate_at: Option<usize>,
    surrogate: Diagnostic,
    closed: Arc<AtomicUsize>,
}

impl MemoryResultSet {
    fn current(&self) -> Option<&(String, String)> {
        self.position.and_then(|index| self.records.get(index))
    }
}

impl ResultCursor for MemoryResultSet {
    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl SearchResultSet for MemoryResultSet {
    fn total_record_count(&self) -> u64 {
        self.total
    }

    fn record_count(&self) -> u64 {
        self.reported
    }

    fn result_count_precision(&self) -> Option<ResultCountPrecision> {
        Some(ResultCountPrecision::Exact)
    }

    fn next_record(&mut self) -> Result<bool, SruError> {
        let next = self.position.map_or(0, |index| index + 1);
        if self.fail_at == Some(next) {
            return Err(SruError::new(DiagnosticCode::GeneralSystemError)
                .with_details("backend failed"));
        }
        if next < self.records.len() {
            self.position = Some(next);
            return Ok(true);
        }
        Ok(false)
    }

    fn record_schema_identifier(&self) -> &str {
        DC_SCHEMA
    }

    fn record_identifier(&self) -> Option<&str> {
        self.current().map(|(identifier, _)| identifier.as_str())
    }

    fn surrogate_diagnostic(&self) -> Option<&Diagnostic> {
        (self.position.is_some() && self.position == self.surrogate_at).then_some(&self.surrogate)
    }

    fn write_record(&mut self, sink: &mut dyn XmlSink) -> Result<(), SruError> {
        let title = self.current().map_or("", |(_, title)| title.as_str());
        sink.start_element(Some("dc"), "record")?;
        sink.namespace(Some("dc"), DC_NAMESPACE)?;
        sink.text_element(Some("dc"), "title", title)?;
        sink.end_element()?;
        Ok(())
    }
}

struct MemoryTerms {
    terms: Vec<(String, u64)>,
    position: Option<usize>,
    closed: Arc<AtomicUsize>,
}

impl MemoryTerms {
    fn current(&self) -> Option<&(String, u64)> {
        self.position.and_then(|index| self.terms.get(index))
    }
}

impl ResultCursor for MemoryTerms {
    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl ScanResultSet for MemoryTerms {
    fn next_term(&mut self) -> Result<bool, SruError> {
        let next = self.position.map_or(0, |index| index + 1);
        if next < self.terms.len() {
            self.position = Some(next);
            return Ok(true);
        }
        Ok(false)
    }

    fn value(&self) -> &str {
        self.current().map_or("", |(value, _)| value.as_str())
    }

    fn number_of_records(&self) -> Option<u64> {
        self.current().map(|(_, count)| *count)
    }

    fn where_in_list(&self) -> Option<WhereInList> {
        let index = self.position?;
        let last = self.terms.len().checked_sub(1)?;
        Some(match (index == 0, index == last) {
            (true, true) => WhereInList::Only,
            (true, false) => WhereInList::First,
            (false, true) => WhereInList::Last,
            (false, false) => WhereInList::Inner,
        })
    }
}

/// Builds a server over `engine` with the bundled query parsers.
pub(crate) fn server(config: Config, engine: MemoryEngine) -> SruServer<MemoryEngine> {
    SruServer::new(config, QueryParserRegistry::with_defaults(), engine)
        .expect("valid configuration")
}

/// Answers `query` and returns the body as text.
pub(crate) fn respond(server: &SruServer<MemoryEngine>, query: &str) -> String {
    let body = server
        .handle_request(&RawParameters::from_query(query), Vec::new())
        .expect("response body");
    String::from_utf8(body).expect("utf-8 body")
}

fn local(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Returns the non-blank text of every element with local name `name`.
pub(crate) fn texts(xml: &str, name: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<String> = Vec::new();
    let mut found = Vec::new();
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(element) => open.push(local(element.local_name().as_ref())),
            Event::End(_) => {
                open.pop();
            }
            Event::Text(text) if open.last().is_some_and(|current| current == name) => {
                let decoded = text.unescape().expect("text");
                if !decoded.trim().is_empty() {
                    found.push(decoded.into_owned());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    found
}

/// Returns the text of the first element with local name `name`.
pub(crate) fn text(xml: &str, name: &str) -> Option<String> {
    texts(xml, name).into_iter().next()
}

/// Counts elements with local name `name`.
pub(crate) fn count(xml: &str, name: &str) -> usize {
    let mut reader = Reader::from_str(xml);
    let mut total = 0;
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(element) | Event::Empty(element)
                if element.local_name().as_ref() == name.as_bytes() =>
            {
                total += 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    total
}

/// Local names of the root element's children, in document order.
pub(crate) fn top_level(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0_usize;
    let mut names = Vec::new();
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(element) => {
                if depth == 1 {
                    names.push(local(element.local_name().as_ref()));
                }
                depth += 1;
            }
            Event::Empty(element) if depth == 1 => {
                names.push(local(element.local_name().as_ref()));
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }
    names
}

/// Reduces a document to its element and text structure, ignoring
/// whitespace-only text.
pub(crate) fn structure(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut events = Vec::new();
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(element) => {
                events.push(format!("start {}", local(element.name().as_ref())));
            }
            Event::Empty(element) => {
                let name = local(element.name().as_ref());
                events.push(format!("start {name}"));
                events.push(format!("end {name}"));
            }
            Event::End(element) => events.push(format!("end {}", local(element.name().as_ref()))),
            Event::Text(text) => {
                let decoded = text.unescape().expect("text");
                if !decoded.trim().is_empty() {
                    events.push(format!("text {decoded}"));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    events
}

/// Diagnostic URIs reported by a response, in order.
pub(crate) fn diagnostic_uris(xml: &str) -> Vec<String> {
    texts(xml, "uri")
}

/// URI of a standard diagnostic number.
pub(crate) fn diagnostic_uri(number: u32) -> String {
    format!("info:srw/diagnostic/1/{number}")
}
