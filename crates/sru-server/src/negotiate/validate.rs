//! Table-driven parameter validation.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use sru_config::Config;
use sru_core::{
    DiagnosticCode, Diagnostics, Operation, ProtocolVersion, RecordPacking, RecordXmlEscaping,
    RenderBy,
};
use sru_query::{CQL_QUERY_TYPE, DEFAULT_QUERY_TYPE, QueryParserRegistry, SruQuery};
use sru_query::cql::QUERY_PARAMETER;

use super::request::{NegotiationFailure, ValidatedRequest};
use super::rules::{Parameter, ParameterRule, rules_for};
use super::{EXTENSION_PREFIX, X_INDENT_RESPONSE, X_UNLIMITED_RESULTSET, X_UNLIMITED_TERMLIST};
use crate::transport::ParameterSource;

/// Accumulated state of one validation pass.
pub(super) struct Validation<'a> {
    config: &'a Config,
    registry: &'a QueryParserRegistry,
    params: &'a dyn ParameterSource,
    operation: Operation,
    version: ProtocolVersion,
    consumed: HashSet<String>,
    diagnostics: Diagnostics,
    fields: Fields,
}

/// Values collected from the table pass before clamping.
#[derive(Default)]
struct Fields {
    query_type: Option<String>,
    query: Option<SruQuery>,
    start_record: Option<u32>,
    maximum_records: Option<u32>,
    escaping: Option<RecordXmlEscaping>,
    packing: Option<RecordPacking>,
    record_schema: Option<String>,
    record_xpath: Option<String>,
    result_set_ttl: Option<u32>,
    sort_keys: Option<String>,
    stylesheet: Option<String>,
    rendered_by: Option<RenderBy>,
    http_accept: Option<String>,
    response_type: Option<String>,
    scan_clause: Option<SruQuery>,
    response_position: Option<u32>,
    maximum_terms: Option<u32>,
    echoed: Vec<(&'static str, String)>,
}

impl<'a> Validation<'a> {
    pub(super) fn new(
        config: &'a Config,
        registry: &'a QueryParserRegistry,
        params: &'a dyn ParameterSource,
        operation: Operation,
        version: ProtocolVersion,
    ) -> Self {
        Self {
            config,
            registry,
            params,
            operation,
            version,
            consumed: HashSet::new(),
            diagnostics: Diagnostics::new(),
            fields: Fields::default(),
        }
    }

    pub(super) fn run(mut self) -> Result<ValidatedRequest, NegotiationFailure> {
        let rules = rules_for(self.operation);
        let legal: Vec<&str> = rules
            .iter()
            .filter(|rule| rule.is_legal(self.version))
            .map(|rule| rule.name(self.version))
            .collect();

        for rule in rules {
            if rule.is_legal(self.version) {
                self.apply_rule(rule);
            } else {
                self.reject_illegal(rule, &legal);
            }
        }
        let extensions = self.sweep();
        self.finish(extensions)
    }

    fn reject_illegal(&mut self, rule: &ParameterRule, legal: &[&str]) {
        let name = rule.name(self.version);
        if self.params.parameter(name).is_none()
            || legal.contains(&name)
            || self.consumed.contains(name)
        {
            return;
        }
        self.consumed.insert(name.to_owned());
        self.diagnostics.add(
            DiagnosticCode::UnsupportedParameter,
            Some(name),
            Some(&format!(
                "parameter '{name}' is not supported in version {}",
                self.version
            )),
        );
    }

    fn apply_rule(&mut self, rule: &ParameterRule) {
        let name = rule.name(self.version);
        self.consumed.insert(name.to_owned());
        let params = self.params;
        let value = match params.parameter(name).map(str::trim) {
            Some("") => {
                self.diagnostics.add(
                    DiagnosticCode::UnsupportedParameterValue,
                    Some(name),
                    Some(&format!("parameter '{name}' has an empty value")),
                );
                None
            }
            other => other,
        };

        if let Some(supplied) = value
            && !matches!(rule.parameter, Parameter::Operation | Parameter::Version)
        {
            self.fields.echoed.push((name, supplied.to_owned()));
        }

        match (rule.parameter, value) {
            (Parameter::Query, _) => self.dispatch_query(),
            (_, None) if rule.mandatory => self.diagnostics.add(
                DiagnosticCode::MandatoryParameterNotSupplied,
                Some(name),
                None,
            ),
            (_, None) => {}
            (parameter, Some(supplied)) => self.apply_value(parameter, name, supplied),
        }
    }

    fn apply_value(&mut self, parameter: Parameter, name: &'static str, value: &'a str) {
        let text = || Some(value.to_owned());
        match parameter {
            Parameter::Operation | Parameter::Version | Parameter::Query => {}
            Parameter::QueryType => self.fields.query_type = text(),
            Parameter::StartRecord => self.fields.start_record = self.count(parameter, name, value),
            Parameter::MaximumRecords => {
                self.fields.maximum_records = self.count(parameter, name, value);
            }
            Parameter::ResultSetTtl => {
                self.fields.result_set_ttl = self.count(parameter, name, value);
            }
            Parameter::ResponsePosition => {
                self.fields.response_position = self.count(parameter, name, value);
            }
            Parameter::MaximumTerms => {
                self.fields.maximum_terms = self.count(parameter, name, value);
            }
            Parameter::RecordXmlEscaping => {
                self.fields.escaping =
                    self.vocabulary(DiagnosticCode::UnsupportedRecordPacking, name, value);
            }
            Parameter::RecordPacking => {
                self.fields.packing =
                    self.vocabulary(DiagnosticCode::UnsupportedRecordPacking, name, value);
            }
            Parameter::RenderedBy => {
                self.fields.rendered_by =
                    self.vocabulary(DiagnosticCode::UnsupportedParameterValue, name, value);
            }
            Parameter::RecordSchema => self.fields.record_schema = text(),
            Parameter::RecordXPath => self.fields.record_xpath = text(),
            Parameter::SortKeys => self.fields.sort_keys = text(),
            Parameter::Stylesheet => self.fields.stylesheet = text(),
            Parameter::HttpAccept => self.fields.http_accept = text(),
            Parameter::ResponseType => self.fields.response_type = text(),
            Parameter::ScanClause => self.dispatch_scan_clause(value),
        }
    }

    /// Parses a non-negative integer with a per-parameter minimum.
    fn count(&mut self, parameter: Parameter, name: &str, value: &str) -> Option<u32> {
        let minimum = parameter.minimum().unwrap_or(0);
        match value.parse::<u32>() {
            Ok(count) if count >= minimum => Some(count),
            _ => {
                self.diagnostics.add(
                    DiagnosticCode::UnsupportedParameterValue,
                    Some(name),
                    Some(&format!(
                        "value '{value}' of parameter '{name}' must be an integer of at least {minimum}"
                    )),
                );
                None
            }
        }
    }

    /// Maps a value through a closed vocabulary.
    fn vocabulary<T: FromStr>(&mut self, code: DiagnosticCode, name: &str, value: &str) -> Option<T> {
        value.parse().ok().or_else(|| {
            self.diagnostics.add(
                code,
                Some(name),
                Some(&format!("unsupported value '{value}' for parameter '{name}'")),
            );
            None
        })
    }

    fn dispatch_query(&mut self) {
        let query_type = match (self.version, self.fields.query_type.as_deref()) {
            (ProtocolVersion::V2_0, Some(query_type)) => query_type.to_owned(),
            _ => DEFAULT_QUERY_TYPE.to_owned(),
        };
        let params = self.params;
        let dispatch = self.registry.dispatch(
            self.version,
            &query_type,
            |name| params.parameter(name),
            &mut self.diagnostics,
        );
        self.consumed.extend(dispatch.consumed);
        self.fields.query = dispatch.query;
    }

    fn dispatch_scan_clause(&mut self, clause: &'a str) {
        let dispatch = self.registry.dispatch(
            self.version,
            CQL_QUERY_TYPE,
            |name| (name == QUERY_PARAMETER).then_some(clause),
            &mut self.diagnostics,
        );
        self.fields.scan_clause = dispatch.query;
    }

    /// Flags every parameter nothing claimed and collects extensions.
    fn sweep(&mut self) -> BTreeMap<String, String> {
        let params = self.params;
        let mut extensions = BTreeMap::new();
        for name in params.parameter_names() {
            if name.starts_with(EXTENSION_PREFIX) {
                let value = params.parameter(name).unwrap_or_default().trim();
                extensions
                    .entry(name.to_owned())
                    .or_insert_with(|| value.to_owned());
            } else if !self.consumed.contains(name) {
                self.diagnostics.add(
                    DiagnosticCode::UnsupportedParameter,
                    Some(name),
                    Some(&format!("parameter '{name}' is not supported")),
                );
            }
        }
        extensions
    }

    fn finish(
        self,
        extensions: BTreeMap<String, String>,
    ) -> Result<ValidatedRequest, NegotiationFailure> {
        let config = self.config;
        let switched_on =
            |name: &str| extensions.get(name).is_some_and(|value| value == "true");
        let indent = match extensions.get(X_INDENT_RESPONSE) {
            Some(value) if config.allow_override_indent_response => value
                .parse::<i32>()
                .map_or_else(|_| config.indent_width(), |width| usize::try_from(width).ok()),
            _ => config.indent_width(),
        };

        if !self.diagnostics.is_empty() {
            return Err(NegotiationFailure {
                operation: self.operation,
                version: self.version,
                indent,
                diagnostics: self.diagnostics,
            });
        }

        let maximum_records = clamp(
            self.fields.maximum_records,
            config.number_of_records,
            config.maximum_records,
            config.allow_override_maximum_records && switched_on(X_UNLIMITED_RESULTSET),
        );
        let maximum_terms = clamp(
            self.fields.maximum_terms,
            config.number_of_terms,
            config.maximum_terms,
            config.allow_override_maximum_terms && switched_on(X_UNLIMITED_TERMLIST),
        );
        let fields = self.fields;
        Ok(ValidatedRequest {
            operation: self.operation,
            version: self.version,
            escaping: fields.escaping.unwrap_or_default(),
            packing: fields.packing,
            query: fields.query,
            start_record: fields.start_record.unwrap_or(1),
            maximum_records,
            record_schema: fields.record_schema,
            record_xpath: fields.record_xpath,
            result_set_ttl: fields.result_set_ttl,
            sort_keys: fields.sort_keys,
            stylesheet: fields.stylesheet,
            rendered_by: fields.rendered_by,
            http_accept: fields.http_accept,
            response_type: fields.response_type,
            scan_clause: fields.scan_clause,
            response_position: fields.response_position.unwrap_or(1),
            maximum_terms,
            indent,
            extensions,
            echoed: fields.echoed,
        })
    }
}

/// Applies the default and the server ceiling to a requested count.
///
/// Returns `None` when the ceiling is lifted.
fn clamp(requested: Option<u32>, default: u32, ceiling: u32, unlimited: bool) -> Option<u32> {
    if unlimited {
        return None;
    }
    Some(requested.unwrap_or(default).min(ceiling))
}
