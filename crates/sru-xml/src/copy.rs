//! Namespace-aware copying of structured payloads into a response.
//!
//! Producers describe a tree through [`XmlTreeVisitor`] events that carry
//! namespace URIs rather than prefixes. [`NamespaceCopier`] re-emits those
//! events through an [`XmlSink`], choosing prefixes from the active
//! [`NamespaceProfile`] and declaring each namespace once, at the element
//! where it is first used.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use sru_core::NamespaceProfile;

use crate::error::XmlWriterError;
use crate::sink::XmlSink;

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace-qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlName<'a> {
    /// Namespace URI, or `None` for names in no namespace.
    pub namespace: Option<&'a str>,
    /// Prefix the producer would prefer, if it has one.
    pub prefix_hint: Option<&'a str>,
    /// Local part of the name.
    pub local: &'a str,
}

impl<'a> XmlName<'a> {
    /// A name in no namespace.
    #[must_use]
    pub const fn local(local: &'a str) -> Self {
        Self {
            namespace: None,
            prefix_hint: None,
            local,
        }
    }

    /// A name in `namespace`.
    #[must_use]
    pub const fn qualified(namespace: &'a str, local: &'a str) -> Self {
        Self {
            namespace: Some(namespace),
            prefix_hint: None,
            local,
        }
    }

    /// Sets the preferred prefix.
    #[must_use]
    pub const fn with_prefix_hint(mut self, prefix: Option<&'a str>) -> Self {
        self.prefix_hint = prefix;
        self
    }
}

/// Receiver of namespace-resolved tree events.
///
/// Implemented by anything that can consume a structured payload, most
/// notably [`NamespaceCopier`].
pub trait XmlTreeVisitor {
    /// Opens an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be emitted.
    fn start_element(&mut self, name: XmlName<'_>) -> Result<(), XmlWriterError>;

    /// Adds an attribute to the element just opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be emitted.
    fn attribute(&mut self, name: XmlName<'_>, value: &str) -> Result<(), XmlWriterError>;

    /// Writes character data.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be emitted.
    fn characters(&mut self, text: &str) -> Result<(), XmlWriterError>;

    /// Closes the most recently opened element.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be emitted.
    fn end_element(&mut self) -> Result<(), XmlWriterError>;

    /// Writes `<name>text</name>`.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying calls.
    fn text_element(&mut self, name: XmlName<'_>, text: &str) -> Result<(), XmlWriterError> {
        self.start_element(name)?;
        self.characters(text)?;
        self.end_element()
    }
}

/// Namespace bindings introduced by one element.
type Scope = Vec<(Option<String>, String)>;

/// Re-emits tree events through a sink, declaring namespaces on first use.
pub struct NamespaceCopier<'w> {
    sink: &'w mut dyn XmlSink,
    profile: &'static NamespaceProfile,
    scopes: Vec<Scope>,
    generated: usize,
}

impl<'w> NamespaceCopier<'w> {
    /// Creates a copier writing into `sink` with prefixes from `profile`.
    pub fn new(sink: &'w mut dyn XmlSink, profile: &'static NamespaceProfile) -> Self {
        Self {
            sink,
            profile,
            scopes: Vec::new(),
            generated: 0,
        }
    }

    fn in_scope(&self, prefix: Option<&str>) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(bound, _)| bound.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    fn prefix_in_scope_for(&self, uri: &str) -> Option<Option<String>> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(bound, bound_uri)| {
                bound_uri == uri && self.in_scope(bound.as_deref()) == Some(uri)
            })
            .map(|(bound, _)| bound.clone())
    }

    fn choose_prefix(&mut self, uri: &str, hint: Option<&str>, attribute: bool) -> Option<String> {
        if uri == XML_NAMESPACE {
            return Some(String::from("xml"));
        }
        if let Some(prefix) = self.profile.prefix_for(uri) {
            return Some(prefix.to_owned());
        }
        if let Some(bound) = self.prefix_in_scope_for(uri) {
            if bound.is_some() || !attribute {
                return bound;
            }
        }
        match hint {
            Some(preferred) if !preferred.is_empty() => Some(preferred.to_owned()),
            _ if !attribute => None,
            _ => {
                self.generated = self.generated.saturating_add(1);
                Some(format!("ns{}", self.generated))
            }
        }
    }

    fn declare(&mut self, prefix: Option<&str>, uri: &str) -> Result<(), XmlWriterError> {
        if uri == XML_NAMESPACE || self.in_scope(prefix).unwrap_or_default() == uri {
            return Ok(());
        }
        self.sink.namespace(prefix, uri)?;
        if let Some(scope) = self.scopes.last_mut() {
            scope.push((prefix.map(str::to_owned), uri.to_owned()));
        }
        Ok(())
    }
}

impl XmlTreeVisitor for NamespaceCopier<'_> {
    fn start_element(&mut self, name: XmlName<'_>) -> Result<(), XmlWriterError> {
        let prefix = match name.namespace {
            Some(uri) => self.choose_prefix(uri, name.prefix_hint, false),
            None => None,
        };
        self.sink.start_element(prefix.as_deref(), name.local)?;
        self.scopes.push(Scope::new());
        self.declare(prefix.as_deref(), name.namespace.unwrap_or_default())
    }

    fn attribute(&mut self, name: XmlName<'_>, value: &str) -> Result<(), XmlWriterError> {
        let Some(uri) = name.namespace else {
            return self.sink.attribute(name.local, value);
        };
        let prefix = self.choose_prefix(uri, name.prefix_hint, true);
        self.declare(prefix.as_deref(), uri)?;
        let qualified = match prefix {
            Some(bound) => format!("{bound}:{}", name.local),
            None => name.local.to_owned(),
        };
        self.sink.attribute(&qualified, value)
    }

    fn characters(&mut self, text: &str) -> Result<(), XmlWriterError> {
        self.sink.characters(text)
    }

    fn end_element(&mut self) -> Result<(), XmlWriterError> {
        self.scopes.pop();
        self.sink.end_element()
    }
}

/// Parses serialized XML and replays it as tree events.
///
/// Namespace declarations are resolved and dropped; the visitor decides
/// where to redeclare them. Comments and processing instructions are
/// skipped, as is whitespace-only text next to child elements. Whitespace
/// that is an element's only content is kept.
///
/// # Errors
///
/// Returns [`XmlWriterError::MalformedFragment`] if the input is not
/// well-formed or uses an undeclared prefix, and propagates visitor errors.
pub fn copy_fragment(xml: &str, visitor: &mut dyn XmlTreeVisitor) -> Result<(), XmlWriterError> {
    let mut reader = Reader::from_str(xml);
    let mut namespaces: Vec<HashMap<String, String>> = Vec::new();
    // Whitespace seen right after a start tag, written only if the element
    // closes without children.
    let mut pending: Option<String> = None;
    let mut after_start = false;
    loop {
        let event = reader.read_event()?;
        let opened = matches!(event, Event::Start(_));
        match event {
            Event::Start(ref element) => {
                pending = None;
                open_element(element, &mut namespaces, visitor)?;
            }
            Event::Empty(ref element) => {
                pending = None;
                open_element(element, &mut namespaces, visitor)?;
                namespaces.pop();
                visitor.end_element()?;
            }
            Event::End(_) => {
                if let Some(whitespace) = pending.take() {
                    visitor.characters(&whitespace)?;
                }
                namespaces.pop();
                visitor.end_element()?;
            }
            Event::Text(ref text) => {
                let decoded = text.unescape()?;
                if !decoded.trim().is_empty() {
                    visitor.characters(&decoded)?;
                } else if after_start {
                    pending = Some(decoded.into_owned());
                }
            }
            Event::CData(data) => {
                if let Some(whitespace) = pending.take() {
                    visitor.characters(&whitespace)?;
                }
                visitor.characters(&String::from_utf8_lossy(&data))?;
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        after_start = opened;
    }
    Ok(())
}

fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

fn resolve<'n>(
    namespaces: &'n [HashMap<String, String>],
    prefix: Option<&str>,
) -> Option<&'n str> {
    if prefix == Some("xml") {
        return Some(XML_NAMESPACE);
    }
    let key = prefix.unwrap_or_default();
    namespaces
        .iter()
        .rev()
        .find_map(|scope| scope.get(key))
        .map(String::as_str)
        .filter(|uri| !uri.is_empty())
}

fn open_element(
    element: &BytesStart<'_>,
    namespaces: &mut Vec<HashMap<String, String>>,
    visitor: &mut dyn XmlTreeVisitor,
) -> Result<(), XmlWriterError> {
    let mut declared = HashMap::new();
    let mut attributes = Vec::new();
    for entry in element.attributes() {
        let attribute = entry.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        if key == "xmlns" {
            declared.insert(String::new(), value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declared.insert(prefix.to_owned(), value);
        } else {
            attributes.push((key, value));
        }
    }
    namespaces.push(declared);

    let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let (prefix, local) = split_name(&tag);
    let namespace = resolve(namespaces, prefix);
    if prefix.is_some() && namespace.is_none() {
        return Err(undeclared(&tag));
    }
    visitor.start_element(XmlName {
        namespace,
        prefix_hint: prefix,
        local,
    })?;

    for (key, value) in &attributes {
        let (attr_prefix, attr_local) = split_name(key);
        let attr_namespace = match attr_prefix {
            Some(bound) => Some(resolve(namespaces, Some(bound)).ok_or_else(|| undeclared(key))?),
            None => None,
        };
        visitor.attribute(
            XmlName {
                namespace: attr_namespace,
                prefix_hint: attr_prefix,
                local: attr_local,
            },
            value,
        )?;
    }
    Ok(())
}

fn undeclared(name: &str) -> XmlWriterError {
    XmlWriterError::MalformedFragment {
        message: format!("undeclared namespace prefix in '{name}'"),
    }
}
