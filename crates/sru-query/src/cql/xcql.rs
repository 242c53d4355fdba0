//! XCQL serialization of the CQL syntax tree.

use sru_xml::{XmlName, XmlTreeVisitor, XmlWriterError};

use super::ast::{CqlNode, CqlQuery, Modifier, PrefixAssignment, SearchClause, SortKey};

/// Writes XCQL elements in one namespace.
pub(crate) struct XcqlWriter<'v> {
    visitor: &'v mut dyn XmlTreeVisitor,
    namespace: &'v str,
}

impl<'v> XcqlWriter<'v> {
    pub(crate) fn new(visitor: &'v mut dyn XmlTreeVisitor, namespace: &'v str) -> Self {
        Self { visitor, namespace }
    }

    fn open(&mut self, local: &str) -> Result<(), XmlWriterError> {
        let name = XmlName::qualified(self.namespace, local);
        self.visitor.start_element(name)
    }

    fn close(&mut self) -> Result<(), XmlWriterError> {
        self.visitor.end_element()
    }

    fn text(&mut self, local: &str, text: &str) -> Result<(), XmlWriterError> {
        let name = XmlName::qualified(self.namespace, local);
        self.visitor.text_element(name, text)
    }

    pub(crate) fn query(&mut self, query: &CqlQuery) -> Result<(), XmlWriterError> {
        self.node(&query.root, &query.prefixes, &query.sort_keys)
    }

    fn node(
        &mut self,
        node: &CqlNode,
        prefixes: &[PrefixAssignment],
        sort_keys: &[SortKey],
    ) -> Result<(), XmlWriterError> {
        match node {
            CqlNode::Boolean {
                operator,
                modifiers,
                left,
                right,
            } => {
                self.open("triple")?;
                self.prefixes(prefixes)?;
                self.open("boolean")?;
                self.text("value", operator.as_str())?;
                self.modifiers(modifiers)?;
                self.close()?;
                self.open("leftOperand")?;
                self.node(left, &[], &[])?;
                self.close()?;
                self.open("rightOperand")?;
                self.node(right, &[], &[])?;
                self.close()?;
                self.sort_keys(sort_keys)?;
                self.close()
            }
            CqlNode::Clause(clause) => {
                self.open("searchClause")?;
                self.prefixes(prefixes)?;
                self.clause(clause)?;
                self.sort_keys(sort_keys)?;
                self.close()
            }
        }
    }

    fn clause(&mut self, clause: &SearchClause) -> Result<(), XmlWriterError> {
        self.text("index", &clause.index)?;
        self.open("relation")?;
        self.text("value", &clause.relation.base)?;
        self.modifiers(&clause.relation.modifiers)?;
        self.close()?;
        self.text("term", &clause.term)
    }

    fn prefixes(&mut self, prefixes: &[PrefixAssignment]) -> Result<(), XmlWriterError> {
        if prefixes.is_empty() {
            return Ok(());
        }
        self.open("prefixes")?;
        for prefix in prefixes {
            self.open("prefix")?;
            if let Some(name) = &prefix.name {
                self.text("name", name)?;
            }
            self.text("identifier", &prefix.identifier)?;
            self.close()?;
        }
        self.close()
    }

    fn modifiers(&mut self, modifiers: &[Modifier]) -> Result<(), XmlWriterError> {
        if modifiers.is_empty() {
            return Ok(());
        }
        self.open("modifiers")?;
        for modifier in modifiers {
            self.open("modifier")?;
            self.text("type", &modifier.name)?;
            if let Some((comparison, value)) = &modifier.value {
                self.text("comparison", comparison)?;
                self.text("value", value)?;
            }
            self.close()?;
        }
        self.close()
    }

    fn sort_keys(&mut self, keys: &[SortKey]) -> Result<(), XmlWriterError> {
        if keys.is_empty() {
            return Ok(());
        }
        self.open("sortKeys")?;
        for key in keys {
            self.open("key")?;
            self.text("index", &key.index)?;
            self.modifiers(&key.modifiers)?;
            self.close()?;
        }
        self.close()
    }
}
