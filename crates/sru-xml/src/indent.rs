//! Pretty-printing layer.

use crate::error::XmlWriterError;
use crate::sink::XmlSink;

/// What an open element has contained so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seen {
    Nothing,
    Element,
    Data,
}

/// Inserts newlines and indentation between elements.
///
/// Whitespace is only written between tags: an element that has received
/// character data is closed flush against it, so textual content is never
/// altered. While suspended, events pass straight through and only mark the
/// enclosing element as holding data.
#[derive(Debug)]
pub struct IndentingSink<S> {
    inner: S,
    width: Option<usize>,
    stack: Vec<Seen>,
    state: Seen,
    suspended: usize,
}

impl<S: XmlSink> IndentingSink<S> {
    /// Wraps `inner`. A `width` of `None` disables indentation entirely.
    pub const fn new(inner: S, width: Option<usize>) -> Self {
        Self {
            inner,
            width,
            stack: Vec::new(),
            state: Seen::Nothing,
            suspended: 0,
        }
    }

    /// Stops indenting until [`resume`](Self::resume) is called.
    pub const fn suspend(&mut self) {
        self.suspended = self.suspended.saturating_add(1);
    }

    /// Undoes one [`suspend`](Self::suspend).
    pub const fn resume(&mut self) {
        self.suspended = self.suspended.saturating_sub(1);
    }

    /// Borrows the wrapped sink.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Mutably borrows the wrapped sink.
    pub const fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Returns the wrapped sink.
    pub fn into_inner(self) -> S {
        self.inner
    }

    const fn active(&self) -> Option<usize> {
        if self.suspended > 0 {
            None
        } else {
            self.width
        }
    }

    fn newline_and_indent(&mut self, width: usize, depth: usize) -> Result<(), XmlWriterError> {
        let mut whitespace = String::from("\n");
        whitespace.push_str(&" ".repeat(width.saturating_mul(depth)));
        self.inner.characters(&whitespace)
    }
}

impl<S: XmlSink> XmlSink for IndentingSink<S> {
    fn start_element(&mut self, prefix: Option<&str>, local: &str) -> Result<(), XmlWriterError> {
        let Some(width) = self.active() else {
            self.state = Seen::Data;
            return self.inner.start_element(prefix, local);
        };
        let depth = self.stack.len();
        self.stack.push(Seen::Element);
        self.state = Seen::Nothing;
        if depth > 0 {
            self.newline_and_indent(width, depth)?;
        }
        self.inner.start_element(prefix, local)
    }

    fn namespace(&mut self, prefix: Option<&str>, uri: &str) -> Result<(), XmlWriterError> {
        self.inner.namespace(prefix, uri)
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<(), XmlWriterError> {
        self.inner.attribute(name, value)
    }

    fn characters(&mut self, text: &str) -> Result<(), XmlWriterError> {
        self.state = Seen::Data;
        self.inner.characters(text)
    }

    fn cdata(&mut self, text: &str) -> Result<(), XmlWriterError> {
        self.state = Seen::Data;
        self.inner.cdata(text)
    }

    fn end_element(&mut self) -> Result<(), XmlWriterError> {
        let Some(width) = self.active() else {
            self.state = Seen::Data;
            return self.inner.end_element();
        };
        let closing = self.state;
        self.state = self.stack.pop().unwrap_or(Seen::Nothing);
        if closing == Seen::Element {
            let depth = self.stack.len();
            self.newline_and_indent(width, depth)?;
        }
        self.inner.end_element()
    }
}
