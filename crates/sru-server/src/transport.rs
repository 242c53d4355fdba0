//! Seams between the protocol core and the host transport.
//!
//! Inbound, the core only needs name lookup, name enumeration and a secure
//! flag ([`ParameterSource`]). Outbound, it writes through a
//! [`ResponseBuffer`] which holds bytes back until they are committed, so a
//! late failure can still be replaced by an error document.

use std::io::{self, Write};

use url::form_urlencoded;

/// Content type of every response body.
pub const CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Read access to the parameters of one request.
pub trait ParameterSource {
    /// Returns the first value supplied for `name`.
    fn parameter(&self, name: &str) -> Option<&str>;

    /// Returns every distinct parameter name, in order of first appearance.
    fn parameter_names(&self) -> Vec<&str>;

    /// Returns `true` when the request arrived over a secure transport.
    fn is_secure(&self) -> bool;
}

/// An immutable parameter view decoded from a query string or form body.
///
/// Repeated names keep every value, but lookups see the first.
///
/// # Example
///
/// ```
/// use sru_server::{ParameterSource, RawParameters};
///
/// let params = RawParameters::from_query("query=dog&maximumRecords=5&query=cat");
/// assert_eq!(params.parameter("query"), Some("dog"));
/// assert_eq!(params.parameter_names(), ["query", "maximumRecords"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    pairs: Vec<(String, String)>,
    secure: bool,
}

impl RawParameters {
    /// Decodes an `application/x-www-form-urlencoded` string.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let pairs = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();
        Self {
            pairs,
            secure: false,
        }
    }

    /// Builds a view from already decoded pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
            secure: false,
        }
    }

    /// Marks the request as received over a secure transport.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Returns every value supplied for `name`, in order.
    pub fn values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl ParameterSource for RawParameters {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.values(name).next()
    }

    fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in &self.pairs {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    fn is_secure(&self) -> bool {
        self.secure
    }
}

/// The byte sink provided by the host transport.
///
/// Bytes handed to [`Write`] are considered sent: once anything has been
/// written the status and body can no longer be replaced.
pub trait ResponseTarget: Write {
    /// Records the content type of the body about to be written.
    fn set_content_type(&mut self, content_type: &str);
}

impl ResponseTarget for Vec<u8> {
    fn set_content_type(&mut self, _content_type: &str) {}
}

/// Buffers a response body in front of a [`ResponseTarget`].
///
/// Bytes are passed on only when the buffer exceeds its capacity, when
/// [`Write::flush`] is called with delayed flushing off, or on
/// [`finish`](Self::finish). Until then [`reset`](Self::reset) discards
/// everything written so far.
#[derive(Debug)]
pub struct ResponseBuffer<T: ResponseTarget> {
    target: T,
    buffer: Vec<u8>,
    capacity: usize,
    delay_flush: bool,
    committed: bool,
}

impl<T: ResponseTarget> ResponseBuffer<T> {
    /// Wraps `target`, holding back up to `capacity` bytes.
    pub fn new(mut target: T, capacity: usize, content_type: &str) -> Self {
        target.set_content_type(content_type);
        Self {
            target,
            buffer: Vec::with_capacity(capacity.min(64 * 1024)),
            capacity,
            delay_flush: true,
            committed: false,
        }
    }

    /// Controls whether [`Write::flush`] is deferred until
    /// [`finish`](Self::finish).
    pub const fn set_delay_flush(&mut self, delay: bool) {
        self.delay_flush = delay;
    }

    /// Returns `true` once any byte has reached the target.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Returns the number of bytes currently held back.
    #[must_use]
    pub const fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Discards buffered bytes.
    ///
    /// Returns `false` and keeps the buffer when bytes were already
    /// committed.
    pub fn reset(&mut self) -> bool {
        if self.committed {
            return false;
        }
        self.buffer.clear();
        true
    }

    /// Sends any buffered bytes and returns the target.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised by the target.
    pub fn finish(mut self) -> io::Result<T> {
        self.commit()?;
        self.target.flush()?;
        Ok(self.target)
    }

    fn commit(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.committed = true;
        self.target.write_all(&self.buffer)?;
        self.buffer.clear();
        Ok(())
    }
}

impl<T: ResponseTarget> Write for ResponseBuffer<T> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        if self.buffer.len() > self.capacity {
            self.commit()?;
        }
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.delay_flush {
            return Ok(());
        }
        self.commit()?;
        self.target.flush()
    }
}
