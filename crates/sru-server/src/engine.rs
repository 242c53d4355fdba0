//! The backend contract.
//!
//! A [`SearchEngine`] answers explain, search and scan requests. Search and
//! scan results are forward-only cursors borrowed by the response assembler
//! for one response and closed unconditionally afterwards.

use std::ops::{Deref, DerefMut};

use sru_core::{Diagnostic, Diagnostics, ResultCountPrecision, SruError, WhereInList};
use sru_xml::XmlSink;

use crate::negotiate::ValidatedRequest;

/// Backend-supplied markup appended to a response.
pub trait ExtraResponseData {
    /// Writes the content of `extraResponseData`.
    ///
    /// # Errors
    ///
    /// Returns a fatal error to abort the response.
    fn write_extra_response_data(&self, sink: &mut dyn XmlSink) -> Result<(), SruError>;
}

/// Releases backend resources held by a cursor.
pub trait ResultCursor {
    /// Called exactly once when the response no longer needs the cursor.
    fn close(&mut self) {}
}

/// A forward-only cursor over the records of one search.
///
/// The cursor is positioned before the first record of the requested
/// window; [`next_record`](Self::next_record) advances it.
pub trait SearchResultSet: ResultCursor {
    /// Number of records matching the query.
    fn total_record_count(&self) -> u64;

    /// Number of records this cursor will deliver.
    fn record_count(&self) -> u64;

    /// Identifier of a result set the client may refer to later.
    fn result_set_id(&self) -> Option<&str> {
        None
    }

    /// Seconds the result set stays available.
    fn result_set_ttl(&self) -> Option<u32> {
        None
    }

    /// Precision of [`total_record_count`](Self::total_record_count).
    fn result_count_precision(&self) -> Option<ResultCountPrecision> {
        None
    }

    /// Advances to the next record.
    ///
    /// # Errors
    ///
    /// Returns a fatal error to abort the response.
    fn next_record(&mut self) -> Result<bool, SruError>;

    /// Schema identifier of the current record.
    fn record_schema_identifier(&self) -> &str;

    /// Identifier of the current record.
    fn record_identifier(&self) -> Option<&str> {
        None
    }

    /// Diagnostic standing in for the current record's content.
    fn surrogate_diagnostic(&self) -> Option<&Diagnostic> {
        None
    }

    /// Serializes the current record.
    ///
    /// # Errors
    ///
    /// Returns a fatal error to abort the response.
    fn write_record(&mut self, sink: &mut dyn XmlSink) -> Result<(), SruError>;

    /// Whether the current record has `extraRecordData`.
    fn has_extra_record_data(&self) -> bool {
        false
    }

    /// Writes the current record's `extraRecordData` content.
    ///
    /// # Errors
    ///
    /// Returns a fatal error to abort the response.
    fn write_extra_record_data(&mut self, _sink: &mut dyn XmlSink) -> Result<(), SruError> {
        Ok(())
    }

    /// Response-level extra data, written after the diagnostics.
    fn extra_response_data(&self) -> Option<&dyn ExtraResponseData> {
        None
    }
}

/// A forward-only cursor over scanned index terms.
pub trait ScanResultSet: ResultCursor {
    /// Advances to the next term.
    ///
    /// # Errors
    ///
    /// Returns a fatal error to abort the response.
    fn next_term(&mut self) -> Result<bool, SruError>;

    /// The current term.
    fn value(&self) -> &str;

    /// Number of records containing the current term.
    fn number_of_records(&self) -> Option<u64> {
        None
    }

    /// Display form of the current term.
    fn display_term(&self) -> Option<&str> {
        None
    }

    /// Position of the current term in the returned list.
    fn where_in_list(&self) -> Option<WhereInList> {
        None
    }

    /// Whether the current term has `extraTermData`.
    fn has_extra_term_data(&self) -> bool {
        false
    }

    /// Writes the current term's `extraTermData` content.
    ///
    /// # Errors
    ///
    /// Returns a fatal error to abort the response.
    fn write_extra_term_data(&mut self, _sink: &mut dyn XmlSink) -> Result<(), SruError> {
        Ok(())
    }

    /// Response-level extra data, written after the diagnostics.
    fn extra_response_data(&self) -> Option<&dyn ExtraResponseData> {
        None
    }
}

/// A search backend.
///
/// Implementations are shared across requests. Non-fatal problems are
/// pushed onto `diagnostics`; returning an error aborts the response in
/// favour of an error document.
pub trait SearchEngine: Send + Sync {
    /// Supplies extra data for an explain response.
    ///
    /// # Errors
    ///
    /// Returns a fatal error to abort the response.
    fn explain(
        &self,
        _request: &ValidatedRequest,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Option<Box<dyn ExtraResponseData>>, SruError> {
        Ok(None)
    }

    /// Runs a search.
    ///
    /// # Errors
    ///
    /// Returns a fatal error to abort the response.
    fn search(
        &self,
        request: &ValidatedRequest,
        diagnostics: &mut Diagnostics,
    ) -> Result<Box<dyn SearchResultSet>, SruError>;

    /// Scans an index. `None` means the scan produced no cursor.
    ///
    /// # Errors
    ///
    /// Returns a fatal error to abort the response.
    fn scan(
        &self,
        request: &ValidatedRequest,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Box<dyn ScanResultSet>>, SruError>;
}

/// Owns a cursor and closes it when dropped.
pub(crate) struct CloseOnDrop<C: ResultCursor + ?Sized>(Box<C>);

impl<C: ResultCursor + ?Sized> CloseOnDrop<C> {
    pub(crate) const fn new(cursor: Box<C>) -> Self {
        Self(cursor)
    }
}

impl<C: ResultCursor + ?Sized> Deref for CloseOnDrop<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.0
    }
}

impl<C: ResultCursor + ?Sized> DerefMut for CloseOnDrop<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.0
    }
}

impl<C: ResultCursor + ?Sized> Drop for CloseOnDrop<C> {
    fn drop(&mut self) {
        self.0.close();
    }
}
