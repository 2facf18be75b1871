//! The scan orchestrator (§4.7): drives a [`RowCursor`] to exhaustion,
//! decoding and merging one row at a time into either a single record or a
//! collection.

use crate::build::build_one;
use crate::cursor::RowCursor;
use crate::decode::RowDecoder;
use crate::merge::merge_into_slice;
use crate::schema::{Mergeable, Record, Schema};
use crate::Error;

/// Drives one [`RowCursor`] to completion against a chosen destination
/// shape.
pub struct Scanner<C: RowCursor> {
    cursor: C,
}

impl<C: RowCursor> Scanner<C> {
    /// Wraps a cursor ready to be advanced from its first row.
    pub fn new(cursor: C) -> Self {
        Self { cursor }
    }

    /// Scans every row into a single `T`, merging rows that share the
    /// root's identity (§8 "single root with joined to-many rows").
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRows`] if the cursor produced no rows,
    /// [`Error::UnknownColumn`]/[`Error::ScanSeparatorInvalid`] if a
    /// column fails to resolve, or [`Error::CursorScanFailure`] if the
    /// cursor itself fails.
    pub fn scan_one<T: Record + 'static>(mut self) -> Result<T, Error> {
        let schema = Schema::of::<T>();
        let column_names = self.cursor.column_names().to_vec();
        let decoder = RowDecoder::new(&column_names, schema)?;

        let span = tracing::info_span!("scan_one", ty = std::any::type_name::<T>());
        let _enter = span.enter();

        let mut result: Option<T> = None;
        while self.cursor.advance().map_err(Error::cursor_scan_failure)? {
            let mut values = decoder.decode(&mut self.cursor)?;
            let built = build_one::<T>(&mut values)?;
            result = Some(match result {
                None => built,
                Some(mut existing) => {
                    existing.merge_fields(built)?;
                    existing
                }
            });
        }
        self.cursor.close().map_err(Error::cursor_scan_failure)?;
        result.ok_or(Error::NoRows)
    }

    /// Scans every row into a `Vec<T>`, merging rows whose root shares a
    /// primary key with an already-built element (§8 "multiple rows").
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Scanner::scan_one`], except an empty result
    /// set is a valid (empty) `Vec`, not [`Error::NoRows`].
    pub fn scan_many<T: Mergeable + 'static>(mut self) -> Result<Vec<T>, Error> {
        let schema = Schema::of::<T>();
        let column_names = self.cursor.column_names().to_vec();
        let decoder = RowDecoder::new(&column_names, schema)?;

        let span = tracing::info_span!("scan_many", ty = std::any::type_name::<T>());
        let _enter = span.enter();

        let mut out: Vec<T> = Vec::new();
        while self.cursor.advance().map_err(Error::cursor_scan_failure)? {
            let mut values = decoder.decode(&mut self.cursor)?;
            let built = build_one::<T>(&mut values)?;
            merge_into_slice(&mut out, built)?;
        }
        self.cursor.close().map_err(Error::cursor_scan_failure)?;
        Ok(out)
    }
}
