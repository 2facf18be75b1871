//! The cursor adapter contract (§6), realised for each supported driver
//! under [`crate::drivers`].
//!
//! Go's `database/sql.Rows` and `pgx.Rows` both expose the same shape:
//! advance one row at a time, report column names once, and scan a whole
//! row into a caller-supplied destination slice in one call. [`RowCursor`]
//! captures that same shape so the decoder (§4.4) never needs to know which
//! concrete driver produced a row.

use crate::scan_slot::ScanSlot;

/// A streaming result-set cursor, advanced one row at a time.
pub trait RowCursor {
    /// The driver-specific error type, wrapped as [`crate::Error::CursorScanFailure`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Advances to the next row. Returns `false` once the result set is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns the driver's own error if advancing fails.
    fn advance(&mut self) -> Result<bool, Self::Error>;

    /// The result set's column names, in cursor order. Stable for the
    /// lifetime of the cursor.
    fn column_names(&self) -> &[String];

    /// Scans the current row into `targets`, one entry per column in
    /// `column_names()` order. [`ScanSlot::Separator`] targets correspond
    /// to `scan:` columns and may be left untouched.
    ///
    /// # Errors
    ///
    /// Returns the driver's own error if a column's runtime type doesn't
    /// match the allocated slot.
    fn scan_into(&mut self, targets: &mut [ScanSlot]) -> Result<(), Self::Error>;

    /// Releases the underlying cursor resources.
    ///
    /// # Errors
    ///
    /// Returns the driver's own error if closing fails.
    fn close(self) -> Result<(), Self::Error>;
}
