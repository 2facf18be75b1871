//! An in-memory [`RowCursor`], used by this crate's own integration tests
//! and available to downstream consumers that want to exercise their
//! `Record` types without a real database connection.
//!
//! Grounded on the teacher's own fake backend for its session-driver
//! abstraction: a result set is just data the test author already knows,
//! fed through the same adapter seam a real driver would use.

use crate::cursor::RowCursor;
use crate::scan_slot::ScanSlot;

/// One cell of mock row data, converted into whichever [`ScanSlot`] shape
/// the decoder requests.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCell {
    Null,
    I64(i64),
    Str(String),
    Bool(bool),
    F64(f64),
    Timestamp(chrono::NaiveDateTime),
    TimestampTz(chrono::DateTime<chrono::Utc>),
    Uuid(uuid::Uuid),
}

/// A fixed, in-memory result set.
pub struct MockCursor {
    column_names: Vec<String>,
    rows: Vec<Vec<MockCell>>,
    at: usize,
}

impl MockCursor {
    /// Builds a cursor over `rows`, each inner `Vec` aligned with
    /// `column_names`.
    #[must_use]
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<MockCell>>) -> Self {
        Self { column_names, rows, at: 0 }
    }
}

/// Mock cursors never fail; this is their `RowCursor::Error`.
#[derive(Debug, thiserror::Error)]
#[error("mock cursor shape mismatch at column {index}")]
pub struct MockCursorError {
    index: usize,
}

impl RowCursor for MockCursor {
    type Error = MockCursorError;

    fn advance(&mut self) -> Result<bool, Self::Error> {
        if self.at < self.rows.len() {
            self.at += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn scan_into(&mut self, targets: &mut [ScanSlot]) -> Result<(), Self::Error> {
        let row = &self.rows[self.at - 1];
        for (index, (slot, cell)) in targets.iter_mut().zip(row).enumerate() {
            *slot = match (&slot, cell) {
                (ScanSlot::Separator, _) => ScanSlot::Separator,
                (ScanSlot::I64(_), MockCell::I64(v)) => ScanSlot::I64(Some(*v)),
                (ScanSlot::I64(_), MockCell::Null) => ScanSlot::I64(None),
                (ScanSlot::Str(_), MockCell::Str(v)) => ScanSlot::Str(Some(v.clone())),
                (ScanSlot::Str(_), MockCell::Null) => ScanSlot::Str(None),
                (ScanSlot::Flat(_), MockCell::Str(v)) => ScanSlot::Flat(Some(v.clone())),
                (ScanSlot::Flat(_), MockCell::Null) => ScanSlot::Flat(None),
                (ScanSlot::Bool(_), MockCell::Bool(v)) => ScanSlot::Bool(Some(*v)),
                (ScanSlot::Bool(_), MockCell::Null) => ScanSlot::Bool(None),
                (ScanSlot::F64(_), MockCell::F64(v)) => ScanSlot::F64(Some(*v)),
                (ScanSlot::F64(_), MockCell::Null) => ScanSlot::F64(None),
                (ScanSlot::Timestamp(_), MockCell::Timestamp(v)) => ScanSlot::Timestamp(Some(*v)),
                (ScanSlot::Timestamp(_), MockCell::Null) => ScanSlot::Timestamp(None),
                (ScanSlot::TimestampTz(_), MockCell::TimestampTz(v)) => {
                    ScanSlot::TimestampTz(Some(*v))
                }
                (ScanSlot::TimestampTz(_), MockCell::Null) => ScanSlot::TimestampTz(None),
                (ScanSlot::Uuid(_), MockCell::Uuid(v)) => ScanSlot::Uuid(Some(*v)),
                (ScanSlot::Uuid(_), MockCell::Null) => ScanSlot::Uuid(None),
                _ => return Err(MockCursorError { index }),
            };
        }
        Ok(())
    }

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}
