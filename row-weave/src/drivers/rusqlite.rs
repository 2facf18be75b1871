//! The `rusqlite` cursor adapter, enabled by the `rusqlite-driver` feature.
//!
//! `rusqlite::Rows` only exposes a row's cells for the lifetime of the
//! `next()` call that produced it, which does not fit this crate's
//! advance-then-scan split. Each row's cells are therefore copied out as
//! untyped [`rusqlite::types::Value`]s at `advance()` time and converted to
//! the requested [`ScanSlot`] shape at `scan_into()` time.

use rusqlite::types::Value as SqlValue;
use rusqlite::Rows;

use crate::cursor::RowCursor;
use crate::scan_slot::ScanSlot;

/// Wraps a `rusqlite::Rows` result set as a [`RowCursor`].
pub struct RusqliteCursor<'stmt> {
    rows: Rows<'stmt>,
    column_names: Vec<String>,
    current: Vec<SqlValue>,
}

impl<'stmt> RusqliteCursor<'stmt> {
    /// Wraps an already-executed query. `column_names` is normally taken
    /// from the originating `Statement::column_names()` before `query()`
    /// borrows it.
    #[must_use]
    pub fn new(rows: Rows<'stmt>, column_names: Vec<String>) -> Self {
        Self {
            rows,
            column_names,
            current: Vec::new(),
        }
    }
}

impl RowCursor for RusqliteCursor<'_> {
    type Error = rusqlite::Error;

    fn advance(&mut self) -> Result<bool, Self::Error> {
        match self.rows.next()? {
            Some(row) => {
                self.current = (0..self.column_names.len())
                    .map(|i| row.get::<_, SqlValue>(i))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(true)
            }
            None => {
                self.current.clear();
                Ok(false)
            }
        }
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn scan_into(&mut self, targets: &mut [ScanSlot]) -> Result<(), Self::Error> {
        for (index, (slot, value)) in targets.iter_mut().zip(&self.current).enumerate() {
            *slot = convert(index, slot, value)?;
        }
        Ok(())
    }

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn convert(index: usize, shape: &ScanSlot, value: &SqlValue) -> rusqlite::Result<ScanSlot> {
    let type_mismatch = || {
        rusqlite::Error::InvalidColumnType(index, format!("{value:?}"), rusqlite::types::Type::Null)
    };

    Ok(match (shape, value) {
        (ScanSlot::Separator, _) => ScanSlot::Separator,
        (ScanSlot::I64(_), SqlValue::Integer(v)) => ScanSlot::I64(Some(*v)),
        (ScanSlot::I64(_), SqlValue::Null) => ScanSlot::I64(None),
        (ScanSlot::I32(_), SqlValue::Integer(v)) => ScanSlot::I32(Some(*v as i32)),
        (ScanSlot::I32(_), SqlValue::Null) => ScanSlot::I32(None),
        (ScanSlot::I16(_), SqlValue::Integer(v)) => ScanSlot::I16(Some(*v as i16)),
        (ScanSlot::I16(_), SqlValue::Null) => ScanSlot::I16(None),
        (ScanSlot::F64(_), SqlValue::Real(v)) => ScanSlot::F64(Some(*v)),
        (ScanSlot::F64(_), SqlValue::Null) => ScanSlot::F64(None),
        (ScanSlot::F32(_), SqlValue::Real(v)) => ScanSlot::F32(Some(*v as f32)),
        (ScanSlot::F32(_), SqlValue::Null) => ScanSlot::F32(None),
        (ScanSlot::Bool(_), SqlValue::Integer(v)) => ScanSlot::Bool(Some(*v != 0)),
        (ScanSlot::Bool(_), SqlValue::Null) => ScanSlot::Bool(None),
        (ScanSlot::Str(_), SqlValue::Text(v)) => ScanSlot::Str(Some(v.clone())),
        (ScanSlot::Str(_), SqlValue::Null) => ScanSlot::Str(None),
        (ScanSlot::Bytes(_), SqlValue::Blob(v)) => ScanSlot::Bytes(Some(v.clone())),
        (ScanSlot::Bytes(_), SqlValue::Null) => ScanSlot::Bytes(None),
        (ScanSlot::Flat(_), SqlValue::Text(v)) => ScanSlot::Flat(Some(v.clone())),
        (ScanSlot::Flat(_), SqlValue::Null) => ScanSlot::Flat(None),
        (ScanSlot::Timestamp(_), SqlValue::Text(v)) => ScanSlot::Timestamp(Some(
            chrono::NaiveDateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S%.f")
                .map_err(|_| type_mismatch())?,
        )),
        (ScanSlot::Timestamp(_), SqlValue::Null) => ScanSlot::Timestamp(None),
        (ScanSlot::TimestampTz(_), SqlValue::Text(v)) => ScanSlot::TimestampTz(Some(
            chrono::DateTime::parse_from_rfc3339(v)
                .map_err(|_| type_mismatch())?
                .with_timezone(&chrono::Utc),
        )),
        (ScanSlot::TimestampTz(_), SqlValue::Null) => ScanSlot::TimestampTz(None),
        (ScanSlot::Uuid(_), SqlValue::Text(v)) => {
            ScanSlot::Uuid(Some(uuid::Uuid::parse_str(v).map_err(|_| type_mismatch())?))
        }
        (ScanSlot::Uuid(_), SqlValue::Null) => ScanSlot::Uuid(None),
        _ => return Err(type_mismatch()),
    })
}
