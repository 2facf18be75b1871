//! The row decoder (§4.4): resolves a cursor's column list against a
//! destination type's [`Schema`] once, then scans each row into a
//! [`RowValues`] scratch buffer using that resolution.
//!
//! Splitting resolution from per-row scanning mirrors how both drivers in
//! `original_source/` behave: `scan:` separators and column identities are
//! fixed for the lifetime of a query, so paying the path-resolution cost
//! once per cursor (not once per row) is both correct and the cheaper
//! option.

use crate::cursor::RowCursor;
use crate::scan_sep;
use crate::scan_slot::ScanSlot;
use crate::schema::{RowValues, Schema};
use crate::Error;

/// What one cursor column contributes to decoding, resolved once against a
/// [`Schema`] before any rows are scanned.
#[derive(Debug)]
enum ColumnPlan {
    /// A `scan:` column; carried only to keep the target vector aligned
    /// with the cursor's column list.
    Separator,
    /// An ordinary data column, resolved to its fully-qualified path and
    /// slot allocator.
    Leaf {
        path: String,
        alloc_slot: fn() -> ScanSlot,
    },
}

/// Resolves a cursor's column list against `schema`, validating every
/// `scan:` separator and every data column up front.
///
/// # Errors
///
/// Returns [`Error::ScanSeparatorInvalid`] for a malformed separator, or
/// [`Error::UnknownColumn`] for a data column with no matching field.
fn plan_columns(column_names: &[String], schema: &Schema) -> Result<Vec<ColumnPlan>, Error> {
    let mut plan = Vec::with_capacity(column_names.len());
    let mut current_path = String::new();

    for name in column_names {
        if let Some(raw) = scan_sep::strip_prefix(name) {
            let separator = scan_sep::parse(raw)?;
            current_path = separator.path;
            plan.push(ColumnPlan::Separator);
            continue;
        }

        let path = if current_path.is_empty() {
            name.clone()
        } else {
            format!("{current_path}.{name}")
        };

        let leaf = schema
            .leaf(&path)
            .ok_or_else(|| Error::UnknownColumn(path.clone()))?;
        plan.push(ColumnPlan::Leaf {
            path,
            alloc_slot: leaf.alloc_slot,
        });
    }

    Ok(plan)
}

/// Scans the cursor's current row into a fresh [`RowValues`], using a
/// pre-resolved column plan.
///
/// # Errors
///
/// Returns [`Error::CursorScanFailure`] if the underlying cursor fails to
/// scan the row.
fn decode_planned<C: RowCursor>(cursor: &mut C, plan: &[ColumnPlan]) -> Result<RowValues, Error> {
    let mut targets: Vec<ScanSlot> = plan
        .iter()
        .map(|column| match column {
            ColumnPlan::Separator => ScanSlot::Separator,
            ColumnPlan::Leaf { alloc_slot, .. } => alloc_slot(),
        })
        .collect();

    cursor
        .scan_into(&mut targets)
        .map_err(Error::cursor_scan_failure)?;

    let mut values = RowValues::new();
    for (column, slot) in plan.iter().zip(targets) {
        if let ColumnPlan::Leaf { path, .. } = column {
            tracing::trace!(path = %path, "decoded column");
            values.insert(path.clone(), slot);
        }
    }

    Ok(values)
}

/// Resolves `cursor`'s columns against `schema` and decodes the current
/// row, in one call. Prefer [`plan_columns`] + repeated [`decode_planned`]
/// calls when scanning more than one row from the same cursor.
#[cfg(test)]
fn decode_row<C: RowCursor>(cursor: &mut C, schema: &Schema) -> Result<RowValues, Error> {
    let plan = plan_columns(cursor.column_names(), schema)?;
    decode_planned(cursor, &plan)
}

/// Resolves a cursor's columns once and decodes every remaining row,
/// yielding one [`RowValues`] per row (§4.4, §4.7 orchestration).
pub struct RowDecoder {
    plan: Vec<ColumnPlan>,
}

impl RowDecoder {
    /// Resolves `column_names` against `schema`.
    ///
    /// # Errors
    ///
    /// See [`plan_columns`].
    pub fn new(column_names: &[String], schema: &Schema) -> Result<Self, Error> {
        Ok(Self {
            plan: plan_columns(column_names, schema)?,
        })
    }

    /// Decodes the cursor's current row using the resolved plan.
    ///
    /// # Errors
    ///
    /// See [`decode_planned`].
    pub fn decode<C: RowCursor>(&self, cursor: &mut C) -> Result<RowValues, Error> {
        decode_planned(cursor, &self.plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldSpec};

    struct FixedCursor {
        columns: Vec<String>,
        rows: Vec<Vec<ScanSlot>>,
        at: usize,
    }

    impl RowCursor for FixedCursor {
        type Error = std::convert::Infallible;

        fn advance(&mut self) -> Result<bool, Self::Error> {
            if self.at < self.rows.len() {
                self.at += 1;
                Ok(true)
            } else {
                Ok(false)
            }
        }

        fn column_names(&self) -> &[String] {
            &self.columns
        }

        fn scan_into(&mut self, targets: &mut [ScanSlot]) -> Result<(), Self::Error> {
            let row = &self.rows[self.at - 1];
            targets.clone_from_slice(row);
            Ok(())
        }

        fn close(self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    static LEAF_FIELDS: &[FieldSpec] = &[
        FieldSpec {
            name: "id",
            pk: false,
            kind: FieldKind::Leaf { alloc_slot: || ScanSlot::I64(None) },
        },
        FieldSpec {
            name: "title",
            pk: false,
            kind: FieldKind::Leaf { alloc_slot: || ScanSlot::Str(None) },
        },
    ];

    struct Leaf;

    impl crate::schema::Record for Leaf {
        const SCHEMA: &'static [FieldSpec] = LEAF_FIELDS;

        fn build(_prefix: &str, _values: &mut RowValues) -> Result<Self, Error> {
            Ok(Leaf)
        }

        fn merge_fields(&mut self, _other: Self) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn decodes_plain_columns_without_separator() {
        let schema = Schema::of::<Leaf>();
        let mut cursor = FixedCursor {
            columns: vec!["id".into(), "title".into()],
            rows: vec![vec![ScanSlot::I64(Some(1)), ScanSlot::Str(Some("x".into()))]],
            at: 0,
        };
        cursor.advance().unwrap();
        let mut values = decode_row(&mut cursor, schema).unwrap();
        assert_eq!(values.take("id"), Some(ScanSlot::I64(Some(1))));
        assert_eq!(values.take("title"), Some(ScanSlot::Str(Some("x".into()))));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let schema = Schema::of::<Leaf>();
        let err = plan_columns(&["nope".to_string()], schema).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(_)));
    }
}
