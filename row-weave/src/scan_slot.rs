//! The scanned-value slot: a cursor-column-shaped destination the row
//! decoder hands to a [`crate::RowCursor`], and the typed readback used by
//! generated `build` code afterwards (§4.4).

use crate::leaf::FlatColumn;
use crate::Error;

/// One scanned column's storage, shaped by the destination field's declared
/// type. Allocated by a field's `alloc_slot` function pointer before a row
/// is scanned, filled in place by the cursor adapter, then consumed once by
/// generated `build` code.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanSlot {
    /// `i64` / `Option<i64>` column.
    I64(Option<i64>),
    /// `i32` / `Option<i32>` column.
    I32(Option<i32>),
    /// `i16` / `Option<i16>` column.
    I16(Option<i16>),
    /// `f64` / `Option<f64>` column.
    F64(Option<f64>),
    /// `f32` / `Option<f32>` column.
    F32(Option<f32>),
    /// `bool` / `Option<bool>` column.
    Bool(Option<bool>),
    /// `String` / `Option<String>` column.
    Str(Option<String>),
    /// `Vec<u8>` / `Option<Vec<u8>>` column.
    Bytes(Option<Vec<u8>>),
    /// A `flat`-tagged column, scanned as text and parsed by a
    /// [`FlatColumn`] implementation during `build`.
    Flat(Option<String>),
    /// `chrono::NaiveDateTime` / `Option<chrono::NaiveDateTime>` column.
    Timestamp(Option<chrono::NaiveDateTime>),
    /// `chrono::DateTime<chrono::Utc>` / `Option<DateTime<Utc>>` column.
    TimestampTz(Option<chrono::DateTime<chrono::Utc>>),
    /// `uuid::Uuid` / `Option<uuid::Uuid>` column.
    Uuid(Option<uuid::Uuid>),
    /// A `scan:<path>` separator column. Never written to a destination
    /// field; present only so the assembled target vector stays aligned
    /// with the cursor's column list.
    Separator,
}

/// Converts a scanned value into a typed field value.
///
/// `slot` is `None` when the field's path was never present among the
/// cursor's columns at all (the query simply didn't select it) — the same
/// "never touched, stays zero" outcome Go gets for free from a
/// `reflect.New`'d zero value. It is `Some` whenever the decoder found and
/// scanned a matching column, including when that column's database value
/// was itself `NULL` (§4.4 point 5, zero-on-null for non-optional
/// destinations).
pub trait FromScanSlot: Sized {
    /// Converts the value scanned for the field at `path`, if any.
    fn from_slot(slot: Option<ScanSlot>, path: &str) -> Result<Self, Error>;
}

macro_rules! impl_from_scan_slot_required {
    ($ty:ty, $variant:ident) => {
        impl FromScanSlot for $ty {
            fn from_slot(slot: Option<ScanSlot>, path: &str) -> Result<Self, Error> {
                match slot {
                    None => Ok(<$ty as crate::leaf::ScanLeaf>::zero()),
                    Some(ScanSlot::$variant(v)) => {
                        Ok(v.unwrap_or_else(<$ty as crate::leaf::ScanLeaf>::zero))
                    }
                    Some(_) => Err(Error::UnknownColumn(path.to_string())),
                }
            }
        }

        impl FromScanSlot for Option<$ty> {
            fn from_slot(slot: Option<ScanSlot>, path: &str) -> Result<Self, Error> {
                match slot {
                    None => Ok(None),
                    Some(ScanSlot::$variant(v)) => Ok(v),
                    Some(_) => Err(Error::UnknownColumn(path.to_string())),
                }
            }
        }
    };
}

impl_from_scan_slot_required!(i64, I64);
impl_from_scan_slot_required!(i32, I32);
impl_from_scan_slot_required!(i16, I16);
impl_from_scan_slot_required!(f64, F64);
impl_from_scan_slot_required!(f32, F32);
impl_from_scan_slot_required!(bool, Bool);
impl_from_scan_slot_required!(String, Str);
impl_from_scan_slot_required!(Vec<u8>, Bytes);
impl_from_scan_slot_required!(chrono::NaiveDateTime, Timestamp);
impl_from_scan_slot_required!(chrono::DateTime<chrono::Utc>, TimestampTz);
impl_from_scan_slot_required!(uuid::Uuid, Uuid);

impl<T: FlatColumn + Default> FromScanSlot for T {
    fn from_slot(slot: Option<ScanSlot>, path: &str) -> Result<Self, Error> {
        match slot {
            None | Some(ScanSlot::Flat(None)) => Ok(T::default()),
            Some(ScanSlot::Flat(Some(raw))) => T::parse_column(&raw),
            Some(_) => Err(Error::UnknownColumn(path.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_i64_defaults_to_zero_on_null() {
        assert_eq!(i64::from_slot(Some(ScanSlot::I64(None)), "id").unwrap(), 0);
    }

    #[test]
    fn required_i64_defaults_to_zero_when_not_selected() {
        assert_eq!(i64::from_slot(None, "id").unwrap(), 0);
    }

    #[test]
    fn required_i64_keeps_value() {
        assert_eq!(i64::from_slot(Some(ScanSlot::I64(Some(7))), "id").unwrap(), 7);
    }

    #[test]
    fn optional_string_keeps_none() {
        let v = Option::<String>::from_slot(Some(ScanSlot::Str(None)), "publisher").unwrap();
        assert_eq!(v, None);
    }

    #[test]
    fn mismatched_slot_kind_is_unknown_column() {
        let err = i64::from_slot(Some(ScanSlot::Str(Some("x".into()))), "id").unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(_)));
    }

    #[test]
    fn required_uuid_defaults_to_nil_on_null() {
        let got = uuid::Uuid::from_slot(Some(ScanSlot::Uuid(None)), "id").unwrap();
        assert_eq!(got, uuid::Uuid::nil());
    }

    #[test]
    fn optional_timestamp_tz_keeps_value() {
        let ts = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let v = Option::<chrono::DateTime<chrono::Utc>>::from_slot(
            Some(ScanSlot::TimestampTz(Some(ts))),
            "created_at",
        )
        .unwrap();
        assert_eq!(v, Some(ts));
    }
}
