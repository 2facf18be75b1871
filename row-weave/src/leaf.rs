//! The builtin-type catalog: which nominal types are leaves for mapping
//! purposes, versus composites to be recursed into.
//!
//! A destination member is a leaf when it implements [`ScanLeaf`] (this
//! crate's scalar catalog), is flagged `flat` in its tag and implements
//! [`FlatColumn`], or is a `Vec<T>`/`Option<T>` of a non-composite `T`
//! (§4.2, §9 "Scalar collection member").

/// Marker for scalar types the row decoder treats as a single scanned
/// column rather than a nested record to recurse into.
///
/// `zero()` supplies the value used when a database column is `NULL` and the
/// destination type is not itself reference-typed (§4.4 point 5) — the
/// equivalent of Go's `reflect.Zero(fieldType)`.
pub trait ScanLeaf: Sized {
    /// The zero value for this type.
    fn zero() -> Self;
}

macro_rules! impl_scan_leaf {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl ScanLeaf for $ty {
                fn zero() -> Self {
                    $zero
                }
            }
        )*
    };
}

impl_scan_leaf! {
    i64 => 0,
    i32 => 0,
    i16 => 0,
    f64 => 0.0,
    f32 => 0.0,
    bool => false,
    String => String::new(),
    Vec<u8> => Vec::new(),
    chrono::NaiveDateTime => chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
    chrono::DateTime<chrono::Utc> => chrono::DateTime::from_timestamp(0, 0).unwrap(),
    uuid::Uuid => uuid::Uuid::nil(),
}

/// Marker for a custom scannable leaf type (`#[db(..., flat)]`), the Rust
/// counterpart of a type implementing the underlying driver's native
/// column-scan capability (Go's `sql.Scanner`).
///
/// Implementors receive the column's textual representation as produced by
/// the cursor adapter and parse it themselves — mirroring how the original
/// `MoneyType` in the source fixtures parses a Postgres composite-type
/// column rendered as `(30.00,USD)`.
pub trait FlatColumn: Sized {
    /// Parses `raw` into `Self`, failing with [`crate::Error::CursorScanFailure`]
    /// on malformed input.
    fn parse_column(raw: &str) -> Result<Self, crate::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values() {
        assert_eq!(i64::zero(), 0);
        assert_eq!(String::zero(), String::new());
        assert!(!bool::zero());
    }
}
