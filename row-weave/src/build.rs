//! The result builder (§4.5): turns one row's staged scanned values into a
//! `T`, the entry point generated `build` code is driven through rather
//! than being called directly by the scanner.

use crate::schema::{Record, RowValues};
use crate::Error;

/// Builds one `T` from `values`, starting at the root (empty) path prefix.
///
/// A thin wrapper around [`Record::build`], kept as its own function so the
/// scanner has a named, documented entry point for "materialise a record
/// from this row's staged values" rather than reaching into
/// `Record::build("", ..)` directly at every call site.
///
/// # Errors
///
/// Returns [`Error::UnknownColumn`] if a required leaf's value was never
/// staged under its expected path.
pub fn build_one<T: Record>(values: &mut RowValues) -> Result<T, Error> {
    T::build("", values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_slot::ScanSlot;
    use crate::schema::{FieldKind, FieldSpec};

    #[derive(Debug, PartialEq)]
    struct Id {
        id: i64,
    }

    impl Record for Id {
        const SCHEMA: &'static [FieldSpec] = &[FieldSpec {
            name: "id",
            pk: false,
            kind: FieldKind::Leaf { alloc_slot: || ScanSlot::I64(None) },
        }];

        fn build(prefix: &str, values: &mut RowValues) -> Result<Self, Error> {
            let path = if prefix.is_empty() { "id".to_string() } else { format!("{prefix}.id") };
            Ok(Id { id: values.take_as(&path)? })
        }

        fn merge_fields(&mut self, _other: Self) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn builds_from_root_prefix() {
        let mut values = RowValues::new();
        values.insert("id".to_string(), ScanSlot::I64(Some(9)));
        let built: Id = build_one(&mut values).unwrap();
        assert_eq!(built, Id { id: 9 });
    }
}
