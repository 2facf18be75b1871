//! Primary-key-based merge (§4.6), adapted from the original implementation's
//! recursive slice/struct merge helper.
//!
//! Merging a freshly built record into an existing one only ever touches
//! composite and collection members — [`Record::merge_fields`] is generated
//! to leave leaves alone, so this module's job reduces to: decide whether a
//! freshly built collection element matches an existing one by primary key,
//! and recurse into it if so.

use crate::schema::{FieldKind, Mergeable};
use crate::Error;

/// Merges `elem` into `slice`: if an existing element shares `elem`'s
/// primary key, `elem`'s composite members are merged into it in place;
/// otherwise `elem` is appended (§4.6 "If no existing element's primary key
/// matches ... append it").
///
/// # Errors
///
/// The derive macro already rejects more than one `pk` field at compile
/// time (a strictly earlier failure point for generated types), but a
/// hand-written [`Mergeable`] can still misstate its own `SCHEMA`. This is
/// the backstop: returns [`Error::TagInvalid`] if `T` declares zero `pk`
/// fields (or an empty column name), [`Error::PrimaryKeyMissingOrAmbiguous`]
/// if it declares more than one (§7), and propagates whatever
/// [`crate::schema::Record::merge_fields`] returns.
pub fn merge_into_slice<T: Mergeable>(slice: &mut Vec<T>, elem: T) -> Result<(), Error> {
    validate_pk_arity::<T>()?;

    let elem_pk = elem.pk();
    if let Some(existing) = slice.iter_mut().find(|e| e.pk() == elem_pk) {
        tracing::trace!("merging into existing collection element");
        existing.merge_fields(elem)?;
    } else {
        tracing::trace!("appending new collection element");
        slice.push(elem);
    }
    Ok(())
}

fn validate_pk_arity<T: Mergeable>() -> Result<(), Error> {
    let mut pk_count = 0;
    for field in T::SCHEMA {
        if let FieldKind::Leaf { .. } | FieldKind::Flat { .. } = field.kind {
            if field.name.is_empty() {
                return Err(Error::tag_invalid(field.name, "column name must not be empty"));
            }
            if field.pk {
                pk_count += 1;
            }
        }
    }
    match pk_count {
        0 => Err(Error::tag_invalid(
            std::any::type_name::<T>(),
            "type has no field tagged `pk`; required to be merged as a collection element",
        )),
        1 => Ok(()),
        _ => Err(Error::primary_key_missing_or_ambiguous(std::any::type_name::<T>())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, Record, RowValues};
    use crate::Error;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Tag {
        id: i64,
        label: String,
    }

    impl Record for Tag {
        const SCHEMA: &'static [FieldSpec] = &[
            FieldSpec {
                name: "id",
                pk: true,
                kind: FieldKind::Leaf { alloc_slot: || crate::ScanSlot::I64(None) },
            },
            FieldSpec {
                name: "label",
                pk: false,
                kind: FieldKind::Leaf { alloc_slot: || crate::ScanSlot::Str(None) },
            },
        ];

        fn build(_prefix: &str, _values: &mut RowValues) -> Result<Self, Error> {
            unreachable!("not exercised directly in this test")
        }

        fn merge_fields(&mut self, _other: Self) -> Result<(), Error> {
            Ok(())
        }
    }

    impl Mergeable for Tag {
        type Pk = i64;

        fn pk(&self) -> Self::Pk {
            self.id
        }
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Untagged {
        id: i64,
    }

    impl Record for Untagged {
        const SCHEMA: &'static [FieldSpec] = &[FieldSpec {
            name: "id",
            pk: false,
            kind: FieldKind::Leaf { alloc_slot: || crate::ScanSlot::I64(None) },
        }];

        fn build(_prefix: &str, _values: &mut RowValues) -> Result<Self, Error> {
            unreachable!("not exercised directly in this test")
        }

        fn merge_fields(&mut self, _other: Self) -> Result<(), Error> {
            Ok(())
        }
    }

    impl Mergeable for Untagged {
        type Pk = i64;

        fn pk(&self) -> Self::Pk {
            self.id
        }
    }

    #[test]
    fn appends_when_no_pk_matches() {
        let mut tags = vec![Tag { id: 1, label: "a".into() }];
        merge_into_slice(&mut tags, Tag { id: 2, label: "b".into() }).unwrap();
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn merges_in_place_when_pk_matches() {
        let mut tags = vec![Tag { id: 1, label: "a".into() }];
        merge_into_slice(&mut tags, Tag { id: 1, label: "a".into() }).unwrap();
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn zero_pk_fields_is_tag_invalid() {
        let mut untagged = Vec::new();
        let err = merge_into_slice(&mut untagged, Untagged { id: 1 }).unwrap_err();
        assert!(matches!(err, Error::TagInvalid { .. }));
    }
}
