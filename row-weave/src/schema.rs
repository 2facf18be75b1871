//! The field map (§3) and the traits generated `#[derive(Record)]` impls
//! satisfy.
//!
//! Go's `scansion` builds a field map at call time by walking a value's
//! `reflect.Type`. This crate has no equivalent of `reflect.Type`, so
//! `#[derive(Record)]` emits the field map as a `'static` table instead —
//! computed once at compile time rather than once per process (§9 "Schema
//! reflector"). [`Schema`] is the thin runtime facade that flattens a
//! type's table (and its composite children's tables) into the dotted-path
//! lookup the row decoder needs; it is memoized per type behind a
//! `OnceLock` so repeated scans of the same destination type pay the
//! flattening cost once.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::scan_slot::ScanSlot;
use crate::Error;

/// One field's contribution to its declaring type's field map.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// The column name (leaf/flat) or path segment (composite) this field
    /// occupies, as named by its `db` tag.
    pub name: &'static str,
    /// Whether this field's tag declared it the record's primary key.
    /// Only meaningful for [`FieldKind::Leaf`]/[`FieldKind::Flat`]; checked
    /// by [`crate::merge::merge_into_slice`] before a type is merged as a
    /// collection element (§4.6, §7 "PrimaryKeyMissingOrAmbiguous").
    pub pk: bool,
    /// What kind of member this is, and how to recurse into or scan it.
    pub kind: FieldKind,
}

/// The shape of one field, as needed by the decoder (to allocate a scan
/// target) or by [`Schema`] (to recurse into a composite's own table).
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A scalar column scanned directly into a [`ScanLeaf`](crate::leaf::ScanLeaf) type.
    Leaf {
        /// Allocates an empty slot shaped for this field's declared type.
        alloc_slot: fn() -> ScanSlot,
    },
    /// A `flat`-tagged column, scanned as text and parsed by a
    /// [`FlatColumn`](crate::leaf::FlatColumn) implementation.
    Flat {
        /// Allocates an empty slot shaped for this field's declared type.
        alloc_slot: fn() -> ScanSlot,
    },
    /// A single embedded composite, always present (no absence check).
    CompositeOne {
        /// The child type's own field table.
        children: fn() -> &'static [FieldSpec],
        /// The child type's name, used to detect a repeat on the current
        /// walking path (§3 "Cycle safety").
        type_name: &'static str,
    },
    /// A `Option<Box<T>>` reference to a composite that may be absent for a
    /// given row (left join produced nulls for its whole subtree).
    CompositeOptional {
        /// The child type's own field table.
        children: fn() -> &'static [FieldSpec],
        /// The child type's name, used to detect a repeat on the current
        /// walking path (§3 "Cycle safety").
        type_name: &'static str,
    },
    /// A `Vec<T>` collection of composites, merged element-by-element
    /// across rows by primary key.
    CompositeMany {
        /// The child type's own field table.
        children: fn() -> &'static [FieldSpec],
        /// The child type's name, used to detect a repeat on the current
        /// walking path (§3 "Cycle safety").
        type_name: &'static str,
    },
    /// `#[db(flatten)]`: an embedded composite whose own fields are
    /// hoisted into the parent's path without an extra path segment — the
    /// Rust stand-in for Go's anonymous embedded struct fields.
    Flatten {
        /// The child type's own field table.
        children: fn() -> &'static [FieldSpec],
        /// The child type's name, used to detect a repeat on the current
        /// walking path (§3 "Cycle safety").
        type_name: &'static str,
    },
}

/// Per-row scratch storage: scanned values keyed by their fully-qualified
/// dotted path, filled by the decoder and drained by generated `build`
/// code (§3 "Scanned-value slot").
#[derive(Debug, Default)]
pub struct RowValues {
    slots: HashMap<String, ScanSlot>,
}

impl RowValues {
    /// Creates an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the scanned value for `path`, overwriting any previous value.
    pub fn insert(&mut self, path: String, slot: ScanSlot) {
        self.slots.insert(path, slot);
    }

    /// Removes and returns the scanned value for `path`, if present.
    pub fn take(&mut self, path: &str) -> Option<ScanSlot> {
        self.slots.remove(path)
    }

    /// Removes and type-converts the scanned value for `path`, if the
    /// query selected it at all (§4.4 point 5 — an unselected leaf is
    /// indistinguishable from one scanned as `NULL`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if a value was scanned for `path`
    /// but its slot kind doesn't match `T`.
    pub fn take_as<T: crate::scan_slot::FromScanSlot>(&mut self, path: &str) -> Result<T, Error> {
        T::from_slot(self.take(path), path)
    }
}

/// A type whose rows this crate can materialise. Implemented by
/// `#[derive(Record)]`.
pub trait Record: Sized {
    /// This type's field table, as emitted by the derive macro.
    const SCHEMA: &'static [FieldSpec];

    /// Materialises one value of `Self` from the scanned values staged
    /// under `prefix` (§4.5).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if a required leaf's value was
    /// never staged (the schema and the decoder disagree, which should not
    /// happen for a `Schema` built from the same `Self::SCHEMA`).
    fn build(prefix: &str, values: &mut RowValues) -> Result<Self, Error>;

    /// Merges `other`'s composite and collection members into `self`.
    /// Leaf members are left untouched — the first row to populate a given
    /// leaf wins (§4.6 "Leaf members are not overwritten").
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagInvalid`] or [`Error::PrimaryKeyMissingOrAmbiguous`]
    /// if a `Vec<T>` collection member's element type is not tagged with
    /// exactly one primary key (§7).
    fn merge_fields(&mut self, other: Self) -> Result<(), Error>;
}

/// A [`Record`] that can additionally be identified by primary key, making
/// it usable as the element type of a `Vec<T>` collection member or as the
/// root of a collection scan.
pub trait Mergeable: Record {
    /// The primary key's value type.
    type Pk: PartialEq + Clone;

    /// Returns this record's primary key value.
    fn pk(&self) -> Self::Pk;
}

/// One leaf's decode-time shape, as resolved by [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct LeafInfo {
    /// Allocates an empty slot shaped for this leaf's declared type.
    pub alloc_slot: fn() -> ScanSlot,
}

/// The flattened dotted-path field map for one [`Record`] type, used by the
/// row decoder to resolve cursor columns to scan targets.
///
/// Unlike Go's `getFieldMap`, which re-walks `reflect.Type` on every call,
/// `Schema::of` memoizes the flattened map the first time each destination
/// type is scanned and reuses it for the lifetime of the process.
#[derive(Debug, Default)]
pub struct Schema {
    leaves: HashMap<String, LeafInfo>,
}

impl Schema {
    /// Returns the memoized [`Schema`] for `T`, building it on first use.
    ///
    /// `Record` implementors are plain data types without a natural place
    /// to hang a per-type `OnceLock`, so the cache is keyed by `TypeId` in
    /// one process-wide table instead of one static per type.
    pub fn of<T: Record + 'static>() -> &'static Self {
        use std::any::TypeId;
        use std::sync::RwLock;

        static CACHES: OnceLock<RwLock<HashMap<TypeId, &'static Schema>>> = OnceLock::new();
        let caches = CACHES.get_or_init(|| RwLock::new(HashMap::new()));

        let id = TypeId::of::<T>();
        if let Some(schema) = caches.read().expect("schema cache poisoned").get(&id) {
            return schema;
        }

        tracing::trace!(type_name = std::any::type_name::<T>(), "building schema (cache miss)");
        let mut leaves = HashMap::new();
        let mut visiting = vec![std::any::type_name::<T>()];
        collect(T::SCHEMA, "", &mut leaves, &mut visiting);
        let schema: &'static Schema = Box::leak(Box::new(Schema { leaves }));

        caches.write().expect("schema cache poisoned").insert(id, schema);
        schema
    }

    /// Looks up the leaf decode shape for a fully-qualified dotted path.
    #[must_use]
    pub fn leaf(&self, path: &str) -> Option<&LeafInfo> {
        self.leaves.get(path)
    }
}

/// Flattens `fields` into `out`, recursing into composite/flatten children.
///
/// `visiting` holds the type names on the current path from the root type
/// down to `fields`' own declaring type. A child whose type name already
/// appears in `visiting` closes a cycle in the destination type graph (e.g.
/// `Author { featured: Option<Box<Book>> }` / `Book { author:
/// Option<Box<Author>> }`); that subtree is pruned rather than recursed into,
/// keeping the field map finite regardless of self-referential destination
/// types (§3 "Cycle safety", §9).
fn collect(
    fields: &'static [FieldSpec],
    prefix: &str,
    out: &mut HashMap<String, LeafInfo>,
    visiting: &mut Vec<&'static str>,
) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };

        match field.kind {
            FieldKind::Leaf { alloc_slot } | FieldKind::Flat { alloc_slot } => {
                out.insert(path, LeafInfo { alloc_slot });
            }
            FieldKind::CompositeOne { children, type_name }
            | FieldKind::CompositeOptional { children, type_name }
            | FieldKind::CompositeMany { children, type_name } => {
                if visiting.contains(&type_name) {
                    tracing::trace!(type_name, path = %path, "pruning cyclic destination type");
                    continue;
                }
                visiting.push(type_name);
                collect(children(), &path, out, visiting);
                visiting.pop();
            }
            FieldKind::Flatten { children, type_name } => {
                if visiting.contains(&type_name) {
                    tracing::trace!(type_name, path = %path, "pruning cyclic destination type");
                    continue;
                }
                // Hoisted: recurse at the *parent's* prefix, not `path`.
                visiting.push(type_name);
                collect(children(), prefix, out, visiting);
                visiting.pop();
            }
        }
    }
}
