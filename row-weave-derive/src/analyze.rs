//! Applies the `db` tag grammar and classifies each field's syntactic type
//! into a [`FieldShape`] (§4.1, §4.2).
//!
//! This is a syntactic twin of `row_weave::tag`/the type-kind decision in
//! `row_weave::schema` — the derive crate cannot depend on `row-weave`
//! itself (that dependency runs the other way), so the small amount of
//! grammar logic it needs is duplicated here rather than shared.

use proc_macro_error::abort;
use syn::{GenericArgument, PathArguments, Type};

use crate::parse::{Ast, AstField};

/// A scalar leaf's underlying Rust type, used to pick the right
/// `ScanSlot` variant at codegen time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafType {
    I64,
    I32,
    I16,
    F64,
    F32,
    Bool,
    Str,
    Bytes,
    /// `chrono::NaiveDateTime`.
    Timestamp,
    /// `chrono::DateTime<chrono::Utc>`.
    TimestampTz,
    /// `uuid::Uuid`.
    Uuid,
}

/// How one field participates in the field map, after tag parsing and type
/// classification.
pub enum FieldShape {
    /// `db = "-"`: never populated by scanning.
    Ignored,
    /// A scalar column.
    Leaf { column: String, optional: bool, leaf: LeafType },
    /// A `flat`-tagged custom-scannable column.
    Flat { column: String },
    /// A directly embedded composite, always present.
    CompositeOne { column: String, child: Type },
    /// An `Option<Box<T>>` reference to a composite that may be absent.
    CompositeOptional { column: String, child: Type },
    /// A `Vec<T>` collection of composites.
    CompositeMany { column: String, child: Type },
    /// `#[db(flatten)]`: an embedded composite hoisted into the parent's
    /// own path.
    Flatten { child: Type },
}

/// One analyzed field, combining its shape with whether its tag named it
/// the primary key.
pub struct AnalyzedField {
    pub ident: syn::Ident,
    pub ty: syn::Type,
    pub shape: FieldShape,
    pub pk: bool,
}

/// A fully analyzed `#[derive(Record)]` input.
pub struct Model {
    pub ident: syn::Ident,
    pub fields: Vec<AnalyzedField>,
    /// Fields tagged `#[db("-")]`: excluded from the field map entirely,
    /// set to `Default::default()` when a value is built.
    pub ignored: Vec<syn::Ident>,
}

/// Classifies every field of `ast`.
///
/// # Panics (via `proc_macro_error::abort!`)
///
/// Aborts if a tag is malformed, if `pk` is declared on more than one
/// field, or if `flatten` is combined with other options.
pub fn analyze(ast: Ast) -> Model {
    let mut pk_count = 0;
    let mut ignored = Vec::new();
    let fields = ast
        .fields
        .into_iter()
        .filter_map(|field| {
            let (shape, pk) = classify(&field);
            if pk {
                pk_count += 1;
            }
            match shape {
                FieldShape::Ignored => {
                    ignored.push(field.ident);
                    None
                }
                shape => Some(AnalyzedField {
                    ident: field.ident,
                    ty: field.ty,
                    shape,
                    pk,
                }),
            }
        })
        .collect();

    if pk_count > 1 {
        abort!(ast.ident, "a Record type may declare at most one `pk` field");
    }

    Model { ident: ast.ident, fields, ignored }
}

fn classify(field: &AstField) -> (FieldShape, bool) {
    let Some(raw) = &field.raw_tag else {
        abort!(
            field.ident,
            "field `{}` needs a #[db(\"column[,option]*\")] or #[db(flatten)] attribute, or #[db(\"-\")] to opt out",
            field.ident
        );
    };

    let trimmed = raw.trim();
    if trimmed == "flatten" {
        return (FieldShape::Flatten { child: field.ty.clone() }, false);
    }
    if trimmed == "-" {
        return (FieldShape::Ignored, false);
    }

    let mut parts = trimmed.split(',').map(str::trim);
    let column = parts.next().unwrap_or("").to_string();
    if column.is_empty() {
        abort!(field.ident, "empty column name in #[db(\"{}\")]", raw);
    }

    let mut pk = false;
    let mut flat = false;
    for opt in parts {
        match opt {
            "pk" => pk = true,
            "flat" => flat = true,
            _ => {} // unknown options tolerated, per the runtime tag grammar
        }
    }

    if flat {
        return (FieldShape::Flat { column }, pk);
    }

    (classify_type(&field.ty, column), pk)
}

fn classify_type(ty: &Type, column: String) -> FieldShape {
    let Type::Path(type_path) = ty else {
        abort!(ty, "unsupported field type for row-weave mapping");
    };
    let segment = type_path.path.segments.last().expect("non-empty path");

    match segment.ident.to_string().as_str() {
        "Option" => {
            let inner = single_generic_arg(segment);
            if let Some(boxed) = as_box(inner) {
                FieldShape::CompositeOptional { column, child: boxed.clone() }
            } else {
                let leaf = leaf_type_of(inner).unwrap_or_else(|| {
                    abort!(inner, "Option<T> is only supported for scalar T or Option<Box<T>> for a composite reference")
                });
                FieldShape::Leaf { column, optional: true, leaf }
            }
        }
        "Vec" => {
            let inner = single_generic_arg(segment);
            if is_u8(inner) {
                FieldShape::Leaf { column, optional: false, leaf: LeafType::Bytes }
            } else {
                FieldShape::CompositeMany { column, child: inner.clone() }
            }
        }
        _ => match leaf_type_of(ty) {
            Some(leaf) => FieldShape::Leaf { column, optional: false, leaf },
            None => FieldShape::CompositeOne { column, child: ty.clone() },
        },
    }
}

fn single_generic_arg(segment: &syn::PathSegment) -> &Type {
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        abort!(segment.ident, "expected a single generic argument");
    };
    match args.args.first() {
        Some(GenericArgument::Type(ty)) => ty,
        _ => abort!(segment.ident, "expected a single generic type argument"),
    }
}

fn as_box(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else { return None };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Box" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(p) if p.path.is_ident("u8"))
}

fn leaf_type_of(ty: &Type) -> Option<LeafType> {
    let Type::Path(type_path) = ty else { return None };
    // Matched on the last path segment so both a bare `NaiveDateTime` and a
    // fully qualified `chrono::NaiveDateTime` are recognised the same way.
    let ident = &type_path.path.segments.last()?.ident;
    Some(match ident.to_string().as_str() {
        "i64" => LeafType::I64,
        "i32" => LeafType::I32,
        "i16" => LeafType::I16,
        "f64" => LeafType::F64,
        "f32" => LeafType::F32,
        "bool" => LeafType::Bool,
        "String" => LeafType::Str,
        "NaiveDateTime" => LeafType::Timestamp,
        "DateTime" => LeafType::TimestampTz,
        "Uuid" => LeafType::Uuid,
        _ => return None,
    })
}
