//! Parses a `#[derive(Record)]` input into a struct-shaped [`Ast`]: one
//! entry per field, carrying its raw `#[db("...")]` tag text (or `None` for
//! an untagged field) alongside its syntactic type.

use proc_macro2::TokenStream;
use proc_macro_error::abort;
use syn::{parse2, DeriveInput, Field, Fields, Lit, Meta};

/// One struct field as seen by the parser, before tag grammar or type
/// classification is applied.
pub struct AstField {
    pub ident: syn::Ident,
    pub ty: syn::Type,
    pub raw_tag: Option<String>,
}

/// A `#[derive(Record)]` input, reduced to what `analyze` needs.
pub struct Ast {
    pub ident: syn::Ident,
    pub fields: Vec<AstField>,
}

/// Parses the derive input into an [`Ast`].
///
/// # Panics (via `proc_macro_error::abort!`)
///
/// Aborts compilation if the input is not a non-generic struct with named
/// fields, or if a `#[db(...)]` attribute's argument is not a string
/// literal.
pub fn parse(ts: TokenStream) -> Ast {
    let input: DeriveInput = match parse2(ts) {
        Ok(input) => input,
        Err(err) => abort!(err.span(), "could not parse derive input: {}", err),
    };

    if !input.generics.params.is_empty() {
        abort!(input.ident, "#[derive(Record)] does not support generic structs");
    }

    let Fields::Named(named) = (match input.data {
        syn::Data::Struct(s) => s.fields,
        _ => abort!(input.ident, "#[derive(Record)] only supports structs"),
    }) else {
        abort!(input.ident, "#[derive(Record)] requires named fields");
    };

    let fields = named.named.into_iter().map(parse_field).collect();

    Ast {
        ident: input.ident,
        fields,
    }
}

fn parse_field(field: Field) -> AstField {
    let ident = field
        .ident
        .clone()
        .unwrap_or_else(|| abort!(field, "tuple struct fields are not supported"));

    let raw_tag = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("db"))
        .map(|attr| db_attribute_literal(attr));

    AstField {
        ident,
        ty: field.ty,
        raw_tag,
    }
}

fn db_attribute_literal(attr: &syn::Attribute) -> String {
    let Meta::List(list) = &attr.meta else {
        abort!(attr, "expected #[db(\"column[,option]*\")] or #[db(flatten)]");
    };

    // `#[db(flatten)]` is a bare path, not a string literal; try that shape
    // first before falling back to `#[db("column[,option]*")]`.
    if let Ok(path) = list.parse_args::<syn::Path>() {
        if path.is_ident("flatten") {
            return "flatten".to_string();
        }
    }

    let lit: Lit = list.parse_args().unwrap_or_else(|_| {
        abort!(attr, "expected #[db(\"column[,option]*\")] or the bare #[db(flatten)]")
    });
    match lit {
        Lit::Str(s) => s.value(),
        other => abort!(other, "#[db(...)] expects a string literal or the bare `flatten`"),
    }
}
