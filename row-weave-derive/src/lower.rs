//! Lowers an analyzed [`Model`] into the shape `codegen` consumes:
//! resolves which field (if any) is the primary key, since that decision
//! governs whether a `Mergeable` impl is emitted at all.

use crate::analyze::{AnalyzedField, Model};

/// An analyzed model plus its resolved primary key, ready for codegen.
pub struct Ir {
    pub ident: syn::Ident,
    pub fields: Vec<AnalyzedField>,
    pub ignored: Vec<syn::Ident>,
    pub pk_index: Option<usize>,
}

/// Resolves `model`'s primary key field index, if it declared one.
pub fn lower(model: Model) -> Ir {
    let pk_index = model.fields.iter().position(|f| f.pk);
    Ir {
        ident: model.ident,
        fields: model.fields,
        ignored: model.ignored,
        pk_index,
    }
}
