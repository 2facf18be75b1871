//! Emits the `Record` (and, where applicable, `Mergeable`) impl for a
//! lowered [`Ir`].
//!
//! This is the code-generation stand-in for `getFieldMap`'s runtime
//! reflection walk (§9): the field table, the per-row builder, and the
//! merge policy are all produced once at compile time instead of being
//! derived from a value's type on every call.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::analyze::{AnalyzedField, FieldShape, LeafType};
use crate::lower::Ir;

/// Emits the full `impl Record for #ident` (and `impl Mergeable` when a
/// `pk` field was declared).
pub fn codegen(ir: Ir) -> TokenStream {
    let ident = &ir.ident;

    let field_specs = ir.fields.iter().map(field_spec_entry);
    let build_stmts = ir.fields.iter().map(build_stmt);
    let ignored_defaults = ir.ignored.iter().map(|field| {
        quote! { #field: ::std::default::Default::default() }
    });
    let field_idents = ir.fields.iter().map(|f| &f.ident);
    let merge_stmts = ir.fields.iter().map(merge_stmt);

    let record_impl = quote! {
        #[automatically_derived]
        impl ::row_weave::schema::Record for #ident {
            const SCHEMA: &'static [::row_weave::FieldSpec] = &[
                #(#field_specs),*
            ];

            fn build(
                prefix: &str,
                values: &mut ::row_weave::RowValues,
            ) -> ::std::result::Result<Self, ::row_weave::Error> {
                #(#build_stmts)*

                Ok(#ident {
                    #(#field_idents,)*
                    #(#ignored_defaults,)*
                })
            }

            fn merge_fields(
                &mut self,
                other: Self,
            ) -> ::std::result::Result<(), ::row_weave::Error> {
                #(#merge_stmts)*
                Ok(())
            }
        }
    };

    let mergeable_impl = ir.pk_index.map(|index| {
        let pk_field = &ir.fields[index];
        let pk_ident = &pk_field.ident;
        let pk_ty = pk_ty_of(pk_field);
        quote! {
            #[automatically_derived]
            impl ::row_weave::Mergeable for #ident {
                type Pk = #pk_ty;

                fn pk(&self) -> Self::Pk {
                    ::std::clone::Clone::clone(&self.#pk_ident)
                }
            }
        }
    });

    quote! {
        #record_impl
        #mergeable_impl
    }
}

fn pk_ty_of(field: &AnalyzedField) -> TokenStream {
    let ty = &field.ty;
    quote! { #ty }
}

fn child_path_expr(prefix_ident: &syn::Ident, column: &str) -> TokenStream {
    quote! {
        if #prefix_ident.is_empty() {
            #column.to_string()
        } else {
            format!("{}.{}", #prefix_ident, #column)
        }
    }
}

fn leaf_alloc_slot(leaf: LeafType) -> TokenStream {
    match leaf {
        LeafType::I64 => quote! { || ::row_weave::ScanSlot::I64(None) },
        LeafType::I32 => quote! { || ::row_weave::ScanSlot::I32(None) },
        LeafType::I16 => quote! { || ::row_weave::ScanSlot::I16(None) },
        LeafType::F64 => quote! { || ::row_weave::ScanSlot::F64(None) },
        LeafType::F32 => quote! { || ::row_weave::ScanSlot::F32(None) },
        LeafType::Bool => quote! { || ::row_weave::ScanSlot::Bool(None) },
        LeafType::Str => quote! { || ::row_weave::ScanSlot::Str(None) },
        LeafType::Bytes => quote! { || ::row_weave::ScanSlot::Bytes(None) },
        LeafType::Timestamp => quote! { || ::row_weave::ScanSlot::Timestamp(None) },
        LeafType::TimestampTz => quote! { || ::row_weave::ScanSlot::TimestampTz(None) },
        LeafType::Uuid => quote! { || ::row_weave::ScanSlot::Uuid(None) },
    }
}

fn field_spec_entry(field: &AnalyzedField) -> TokenStream {
    let ident = &field.ident;
    let name = ident.to_string();
    let pk = field.pk;

    match &field.shape {
        FieldShape::Leaf { column, leaf, .. } => {
            let alloc_slot = leaf_alloc_slot(*leaf);
            quote! {
                ::row_weave::FieldSpec {
                    name: #column,
                    pk: #pk,
                    kind: ::row_weave::FieldKind::Leaf { alloc_slot: #alloc_slot },
                }
            }
        }
        FieldShape::Flat { column } => {
            quote! {
                ::row_weave::FieldSpec {
                    name: #column,
                    pk: #pk,
                    kind: ::row_weave::FieldKind::Flat {
                        alloc_slot: || ::row_weave::ScanSlot::Flat(None),
                    },
                }
            }
        }
        FieldShape::CompositeOne { column, child } => {
            quote! {
                ::row_weave::FieldSpec {
                    name: #column,
                    pk: false,
                    kind: ::row_weave::FieldKind::CompositeOne {
                        children: || <#child as ::row_weave::schema::Record>::SCHEMA,
                        type_name: ::std::any::type_name::<#child>(),
                    },
                }
            }
        }
        FieldShape::CompositeOptional { column, child } => {
            quote! {
                ::row_weave::FieldSpec {
                    name: #column,
                    pk: false,
                    kind: ::row_weave::FieldKind::CompositeOptional {
                        children: || <#child as ::row_weave::schema::Record>::SCHEMA,
                        type_name: ::std::any::type_name::<#child>(),
                    },
                }
            }
        }
        FieldShape::CompositeMany { column, child } => {
            quote! {
                ::row_weave::FieldSpec {
                    name: #column,
                    pk: false,
                    kind: ::row_weave::FieldKind::CompositeMany {
                        children: || <#child as ::row_weave::schema::Record>::SCHEMA,
                        type_name: ::std::any::type_name::<#child>(),
                    },
                }
            }
        }
        FieldShape::Flatten { child } => {
            let _ = name;
            quote! {
                ::row_weave::FieldSpec {
                    name: "",
                    pk: false,
                    kind: ::row_weave::FieldKind::Flatten {
                        children: || <#child as ::row_weave::schema::Record>::SCHEMA,
                        type_name: ::std::any::type_name::<#child>(),
                    },
                }
            }
        }
        FieldShape::Ignored => unreachable!("Ignored fields are filtered out in analyze()"),
    }
}

fn build_stmt(field: &AnalyzedField) -> TokenStream {
    let ident = &field.ident;
    let prefix_var = format_ident!("__prefix_{}", ident);

    match &field.shape {
        FieldShape::Leaf { column, .. } | FieldShape::Flat { column } => {
            let path_expr = child_path_expr(&format_ident!("prefix"), column);
            quote! {
                let #ident = values.take_as(&(#path_expr))?;
            }
        }
        FieldShape::CompositeOne { column, child } => {
            let path_expr = child_path_expr(&format_ident!("prefix"), column);
            quote! {
                let #prefix_var = #path_expr;
                let #ident = <#child as ::row_weave::schema::Record>::build(&#prefix_var, values)?;
            }
        }
        FieldShape::CompositeOptional { column, child } => {
            let path_expr = child_path_expr(&format_ident!("prefix"), column);
            quote! {
                let #prefix_var = #path_expr;
                let __built = <#child as ::row_weave::schema::Record>::build(&#prefix_var, values)?;
                let #ident = if __built == ::std::default::Default::default() {
                    None
                } else {
                    Some(::std::boxed::Box::new(__built))
                };
            }
        }
        FieldShape::CompositeMany { column, child } => {
            let path_expr = child_path_expr(&format_ident!("prefix"), column);
            quote! {
                let #prefix_var = #path_expr;
                let __built = <#child as ::row_weave::schema::Record>::build(&#prefix_var, values)?;
                let #ident = if __built == ::std::default::Default::default() {
                    ::std::vec::Vec::new()
                } else {
                    ::std::vec![__built]
                };
            }
        }
        FieldShape::Flatten { child } => {
            quote! {
                let #ident = <#child as ::row_weave::schema::Record>::build(prefix, values)?;
            }
        }
        FieldShape::Ignored => unreachable!("Ignored fields are filtered out in analyze()"),
    }
}

fn merge_stmt(field: &AnalyzedField) -> TokenStream {
    let ident = &field.ident;
    match &field.shape {
        FieldShape::Leaf { .. } | FieldShape::Flat { .. } => quote! {},
        FieldShape::CompositeOne { .. } | FieldShape::Flatten { .. } => {
            quote! {
                ::row_weave::schema::Record::merge_fields(&mut self.#ident, other.#ident)?;
            }
        }
        FieldShape::CompositeOptional { .. } => {
            quote! {
                match (self.#ident.as_mut(), other.#ident) {
                    (Some(existing), Some(incoming)) => {
                        ::row_weave::schema::Record::merge_fields(&mut **existing, *incoming)?;
                    }
                    (None, Some(incoming)) => {
                        self.#ident = Some(incoming);
                    }
                    _ => {}
                }
            }
        }
        FieldShape::CompositeMany { .. } => {
            quote! {
                for __elem in other.#ident {
                    ::row_weave::merge::merge_into_slice(&mut self.#ident, __elem)?;
                }
            }
        }
        FieldShape::Ignored => unreachable!("Ignored fields are filtered out in analyze()"),
    }
}
