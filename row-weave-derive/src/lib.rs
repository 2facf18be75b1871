//! `#[derive(Record)]`: builds a type's field map and row-building/merge
//! logic at compile time, replacing the runtime reflection a dynamically
//! typed implementation of the same idea would use (§9).

use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;

mod analyze;
mod codegen;
mod lower;
mod parse;

/// Derives [`row_weave::schema::Record`] (and, when the type declares a
/// `pk` field, `row_weave::Mergeable`) from `#[db(...)]`-tagged fields.
#[proc_macro_derive(Record, attributes(db))]
#[proc_macro_error]
pub fn derive_record(ts: TokenStream) -> TokenStream {
    let ast = parse::parse(ts.into());
    let model = analyze::analyze(ast);
    let ir = lower::lower(model);
    codegen::codegen(ir).into()
}
