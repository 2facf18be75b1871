//! Materialises relational query result rows into a typed object graph.
//!
//! A query that joins a root table to one or more related tables produces a
//! flat stream of rows; this crate turns that stream back into nested Rust
//! values — a single record with `Vec<Child>` fields, or a `Vec<Root>` when
//! the query itself has no unique root. `#[derive(Record)]` and a `db` tag
//! on each field replace the runtime reflection the same idea is usually
//! built on in languages with a first-class reflection API:
//!
//! ```ignore
//! #[derive(Record)]
//! struct Author {
//!     #[db("id,pk")]
//!     id: i64,
//!     #[db("name")]
//!     name: String,
//!     #[db("books")]
//!     books: Vec<Book>,
//! }
//! ```
//!
//! A query selecting `a.id, a.name, 'scan:books' AS sep, b.id, b.title` can
//! then be scanned straight into `Vec<Author>` via [`Scanner::scan_many`],
//! with each `Author`'s `books` merged across however many rows its joined
//! books occupied.

pub mod build;
pub mod cursor;
pub mod decode;
pub mod drivers;
mod error;
pub mod leaf;
pub mod merge;
pub mod scan_sep;
pub mod scan_slot;
pub mod schema;
pub mod scanner;
pub mod tag;

pub use cursor::RowCursor;
pub use error::Error;
pub use leaf::{FlatColumn, ScanLeaf};
pub use scan_slot::ScanSlot;
pub use schema::{FieldKind, FieldSpec, Mergeable, Record, RowValues, Schema};
pub use scanner::Scanner;

/// `#[derive(Record)]`, re-exported so callers only need `use row_weave::Record;`.
pub use row_weave_derive::Record;

/// Commonly imported names for implementing [`Record`] by hand (derive
/// users only need [`Record`] itself).
pub mod prelude {
    pub use crate::leaf::{FlatColumn, ScanLeaf};
    pub use crate::schema::{FieldKind, FieldSpec, Mergeable, Record, RowValues};
    pub use crate::scan_slot::ScanSlot;
    pub use crate::{Error, RowCursor, Scanner};
}
