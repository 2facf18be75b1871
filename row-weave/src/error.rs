//! Error types returned across the crate.
//!
//! Design principle, mirrored from query-preparation libraries in this
//! style: most errors should be attributable to a single phase. Tag and
//! scan-separator grammar errors surface while a [`crate::Schema`] is being
//! built (once per type, memoized); cursor and merge errors surface per row
//! while a scan is in flight.

use thiserror::Error as ThisError;

/// Errors produced while resolving a destination type's field map, scanning
/// cursor rows into it, or merging the results.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The destination type passed to [`crate::Scanner`] is not a valid
    /// scan target — for example a collection destination whose element
    /// type has no declared primary key.
    ///
    /// Retained for taxonomy completeness (§7) but structurally unreachable
    /// through the public API as written: `Scanner::scan_many::<T>` requires
    /// `T: Mergeable`, a bound the derive macro only emits for types with
    /// exactly one `pk` field, so an invalid collection element fails to
    /// *compile* rather than reaching this variant at runtime. The weaker,
    /// genuinely-reachable runtime twin of this check lives in
    /// [`Error::PrimaryKeyMissingOrAmbiguous`], which backstops hand-written
    /// `Mergeable` implementors whose `SCHEMA` table misstates its own pk
    /// arity.
    #[error("invalid scan destination: {0}")]
    DestinationTypeInvalid(String),

    /// A `#[db("...")]` tag failed to parse, or named a combination of
    /// options the grammar rejects.
    #[error("invalid db tag on field `{field}`: {reason}")]
    TagInvalid {
        /// The struct field the offending tag was attached to.
        field: &'static str,
        /// Human-readable description of what was wrong with it.
        reason: String,
    },

    /// A cursor column did not resolve to any entry in the destination
    /// type's field map.
    #[error("column `{0}` has no corresponding field in the destination type")]
    UnknownColumn(String),

    /// The underlying cursor (`rusqlite`, `postgres`, or a caller-supplied
    /// [`crate::RowCursor`]) failed while advancing or scanning a row.
    #[error("cursor failed while scanning a row")]
    CursorScanFailure(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// A `scan:<path>` separator column was malformed, or used the
    /// historical `scan:many(path, group_by)` form, which is parsed but
    /// rejected (see Open Questions).
    #[error("invalid scan separator `{0}`")]
    ScanSeparatorInvalid(String),

    /// A type reachable as a collection element (or as the root of a
    /// collection scan) has no field tagged `pk`, or has more than one.
    #[error("type `{0}` must declare exactly one `pk` field to be merged as a collection element")]
    PrimaryKeyMissingOrAmbiguous(String),

    /// The cursor produced no rows at all for a single-record destination.
    #[error("query returned no rows")]
    NoRows,
}

impl Error {
    /// Wraps a driver-specific error as a [`Error::CursorScanFailure`].
    pub fn cursor_scan_failure(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::CursorScanFailure(Box::new(source))
    }

    /// Builds a [`Error::TagInvalid`] for the given field and reason.
    pub fn tag_invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::TagInvalid {
            field,
            reason: reason.into(),
        }
    }

    /// Builds a [`Error::PrimaryKeyMissingOrAmbiguous`] for the given type.
    pub fn primary_key_missing_or_ambiguous(type_name: impl Into<String>) -> Self {
        Self::PrimaryKeyMissingOrAmbiguous(type_name.into())
    }
}
