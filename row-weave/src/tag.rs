//! Parses the `db` tag grammar: `<column>[,<option>]*`.
//!
//! The grammar is shared between the derive macro (which parses the literal
//! string passed to `#[db("...")]` at compile time) and this runtime twin,
//! kept so the grammar itself can be unit tested without invoking the
//! proc-macro machinery.

/// The options recognised after the column name in a `db` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagOptions {
    /// `pk` — marks the field as the record's primary key.
    pub pk: bool,
    /// `flat` — scan as a single opaque column rather than recursing.
    pub flat: bool,
}

/// The parsed shape of one field's `db` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSpec {
    /// The field is suppressed entirely (`db = "-"`).
    Ignored,
    /// The field participates in mapping under `column`, with the given
    /// options.
    Column {
        /// The column name (first comma-separated part of the tag).
        column: String,
        /// Recognised trailing options.
        options: TagOptions,
    },
}

/// Parses a `db` tag string per §4.1: split on `,`, trim each part, first
/// part is the column name, remaining parts are options. Unknown options
/// are tolerated (ignored). `-` as the whole tag means ignore.
#[must_use]
pub fn parse(raw: &str) -> TagSpec {
    let trimmed = raw.trim();
    if trimmed == "-" {
        return TagSpec::Ignored;
    }

    let mut parts = trimmed.split(',').map(str::trim);
    let column = parts.next().unwrap_or("").to_string();

    let mut options = TagOptions::default();
    for opt in parts {
        match opt {
            "pk" => options.pk = true,
            "flat" => options.flat = true,
            _ => {} // unknown options are tolerated
        }
    }

    TagSpec::Column { column, options }
}
