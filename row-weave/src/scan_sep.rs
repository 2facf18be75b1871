//! Parses `scan:<path>` separator columns (§4.3).
//!
//! A separator column repositions the decoder's "current path" for the data
//! columns that follow it, so a flat `SELECT` result set can describe a
//! nested object graph without repeating the full dotted path on every
//! column. The historical `scan:many(path, group_by)` form is recognised so
//! it produces a precise error rather than being silently treated as a
//! plain dotted path (Open Questions: dropped rather than implemented,
//! since primary-key-based merge makes the explicit group-by redundant).

use crate::Error;

const SCAN_PREFIX: &str = "scan:";

/// One parsed separator column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSeparator {
    /// The dotted path the decoder's current path is set to.
    pub path: String,
}

/// Returns `Some(raw_after_prefix)` if `column_name` is a separator column,
/// `None` if it is an ordinary data column.
#[must_use]
pub fn strip_prefix(column_name: &str) -> Option<&str> {
    column_name.strip_prefix(SCAN_PREFIX)
}

/// Parses the text following `scan:` in a separator column name.
///
/// # Errors
///
/// Returns [`Error::ScanSeparatorInvalid`] for the empty path, a path with
/// empty segments (`a..b`), or the historical `many(path, group_by)` call
/// form.
pub fn parse(raw: &str) -> Result<ScanSeparator, Error> {
    let trimmed = raw.trim();

    if trimmed.starts_with("many(") && trimmed.ends_with(')') {
        return Err(Error::ScanSeparatorInvalid(format!(
            "scan:{trimmed} uses the unsupported many(path, group_by) form; \
             primary-key-based merge makes the explicit group-by unnecessary"
        )));
    }

    if trimmed.is_empty() {
        return Err(Error::ScanSeparatorInvalid("scan: with an empty path".to_string()));
    }

    if trimmed.split('.').any(str::is_empty) {
        return Err(Error::ScanSeparatorInvalid(format!("scan:{trimmed} has an empty path segment")));
    }

    Ok(ScanSeparator {
        path: trimmed.to_string(),
    })
}
