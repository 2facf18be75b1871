//! Shared fixtures for the end-to-end scan scenarios: a small library
//! catalog (author -> books -> shelves), reused across test files.

use row_weave::drivers::mock::MockCell;
use row_weave::{Error, FlatColumn, Record};

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Author {
    #[db("id,pk")]
    pub id: i64,
    #[db("name")]
    pub name: String,
    #[db("imprint")]
    pub imprint: Option<String>,
    #[db("books")]
    pub books: Vec<Book>,
    #[db("featured")]
    pub featured: Option<Box<Book>>,
    #[db(flatten)]
    pub contact: Contact,
}

/// Anonymously composed into [`Author`] via `#[db(flatten)]`: its own
/// columns (`email`) are selected directly alongside `Author`'s, with no
/// `contact.` path segment of their own.
#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Contact {
    #[db("email")]
    pub email: String,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Book {
    #[db("id,pk")]
    pub id: i64,
    #[db("title")]
    pub title: String,
    #[db("price,flat")]
    pub price: Money,
    #[db("shelves")]
    pub shelves: Vec<Shelf>,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Shelf {
    #[db("id,pk")]
    pub id: i64,
    #[db("label")]
    pub label: String,
}

/// A `(amount,currency)` composite column, parsed from its textual
/// representation the way a Postgres composite type arrives over the wire.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Money {
    pub cents: i64,
    pub currency: String,
}

impl FlatColumn for Money {
    fn parse_column(raw: &str) -> Result<Self, Error> {
        let inner = raw
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| Error::cursor_scan_failure(MoneyParseError(raw.to_string())))?;

        let (amount, currency) = inner
            .split_once(',')
            .ok_or_else(|| Error::cursor_scan_failure(MoneyParseError(raw.to_string())))?;

        let amount: f64 = amount
            .parse()
            .map_err(|_| Error::cursor_scan_failure(MoneyParseError(raw.to_string())))?;

        Ok(Money {
            cents: (amount * 100.0).round() as i64,
            currency: currency.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("malformed money column: {0}")]
struct MoneyParseError(String);

/// Exercises the `chrono`/`uuid` builtin leaf types end to end.
#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Event {
    #[db("id,pk")]
    pub id: i64,
    #[db("external_id")]
    pub external_id: uuid::Uuid,
    #[db("occurred_at")]
    pub occurred_at: chrono::NaiveDateTime,
    #[db("recorded_at")]
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Shorthand for building one mock row's cells.
pub fn row(cells: Vec<MockCell>) -> Vec<MockCell> {
    cells
}

pub fn i(v: i64) -> MockCell {
    MockCell::I64(v)
}

pub fn s(v: &str) -> MockCell {
    MockCell::Str(v.to_string())
}

pub fn null() -> MockCell {
    MockCell::Null
}
