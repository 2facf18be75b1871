//! End-to-end scan scenarios against an in-memory cursor, covering §8's
//! scan shapes: a single joined root, independent root rows, a three-level
//! join, an absent-vs-present optional reference, a flat custom leaf, and
//! the no-rows sentinel.

mod support;

use row_weave::drivers::mock::{MockCell, MockCursor};
use row_weave::{Error, Scanner};
use support::{i, null, s, Author, Book, Event, Money, Shelf};

#[test]
fn flatten_hoists_child_columns_into_parent_path() {
    let cursor = MockCursor::new(
        vec!["id".into(), "name".into(), "email".into()],
        vec![vec![i(1), s("Ada Lovelace"), s("ada@example.com")]],
    );

    let author: Author = Scanner::new(cursor).scan_one().unwrap();
    assert_eq!(author.contact.email, "ada@example.com");
}

#[test]
fn single_root_with_joined_books() {
    let cursor = MockCursor::new(
        vec![
            "id".into(),
            "name".into(),
            "imprint".into(),
            "scan:books".into(),
            "id".into(),
            "title".into(),
            "price".into(),
        ],
        vec![
            vec![i(1), s("Ada Lovelace"), null(), null(), i(10), s("Book One"), s("(12.50,USD)")],
            vec![i(1), s("Ada Lovelace"), null(), null(), i(11), s("Book Two"), s("(9.99,USD)")],
        ],
    );

    let author: Author = Scanner::new(cursor).scan_one().unwrap();

    assert_eq!(author.id, 1);
    assert_eq!(author.name, "Ada Lovelace");
    assert_eq!(author.imprint, None);
    assert_eq!(author.books.len(), 2);
    assert_eq!(author.books[0].title, "Book One");
    assert_eq!(author.books[0].price, Money { cents: 1250, currency: "USD".into() });
    assert_eq!(author.books[1].price.currency, "USD");
    assert!(author.featured.is_none());
}

#[test]
fn multiple_independent_root_rows() {
    let cursor = MockCursor::new(
        vec!["id".into(), "name".into(), "imprint".into()],
        vec![
            vec![i(1), s("Ada Lovelace"), null()],
            vec![i(2), s("Grace Hopper"), s("Indie Press")],
        ],
    );

    let authors: Vec<Author> = Scanner::new(cursor).scan_many().unwrap();

    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].id, 1);
    assert_eq!(authors[1].imprint, Some("Indie Press".to_string()));
    assert!(authors[0].books.is_empty());
}

#[test]
fn deep_load_merges_shared_shelf_across_rows() {
    let columns = vec![
        "id".into(),
        "name".into(),
        "imprint".into(),
        "scan:books".into(),
        "id".into(),
        "title".into(),
        "price".into(),
        "scan:books.shelves".into(),
        "id".into(),
        "label".into(),
    ];
    let rows = vec![
        vec![i(1), s("Ada Lovelace"), null(), null(), i(10), s("Book One"), s("(1.00,USD)"), null(), i(100), s("Fiction")],
        vec![i(1), s("Ada Lovelace"), null(), null(), i(10), s("Book One"), s("(1.00,USD)"), null(), i(101), s("New Releases")],
        vec![i(1), s("Ada Lovelace"), null(), null(), i(11), s("Book Two"), s("(2.00,USD)"), null(), i(100), s("Fiction")],
    ];
    let cursor = MockCursor::new(columns, rows);

    let author: Author = Scanner::new(cursor).scan_one().unwrap();

    assert_eq!(author.books.len(), 2);
    let book_one = author.books.iter().find(|b| b.id == 10).unwrap();
    assert_eq!(book_one.shelves.len(), 2);
    assert!(book_one.shelves.iter().any(|sh| sh.label == "Fiction"));
    assert!(book_one.shelves.iter().any(|sh| sh.label == "New Releases"));

    let book_two = author.books.iter().find(|b| b.id == 11).unwrap();
    assert_eq!(book_two.shelves, vec![Shelf { id: 100, label: "Fiction".into() }]);
}

#[test]
fn optional_reference_is_absent_when_all_null() {
    let cursor = MockCursor::new(
        vec!["id".into(), "name".into()],
        vec![vec![i(1), s("Ada Lovelace")]],
    );

    let author: Author = Scanner::new(cursor).scan_one().unwrap();
    assert!(author.featured.is_none());
}

#[test]
fn optional_reference_is_present_when_populated() {
    let cursor = MockCursor::new(
        vec![
            "id".into(),
            "name".into(),
            "scan:featured".into(),
            "id".into(),
            "title".into(),
            "price".into(),
        ],
        vec![vec![i(1), s("Ada Lovelace"), null(), i(99), s("Featured Book"), s("(5.00,EUR)")]],
    );

    let author: Author = Scanner::new(cursor).scan_one().unwrap();
    let featured = author.featured.expect("featured should be populated");
    assert_eq!(*featured, Book {
        id: 99,
        title: "Featured Book".into(),
        price: Money { cents: 500, currency: "EUR".into() },
        shelves: vec![],
    });
}

#[test]
fn no_rows_is_reported_as_a_sentinel_error() {
    let cursor = MockCursor::new(vec!["id".into(), "name".into()], vec![]);
    let err = Scanner::new(cursor).scan_one::<Author>().unwrap_err();
    assert!(matches!(err, Error::NoRows));
}

#[test]
fn unknown_column_is_rejected_before_any_row_is_scanned() {
    let cursor = MockCursor::new(vec!["nonexistent".into()], vec![vec![i(1)]]);
    let err = Scanner::new(cursor).scan_one::<Author>().unwrap_err();
    assert!(matches!(err, Error::UnknownColumn(col) if col == "nonexistent"));
}

#[test]
fn chrono_and_uuid_leaf_columns_round_trip() {
    let external_id = uuid::Uuid::parse_str("f47ac10b-58cc-4372-a567-0e02b2c3d479").unwrap();
    let occurred_at = chrono::NaiveDate::from_ymd_opt(2026, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    let recorded_at = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();

    let cursor = MockCursor::new(
        vec!["id".into(), "external_id".into(), "occurred_at".into(), "recorded_at".into()],
        vec![vec![
            i(1),
            MockCell::Uuid(external_id),
            MockCell::Timestamp(occurred_at),
            MockCell::TimestampTz(recorded_at),
        ]],
    );

    let event: Event = Scanner::new(cursor).scan_one().unwrap();
    assert_eq!(event.external_id, external_id);
    assert_eq!(event.occurred_at, occurred_at);
    assert_eq!(event.recorded_at, recorded_at);
}
