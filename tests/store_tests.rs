// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use billfold::book::Book;
use billfold::db;
use billfold::models::{NewCard, NewCardPurchase, NewExpense, Payer};
use billfold::snapshot::SnapshotStore;
use billfold::store::{Collection, RecordStore, SqliteStore};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tempfile::tempdir;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// A record store that is never reachable.
struct Offline;

impl RecordStore for Offline {
    fn load_all(&self, _owner_key: &str, _collection: Collection) -> Result<Vec<Value>> {
        Err(anyhow!("connection refused"))
    }

    fn replace_all(&self, _owner_key: &str, _collection: Collection, _records: &[Value]) -> Result<()> {
        Err(anyhow!("connection refused"))
    }
}

fn lunch(payer: &str) -> NewExpense {
    NewExpense {
        description: "Lunch".into(),
        amount: d("25.50"),
        category: "Food".into(),
        payer: Payer::parse(payer),
        due_date: date(2025, 3, 1),
    }
}

#[test]
fn replace_all_overwrites_only_that_owner_and_collection() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .replace_all("a", Collection::People, &[json!("Ana"), json!("Bruno")])
        .unwrap();
    store
        .replace_all("b", Collection::People, &[json!("Caio")])
        .unwrap();
    store
        .replace_all("a", Collection::Cards, &[json!({"id": 1})])
        .unwrap();

    store
        .replace_all("a", Collection::People, &[json!("Bruno")])
        .unwrap();

    assert_eq!(store.load_all("a", Collection::People).unwrap(), vec![json!("Bruno")]);
    assert_eq!(store.load_all("b", Collection::People).unwrap(), vec![json!("Caio")]);
    assert_eq!(store.load_all("a", Collection::Cards).unwrap().len(), 1);
    assert!(store.load_all("c", Collection::People).unwrap().is_empty());
}

#[test]
fn records_keep_their_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    let records: Vec<Value> = (0..5).map(|i| json!({ "n": 4 - i })).collect();
    store.replace_all("a", Collection::Expenses, &records).unwrap();
    assert_eq!(store.load_all("a", Collection::Expenses).unwrap(), records);
}

#[test]
fn book_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = db::db_path(dir.path()).unwrap();

    let mut book = Book::open(
        Box::new(SqliteStore::new(db::open_or_init(&path).unwrap()).unwrap()),
        None,
        "user_test",
    )
    .unwrap();
    book.add_expense(lunch("Ana")).unwrap();
    let card = book
        .add_card(NewCard {
            name: "Visa".into(),
            credit_limit: d("1000"),
            closing_day: 5,
            due_day: 15,
        })
        .unwrap();
    book.add_card_purchase(NewCardPurchase {
        card_id: card,
        description: "Chair".into(),
        amount: d("90"),
        category: "Home".into(),
        installment_count: 3,
        purchase_date: date(2025, 3, 20),
    })
    .unwrap();
    book.add_income("Salary", d("3000"), date(2025, 3, 1)).unwrap();

    let reopened = Book::open(
        Box::new(SqliteStore::new(db::open_or_init(&path).unwrap()).unwrap()),
        None,
        "user_test",
    )
    .unwrap();
    let (a, b) = (book.ledger(), reopened.ledger());
    assert_eq!(a.expenses, b.expenses);
    assert_eq!(a.incomes, b.incomes);
    assert_eq!(a.people, b.people);
    assert_eq!(a.cards, b.cards);
    assert_eq!(a.purchases, b.purchases);
    assert_eq!(b.expenses.len(), 4);
}

#[test]
fn failed_save_falls_back_to_snapshot() {
    let dir = tempdir().unwrap();
    let snapshot = SnapshotStore::new(dir.path());

    let mut book = Book::open(Box::new(Offline), Some(snapshot.clone()), "user_test").unwrap();
    let id = book.add_expense(lunch("Ana")).unwrap();
    assert!(book.ledger().expense(id).is_some());
    assert!(snapshot.path(Collection::Expenses).exists());
    assert!(snapshot.path(Collection::People).exists());
    assert!(!snapshot.path(Collection::Cards).exists());

    let reopened = Book::open(Box::new(Offline), Some(snapshot), "user_test").unwrap();
    assert_eq!(reopened.ledger().expenses, book.ledger().expenses);
    assert_eq!(reopened.ledger().people, vec!["Ana".to_string()]);
}

#[test]
fn unreadable_snapshot_starts_empty() {
    let dir = tempdir().unwrap();
    let snapshot = SnapshotStore::new(dir.path());
    std::fs::write(snapshot.path(Collection::Expenses), "{ not json").unwrap();
    snapshot
        .save(Collection::People, &[json!("Ana")])
        .unwrap();

    let book = Book::open(Box::new(Offline), Some(snapshot), "user_test").unwrap();
    assert!(book.ledger().expenses.is_empty());
    assert_eq!(book.ledger().people, vec!["Ana".to_string()]);
}

#[test]
fn offline_without_snapshot_starts_empty() {
    let book = Book::open(Box::new(Offline), None, "user_test").unwrap();
    assert!(book.ledger().expenses.is_empty());
}

#[test]
fn failed_operation_is_not_persisted() {
    let dir = tempdir().unwrap();
    let snapshot = SnapshotStore::new(dir.path());
    let mut book = Book::open(Box::new(Offline), Some(snapshot.clone()), "user_test").unwrap();
    assert!(book.settle_partial(1, d("10"), date(2025, 3, 1)).is_err());
    assert!(!snapshot.path(Collection::Incomes).exists());
}

#[test]
fn corrupt_record_is_reported() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .replace_all("user_test", Collection::Cards, &[json!({"name": "no id"})])
        .unwrap();
    assert!(Book::open(Box::new(store), None, "user_test").is_err());
}

#[test]
fn owner_key_is_created_once() {
    let dir = tempdir().unwrap();
    let first = db::owner_key(dir.path()).unwrap();
    let second = db::owner_key(dir.path()).unwrap();
    assert!(first.starts_with("user_"));
    assert_eq!(first, second);
}
