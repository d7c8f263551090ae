// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::book::Book;
use billfold::engine::statements::{
    assign_statement_due_date, belongs_to_statement, card_summary, current_statement_total,
    forecast_statements, next_statement_total, statement_closing_date, statement_month_total,
};
use billfold::error::LedgerError;
use billfold::ledger::Ledger;
use billfold::models::{Card, NewCard, NewCardPurchase};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn new_card(closing_day: u32, due_day: u32) -> NewCard {
    NewCard {
        name: "Visa".into(),
        credit_limit: d("2000.00"),
        closing_day,
        due_day,
    }
}

fn new_purchase(card_id: i64, amount: &str, count: u32, on: NaiveDate) -> NewCardPurchase {
    NewCardPurchase {
        card_id,
        description: "Fridge".into(),
        amount: d(amount),
        category: "Home".into(),
        installment_count: count,
        purchase_date: on,
    }
}

fn card_of(l: &Ledger, id: i64) -> Card {
    l.card(id).unwrap().clone()
}

#[test]
fn end_to_end_installments_after_closing() {
    let mut book = Book::open_in_memory().unwrap();
    let c = book.add_card(new_card(5, 15)).unwrap();
    let (_, created) = book
        .add_card_purchase(new_purchase(c, "300", 3, date(2025, 3, 20)))
        .unwrap();

    assert_eq!(created.len(), 3);
    let l = book.ledger();
    let got: Vec<_> = l.expenses.iter().map(|e| (e.due_date, e.amount)).collect();
    assert_eq!(
        got,
        vec![
            (date(2025, 5, 15), d("100.00")),
            (date(2025, 6, 15), d("100.00")),
            (date(2025, 7, 15), d("100.00")),
        ]
    );
}

#[test]
fn closing_day_rolls_purchase_to_next_statement() {
    let mut l = Ledger::new();
    let c = l.add_card(new_card(10, 20)).unwrap();
    l.add_card_purchase(new_purchase(c, "80.00", 1, date(2025, 3, 15)))
        .unwrap();
    let card = card_of(&l, c);

    assert_eq!(statement_closing_date(&card, date(2025, 3, 15)), date(2025, 4, 10));
    assert_eq!(statement_month_total(&card, &l, date(2025, 3, 1)), Decimal::ZERO);
    assert_eq!(statement_month_total(&card, &l, date(2025, 4, 1)), d("80.00"));
}

#[test]
fn purchase_on_closing_day_stays_on_that_statement() {
    let card = Card {
        id: 1,
        name: "Visa".into(),
        credit_limit: d("1000"),
        closing_day: 10,
        due_day: 20,
        active: true,
    };
    assert_eq!(statement_closing_date(&card, date(2025, 3, 10)), date(2025, 3, 10));
    assert!(belongs_to_statement(&card, date(2025, 3, 10), date(2025, 3, 10)));
    assert!(!belongs_to_statement(&card, date(2025, 3, 10), date(2025, 3, 11)));
    assert!(belongs_to_statement(&card, date(2025, 3, 11), date(2025, 4, 10)));
}

#[test]
fn closing_day_beyond_month_end_is_clamped() {
    let card = Card {
        id: 1,
        name: "Visa".into(),
        credit_limit: d("1000"),
        closing_day: 31,
        due_day: 31,
        active: true,
    };
    assert_eq!(statement_closing_date(&card, date(2025, 2, 14)), date(2025, 2, 28));
    assert_eq!(assign_statement_due_date(&card, date(2025, 2, 14), 1), date(2025, 3, 31));
    assert_eq!(assign_statement_due_date(&card, date(2025, 2, 14), 2), date(2025, 4, 30));
}

#[test]
fn current_statement_mixes_open_lump_sums_and_installments_due() {
    let mut l = Ledger::new();
    let c = l.add_card(new_card(10, 20)).unwrap();
    // Still open on Mar 5: the Mar 10 statement has not closed.
    l.add_card_purchase(new_purchase(c, "50.00", 1, date(2025, 3, 2)))
        .unwrap();
    // Closed on Feb 10, so it no longer counts.
    l.add_card_purchase(new_purchase(c, "70.00", 1, date(2025, 2, 1)))
        .unwrap();
    // Closes Jan 10; installments due Feb 20, Mar 20, Apr 20.
    l.add_card_purchase(new_purchase(c, "300.00", 3, date(2025, 1, 8)))
        .unwrap();

    let total = current_statement_total(&l, c, date(2025, 3, 5)).unwrap();
    assert_eq!(total, d("150.00"));
}

#[test]
fn inactive_purchases_are_ignored() {
    let mut l = Ledger::new();
    let c = l.add_card(new_card(10, 20)).unwrap();
    let p = l
        .add_card_purchase(new_purchase(c, "50.00", 1, date(2025, 3, 2)))
        .unwrap();
    l.purchases.iter_mut().find(|x| x.id == p).unwrap().active = false;
    assert_eq!(current_statement_total(&l, c, date(2025, 3, 5)).unwrap(), Decimal::ZERO);
}

#[test]
fn forecast_is_sparse_and_ordered() {
    let mut l = Ledger::new();
    let c = l.add_card(new_card(5, 15)).unwrap();
    l.add_card_purchase(new_purchase(c, "300", 3, date(2025, 3, 20)))
        .unwrap();

    let f = forecast_statements(&l, c, date(2025, 3, 20), 6).unwrap();
    let months: Vec<_> = f.iter().map(|s| s.month.as_str()).collect();
    assert_eq!(months, vec!["2025-05", "2025-06", "2025-07"]);
    assert!(f.iter().all(|s| s.total == d("100.00")));

    assert!(forecast_statements(&l, c, date(2025, 3, 20), 2).unwrap().is_empty());
    assert_eq!(next_statement_total(&l, c, date(2025, 4, 1)).unwrap(), d("100.00"));
}

#[test]
fn summary_reports_available_limit() {
    let mut l = Ledger::new();
    let c = l.add_card(new_card(5, 15)).unwrap();
    l.add_card_purchase(new_purchase(c, "300", 3, date(2025, 3, 20)))
        .unwrap();
    l.add_card_purchase(new_purchase(c, "200", 1, date(2025, 3, 21)))
        .unwrap();

    let s = card_summary(&l, c, date(2025, 3, 25)).unwrap();
    assert_eq!(s.committed, d("500"));
    assert_eq!(s.available, d("1500.00"));
    assert_eq!(s.current_statement, d("200"));
}

#[test]
fn unknown_card_is_not_found() {
    let l = Ledger::new();
    assert!(matches!(
        current_statement_total(&l, 42, date(2025, 1, 1)),
        Err(LedgerError::NotFound { .. })
    ));
}

#[test]
fn book_rejects_purchase_on_unknown_card() {
    let mut book = Book::open_in_memory().unwrap();
    let err = book
        .add_card_purchase(new_purchase(7, "10", 1, date(2025, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
    assert!(book.ledger().purchases.is_empty());
}
