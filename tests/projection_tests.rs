// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::engine::expansion::expand_recurring;
use billfold::engine::projection::{monthly_forecast_for_person, ForecastSource};
use billfold::ledger::Ledger;
use billfold::models::{NewExpense, NewRecurring, Payer, RecurrenceKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn recurring(kind: RecurrenceKind, count: Option<u32>, amount: &str, start: NaiveDate) -> NewRecurring {
    NewRecurring {
        description: "Streaming".into(),
        amount: d(amount),
        category: "Fun".into(),
        kind,
        installment_count: count,
        payer: Payer::parse("Ana"),
        start_date: start,
    }
}

#[test]
fn person_with_nothing_pending_has_empty_forecast() {
    let mut l = Ledger::new();
    l.add_person("Ana").unwrap();
    assert!(monthly_forecast_for_person(&l, "Ana", date(2025, 3, 1)).is_empty());
}

#[test]
fn unpaid_expenses_land_in_their_due_month() {
    let mut l = Ledger::new();
    for (amount, due) in [("20.00", date(2025, 3, 3)), ("15.00", date(2025, 3, 20)), ("40.00", date(2025, 5, 1))] {
        l.add_expense(NewExpense {
            description: "Lunch".into(),
            amount: d(amount),
            category: "Food".into(),
            payer: Payer::parse("Ana"),
            due_date: due,
        })
        .unwrap();
    }
    // Outside the six-month window.
    l.add_expense(NewExpense {
        description: "Trip".into(),
        amount: d("500"),
        category: "Travel".into(),
        payer: Payer::parse("Ana"),
        due_date: date(2025, 12, 1),
    })
    .unwrap();

    let f = monthly_forecast_for_person(&l, "Ana", date(2025, 3, 10));
    assert_eq!(f.len(), 2);
    assert_eq!(f[0].month, "2025-03");
    assert_eq!(f[0].total, d("35.00"));
    assert_eq!(f[0].installment_count, 2);
    assert_eq!(f[1].month, "2025-05");
    assert!(f[1].items.iter().all(|i| i.source == ForecastSource::Expense));
}

#[test]
fn fixed_obligation_counts_every_month_once() {
    let mut l = Ledger::new();
    let id = l
        .add_recurring(recurring(RecurrenceKind::Fixed, None, "25.00", date(2025, 3, 12)))
        .unwrap();
    // Materialises March as a real expense.
    expand_recurring(&mut l, id, date(2025, 3, 12)).unwrap();

    let f = monthly_forecast_for_person(&l, "Ana", date(2025, 3, 1));
    assert_eq!(f.len(), 6);
    assert!(f.iter().all(|m| m.total == d("25.00")));
    assert_eq!(f[0].items[0].source, ForecastSource::Expense);
    assert_eq!(f[1].items[0].source, ForecastSource::Recurring);
    assert_eq!(f[1].items[0].due_date, date(2025, 4, 12));
}

#[test]
fn fixed_obligation_starting_later_is_not_projected_early() {
    let mut l = Ledger::new();
    l.add_recurring(recurring(RecurrenceKind::Fixed, None, "25.00", date(2025, 6, 1)))
        .unwrap();
    let f = monthly_forecast_for_person(&l, "Ana", date(2025, 3, 1));
    let months: Vec<_> = f.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["2025-06", "2025-07", "2025-08"]);
}

#[test]
fn unexpanded_installments_are_projected_until_the_plan_ends() {
    let mut l = Ledger::new();
    let id = l
        .add_recurring(recurring(RecurrenceKind::Installment, Some(4), "50.00", date(2025, 2, 5)))
        .unwrap();
    l.recurring_mut(id).unwrap().installments_paid = 1;

    let f = monthly_forecast_for_person(&l, "Ana", date(2025, 3, 1));
    let months: Vec<_> = f.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["2025-03", "2025-04", "2025-05"]);
    assert_eq!(f[0].items[0].description, "Streaming (installment 2/4)");
}

#[test]
fn expanded_installments_are_not_counted_twice() {
    let mut l = Ledger::new();
    let id = l
        .add_recurring(recurring(RecurrenceKind::Installment, Some(2), "50.00", date(2025, 3, 5)))
        .unwrap();
    expand_recurring(&mut l, id, date(2025, 3, 5)).unwrap();

    let f = monthly_forecast_for_person(&l, "Ana", date(2025, 3, 1));
    assert_eq!(f.len(), 2);
    assert!(f.iter().all(|m| m.total == d("50.00") && m.installment_count == 1));
}

#[test]
fn household_expenses_are_not_part_of_a_person_forecast() {
    let mut l = Ledger::new();
    l.add_expense(NewExpense {
        description: "Rent".into(),
        amount: d("900"),
        category: "Home".into(),
        payer: Payer::Myself,
        due_date: date(2025, 3, 5),
    })
    .unwrap();
    assert!(monthly_forecast_for_person(&l, "Ana", date(2025, 3, 1)).is_empty());
}
