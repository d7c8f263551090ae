// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::engine::audit::audit;
use billfold::engine::dashboard::{
    month_summary, monthly_evolution, person_summaries, receivable_total, recurring_stats,
    spending_by_category,
};
use billfold::engine::expansion::expand_recurring;
use billfold::engine::settlement::{mark_self_expense_paid, settle_partial};
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

fn spend(l: &mut Ledger, amount: &str, category: &str, payer: &str, due: NaiveDate) -> i64 {
    l.add_expense(NewExpense {
        description: category.to_lowercase(),
        amount: d(amount),
        category: category.into(),
        payer: Payer::parse(payer),
        due_date: due,
    })
    .unwrap()
}

fn setup() -> Ledger {
    let mut l = Ledger::new();
    l.add_income("Salary", d("1000.00"), date(2025, 3, 1)).unwrap();
    let rent = spend(&mut l, "700.00", "Home", "self", date(2025, 3, 5));
    mark_self_expense_paid(&mut l, rent, date(2025, 3, 5)).unwrap();
    spend(&mut l, "500.00", "Bills", "self", date(2025, 3, 20));
    spend(&mut l, "120.00", "Food", "Ana", date(2025, 3, 15));
    spend(&mut l, "80.00", "Food", "Ana", date(2025, 4, 15));
    l
}

#[test]
fn month_summary_flags_shortfall() {
    let l = setup();
    let s = month_summary(&l, "2025-03");
    assert_eq!(s.income, d("1000.00"));
    assert_eq!(s.paid, d("700.00"));
    assert_eq!(s.balance, d("300.00"));
    assert_eq!(s.pending, d("500.00"));
    assert_eq!(s.receivable, d("120.00"));
    assert_eq!(s.shortfall, Some(d("80.00")));
}

#[test]
fn month_without_pending_has_no_shortfall() {
    let l = setup();
    assert_eq!(month_summary(&l, "2025-04").shortfall, None);
}

#[test]
fn receivables_and_people() {
    let mut l = setup();
    assert_eq!(receivable_total(&l), d("200.00"));

    let march = l
        .expenses
        .iter()
        .find(|e| e.due_date == date(2025, 3, 15))
        .unwrap()
        .id;
    settle_partial(&mut l, march, d("20.00"), date(2025, 3, 16)).unwrap();

    let people = person_summaries(&l);
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name, "Ana");
    assert_eq!(people[0].pending, d("180.00"));
    assert_eq!(people[0].pending_count, 2);
    assert_eq!(people[0].received, d("20.00"));
}

#[test]
fn spending_groups_paid_expenses_largest_first() {
    let mut l = setup();
    let gym = spend(&mut l, "60.00", "Health", "self", date(2025, 2, 10));
    mark_self_expense_paid(&mut l, gym, date(2025, 2, 10)).unwrap();

    let all = spending_by_category(&l, None);
    assert_eq!(all, vec![("Home".to_string(), d("700.00")), ("Health".to_string(), d("60.00"))]);
    let march = spending_by_category(&l, Some("2025-03"));
    assert_eq!(march, vec![("Home".to_string(), d("700.00"))]);
}

#[test]
fn evolution_covers_trailing_months_oldest_first() {
    let l = setup();
    let points = monthly_evolution(&l, date(2025, 4, 10), 3);
    let months: Vec<_> = points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, vec!["2025-02", "2025-03", "2025-04"]);
    assert_eq!(points[1].balance, d("300.00"));
    assert_eq!(points[2].income, Decimal::ZERO);
}

#[test]
fn recurring_stats_project_three_months() {
    let mut l = Ledger::new();
    l.add_recurring(NewRecurring {
        description: "Internet".into(),
        amount: d("100.00"),
        category: "Bills".into(),
        kind: RecurrenceKind::Fixed,
        installment_count: None,
        payer: Payer::Myself,
        start_date: date(2025, 1, 1),
    })
    .unwrap();
    let plan = l
        .add_recurring(NewRecurring {
            description: "Sofa".into(),
            amount: d("50.00"),
            category: "Home".into(),
            kind: RecurrenceKind::Installment,
            installment_count: Some(4),
            payer: Payer::Myself,
            start_date: date(2025, 1, 1),
        })
        .unwrap();
    l.recurring_mut(plan).unwrap().installments_paid = 2;

    let stats = recurring_stats(&l);
    assert_eq!(stats.active, 2);
    assert_eq!(stats.monthly_fixed, d("100.00"));
    assert_eq!(stats.next_three_months, d("400.00"));
}

#[test]
fn audit_is_clean_for_consistent_ledger() {
    let l = setup();
    assert!(audit(&l).is_empty());
}

#[test]
fn audit_reports_counter_behind_and_broken_links() {
    let mut l = Ledger::new();
    let plan = l
        .add_recurring(NewRecurring {
            description: "Bike".into(),
            amount: d("100.00"),
            category: "Transport".into(),
            kind: RecurrenceKind::Installment,
            installment_count: Some(2),
            payer: Payer::parse("Ana"),
            start_date: date(2025, 1, 10),
        })
        .unwrap();
    let ids = expand_recurring(&mut l, plan, date(2025, 1, 10)).unwrap();
    // Paid behind the engine's back.
    l.expenses.iter_mut().find(|e| e.id == ids[0]).unwrap().paid = true;
    l.expenses.iter_mut().find(|e| e.id == ids[1]).unwrap().purchase_id = Some(404);

    let codes: Vec<_> = audit(&l).into_iter().map(|i| i.code).collect();
    assert!(codes.contains(&"counter_behind"));
    assert!(codes.contains(&"orphan_purchase_link"));
}

#[test]
fn audit_reports_unknown_payer() {
    let mut l = setup();
    l.people.clear();
    let codes: Vec<_> = audit(&l).into_iter().map(|i| i.code).collect();
    assert_eq!(codes, vec!["unknown_payer", "unknown_payer"]);
}

#[test]
fn audit_reports_obligation_owed_by_unknown_person() {
    let mut l = Ledger::new();
    l.add_recurring(NewRecurring {
        description: "Gym".into(),
        amount: d("40.00"),
        category: "Health".into(),
        kind: RecurrenceKind::Fixed,
        installment_count: None,
        payer: Payer::parse("Bruno"),
        start_date: date(2025, 3, 1),
    })
    .unwrap();
    assert!(audit(&l).is_empty());
    l.people.clear();
    let issues = audit(&l);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, "unknown_payer");
    assert!(issues[0].detail.starts_with("recurring #"));
}
