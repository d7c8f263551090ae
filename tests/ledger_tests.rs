// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::error::{LedgerError, RecordKind};
use billfold::ledger::Ledger;
use billfold::models::{NewCard, NewCardPurchase, NewExpense, NewRecurring, Payer, RecurrenceKind};
use billfold::engine::audit::audit;
use billfold::engine::expansion::{expand_card_purchase, expand_recurring};
use billfold::engine::settlement::settle_recurring_installment;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn expense(desc: &str, amount: &str, payer: &str, due: NaiveDate) -> NewExpense {
    NewExpense {
        description: desc.into(),
        amount: d(amount),
        category: "Food".into(),
        payer: Payer::parse(payer),
        due_date: due,
    }
}

#[test]
fn add_expense_registers_new_payer() {
    let mut l = Ledger::new();
    l.add_expense(expense("Pizza", "40.00", "Ana", date(2025, 3, 1)))
        .unwrap();
    assert_eq!(l.people, vec!["Ana".to_string()]);
    l.add_expense(expense("Rent", "900.00", "self", date(2025, 3, 5)))
        .unwrap();
    assert_eq!(l.people.len(), 1);
}

#[test]
fn add_expense_rejects_non_positive_amount() {
    let mut l = Ledger::new();
    let err = l
        .add_expense(expense("Nothing", "0", "self", date(2025, 3, 1)))
        .unwrap_err();
    assert_eq!(err, LedgerError::InvalidAmount(Decimal::ZERO));
    assert!(l.expenses.is_empty());
}

#[test]
fn ids_are_unique_across_collections() {
    let mut l = Ledger::new();
    let e = l
        .add_expense(expense("A", "1", "self", date(2025, 1, 1)))
        .unwrap();
    let i = l.add_income("Salary", d("10"), date(2025, 1, 1)).unwrap();
    let c = l
        .add_card(NewCard {
            name: "Visa".into(),
            credit_limit: d("1000"),
            closing_day: 5,
            due_day: 15,
        })
        .unwrap();
    assert!(e < i && i < c);
    l.delete_income(i).unwrap();
    let next = l.add_income("Bonus", d("5"), date(2025, 1, 2)).unwrap();
    assert!(next > c);
}

#[test]
fn person_names_are_validated() {
    let mut l = Ledger::new();
    assert!(matches!(
        l.add_person("  "),
        Err(LedgerError::InvalidOperation(_))
    ));
    assert!(matches!(
        l.add_person("Self"),
        Err(LedgerError::InvalidOperation(_))
    ));
    l.add_person(" Bruno ").unwrap();
    assert!(l.has_person("Bruno"));
    assert!(matches!(
        l.add_person("Bruno"),
        Err(LedgerError::InvalidOperation(_))
    ));
}

#[test]
fn deleting_person_reassigns_expenses_to_self() {
    let mut l = Ledger::new();
    l.add_expense(expense("Lunch", "20", "Ana", date(2025, 3, 1)))
        .unwrap();
    l.add_expense(expense("Taxi", "15", "Ana", date(2025, 3, 2)))
        .unwrap();
    l.add_expense(expense("Gym", "60", "self", date(2025, 3, 3)))
        .unwrap();
    let plan = l
        .add_recurring(NewRecurring {
            description: "Bike".into(),
            amount: d("120.00"),
            category: "Transport".into(),
            kind: RecurrenceKind::Installment,
            installment_count: Some(3),
            payer: Payer::parse("Ana"),
            start_date: date(2025, 3, 10),
        })
        .unwrap();
    expand_recurring(&mut l, plan, date(2025, 3, 10)).unwrap();

    let moved = l.delete_person("Ana").unwrap();

    assert_eq!(moved, 5);
    assert_eq!(l.expenses.len(), 6);
    assert!(l.expenses.iter().all(|e| e.payer == Payer::Myself));
    assert_eq!(l.recurring(plan).unwrap().payer, Payer::Myself);
    assert!(!l.has_person("Ana"));
    assert!(audit(&l).is_empty());

    // The household now owes the plan itself: paying it brings in nothing.
    let s = settle_recurring_installment(&mut l, plan, date(2025, 3, 10)).unwrap();
    assert_eq!(s.income_id, None);
    assert!(l.incomes.is_empty());
}

#[test]
fn deleting_unknown_person_is_not_found() {
    let mut l = Ledger::new();
    assert_eq!(
        l.delete_person("Nobody").unwrap_err(),
        LedgerError::NotFound {
            kind: RecordKind::Person,
            key: "Nobody".into()
        }
    );
}

#[test]
fn renaming_person_repoints_payers() {
    let mut l = Ledger::new();
    let e = l
        .add_expense(expense("Lunch", "20", "Ana", date(2025, 3, 1)))
        .unwrap();
    let r = l
        .add_recurring(NewRecurring {
            description: "Phone".into(),
            amount: d("30"),
            category: "Bills".into(),
            kind: RecurrenceKind::Fixed,
            installment_count: None,
            payer: Payer::parse("Ana"),
            start_date: date(2025, 3, 10),
        })
        .unwrap();

    l.rename_person("Ana", "Ana Paula").unwrap();

    assert_eq!(l.expense(e).unwrap().payer, Payer::parse("Ana Paula"));
    assert_eq!(l.recurring(r).unwrap().payer, Payer::parse("Ana Paula"));
    assert_eq!(l.people, vec!["Ana Paula".to_string()]);
}

#[test]
fn installment_plan_requires_a_count() {
    let mut l = Ledger::new();
    let err = l
        .add_recurring(NewRecurring {
            description: "Sofa".into(),
            amount: d("100"),
            category: "Home".into(),
            kind: RecurrenceKind::Installment,
            installment_count: None,
            payer: Payer::Myself,
            start_date: date(2025, 1, 1),
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidOperation(_)));
    assert!(l.recurring.is_empty());
}

#[test]
fn toggle_refuses_to_reactivate_finished_plan() {
    let mut l = Ledger::new();
    let id = l
        .add_recurring(NewRecurring {
            description: "Course".into(),
            amount: d("50"),
            category: "Education".into(),
            kind: RecurrenceKind::Installment,
            installment_count: Some(1),
            payer: Payer::Myself,
            start_date: date(2025, 1, 1),
        })
        .unwrap();
    {
        let r = l.recurring_mut(id).unwrap();
        r.installments_paid = 1;
        r.active = false;
    }
    assert!(l.toggle_recurring_active(id).is_err());
}

#[test]
fn deleting_recurring_keeps_its_expenses() {
    let mut l = Ledger::new();
    let id = l
        .add_recurring(NewRecurring {
            description: "Sofa".into(),
            amount: d("100"),
            category: "Home".into(),
            kind: RecurrenceKind::Installment,
            installment_count: Some(3),
            payer: Payer::Myself,
            start_date: date(2025, 1, 10),
        })
        .unwrap();
    expand_recurring(&mut l, id, date(2025, 1, 10)).unwrap();
    l.delete_recurring(id).unwrap();
    assert_eq!(l.expenses.len(), 3);
    assert!(l.expenses.iter().all(|e| e.recurring_id.is_none()));
}

#[test]
fn card_validation_and_cascading_delete() {
    let mut l = Ledger::new();
    let bad = l.add_card(NewCard {
        name: "Visa".into(),
        credit_limit: d("1000"),
        closing_day: 32,
        due_day: 10,
    });
    assert!(matches!(bad, Err(LedgerError::InvalidOperation(_))));

    let card = l
        .add_card(NewCard {
            name: "Visa".into(),
            credit_limit: d("1000"),
            closing_day: 5,
            due_day: 15,
        })
        .unwrap();
    let p = l
        .add_card_purchase(NewCardPurchase {
            card_id: card,
            description: "TV".into(),
            amount: d("300"),
            category: "Home".into(),
            installment_count: 3,
            purchase_date: date(2025, 3, 20),
        })
        .unwrap();
    expand_card_purchase(&mut l, p).unwrap();
    l.add_expense(expense("Rent", "900", "self", date(2025, 3, 5)))
        .unwrap();

    let cascade = l.delete_card(card).unwrap();

    assert_eq!(cascade.purchases, 1);
    assert_eq!(cascade.expenses, 3);
    assert!(l.purchases.is_empty());
    assert_eq!(l.expenses.len(), 1);
    assert!(l.card_by_name("visa").is_none());
}

#[test]
fn updating_purchase_keeps_paid_installments() {
    let mut l = Ledger::new();
    let card = l
        .add_card(NewCard {
            name: "Visa".into(),
            credit_limit: d("1000"),
            closing_day: 5,
            due_day: 15,
        })
        .unwrap();
    let p = l
        .add_card_purchase(NewCardPurchase {
            card_id: card,
            description: "TV".into(),
            amount: d("300"),
            category: "Home".into(),
            installment_count: 3,
            purchase_date: date(2025, 3, 20),
        })
        .unwrap();
    let ids = expand_card_purchase(&mut l, p).unwrap();
    l.expenses.iter_mut().find(|e| e.id == ids[0]).unwrap().paid = true;

    let dropped = l
        .update_card_purchase(
            p,
            NewCardPurchase {
                card_id: card,
                description: "TV".into(),
                amount: d("400"),
                category: "Home".into(),
                installment_count: 4,
                purchase_date: date(2025, 3, 20),
            },
        )
        .unwrap();

    assert_eq!(dropped, 2);
    assert_eq!(l.expenses.len(), 1);
    assert!(l.expenses[0].paid);
}
