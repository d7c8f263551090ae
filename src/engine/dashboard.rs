// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only figures for the monthly dashboard and its charts.

use crate::ledger::Ledger;
use crate::models::RecurrenceKind;
use crate::utils::{month_key, shift_month_start};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub income: Decimal,
    /// Household expenses already paid this month.
    pub paid: Decimal,
    /// `income - paid`.
    pub balance: Decimal,
    /// Household expenses still open this month.
    pub pending: Decimal,
    /// Open expenses other people owe for this month.
    pub receivable: Decimal,
    /// How much is missing to cover `pending` even after collecting
    /// everything receivable; `None` when the month closes.
    pub shortfall: Option<Decimal>,
}

pub fn month_summary(ledger: &Ledger, month: &str) -> MonthSummary {
    let in_month = |d: NaiveDate| month_key(d) == month;
    let income: Decimal = ledger
        .incomes
        .iter()
        .filter(|i| in_month(i.date))
        .map(|i| i.amount)
        .sum();
    let mut paid = Decimal::ZERO;
    let mut pending = Decimal::ZERO;
    let mut receivable = Decimal::ZERO;
    for e in ledger.expenses.iter().filter(|e| in_month(e.due_date)) {
        match (e.payer.is_self(), e.paid) {
            (true, true) => paid += e.amount,
            (true, false) => pending += e.amount,
            (false, false) => receivable += e.amount,
            (false, true) => {}
        }
    }
    let balance = income - paid;
    let available = balance + receivable;
    let shortfall = (pending > Decimal::ZERO && available < pending).then(|| pending - available);
    MonthSummary {
        month: month.to_string(),
        income,
        paid,
        balance,
        pending,
        receivable,
        shortfall,
    }
}

/// Everything other people still owe, regardless of month.
pub fn receivable_total(ledger: &Ledger) -> Decimal {
    ledger
        .expenses
        .iter()
        .filter(|e| !e.paid && !e.payer.is_self())
        .map(|e| e.amount)
        .sum()
}

/// Paid expenses per category, largest first.
pub fn spending_by_category(ledger: &Ledger, month: Option<&str>) -> Vec<(String, Decimal)> {
    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in ledger
        .expenses
        .iter()
        .filter(|e| e.paid && month.is_none_or(|m| month_key(e.due_date) == m))
    {
        *agg.entry(e.category.clone()).or_insert(Decimal::ZERO) += e.amount;
    }
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPoint {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// Income against paid expenses for the `months` months ending with
/// `today`'s month, oldest first.
pub fn monthly_evolution(ledger: &Ledger, today: NaiveDate, months: u32) -> Vec<MonthPoint> {
    (0..months as i32)
        .rev()
        .map(|back| month_key(shift_month_start(today, -back)))
        .map(|month| {
            let income: Decimal = ledger
                .incomes
                .iter()
                .filter(|i| month_key(i.date) == month)
                .map(|i| i.amount)
                .sum();
            let expenses: Decimal = ledger
                .expenses
                .iter()
                .filter(|e| e.paid && month_key(e.due_date) == month)
                .map(|e| e.amount)
                .sum();
            MonthPoint {
                month,
                income,
                expenses,
                balance: income - expenses,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringStats {
    pub active: usize,
    pub monthly_fixed: Decimal,
    pub next_three_months: Decimal,
}

pub fn recurring_stats(ledger: &Ledger) -> RecurringStats {
    let active: Vec<_> = ledger.recurring.iter().filter(|r| r.active).collect();
    let monthly_fixed: Decimal = active
        .iter()
        .filter(|r| r.kind == RecurrenceKind::Fixed)
        .map(|r| r.amount)
        .sum();
    let next_three_months = active
        .iter()
        .map(|r| match r.kind {
            RecurrenceKind::Fixed => r.amount * Decimal::from(3),
            RecurrenceKind::Installment => {
                r.amount * Decimal::from(r.remaining().unwrap_or(0).min(3))
            }
        })
        .sum();
    RecurringStats {
        active: active.len(),
        monthly_fixed,
        next_three_months,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonSummary {
    pub name: String,
    pub pending: Decimal,
    pub pending_count: usize,
    pub received: Decimal,
}

pub fn person_summaries(ledger: &Ledger) -> Vec<PersonSummary> {
    ledger
        .people
        .iter()
        .map(|name| {
            let open: Vec<_> = ledger
                .expenses
                .iter()
                .filter(|e| !e.paid && e.payer.is_person(name))
                .collect();
            PersonSummary {
                name: name.clone(),
                pending: open.iter().map(|e| e.amount).sum(),
                pending_count: open.len(),
                received: ledger
                    .incomes
                    .iter()
                    .filter(|i| i.source_person.as_deref() == Some(name.as_str()))
                    .map(|i| i.amount)
                    .sum(),
            }
        })
        .collect()
}
