// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::expansion::{installment_date, installment_description};
use crate::ledger::Ledger;
use crate::models::{Installment, RecurrenceKind};
use crate::utils::{clamped_date, month_key, same_month, shift_month_start};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

pub const FORECAST_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSource {
    /// An unpaid expense already in the ledger.
    Expense,
    /// A recurring charge that has no expense for that month yet.
    Recurring,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastItem {
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub source: ForecastSource,
    pub source_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthForecast {
    pub month: String,
    pub total: Decimal,
    pub installment_count: usize,
    pub items: Vec<ForecastItem>,
}

/// What `person` is expected to owe over the next [`FORECAST_MONTHS`] months,
/// starting with `today`'s month. Months with nothing due are omitted.
pub fn monthly_forecast_for_person(
    ledger: &Ledger,
    person: &str,
    today: NaiveDate,
) -> Vec<MonthForecast> {
    (0..FORECAST_MONTHS as i32)
        .map(|offset| shift_month_start(today, offset))
        .filter_map(|month| {
            let items = month_items(ledger, person, month);
            let total: Decimal = items.iter().map(|i| i.amount).sum();
            (total > Decimal::ZERO).then(|| MonthForecast {
                month: month_key(month),
                total,
                installment_count: items.len(),
                items,
            })
        })
        .collect()
}

fn month_items(ledger: &Ledger, person: &str, month: NaiveDate) -> Vec<ForecastItem> {
    let mut items: Vec<ForecastItem> = ledger
        .expenses
        .iter()
        .filter(|e| !e.paid && e.payer.is_person(person) && same_month(e.due_date, month))
        .map(|e| ForecastItem {
            description: e.description.clone(),
            amount: e.amount,
            due_date: e.due_date,
            source: ForecastSource::Expense,
            source_id: e.id,
        })
        .collect();

    let obligations = ledger
        .recurring
        .iter()
        .filter(|r| r.active && r.payer.is_person(person));
    for ob in obligations {
        let materialised = |index: Option<u32>, due: NaiveDate| {
            ledger.expenses.iter().any(|e| {
                e.recurring_id == Some(ob.id)
                    && match index {
                        Some(i) => e.installment_index() == Some(i),
                        None => same_month(e.due_date, due),
                    }
            })
        };
        match ob.kind {
            RecurrenceKind::Installment => {
                let count = ob.installment_count.unwrap_or(0);
                for installment in
                    (ob.installments_paid + 1..=count).filter_map(|i| Installment::new(i, count))
                {
                    let due = installment_date(ob.start_date, installment.index);
                    if same_month(due, month) && !materialised(Some(installment.index), due) {
                        items.push(ForecastItem {
                            description: installment_description(&ob.description, installment),
                            amount: ob.amount,
                            due_date: due,
                            source: ForecastSource::Recurring,
                            source_id: ob.id,
                        });
                    }
                }
            }
            RecurrenceKind::Fixed => {
                if month_key(month) < month_key(ob.start_date) {
                    continue;
                }
                let due = clamped_date(month.year(), month.month(), ob.start_date.day());
                if !materialised(None, due) {
                    items.push(ForecastItem {
                        description: ob.description.clone(),
                        amount: ob.amount,
                        due_date: due,
                        source: ForecastSource::Recurring,
                        source_id: ob.id,
                    });
                }
            }
        }
    }
    items.sort_by_key(|i| (i.due_date, i.source_id));
    items
}
