// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns recurring obligations and card purchases into dated expenses.
//!
//! Every generator is idempotent: an installment that already exists in the
//! ledger (same description, due date, parent id and index) is skipped, so
//! running an expansion twice never duplicates records.

use crate::engine::statements::assign_statement_due_date;
use crate::error::{LedgerError, LedgerResult, RecordKind};
use crate::ledger::Ledger;
use crate::models::{
    Card, CardPurchase, Expense, Installment, Payer, RecurrenceKind, RecurringObligation,
};
use crate::utils::{add_months, clamped_date, month_key, month_start, round2, same_month};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

pub fn installment_description(description: &str, installment: Installment) -> String {
    format!("{} (installment {})", description, installment)
}

pub fn purchase_description(description: &str, installment: Installment) -> String {
    format!("{} ({})", description, installment)
}

/// Due date of installment `index` of a plan starting on `start`.
pub fn installment_date(start: NaiveDate, index: u32) -> NaiveDate {
    add_months(start, index as i32 - 1)
}

/// One installment of a card purchase, before it becomes an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedInstallment {
    pub installment: Installment,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}

pub fn installment_amount(purchase: &CardPurchase) -> Decimal {
    round2(purchase.amount / Decimal::from(purchase.installment_count.max(1)))
}

/// Pure schedule for a card purchase on `card`.
pub fn plan_card_installments(purchase: &CardPurchase, card: &Card) -> Vec<PlannedInstallment> {
    let count = purchase.installment_count;
    let amount = installment_amount(purchase);
    (1..=count)
        .filter_map(|i| Installment::new(i, count))
        .map(|installment| PlannedInstallment {
            installment,
            due_date: assign_statement_due_date(card, purchase.purchase_date, installment.index),
            amount,
        })
        .collect()
}

/// Materialises the expenses a recurring obligation implies right now.
///
/// * fixed, owned by the household: one expense on the start date, only when
///   the start date is in `today`'s month;
/// * fixed, owned by someone else: one expense on the start date;
/// * installment plans (any payer): every installment not yet settled.
///
/// Returns the ids of the expenses created.
pub fn expand_recurring(
    ledger: &mut Ledger,
    recurring_id: i64,
    today: NaiveDate,
) -> LedgerResult<Vec<i64>> {
    let ob = ledger
        .recurring(recurring_id)
        .cloned()
        .ok_or_else(|| LedgerError::not_found(RecordKind::Recurring, recurring_id))?;
    if !ob.active {
        debug!(recurring = ob.id, "inactive obligation, nothing to expand");
        return Ok(Vec::new());
    }

    let mut created = Vec::new();
    match ob.kind {
        RecurrenceKind::Fixed => {
            if ob.payer.is_self() && !same_month(ob.start_date, today) {
                debug!(
                    recurring = ob.id,
                    start = %ob.start_date,
                    "household fixed obligation outside current month"
                );
                return Ok(created);
            }
            if let Some(id) = push_occurrence(ledger, &ob, ob.start_date) {
                created.push(id);
            }
        }
        RecurrenceKind::Installment => {
            let count = ob.installment_count.unwrap_or(0);
            let pending = (ob.installments_paid + 1..=count).filter_map(|i| Installment::new(i, count));
            for installment in pending {
                let due = installment_date(ob.start_date, installment.index);
                let description = installment_description(&ob.description, installment);
                let exists = ledger.expenses.iter().any(|e| {
                    e.recurring_id == Some(ob.id)
                        && e.installment_index() == Some(installment.index)
                        && e.due_date == due
                        && e.description == description
                });
                if exists {
                    continue;
                }
                let id = ledger.next_id();
                ledger.expenses.push(Expense {
                    id,
                    description,
                    amount: ob.amount,
                    category: ob.category.clone(),
                    payer: ob.payer.clone(),
                    due_date: due,
                    paid: false,
                    paid_date: None,
                    recurring_id: Some(ob.id),
                    installment: Some(installment),
                    card_id: None,
                    purchase_id: None,
                    created_at: Utc::now(),
                });
                created.push(id);
            }
        }
    }
    debug!(recurring = ob.id, created = created.len(), "expanded recurring obligation");
    Ok(created)
}

/// Rolls an active fixed obligation forward into `month` (`YYYY-MM`).
///
/// The occurrence falls on the start day, clamped to the month's length.
/// Returns `None` when the occurrence already exists.
pub fn expand_fixed_for_month(
    ledger: &mut Ledger,
    recurring_id: i64,
    month: &str,
) -> LedgerResult<Option<i64>> {
    let ob = ledger
        .recurring(recurring_id)
        .cloned()
        .ok_or_else(|| LedgerError::not_found(RecordKind::Recurring, recurring_id))?;
    if ob.kind != RecurrenceKind::Fixed {
        return Err(LedgerError::invalid(format!(
            "'{}' is an installment plan; its installments are generated up front",
            ob.description
        )));
    }
    if !ob.active {
        return Err(LedgerError::invalid(format!("'{}' is inactive", ob.description)));
    }
    let first = month_start(month).map_err(|e| LedgerError::invalid(e.to_string()))?;
    if month_key(first) < month_key(ob.start_date) {
        return Err(LedgerError::invalid(format!(
            "'{}' only starts in {}",
            ob.description,
            month_key(ob.start_date)
        )));
    }
    let due = clamped_date(first.year(), first.month(), ob.start_date.day());
    Ok(push_occurrence(ledger, &ob, due))
}

fn push_occurrence(ledger: &mut Ledger, ob: &RecurringObligation, due: NaiveDate) -> Option<i64> {
    let exists = ledger.expenses.iter().any(|e| {
        e.recurring_id == Some(ob.id) && e.due_date == due && e.description == ob.description
    });
    if exists {
        return None;
    }
    let id = ledger.next_id();
    ledger.expenses.push(Expense {
        id,
        description: ob.description.clone(),
        amount: ob.amount,
        category: ob.category.clone(),
        payer: ob.payer.clone(),
        due_date: due,
        paid: false,
        paid_date: None,
        recurring_id: Some(ob.id),
        installment: None,
        card_id: None,
        purchase_id: None,
        created_at: Utc::now(),
    });
    Some(id)
}

/// Generates one expense per installment of a card purchase.
///
/// A purchase whose card no longer exists is left as is: the purchase record
/// is kept and nothing is generated.
pub fn expand_card_purchase(ledger: &mut Ledger, purchase_id: i64) -> LedgerResult<Vec<i64>> {
    let purchase = ledger
        .purchase(purchase_id)
        .cloned()
        .ok_or_else(|| LedgerError::not_found(RecordKind::Purchase, purchase_id))?;
    let Some(card) = ledger.card(purchase.card_id).cloned() else {
        warn!(
            purchase = purchase.id,
            card = purchase.card_id,
            "card not found, purchase not expanded"
        );
        return Ok(Vec::new());
    };

    let mut created = Vec::new();
    let pending = plan_card_installments(&purchase, &card)
        .into_iter()
        .filter(|p| p.installment.index > purchase.installments_paid);
    for planned in pending {
        let description = purchase_description(&purchase.description, planned.installment);
        let exists = ledger.expenses.iter().any(|e| {
            e.purchase_id == Some(purchase.id)
                && e.due_date == planned.due_date
                && e.description == description
        });
        if exists {
            continue;
        }
        let id = ledger.next_id();
        ledger.expenses.push(Expense {
            id,
            description,
            amount: planned.amount,
            category: purchase.category.clone(),
            payer: Payer::Myself,
            due_date: planned.due_date,
            paid: false,
            paid_date: None,
            recurring_id: None,
            installment: Some(planned.installment),
            card_id: Some(card.id),
            purchase_id: Some(purchase.id),
            created_at: Utc::now(),
        });
        created.push(id);
    }
    debug!(purchase = purchase.id, created = created.len(), "expanded card purchase");
    Ok(created)
}
