// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Payments against expenses.
//!
//! Settling a debt owed by someone else records the receipt as income and
//! keeps the parent plan's progress counter in step with the individual
//! expenses. Every entry point validates first and only then mutates, so an
//! `Err` leaves the ledger as it was.

use crate::error::{ensure_positive, LedgerError, LedgerResult, RecordKind};
use crate::ledger::Ledger;
use crate::models::{Expense, IncomeOrigin, Installment, Payer, RecurrenceKind};
use crate::utils::{month_key, round2};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialSettlement {
    pub expense_id: i64,
    pub income_id: i64,
    pub received: Decimal,
    /// Amount still owed; zero once the expense is paid.
    pub remaining: Decimal,
    pub fully_paid: bool,
    /// Obligation whose counter moved forward, if any.
    pub advanced_recurring: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentSettlement {
    pub recurring_id: i64,
    pub installment: Installment,
    pub expense_id: Option<i64>,
    pub income_id: Option<i64>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MonthSettlement {
    NothingPending,
    Settled {
        income_id: i64,
        total: Decimal,
        expense_ids: Vec<i64>,
        advanced_recurring: Vec<i64>,
    },
}

/// Moves the parent obligation's counter when `expense` is exactly the next
/// installment it expects. Out-of-order payments leave the counter alone.
fn advance_recurring(ledger: &mut Ledger, expense: &Expense) -> Option<i64> {
    let recurring_id = expense.recurring_id?;
    let index = expense.installment_index()?;
    let ob = ledger.recurring.iter_mut().find(|r| r.id == recurring_id)?;
    if ob.kind != RecurrenceKind::Installment || index != ob.installments_paid + 1 {
        debug!(
            recurring = recurring_id,
            index,
            paid = ob.installments_paid,
            "installment not next in sequence, counter unchanged"
        );
        return None;
    }
    ob.installments_paid += 1;
    if ob.is_exhausted() {
        ob.active = false;
        info!(recurring = recurring_id, "all installments paid, obligation closed");
    }
    Some(recurring_id)
}

/// Same sequencing rule for the card purchase an installment came from.
fn advance_purchase(ledger: &mut Ledger, expense: &Expense) {
    let (Some(purchase_id), Some(index)) = (expense.purchase_id, expense.installment_index())
    else {
        return;
    };
    if let Some(p) = ledger.purchases.iter_mut().find(|p| p.id == purchase_id) {
        if index == p.installments_paid + 1 {
            p.installments_paid += 1;
            if p.installments_paid >= p.installment_count {
                p.active = false;
                info!(purchase = purchase_id, "all installments paid, purchase closed");
            }
        }
    }
}

fn pending_expense(ledger: &Ledger, expense_id: i64) -> LedgerResult<&Expense> {
    let e = ledger
        .expense(expense_id)
        .ok_or_else(|| LedgerError::not_found(RecordKind::Expense, expense_id))?;
    if e.paid {
        return Err(LedgerError::invalid(format!(
            "'{}' is already settled",
            e.description
        )));
    }
    Ok(e)
}

/// Records a (possibly partial) payment received from the person who owes
/// `expense_id`.
///
/// Paying more than is owed settles the expense; the surplus is still
/// recorded as received.
pub fn settle_partial(
    ledger: &mut Ledger,
    expense_id: i64,
    amount_paid: Decimal,
    today: NaiveDate,
) -> LedgerResult<PartialSettlement> {
    let expense = pending_expense(ledger, expense_id)?.clone();
    let Payer::Person(person) = expense.payer.clone() else {
        return Err(LedgerError::invalid(
            "Cannot receive a payment from the household itself",
        ));
    };
    let received = ensure_positive(round2(amount_paid))?;

    let income_id = ledger.record_income(
        format!("payment from {} - {}", person, expense.description),
        received,
        today,
        IncomeOrigin::PersonPayment,
        Some(person.clone()),
    );
    let advanced_recurring = advance_recurring(ledger, &expense);

    let remaining = round2(expense.amount - received);
    let e = ledger.expense_mut(expense_id)?;
    let fully_paid = remaining <= Decimal::ZERO;
    if fully_paid {
        e.paid = true;
        e.paid_date = Some(today);
    } else {
        e.amount = remaining;
    }
    info!(
        expense = expense_id,
        person = %person,
        %received,
        %remaining,
        "payment received"
    );
    Ok(PartialSettlement {
        expense_id,
        income_id,
        received,
        remaining: remaining.max(Decimal::ZERO),
        fully_paid,
        advanced_recurring,
    })
}

/// Pays the next installment of an installment plan.
pub fn settle_recurring_installment(
    ledger: &mut Ledger,
    recurring_id: i64,
    today: NaiveDate,
) -> LedgerResult<InstallmentSettlement> {
    let ob = ledger
        .recurring(recurring_id)
        .cloned()
        .ok_or_else(|| LedgerError::not_found(RecordKind::Recurring, recurring_id))?;
    let count = match (ob.kind, ob.installment_count) {
        (RecurrenceKind::Installment, Some(n)) => n,
        _ => {
            return Err(LedgerError::invalid(format!(
                "'{}' is not an installment plan",
                ob.description
            )))
        }
    };
    let next = ob.installments_paid + 1;
    let Some(installment) = Installment::new(next, count) else {
        return Err(LedgerError::invalid(format!(
            "All {} installments of '{}' are already paid",
            count, ob.description
        )));
    };

    let sibling = ledger
        .expenses
        .iter()
        .find(|e| e.recurring_id == Some(recurring_id) && e.installment_index() == Some(next))
        .map(|e| (e.id, e.paid, e.amount));

    let r = ledger.recurring_mut(recurring_id)?;
    r.installments_paid = next;
    let completed = r.is_exhausted();
    if completed {
        r.active = false;
    }

    let mut outstanding = ob.amount;
    let mut already_paid = false;
    if let Some((id, paid, amount)) = sibling {
        already_paid = paid;
        outstanding = amount;
        let e = ledger.expense_mut(id)?;
        if !e.paid {
            e.paid = true;
            e.paid_date = Some(today);
        }
    }

    let income_id = match ob.payer.person() {
        Some(person) if !already_paid => Some(ledger.record_income(
            format!(
                "payment from {} - {} (installment {})",
                person, ob.description, installment
            ),
            outstanding,
            today,
            IncomeOrigin::PersonPayment,
            Some(person.to_string()),
        )),
        _ => None,
    };
    info!(recurring = recurring_id, %installment, completed, "installment settled");
    Ok(InstallmentSettlement {
        recurring_id,
        installment,
        expense_id: sibling.map(|(id, _, _)| id),
        income_id,
        completed,
    })
}

/// Settles everything `person` owes for `month` (`YYYY-MM`) in one receipt.
pub fn settle_month_for_person(
    ledger: &mut Ledger,
    person: &str,
    month: &str,
    today: NaiveDate,
) -> LedgerResult<MonthSettlement> {
    if Payer::parse(person).is_self() {
        return Err(LedgerError::invalid(
            "Cannot receive a payment from the household itself",
        ));
    }
    let mut matched: Vec<Expense> = ledger
        .expenses
        .iter()
        .filter(|e| !e.paid && e.payer.is_person(person) && month_key(e.due_date) == month)
        .cloned()
        .collect();
    if matched.is_empty() {
        debug!(person, month, "nothing pending");
        return Ok(MonthSettlement::NothingPending);
    }
    // Earlier installments first so in-month sequences cascade.
    matched.sort_by_key(|e| (e.installment_index().unwrap_or(0), e.due_date, e.id));

    let total: Decimal = matched.iter().map(|e| e.amount).sum();
    let income_id = ledger.record_income(
        format!("payment in full from {} - {}", person, month),
        total,
        today,
        IncomeOrigin::PersonPayment,
        Some(person.to_string()),
    );

    let mut advanced_recurring = Vec::new();
    for expense in &matched {
        let e = ledger.expense_mut(expense.id)?;
        e.paid = true;
        e.paid_date = Some(today);
        if let Some(id) = advance_recurring(ledger, expense) {
            advanced_recurring.push(id);
        }
    }
    info!(person, month, %total, expenses = matched.len(), "month settled");
    Ok(MonthSettlement::Settled {
        income_id,
        total,
        expense_ids: matched.iter().map(|e| e.id).collect(),
        advanced_recurring,
    })
}

/// Marks one of the household's own expenses as paid. No income is recorded.
pub fn mark_self_expense_paid(
    ledger: &mut Ledger,
    expense_id: i64,
    today: NaiveDate,
) -> LedgerResult<()> {
    let expense = pending_expense(ledger, expense_id)?.clone();
    if !expense.payer.is_self() {
        return Err(LedgerError::invalid(format!(
            "'{}' is owed by {}; record their payment instead",
            expense.description, expense.payer
        )));
    }
    let e = ledger.expense_mut(expense_id)?;
    e.paid = true;
    e.paid_date = Some(today);
    advance_recurring(ledger, &expense);
    advance_purchase(ledger, &expense);
    info!(expense = expense_id, "expense marked paid");
    Ok(())
}
