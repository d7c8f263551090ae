// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Credit-card statement rules.
//!
//! A statement closes on the card's closing day; a purchase made after that
//! day rolls over to the following statement. Statement `N` is paid on the
//! card's due day of the month after it closes, and each further installment
//! of a purchase lands one statement later.

use crate::engine::expansion::{installment_amount, plan_card_installments};
use crate::error::{LedgerError, LedgerResult, RecordKind};
use crate::ledger::Ledger;
use crate::models::{Card, CardPurchase};
use crate::utils::{clamped_date, month_key, same_month, shift_month_start};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// Closing date of the statement `purchase_date` is billed on.
pub fn statement_closing_date(card: &Card, purchase_date: NaiveDate) -> NaiveDate {
    let closing_this_month = clamped_date(
        purchase_date.year(),
        purchase_date.month(),
        card.closing_day,
    );
    if purchase_date > closing_this_month {
        let next = shift_month_start(purchase_date, 1);
        clamped_date(next.year(), next.month(), card.closing_day)
    } else {
        closing_this_month
    }
}

/// Whether a purchase is still on a statement that has not closed as of
/// `reference`.
pub fn belongs_to_statement(card: &Card, purchase_date: NaiveDate, reference: NaiveDate) -> bool {
    reference <= statement_closing_date(card, purchase_date)
}

/// Whether a purchase is billed on the statement that closes in the month
/// of `month_date`.
pub fn closes_in_month(card: &Card, purchase_date: NaiveDate, month_date: NaiveDate) -> bool {
    same_month(statement_closing_date(card, purchase_date), month_date)
}

/// Due date of installment `index` (1-based) of a purchase.
///
/// The due day is clamped to the month's last day, so a card due on the 31st
/// is due on Feb 28/29.
pub fn assign_statement_due_date(card: &Card, purchase_date: NaiveDate, index: u32) -> NaiveDate {
    let closing = statement_closing_date(card, purchase_date);
    let month = shift_month_start(closing, index as i32);
    clamped_date(month.year(), month.month(), card.due_day)
}

fn active_purchases<'a>(ledger: &'a Ledger, card_id: i64) -> impl Iterator<Item = &'a CardPurchase> {
    ledger
        .purchases
        .iter()
        .filter(move |p| p.card_id == card_id && p.active)
}

fn card_or_err(ledger: &Ledger, card_id: i64) -> LedgerResult<&Card> {
    ledger
        .card(card_id)
        .ok_or_else(|| LedgerError::not_found(RecordKind::Card, card_id))
}

/// Amount of the statement currently open as of `today`.
///
/// Lump sums count while their statement has not closed yet; installment
/// purchases contribute each installment falling due in `today`'s month.
pub fn current_statement_total(
    ledger: &Ledger,
    card_id: i64,
    today: NaiveDate,
) -> LedgerResult<Decimal> {
    let card = card_or_err(ledger, card_id)?;
    let mut total = Decimal::ZERO;
    for p in active_purchases(ledger, card_id) {
        if p.is_lump_sum() {
            if belongs_to_statement(card, p.purchase_date, today) {
                total += p.amount;
            }
        } else {
            let amount = installment_amount(p);
            for planned in plan_card_installments(p, card) {
                if same_month(planned.due_date, today) {
                    total += amount;
                }
            }
        }
    }
    Ok(total)
}

/// Amount billed on the statement of `month_date`'s month.
///
/// Lump sums are counted in the month their statement closes, installments
/// in the month they fall due. Installment `i` is due `i` months after its
/// statement closes, so a lump sum shows up here one month before its
/// expense is due. A month's total therefore mixes the statement closing in
/// it with installments billed on earlier statements.
pub fn statement_month_total(card: &Card, ledger: &Ledger, month_date: NaiveDate) -> Decimal {
    let mut total = Decimal::ZERO;
    for p in active_purchases(ledger, card.id) {
        if p.is_lump_sum() {
            if closes_in_month(card, p.purchase_date, month_date) {
                total += p.amount;
            }
        } else {
            total += plan_card_installments(p, card)
                .iter()
                .filter(|planned| same_month(planned.due_date, month_date))
                .map(|planned| planned.amount)
                .sum::<Decimal>();
        }
    }
    total
}

pub fn next_statement_total(
    ledger: &Ledger,
    card_id: i64,
    today: NaiveDate,
) -> LedgerResult<Decimal> {
    let card = card_or_err(ledger, card_id)?;
    Ok(statement_month_total(card, ledger, shift_month_start(today, 1)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementForecast {
    pub month: String,
    pub total: Decimal,
}

/// Statement totals for `horizon` months starting with `today`'s month.
/// Months with nothing billed are left out.
pub fn forecast_statements(
    ledger: &Ledger,
    card_id: i64,
    today: NaiveDate,
    horizon: u32,
) -> LedgerResult<Vec<StatementForecast>> {
    let card = card_or_err(ledger, card_id)?;
    let out = (0..horizon as i32)
        .map(|offset| shift_month_start(today, offset))
        .filter_map(|month| {
            let total = statement_month_total(card, ledger, month);
            (total > Decimal::ZERO).then(|| StatementForecast {
                month: month_key(month),
                total,
            })
        })
        .collect();
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    pub card_id: i64,
    pub name: String,
    pub credit_limit: Decimal,
    pub committed: Decimal,
    pub available: Decimal,
    pub current_statement: Decimal,
    pub next_statement: Decimal,
    pub forecast: Vec<StatementForecast>,
}

/// Everything a card screen shows: limit usage and upcoming statements.
pub fn card_summary(ledger: &Ledger, card_id: i64, today: NaiveDate) -> LedgerResult<CardSummary> {
    let card = card_or_err(ledger, card_id)?;
    // Paid installments free up the limit again.
    let committed: Decimal = active_purchases(ledger, card_id)
        .map(|p| {
            let paid = installment_amount(p) * Decimal::from(p.installments_paid);
            (p.amount - paid).max(Decimal::ZERO)
        })
        .sum();
    Ok(CardSummary {
        card_id,
        name: card.name.clone(),
        credit_limit: card.credit_limit,
        committed,
        available: card.credit_limit - committed,
        current_statement: current_statement_total(ledger, card_id, today)?,
        next_statement: next_statement_total(ledger, card_id, today)?,
        forecast: forecast_statements(ledger, card_id, today, 6)?,
    })
}
