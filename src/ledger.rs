// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory collections for every record kind.
//!
//! The ledger only knows how to insert, update, delete and find records and
//! how to keep references between them intact when something is removed.
//! Expansion, statements, settlement and projections live in [`crate::engine`]
//! and operate on a `&mut Ledger`.

use crate::error::{ensure_positive, LedgerError, LedgerResult, RecordKind};
use crate::models::{
    Card, CardPurchase, Expense, Income, IncomeOrigin, NewCard, NewCardPurchase, NewExpense,
    NewRecurring, Payer, RecurrenceKind, RecurringObligation, SELF_PAYER,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub people: Vec<String>,
    pub recurring: Vec<RecurringObligation>,
    pub cards: Vec<Card>,
    pub purchases: Vec<CardPurchase>,
    #[serde(skip)]
    last_id: i64,
}

/// What a cascading delete removed or rewrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cascade {
    pub purchases: usize,
    pub expenses: usize,
}

impl Ledger {
    pub fn new() -> Ledger {
        Ledger::default()
    }

    /// Allocates a fresh id, above every id already present in any collection.
    pub fn next_id(&mut self) -> i64 {
        let max_seen = self
            .expenses
            .iter()
            .map(|r| r.id)
            .chain(self.incomes.iter().map(|r| r.id))
            .chain(self.recurring.iter().map(|r| r.id))
            .chain(self.cards.iter().map(|r| r.id))
            .chain(self.purchases.iter().map(|r| r.id))
            .max()
            .unwrap_or(0);
        self.last_id = self.last_id.max(max_seen) + 1;
        self.last_id
    }

    // ----- expenses -------------------------------------------------------

    pub fn expense(&self, id: i64) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn expense_mut(&mut self, id: i64) -> LedgerResult<&mut Expense> {
        self.expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Expense, id))
    }

    pub fn add_expense(&mut self, new: NewExpense) -> LedgerResult<i64> {
        ensure_positive(new.amount)?;
        self.ensure_payer(&new.payer)?;
        let id = self.next_id();
        self.expenses.push(Expense {
            id,
            description: new.description,
            amount: new.amount,
            category: new.category,
            payer: new.payer,
            due_date: new.due_date,
            paid: false,
            paid_date: None,
            recurring_id: None,
            installment: None,
            card_id: None,
            purchase_id: None,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    /// Replaces the user-editable fields; payment state and links are kept.
    pub fn update_expense(&mut self, id: i64, new: NewExpense) -> LedgerResult<()> {
        ensure_positive(new.amount)?;
        self.ensure_payer(&new.payer)?;
        let e = self.expense_mut(id)?;
        e.description = new.description;
        e.amount = new.amount;
        e.category = new.category;
        e.payer = new.payer;
        e.due_date = new.due_date;
        Ok(())
    }

    pub fn delete_expense(&mut self, id: i64) -> LedgerResult<Expense> {
        let pos = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Expense, id))?;
        Ok(self.expenses.remove(pos))
    }

    // ----- incomes --------------------------------------------------------

    pub fn income(&self, id: i64) -> Option<&Income> {
        self.incomes.iter().find(|i| i.id == id)
    }

    pub fn add_income(
        &mut self,
        description: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> LedgerResult<i64> {
        ensure_positive(amount)?;
        Ok(self.record_income(description.to_string(), amount, date, IncomeOrigin::Direct, None))
    }

    pub(crate) fn record_income(
        &mut self,
        description: String,
        amount: Decimal,
        date: NaiveDate,
        origin: IncomeOrigin,
        source_person: Option<String>,
    ) -> i64 {
        let id = self.next_id();
        self.incomes.push(Income {
            id,
            description,
            amount,
            date,
            origin,
            source_person,
            created_at: Utc::now(),
        });
        id
    }

    pub fn update_income(
        &mut self,
        id: i64,
        description: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> LedgerResult<()> {
        ensure_positive(amount)?;
        let inc = self
            .incomes
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Income, id))?;
        inc.description = description.to_string();
        inc.amount = amount;
        inc.date = date;
        Ok(())
    }

    pub fn delete_income(&mut self, id: i64) -> LedgerResult<Income> {
        let pos = self
            .incomes
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Income, id))?;
        Ok(self.incomes.remove(pos))
    }

    // ----- people ---------------------------------------------------------

    pub fn has_person(&self, name: &str) -> bool {
        self.people.iter().any(|p| p == name)
    }

    pub fn add_person(&mut self, name: &str) -> LedgerResult<()> {
        let name = validate_person_name(name)?;
        if self.has_person(&name) {
            return Err(LedgerError::invalid(format!(
                "Person '{}' already exists",
                name
            )));
        }
        self.people.push(name);
        Ok(())
    }

    /// Registers the person behind `payer` the first time it is used.
    pub fn ensure_payer(&mut self, payer: &Payer) -> LedgerResult<()> {
        if let Some(name) = payer.person() {
            let name = validate_person_name(name)?;
            if !self.has_person(&name) {
                info!(person = %name, "registering person on first use");
                self.people.push(name);
            }
        }
        Ok(())
    }

    pub fn rename_person(&mut self, from: &str, to: &str) -> LedgerResult<()> {
        let to = validate_person_name(to)?;
        let pos = self
            .people
            .iter()
            .position(|p| p == from)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Person, from))?;
        if from != to && self.has_person(&to) {
            return Err(LedgerError::invalid(format!("Person '{}' already exists", to)));
        }
        self.people[pos] = to.clone();
        let new_payer = Payer::Person(to);
        for e in self.expenses.iter_mut().filter(|e| e.payer.is_person(from)) {
            e.payer = new_payer.clone();
        }
        for r in self.recurring.iter_mut().filter(|r| r.payer.is_person(from)) {
            r.payer = new_payer.clone();
        }
        for i in self
            .incomes
            .iter_mut()
            .filter(|i| i.source_person.as_deref() == Some(from))
        {
            i.source_person = new_payer.person().map(str::to_string);
        }
        Ok(())
    }

    /// Removes a person. Their expenses and recurring obligations are handed
    /// over to the household rather than forgiven; returns how many expenses
    /// were reassigned.
    pub fn delete_person(&mut self, name: &str) -> LedgerResult<usize> {
        let pos = self
            .people
            .iter()
            .position(|p| p == name)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Person, name))?;
        self.people.remove(pos);
        let mut moved = 0;
        for e in self.expenses.iter_mut().filter(|e| e.payer.is_person(name)) {
            e.payer = Payer::Myself;
            moved += 1;
        }
        for r in self.recurring.iter_mut().filter(|r| r.payer.is_person(name)) {
            r.payer = Payer::Myself;
        }
        Ok(moved)
    }

    // ----- recurring obligations ------------------------------------------

    pub fn recurring(&self, id: i64) -> Option<&RecurringObligation> {
        self.recurring.iter().find(|r| r.id == id)
    }

    pub fn recurring_mut(&mut self, id: i64) -> LedgerResult<&mut RecurringObligation> {
        self.recurring
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Recurring, id))
    }

    pub fn add_recurring(&mut self, new: NewRecurring) -> LedgerResult<i64> {
        let count = validate_recurring(&new)?;
        self.ensure_payer(&new.payer)?;
        let id = self.next_id();
        self.recurring.push(RecurringObligation {
            id,
            description: new.description,
            amount: new.amount,
            category: new.category,
            kind: new.kind,
            installment_count: count,
            installments_paid: 0,
            payer: new.payer,
            start_date: new.start_date,
            active: true,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    /// Edits an obligation while keeping its progress counter.
    pub fn update_recurring(&mut self, id: i64, new: NewRecurring) -> LedgerResult<()> {
        let count = validate_recurring(&new)?;
        self.ensure_payer(&new.payer)?;
        let r = self.recurring_mut(id)?;
        r.description = new.description;
        r.amount = new.amount;
        r.category = new.category;
        r.kind = new.kind;
        r.installment_count = count;
        r.payer = new.payer;
        r.start_date = new.start_date;
        if let Some(n) = count {
            r.installments_paid = r.installments_paid.min(n);
        }
        if r.is_exhausted() {
            r.active = false;
        }
        Ok(())
    }

    /// Removes the obligation. Expenses it generated stay in the ledger,
    /// detached from it.
    pub fn delete_recurring(&mut self, id: i64) -> LedgerResult<RecurringObligation> {
        let pos = self
            .recurring
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Recurring, id))?;
        for e in self.expenses.iter_mut().filter(|e| e.recurring_id == Some(id)) {
            e.recurring_id = None;
        }
        Ok(self.recurring.remove(pos))
    }

    /// Flips `active`; returns the new state.
    pub fn toggle_recurring_active(&mut self, id: i64) -> LedgerResult<bool> {
        let r = self.recurring_mut(id)?;
        if !r.active && r.is_exhausted() {
            return Err(LedgerError::invalid(format!(
                "'{}' has no installments left to activate",
                r.description
            )));
        }
        r.active = !r.active;
        Ok(r.active)
    }

    // ----- cards ----------------------------------------------------------

    pub fn card(&self, id: i64) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_by_name(&self, name: &str) -> Option<&Card> {
        let name = name.trim();
        self.cards.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn add_card(&mut self, new: NewCard) -> LedgerResult<i64> {
        validate_card(&new)?;
        let id = self.next_id();
        self.cards.push(Card {
            id,
            name: new.name,
            credit_limit: new.credit_limit,
            closing_day: new.closing_day,
            due_day: new.due_day,
            active: true,
        });
        Ok(id)
    }

    pub fn update_card(&mut self, id: i64, new: NewCard) -> LedgerResult<()> {
        validate_card(&new)?;
        let c = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Card, id))?;
        c.name = new.name;
        c.credit_limit = new.credit_limit;
        c.closing_day = new.closing_day;
        c.due_day = new.due_day;
        Ok(())
    }

    /// Deletes a card together with its purchases and their installments.
    pub fn delete_card(&mut self, id: i64) -> LedgerResult<Cascade> {
        let pos = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Card, id))?;
        self.cards.remove(pos);
        let purchase_ids: Vec<i64> = self
            .purchases
            .iter()
            .filter(|p| p.card_id == id)
            .map(|p| p.id)
            .collect();
        self.purchases.retain(|p| p.card_id != id);
        let before = self.expenses.len();
        self.expenses.retain(|e| {
            e.card_id != Some(id) && !e.purchase_id.is_some_and(|p| purchase_ids.contains(&p))
        });
        Ok(Cascade {
            purchases: purchase_ids.len(),
            expenses: before - self.expenses.len(),
        })
    }

    // ----- card purchases -------------------------------------------------

    pub fn purchase(&self, id: i64) -> Option<&CardPurchase> {
        self.purchases.iter().find(|p| p.id == id)
    }

    pub fn add_card_purchase(&mut self, new: NewCardPurchase) -> LedgerResult<i64> {
        validate_purchase(&new)?;
        let id = self.next_id();
        self.purchases.push(CardPurchase {
            id,
            card_id: new.card_id,
            description: new.description,
            amount: new.amount,
            category: new.category,
            installment_count: new.installment_count,
            installments_paid: 0,
            purchase_date: new.purchase_date,
            active: true,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    /// Rewrites a purchase and drops its unpaid installments so the caller
    /// can expand it again; paid installments are history and stay.
    pub fn update_card_purchase(&mut self, id: i64, new: NewCardPurchase) -> LedgerResult<usize> {
        validate_purchase(&new)?;
        let p = self
            .purchases
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Purchase, id))?;
        p.card_id = new.card_id;
        p.description = new.description;
        p.amount = new.amount;
        p.category = new.category;
        p.installment_count = new.installment_count;
        p.installments_paid = p.installments_paid.min(new.installment_count);
        p.active = p.installments_paid < p.installment_count;
        p.purchase_date = new.purchase_date;
        let before = self.expenses.len();
        self.expenses
            .retain(|e| !(e.purchase_id == Some(id) && !e.paid));
        Ok(before - self.expenses.len())
    }

    pub fn delete_card_purchase(&mut self, id: i64) -> LedgerResult<Cascade> {
        let pos = self
            .purchases
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::Purchase, id))?;
        self.purchases.remove(pos);
        let before = self.expenses.len();
        self.expenses.retain(|e| e.purchase_id != Some(id));
        Ok(Cascade {
            purchases: 1,
            expenses: before - self.expenses.len(),
        })
    }
}

fn validate_person_name(name: &str) -> LedgerResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::invalid("Person name cannot be empty"));
    }
    if name.eq_ignore_ascii_case(SELF_PAYER) {
        return Err(LedgerError::invalid(format!(
            "'{}' is reserved for the household",
            SELF_PAYER
        )));
    }
    Ok(name.to_string())
}

fn validate_recurring(new: &NewRecurring) -> LedgerResult<Option<u32>> {
    ensure_positive(new.amount)?;
    match new.kind {
        RecurrenceKind::Fixed => Ok(None),
        RecurrenceKind::Installment => match new.installment_count {
            Some(n) if n >= 1 => Ok(Some(n)),
            _ => Err(LedgerError::invalid(
                "Installment obligations need at least one installment",
            )),
        },
    }
}

fn validate_card(new: &NewCard) -> LedgerResult<()> {
    if new.name.trim().is_empty() {
        return Err(LedgerError::invalid("Card name cannot be empty"));
    }
    for (label, day) in [("closing", new.closing_day), ("due", new.due_day)] {
        if !(1..=31).contains(&day) {
            return Err(LedgerError::invalid(format!(
                "Card {} day must be between 1 and 31, got {}",
                label, day
            )));
        }
    }
    if new.credit_limit < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(new.credit_limit));
    }
    Ok(())
}

fn validate_purchase(new: &NewCardPurchase) -> LedgerResult<()> {
    ensure_positive(new.amount)?;
    if new.installment_count == 0 {
        return Err(LedgerError::invalid(
            "A card purchase needs at least one installment",
        ));
    }
    Ok(())
}
