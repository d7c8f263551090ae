// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! A ledger bound to its storage.
//!
//! Every mutating operation runs against the in-memory [`Ledger`] first and
//! then writes back each collection it touched. Storage failures are logged
//! and answered with a local snapshot; they never fail the operation.

use crate::engine::settlement::{self, InstallmentSettlement, MonthSettlement, PartialSettlement};
use crate::engine::expansion;
use crate::error::{LedgerError, LedgerResult, RecordKind};
use crate::ledger::{Cascade, Ledger};
use crate::models::{NewCard, NewCardPurchase, NewExpense, NewRecurring};
use crate::snapshot::SnapshotStore;
use crate::store::{Collection, RecordStore, SqliteStore};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::store::Collection::{Cards, Expenses, Incomes, People, Purchases, Recurring};

pub struct Book {
    ledger: Ledger,
    store: Box<dyn RecordStore>,
    snapshot: Option<SnapshotStore>,
    owner_key: String,
}

impl Book {
    /// Loads all collections for `owner_key`. A collection the store cannot
    /// deliver is read from the snapshot instead, or starts empty.
    pub fn open(
        store: Box<dyn RecordStore>,
        snapshot: Option<SnapshotStore>,
        owner_key: &str,
    ) -> Result<Book> {
        let mut book = Book {
            ledger: Ledger::new(),
            store,
            snapshot,
            owner_key: owner_key.to_string(),
        };
        book.ledger.expenses = decode(book.fetch(Expenses)?, Expenses)?;
        book.ledger.incomes = decode(book.fetch(Incomes)?, Incomes)?;
        book.ledger.people = decode(book.fetch(People)?, People)?;
        book.ledger.recurring = decode(book.fetch(Recurring)?, Recurring)?;
        book.ledger.cards = decode(book.fetch(Cards)?, Cards)?;
        book.ledger.purchases = decode(book.fetch(Purchases)?, Purchases)?;
        debug!(
            owner = %book.owner_key,
            expenses = book.ledger.expenses.len(),
            incomes = book.ledger.incomes.len(),
            "book loaded"
        );
        Ok(book)
    }

    /// Throwaway book on an in-memory SQLite store.
    pub fn open_in_memory() -> Result<Book> {
        Book::open(Box::new(SqliteStore::open_in_memory()?), None, "local")
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn owner_key(&self) -> &str {
        &self.owner_key
    }

    fn fetch(&self, collection: Collection) -> Result<Vec<Value>> {
        match self.store.load_all(&self.owner_key, collection) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(%collection, error = %err, "store unavailable, reading snapshot");
                let Some(snapshot) = &self.snapshot else {
                    return Ok(Vec::new());
                };
                match snapshot.load(collection) {
                    Ok(records) => Ok(records.unwrap_or_default()),
                    Err(err) => {
                        warn!(%collection, error = %err, "snapshot unreadable, starting empty");
                        Ok(Vec::new())
                    }
                }
            }
        }
    }

    fn encode(&self, collection: Collection) -> serde_json::Result<Vec<Value>> {
        let l = &self.ledger;
        match collection {
            Expenses => to_values(&l.expenses),
            Incomes => to_values(&l.incomes),
            People => to_values(&l.people),
            Recurring => to_values(&l.recurring),
            Cards => to_values(&l.cards),
            Purchases => to_values(&l.purchases),
        }
    }

    fn persist(&self, touched: &[Collection]) {
        for &collection in touched {
            let records = match self.encode(collection) {
                Ok(records) => records,
                Err(err) => {
                    warn!(%collection, error = %err, "could not serialise collection");
                    continue;
                }
            };
            let Err(err) = self.store.replace_all(&self.owner_key, collection, &records) else {
                continue;
            };
            warn!(%collection, error = %err, "save failed, writing local snapshot");
            if let Some(snapshot) = &self.snapshot {
                if let Err(err) = snapshot.save(collection, &records) {
                    warn!(%collection, error = %err, "snapshot write failed");
                }
            }
        }
    }

    /// Runs `op` on the ledger and saves `touched` when it succeeds.
    fn apply<T>(
        &mut self,
        touched: &[Collection],
        op: impl FnOnce(&mut Ledger) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let out = op(&mut self.ledger)?;
        self.persist(touched);
        Ok(out)
    }

    // expenses

    pub fn add_expense(&mut self, new: NewExpense) -> LedgerResult<i64> {
        let id = self.apply(&[Expenses, People], |l| l.add_expense(new))?;
        info!(expense = id, "expense added");
        Ok(id)
    }

    pub fn update_expense(&mut self, id: i64, new: NewExpense) -> LedgerResult<()> {
        self.apply(&[Expenses, People], |l| l.update_expense(id, new))
    }

    pub fn delete_expense(&mut self, id: i64) -> LedgerResult<()> {
        self.apply(&[Expenses], |l| l.delete_expense(id).map(|_| ()))
    }

    // incomes

    pub fn add_income(
        &mut self,
        description: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> LedgerResult<i64> {
        self.apply(&[Incomes], |l| l.add_income(description, amount, date))
    }

    pub fn update_income(
        &mut self,
        id: i64,
        description: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> LedgerResult<()> {
        self.apply(&[Incomes], |l| l.update_income(id, description, amount, date))
    }

    pub fn delete_income(&mut self, id: i64) -> LedgerResult<()> {
        self.apply(&[Incomes], |l| l.delete_income(id).map(|_| ()))
    }

    // people

    pub fn add_person(&mut self, name: &str) -> LedgerResult<()> {
        self.apply(&[People], |l| l.add_person(name))
    }

    pub fn rename_person(&mut self, from: &str, to: &str) -> LedgerResult<()> {
        self.apply(&[People, Expenses, Recurring, Incomes], |l| {
            l.rename_person(from, to)
        })
    }

    pub fn delete_person(&mut self, name: &str) -> LedgerResult<usize> {
        let moved = self.apply(&[People, Expenses, Recurring], |l| l.delete_person(name))?;
        info!(person = name, reassigned = moved, "person deleted");
        Ok(moved)
    }

    // recurring obligations

    /// Creates the obligation and materialises what it implies today.
    pub fn add_recurring(
        &mut self,
        new: NewRecurring,
        today: NaiveDate,
    ) -> LedgerResult<(i64, Vec<i64>)> {
        self.apply(&[Recurring, Expenses, People], |l| {
            let id = l.add_recurring(new)?;
            let created = expansion::expand_recurring(l, id, today)?;
            Ok((id, created))
        })
    }

    pub fn update_recurring(&mut self, id: i64, new: NewRecurring) -> LedgerResult<()> {
        self.apply(&[Recurring, People], |l| l.update_recurring(id, new))
    }

    pub fn delete_recurring(&mut self, id: i64) -> LedgerResult<()> {
        self.apply(&[Recurring, Expenses], |l| l.delete_recurring(id).map(|_| ()))
    }

    pub fn toggle_recurring(&mut self, id: i64) -> LedgerResult<bool> {
        self.apply(&[Recurring], |l| l.toggle_recurring_active(id))
    }

    pub fn expand_fixed_for_month(&mut self, id: i64, month: &str) -> LedgerResult<Option<i64>> {
        self.apply(&[Expenses], |l| expansion::expand_fixed_for_month(l, id, month))
    }

    // cards

    pub fn add_card(&mut self, new: NewCard) -> LedgerResult<i64> {
        self.apply(&[Cards], |l| l.add_card(new))
    }

    pub fn update_card(&mut self, id: i64, new: NewCard) -> LedgerResult<()> {
        self.apply(&[Cards], |l| l.update_card(id, new))
    }

    pub fn delete_card(&mut self, id: i64) -> LedgerResult<Cascade> {
        let cascade = self.apply(&[Cards, Purchases, Expenses], |l| l.delete_card(id))?;
        info!(
            card = id,
            purchases = cascade.purchases,
            expenses = cascade.expenses,
            "card deleted"
        );
        Ok(cascade)
    }

    // card purchases

    /// Records a purchase and generates its installments.
    pub fn add_card_purchase(&mut self, new: NewCardPurchase) -> LedgerResult<(i64, Vec<i64>)> {
        self.apply(&[Purchases, Expenses], |l| {
            require_card(l, new.card_id)?;
            let id = l.add_card_purchase(new)?;
            let created = expansion::expand_card_purchase(l, id)?;
            Ok((id, created))
        })
    }

    /// Returns how many unpaid installments were dropped and the ids of the
    /// regenerated ones.
    pub fn update_card_purchase(
        &mut self,
        id: i64,
        new: NewCardPurchase,
    ) -> LedgerResult<(usize, Vec<i64>)> {
        self.apply(&[Purchases, Expenses], |l| {
            require_card(l, new.card_id)?;
            let dropped = l.update_card_purchase(id, new)?;
            let created = expansion::expand_card_purchase(l, id)?;
            Ok((dropped, created))
        })
    }

    pub fn delete_card_purchase(&mut self, id: i64) -> LedgerResult<Cascade> {
        self.apply(&[Purchases, Expenses], |l| l.delete_card_purchase(id))
    }

    // settlement

    pub fn settle_partial(
        &mut self,
        expense_id: i64,
        amount: Decimal,
        today: NaiveDate,
    ) -> LedgerResult<PartialSettlement> {
        self.apply(&[Expenses, Incomes, Recurring], |l| {
            settlement::settle_partial(l, expense_id, amount, today)
        })
    }

    pub fn settle_recurring_installment(
        &mut self,
        recurring_id: i64,
        today: NaiveDate,
    ) -> LedgerResult<InstallmentSettlement> {
        self.apply(&[Recurring, Expenses, Incomes], |l| {
            settlement::settle_recurring_installment(l, recurring_id, today)
        })
    }

    pub fn settle_month_for_person(
        &mut self,
        person: &str,
        month: &str,
        today: NaiveDate,
    ) -> LedgerResult<MonthSettlement> {
        self.apply(&[Expenses, Incomes, Recurring], |l| {
            settlement::settle_month_for_person(l, person, month, today)
        })
    }

    pub fn mark_self_expense_paid(&mut self, expense_id: i64, today: NaiveDate) -> LedgerResult<()> {
        self.apply(&[Expenses, Recurring, Purchases], |l| {
            settlement::mark_self_expense_paid(l, expense_id, today)
        })
    }
}

fn require_card(ledger: &Ledger, card_id: i64) -> LedgerResult<()> {
    match ledger.card(card_id) {
        Some(_) => Ok(()),
        None => Err(LedgerError::not_found(RecordKind::Card, card_id)),
    }
}

fn to_values<T: Serialize>(items: &[T]) -> serde_json::Result<Vec<Value>> {
    items.iter().map(serde_json::to_value).collect()
}

fn decode<T: DeserializeOwned>(records: Vec<Value>, collection: Collection) -> Result<Vec<T>> {
    records
        .into_iter()
        .enumerate()
        .map(|(pos, v)| {
            serde_json::from_value(v)
                .with_context(|| format!("Invalid {} record at position {}", collection, pos))
        })
        .collect()
}
