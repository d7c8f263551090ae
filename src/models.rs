// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved payer name for the household's own obligations.
pub const SELF_PAYER: &str = "self";

/// Who is liable for an expense: the household itself or a named person
/// who owes the money back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Payer {
    Myself,
    Person(String),
}

impl Payer {
    pub fn parse(s: &str) -> Payer {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(SELF_PAYER) {
            Payer::Myself
        } else {
            Payer::Person(s.to_string())
        }
    }

    pub fn is_self(&self) -> bool {
        matches!(self, Payer::Myself)
    }

    pub fn person(&self) -> Option<&str> {
        match self {
            Payer::Myself => None,
            Payer::Person(name) => Some(name),
        }
    }

    pub fn is_person(&self, name: &str) -> bool {
        self.person() == Some(name)
    }
}

impl From<String> for Payer {
    fn from(s: String) -> Self {
        Payer::parse(&s)
    }
}

impl From<Payer> for String {
    fn from(p: Payer) -> Self {
        p.to_string()
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payer::Myself => f.write_str(SELF_PAYER),
            Payer::Person(name) => f.write_str(name),
        }
    }
}

/// Position of a generated record inside its plan (`index` of `count`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub index: u32,
    pub count: u32,
}

impl Installment {
    pub fn new(index: u32, count: u32) -> Option<Installment> {
        (index >= 1 && index <= count).then_some(Installment { index, count })
    }
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub payer: Payer,
    pub due_date: NaiveDate,
    pub paid: bool,
    pub paid_date: Option<NaiveDate>,
    pub recurring_id: Option<i64>,
    pub installment: Option<Installment>,
    pub card_id: Option<i64>,
    pub purchase_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn installment_index(&self) -> Option<u32> {
        self.installment.map(|i| i.index)
    }

    pub fn is_pending(&self) -> bool {
        !self.paid
    }
}

/// Fields supplied when an expense is entered directly.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub payer: Payer,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeOrigin {
    Direct,
    PersonPayment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub origin: IncomeOrigin,
    pub source_person: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Fixed,
    Installment,
}

impl RecurrenceKind {
    pub fn parse(s: &str) -> Option<RecurrenceKind> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Some(RecurrenceKind::Fixed),
            "installment" | "installments" => Some(RecurrenceKind::Installment),
            _ => None,
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceKind::Fixed => f.write_str("fixed"),
            RecurrenceKind::Installment => f.write_str("installment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringObligation {
    pub id: i64,
    pub description: String,
    /// Per-installment amount for installment plans, monthly amount otherwise.
    pub amount: Decimal,
    pub category: String,
    pub kind: RecurrenceKind,
    pub installment_count: Option<u32>,
    pub installments_paid: u32,
    pub payer: Payer,
    pub start_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl RecurringObligation {
    pub fn is_installment(&self) -> bool {
        self.kind == RecurrenceKind::Installment
    }

    /// Installments still to be paid; `None` for fixed obligations.
    pub fn remaining(&self) -> Option<u32> {
        self.installment_count
            .map(|n| n.saturating_sub(self.installments_paid))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.installment_count, Some(n) if self.installments_paid >= n)
    }
}

#[derive(Debug, Clone)]
pub struct NewRecurring {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub kind: RecurrenceKind,
    pub installment_count: Option<u32>,
    pub payer: Payer,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub credit_limit: Decimal,
    pub closing_day: u32,
    pub due_day: u32,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub name: String,
    pub credit_limit: Decimal,
    pub closing_day: u32,
    pub due_day: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPurchase {
    pub id: i64,
    pub card_id: i64,
    pub description: String,
    /// Total purchase amount, split evenly across installments.
    pub amount: Decimal,
    pub category: String,
    pub installment_count: u32,
    pub installments_paid: u32,
    pub purchase_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl CardPurchase {
    pub fn is_lump_sum(&self) -> bool {
        self.installment_count == 1
    }
}

#[derive(Debug, Clone)]
pub struct NewCardPurchase {
    pub card_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub installment_count: u32,
    pub purchase_date: NaiveDate,
}
