// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Record families that can be looked up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Expense,
    Income,
    Person,
    Recurring,
    Card,
    Purchase,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordKind::Expense => "expense",
            RecordKind::Income => "income",
            RecordKind::Person => "person",
            RecordKind::Recurring => "recurring obligation",
            RecordKind::Card => "card",
            RecordKind::Purchase => "card purchase",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: RecordKind, key: String },
    #[error("Invalid amount {0}: expected a positive value")]
    InvalidAmount(Decimal),
    #[error("{0}")]
    InvalidOperation(String),
}

impl LedgerError {
    pub fn not_found(kind: RecordKind, key: impl fmt::Display) -> Self {
        LedgerError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        LedgerError::InvalidOperation(msg.into())
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Rejects zero and negative amounts before anything is mutated.
pub fn ensure_positive(amount: Decimal) -> LedgerResult<Decimal> {
    if amount > Decimal::ZERO {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidAmount(amount))
    }
}
