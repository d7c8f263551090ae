// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::commands::DEFAULT_CATEGORY;
use crate::error::{LedgerError, RecordKind};
use crate::ledger::Ledger;
use crate::models::{Expense, NewExpense, Payer};
use crate::utils::{
    arg_date, arg_decimal, arg_month, arg_text, fmt_money, maybe_print_json, month_key,
    parse_decimal, parse_id, pretty_table,
};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle(book: &mut Book, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(book, today, sub)?,
        Some(("list", sub)) => list(book.ledger(), sub)?,
        Some(("edit", sub)) => edit(book, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            book.delete_expense(id)?;
            println!("Deleted expense #{}", id);
        }
        Some(("pay", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            book.mark_self_expense_paid(id, today)?;
            println!("Expense #{} marked paid on {}", id, today);
        }
        _ => {}
    }
    Ok(())
}

/// Reads the `add` arguments; omitted optional fields get their defaults.
pub fn new_expense_from_args(sub: &clap::ArgMatches, today: NaiveDate) -> Result<NewExpense> {
    Ok(NewExpense {
        description: sub.get_one::<String>("desc").unwrap().trim().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        category: arg_text(sub, "category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        payer: Payer::parse(&arg_text(sub, "payer").unwrap_or_default()),
        due_date: arg_date(sub, "due")?.unwrap_or(today),
    })
}

fn add(book: &mut Book, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let new = new_expense_from_args(sub, today)?;
    let payer = new.payer.clone();
    let id = book.add_expense(new)?;
    println!("Added expense #{} (payer: {})", id, payer);
    Ok(())
}

fn edit(book: &mut Book, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let current = book
        .ledger()
        .expense(id)
        .cloned()
        .ok_or_else(|| LedgerError::not_found(RecordKind::Expense, id))?;
    let new = NewExpense {
        description: arg_text(sub, "desc").unwrap_or(current.description),
        amount: arg_decimal(sub, "amount")?.unwrap_or(current.amount),
        category: arg_text(sub, "category").unwrap_or(current.category),
        payer: arg_text(sub, "payer")
            .map(|p| Payer::parse(&p))
            .unwrap_or(current.payer),
        due_date: arg_date(sub, "due")?.unwrap_or(current.due_date),
    };
    book.update_expense(id, new)?;
    println!("Updated expense #{}", id);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub due_date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub payer: String,
    pub paid: bool,
    pub paid_date: Option<String>,
    pub installment: Option<String>,
}

impl From<&Expense> for ExpenseRow {
    fn from(e: &Expense) -> Self {
        ExpenseRow {
            id: e.id,
            due_date: e.due_date.to_string(),
            description: e.description.clone(),
            amount: fmt_money(&e.amount),
            category: e.category.clone(),
            payer: e.payer.to_string(),
            paid: e.paid,
            paid_date: e.paid_date.map(|d| d.to_string()),
            installment: e.installment.map(|i| i.to_string()),
        }
    }
}

/// Expenses matching the `list` filters, ordered by due date.
pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let month = arg_month(sub, "month")?;
    let payer = arg_text(sub, "payer").map(|p| Payer::parse(&p));
    let pending_only = sub.get_flag("pending");
    let mut matched: Vec<&Expense> = ledger
        .expenses
        .iter()
        .filter(|e| month.as_deref().is_none_or(|m| month_key(e.due_date) == m))
        .filter(|e| payer.as_ref().is_none_or(|p| &e.payer == p))
        .filter(|e| !pending_only || e.is_pending())
        .collect();
    matched.sort_by_key(|e| (e.due_date, e.id));
    Ok(matched.into_iter().map(ExpenseRow::from).collect())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(ledger, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .into_iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.due_date,
                r.description,
                r.amount,
                r.category,
                r.payer,
                if r.paid { "paid".into() } else { "pending".into() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Due", "Description", "Amount", "Category", "Payer", "Status"],
            rows
        )
    );
    Ok(())
}
