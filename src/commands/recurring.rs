// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::commands::DEFAULT_CATEGORY;
use crate::error::{LedgerError, RecordKind};
use crate::models::{NewRecurring, Payer, RecurrenceKind, RecurringObligation};
use crate::utils::{
    arg_count, arg_date, arg_decimal, arg_text, fmt_money, maybe_print_json, parse_decimal,
    parse_id, parse_month, pretty_table,
};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle(book: &mut Book, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = new_recurring_from_args(sub, today)?;
            let (id, created) = book.add_recurring(new, today)?;
            println!("Added obligation #{} ({} expense(s) created)", id, created.len());
        }
        Some(("list", sub)) => list(book, sub)?,
        Some(("edit", sub)) => edit(book, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            book.delete_recurring(id)?;
            println!("Deleted obligation #{}; its expenses were kept", id);
        }
        Some(("toggle", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let active = book.toggle_recurring(id)?;
            println!(
                "Obligation #{} is now {}",
                id,
                if active { "active" } else { "inactive" }
            );
        }
        Some(("roll", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            match book.expand_fixed_for_month(id, &month)? {
                Some(expense) => println!("Created expense #{} for {}", expense, month),
                None => println!("Nothing to create for {}", month),
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_kind(s: &str) -> Result<RecurrenceKind> {
    RecurrenceKind::parse(s).ok_or_else(|| anyhow!("Unknown kind '{}' (use fixed|installment)", s))
}

pub fn new_recurring_from_args(sub: &clap::ArgMatches, today: NaiveDate) -> Result<NewRecurring> {
    Ok(NewRecurring {
        description: sub.get_one::<String>("desc").unwrap().trim().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        category: arg_text(sub, "category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        kind: parse_kind(sub.get_one::<String>("kind").unwrap())?,
        installment_count: arg_count(sub, "count")?,
        payer: Payer::parse(&arg_text(sub, "payer").unwrap_or_default()),
        start_date: arg_date(sub, "start")?.unwrap_or(today),
    })
}

fn edit(book: &mut Book, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let current = book
        .ledger()
        .recurring(id)
        .cloned()
        .ok_or_else(|| LedgerError::not_found(RecordKind::Recurring, id))?;
    let kind = match arg_text(sub, "kind") {
        Some(k) => parse_kind(&k)?,
        None => current.kind,
    };
    let installment_count = match kind {
        RecurrenceKind::Fixed => None,
        RecurrenceKind::Installment => arg_count(sub, "count")?.or(current.installment_count),
    };
    let new = NewRecurring {
        description: arg_text(sub, "desc").unwrap_or(current.description),
        amount: arg_decimal(sub, "amount")?.unwrap_or(current.amount),
        category: arg_text(sub, "category").unwrap_or(current.category),
        kind,
        installment_count,
        payer: arg_text(sub, "payer")
            .map(|p| Payer::parse(&p))
            .unwrap_or(current.payer),
        start_date: arg_date(sub, "start")?.unwrap_or(current.start_date),
    };
    book.update_recurring(id, new)?;
    println!("Updated obligation #{}", id);
    Ok(())
}

#[derive(Debug, Serialize)]
struct RecurringRow {
    id: i64,
    description: String,
    amount: String,
    kind: RecurrenceKind,
    progress: Option<String>,
    payer: String,
    start_date: String,
    active: bool,
}

impl From<&RecurringObligation> for RecurringRow {
    fn from(r: &RecurringObligation) -> Self {
        RecurringRow {
            id: r.id,
            description: r.description.clone(),
            amount: fmt_money(&r.amount),
            kind: r.kind,
            progress: r
                .installment_count
                .map(|n| format!("{}/{}", r.installments_paid, n)),
            payer: r.payer.to_string(),
            start_date: r.start_date.to_string(),
            active: r.active,
        }
    }
}

fn list(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<RecurringRow> = book.ledger().recurring.iter().map(RecurringRow::from).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .into_iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.description,
                r.amount,
                r.kind.to_string(),
                r.progress.unwrap_or_else(|| "-".into()),
                r.payer,
                r.start_date,
                if r.active { "yes".into() } else { "no".into() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Description", "Amount", "Kind", "Paid", "Payer", "Start", "Active"],
            rows
        )
    );
    Ok(())
}
