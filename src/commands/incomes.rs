// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::error::{LedgerError, RecordKind};
use crate::ledger::Ledger;
use crate::models::{Income, IncomeOrigin};
use crate::utils::{
    arg_date, arg_decimal, arg_month, arg_text, fmt_money, maybe_print_json, month_key,
    parse_decimal, parse_id, pretty_table,
};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle(book: &mut Book, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let desc = sub.get_one::<String>("desc").unwrap().trim();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let date = arg_date(sub, "date")?.unwrap_or(today);
            let id = book.add_income(desc, amount, date)?;
            println!("Added income #{}", id);
        }
        Some(("list", sub)) => list(book.ledger(), sub)?,
        Some(("edit", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let current = book
                .ledger()
                .income(id)
                .cloned()
                .ok_or_else(|| LedgerError::not_found(RecordKind::Income, id))?;
            let desc = arg_text(sub, "desc").unwrap_or(current.description);
            let amount = arg_decimal(sub, "amount")?.unwrap_or(current.amount);
            let date = arg_date(sub, "date")?.unwrap_or(current.date);
            book.update_income(id, &desc, amount, date)?;
            println!("Updated income #{}", id);
        }
        Some(("rm", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            book.delete_income(id)?;
            println!("Deleted income #{}", id);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct IncomeRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub origin: IncomeOrigin,
    pub source_person: Option<String>,
}

impl From<&Income> for IncomeRow {
    fn from(i: &Income) -> Self {
        IncomeRow {
            id: i.id,
            date: i.date.to_string(),
            description: i.description.clone(),
            amount: fmt_money(&i.amount),
            origin: i.origin,
            source_person: i.source_person.clone(),
        }
    }
}

pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<IncomeRow>> {
    let month = arg_month(sub, "month")?;
    let mut matched: Vec<&Income> = ledger
        .incomes
        .iter()
        .filter(|i| month.as_deref().is_none_or(|m| month_key(i.date) == m))
        .collect();
    matched.sort_by_key(|i| (i.date, i.id));
    Ok(matched.into_iter().map(IncomeRow::from).collect())
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
                r.date,
                r.description,
                r.amount,
                r.source_person.unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Description", "Amount", "From"], rows)
    );
    Ok(())
}
