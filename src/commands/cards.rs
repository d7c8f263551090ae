// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::engine::projection::FORECAST_MONTHS;
use crate::engine::statements::{card_summary, forecast_statements};
use crate::error::{LedgerError, RecordKind};
use crate::ledger::Ledger;
use crate::models::NewCard;
use crate::utils::{
    arg_count, arg_decimal, arg_text, fmt_money, maybe_print_json, parse_count, parse_decimal,
    pretty_table,
};
use anyhow::Result;
use chrono::NaiveDate;

/// Finds a card by id, falling back to a case-insensitive name match.
pub fn resolve_card(ledger: &Ledger, key: &str) -> Result<i64> {
    let key = key.trim();
    if let Ok(id) = key.parse::<i64>() {
        if ledger.card(id).is_some() {
            return Ok(id);
        }
    }
    ledger
        .card_by_name(key)
        .map(|c| c.id)
        .ok_or_else(|| LedgerError::not_found(RecordKind::Card, key).into())
}

pub fn handle(book: &mut Book, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewCard {
                name: sub.get_one::<String>("name").unwrap().trim().to_string(),
                credit_limit: parse_decimal(sub.get_one::<String>("limit").unwrap())?,
                closing_day: parse_count(sub.get_one::<String>("closing").unwrap())?,
                due_day: parse_count(sub.get_one::<String>("due-day").unwrap())?,
            };
            let id = book.add_card(new)?;
            println!("Added card #{}", id);
        }
        Some(("list", sub)) => list(book.ledger(), today, sub)?,
        Some(("edit", sub)) => {
            let id = resolve_card(book.ledger(), sub.get_one::<String>("card").unwrap())?;
            let current = book
                .ledger()
                .card(id)
                .cloned()
                .ok_or_else(|| LedgerError::not_found(RecordKind::Card, id))?;
            let new = NewCard {
                name: arg_text(sub, "name").unwrap_or(current.name),
                credit_limit: arg_decimal(sub, "limit")?.unwrap_or(current.credit_limit),
                closing_day: arg_count(sub, "closing")?.unwrap_or(current.closing_day),
                due_day: arg_count(sub, "due-day")?.unwrap_or(current.due_day),
            };
            book.update_card(id, new)?;
            println!("Updated card #{}", id);
        }
        Some(("rm", sub)) => {
            let id = resolve_card(book.ledger(), sub.get_one::<String>("card").unwrap())?;
            let cascade = book.delete_card(id)?;
            println!(
                "Deleted card #{} with {} purchase(s) and {} expense(s)",
                id, cascade.purchases, cascade.expenses
            );
        }
        Some(("show", sub)) => show(book.ledger(), today, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let data = ledger
        .cards
        .iter()
        .map(|c| card_summary(ledger, c.id, today))
        .collect::<Result<Vec<_>, _>>()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = ledger
        .cards
        .iter()
        .zip(data)
        .map(|(c, s)| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.closing_day.to_string(),
                c.due_day.to_string(),
                fmt_money(&s.credit_limit),
                fmt_money(&s.available),
                fmt_money(&s.current_statement),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Card", "Closes", "Due", "Limit", "Available", "Statement"],
            rows
        )
    );
    Ok(())
}

fn show(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let id = resolve_card(ledger, sub.get_one::<String>("card").unwrap())?;
    let horizon = arg_count(sub, "horizon")?.unwrap_or(FORECAST_MONTHS);
    let mut summary = card_summary(ledger, id, today)?;
    summary.forecast = forecast_statements(ledger, id, today, horizon)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let overview = vec![
        vec!["Limit".into(), fmt_money(&summary.credit_limit)],
        vec!["Committed".into(), fmt_money(&summary.committed)],
        vec!["Available".into(), fmt_money(&summary.available)],
        vec!["Current statement".into(), fmt_money(&summary.current_statement)],
        vec!["Next statement".into(), fmt_money(&summary.next_statement)],
    ];
    println!("{}", pretty_table(&[summary.name.as_str(), ""], overview));
    let forecast = summary
        .forecast
        .into_iter()
        .map(|f| vec![f.month, fmt_money(&f.total)])
        .collect();
    println!("{}", pretty_table(&["Month", "Statement"], forecast));
    Ok(())
}
