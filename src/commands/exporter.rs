// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::utils::fmt_money;
use anyhow::{bail, Result};
use serde_json::json;

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(ledger, sub),
        Some(("incomes", sub)) => export_incomes(ledger, sub),
        _ => Ok(()),
    }
}

fn format_arg(sub: &clap::ArgMatches) -> Result<String> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    Ok(fmt)
}

pub fn export_expenses(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = format_arg(sub)?;
    let out = sub.get_one::<String>("out").unwrap();
    let mut expenses: Vec<_> = ledger.expenses.iter().collect();
    expenses.sort_by_key(|e| (e.due_date, e.id));

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "id", "due_date", "description", "amount", "category", "payer", "paid", "paid_date",
            "installment",
        ])?;
        for e in expenses {
            wtr.write_record([
                e.id.to_string(),
                e.due_date.to_string(),
                e.description.clone(),
                fmt_money(&e.amount),
                e.category.clone(),
                e.payer.to_string(),
                e.paid.to_string(),
                e.paid_date.map(|d| d.to_string()).unwrap_or_default(),
                e.installment.map(|i| i.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = expenses
            .into_iter()
            .map(|e| {
                json!({
                    "id": e.id, "due_date": e.due_date, "description": e.description,
                    "amount": fmt_money(&e.amount), "category": e.category, "payer": e.payer,
                    "paid": e.paid, "paid_date": e.paid_date, "installment": e.installment
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported expenses to {}", out);
    Ok(())
}

pub fn export_incomes(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = format_arg(sub)?;
    let out = sub.get_one::<String>("out").unwrap();
    let mut incomes: Vec<_> = ledger.incomes.iter().collect();
    incomes.sort_by_key(|i| (i.date, i.id));

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["id", "date", "description", "amount", "source_person"])?;
        for i in incomes {
            wtr.write_record([
                i.id.to_string(),
                i.date.to_string(),
                i.description.clone(),
                fmt_money(&i.amount),
                i.source_person.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = incomes
            .into_iter()
            .map(|i| {
                json!({
                    "id": i.id, "date": i.date, "description": i.description,
                    "amount": fmt_money(&i.amount), "source_person": i.source_person
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported incomes to {}", out);
    Ok(())
}
