// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::engine::dashboard::person_summaries;
use crate::engine::projection::monthly_forecast_for_person;
use crate::error::{LedgerError, RecordKind};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;

pub fn handle(book: &mut Book, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            book.add_person(name)?;
            println!("Added {}", name.trim());
        }
        Some(("list", sub)) => {
            let data = person_summaries(book.ledger());
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                return Ok(());
            }
            let rows = data
                .into_iter()
                .map(|p| {
                    vec![
                        p.name,
                        fmt_money(&p.pending),
                        p.pending_count.to_string(),
                        fmt_money(&p.received),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Person", "Owes", "Open items", "Received"], rows)
            );
        }
        Some(("rename", sub)) => {
            let from = sub.get_one::<String>("from").unwrap().trim();
            let to = sub.get_one::<String>("to").unwrap().trim();
            book.rename_person(from, to)?;
            println!("Renamed {} to {}", from, to);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let moved = book.delete_person(name)?;
            println!("Deleted {}; {} expense(s) reassigned to self", name, moved);
        }
        Some(("forecast", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if !book.ledger().has_person(name) {
                return Err(LedgerError::not_found(RecordKind::Person, name).into());
            }
            let data = monthly_forecast_for_person(book.ledger(), name, today);
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                return Ok(());
            }
            if data.is_empty() {
                println!("Nothing expected from {}", name);
                return Ok(());
            }
            let rows = data
                .into_iter()
                .map(|f| {
                    let detail = f
                        .items
                        .iter()
                        .map(|i| format!("{} {}", i.description, fmt_money(&i.amount)))
                        .collect::<Vec<_>>()
                        .join("; ");
                    vec![f.month, fmt_money(&f.total), f.installment_count.to_string(), detail]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Month", "Total", "Items", "Detail"], rows)
            );
        }
        _ => {}
    }
    Ok(())
}
