// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::commands::cards::resolve_card;
use crate::commands::DEFAULT_CATEGORY;
use crate::error::{LedgerError, RecordKind};
use crate::ledger::Ledger;
use crate::models::NewCardPurchase;
use crate::utils::{
    arg_count, arg_date, arg_decimal, arg_text, fmt_money, maybe_print_json, parse_decimal,
    parse_id, pretty_table,
};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle(book: &mut Book, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = new_purchase_from_args(book.ledger(), sub, today)?;
            let (id, created) = book.add_card_purchase(new)?;
            println!("Added purchase #{} ({} installment(s))", id, created.len());
        }
        Some(("list", sub)) => list(book.ledger(), sub)?,
        Some(("edit", sub)) => edit(book, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let cascade = book.delete_card_purchase(id)?;
            println!(
                "Deleted purchase #{} and {} installment(s)",
                id, cascade.expenses
            );
        }
        _ => {}
    }
    Ok(())
}

pub fn new_purchase_from_args(
    ledger: &Ledger,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<NewCardPurchase> {
    Ok(NewCardPurchase {
        card_id: resolve_card(ledger, sub.get_one::<String>("card").unwrap())?,
        description: sub.get_one::<String>("desc").unwrap().trim().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        category: arg_text(sub, "category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        installment_count: arg_count(sub, "installments")?.unwrap_or(1),
        purchase_date: arg_date(sub, "date")?.unwrap_or(today),
    })
}

fn edit(book: &mut Book, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let current = book
        .ledger()
        .purchase(id)
        .cloned()
        .ok_or_else(|| LedgerError::not_found(RecordKind::Purchase, id))?;
    let card_id = match arg_text(sub, "card") {
        Some(key) => resolve_card(book.ledger(), &key)?,
        None => current.card_id,
    };
    let new = NewCardPurchase {
        card_id,
        description: arg_text(sub, "desc").unwrap_or(current.description),
        amount: arg_decimal(sub, "amount")?.unwrap_or(current.amount),
        category: arg_text(sub, "category").unwrap_or(current.category),
        installment_count: arg_count(sub, "installments")?.unwrap_or(current.installment_count),
        purchase_date: arg_date(sub, "date")?.unwrap_or(current.purchase_date),
    };
    let (dropped, created) = book.update_card_purchase(id, new)?;
    println!(
        "Updated purchase #{}: replaced {} unpaid installment(s) with {}",
        id,
        dropped,
        created.len()
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct PurchaseRow {
    id: i64,
    card: String,
    date: String,
    description: String,
    amount: String,
    installments: String,
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let card_filter = match arg_text(sub, "card") {
        Some(key) => Some(resolve_card(ledger, &key)?),
        None => None,
    };
    let mut data: Vec<PurchaseRow> = ledger
        .purchases
        .iter()
        .filter(|p| card_filter.is_none_or(|c| p.card_id == c))
        .map(|p| PurchaseRow {
            id: p.id,
            card: ledger
                .card(p.card_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("#{} (missing)", p.card_id)),
            date: p.purchase_date.to_string(),
            description: p.description.clone(),
            amount: fmt_money(&p.amount),
            installments: format!("{}/{}", p.installments_paid, p.installment_count),
        })
        .collect();
    data.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .into_iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.card,
                r.date,
                r.description,
                r.amount,
                r.installments,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Card", "Date", "Description", "Amount", "Paid"],
            rows
        )
    );
    Ok(())
}
