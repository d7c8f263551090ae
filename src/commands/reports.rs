// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::dashboard::{
    month_summary, monthly_evolution, person_summaries, receivable_total, recurring_stats,
    spending_by_category,
};
use crate::ledger::Ledger;
use crate::utils::{arg_count, arg_month, fmt_money, maybe_print_json, month_key, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

pub fn handle(ledger: &Ledger, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(ledger, today, sub)?,
        Some(("categories", sub)) => categories(ledger, sub)?,
        Some(("evolution", sub)) => evolution(ledger, today, sub)?,
        Some(("recurring", sub)) => {
            let stats = recurring_stats(ledger);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
                let rows = vec![
                    vec!["Active obligations".into(), stats.active.to_string()],
                    vec!["Fixed per month".into(), fmt_money(&stats.monthly_fixed)],
                    vec!["Next three months".into(), fmt_money(&stats.next_three_months)],
                ];
                println!("{}", pretty_table(&["Recurring", ""], rows));
            }
        }
        Some(("people", sub)) => {
            let people = person_summaries(ledger);
            let total = receivable_total(ledger);
            let data = json!({ "receivable": total, "people": people });
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let mut rows: Vec<Vec<String>> = people
                    .into_iter()
                    .filter(|p| p.pending_count > 0)
                    .map(|p| vec![p.name, fmt_money(&p.pending), p.pending_count.to_string()])
                    .collect();
                rows.push(vec!["Total".into(), fmt_money(&total), String::new()]);
                println!("{}", pretty_table(&["Person", "Owes", "Open items"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

fn dashboard(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let month = arg_month(sub, "month")?.unwrap_or_else(|| month_key(today));
    let s = month_summary(ledger, &month);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let mut rows = vec![
        vec!["Income".into(), fmt_money(&s.income)],
        vec!["Paid".into(), fmt_money(&s.paid)],
        vec!["Balance".into(), fmt_money(&s.balance)],
        vec!["Pending".into(), fmt_money(&s.pending)],
        vec!["Receivable".into(), fmt_money(&s.receivable)],
    ];
    if let Some(short) = s.shortfall {
        rows.push(vec!["Shortfall".into(), fmt_money(&short)]);
    }
    println!("{}", pretty_table(&[s.month.as_str(), ""], rows));
    Ok(())
}

fn categories(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let month = arg_month(sub, "month")?;
    let items = spending_by_category(ledger, month.as_deref());
    let data: Vec<Vec<String>> = items
        .into_iter()
        .map(|(cat, amt)| vec![cat, fmt_money(&amt)])
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}

fn evolution(ledger: &Ledger, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let months = arg_count(sub, "months")?.unwrap_or(6);
    let points = monthly_evolution(ledger, today, months);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        return Ok(());
    }
    let rows = points
        .into_iter()
        .map(|p| {
            vec![
                p.month,
                fmt_money(&p.income),
                fmt_money(&p.expenses),
                fmt_money(&p.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Balance"], rows)
    );
    Ok(())
}
