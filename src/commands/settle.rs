// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::engine::settlement::MonthSettlement;
use crate::utils::{fmt_money, parse_decimal, parse_id, parse_month};
use anyhow::Result;
use chrono::NaiveDate;

pub fn handle(book: &mut Book, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("partial", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let s = book.settle_partial(id, amount, today)?;
            if s.fully_paid {
                println!("Received {}; expense #{} is paid", fmt_money(&s.received), id);
            } else {
                println!(
                    "Received {}; {} still owed on expense #{}",
                    fmt_money(&s.received),
                    fmt_money(&s.remaining),
                    id
                );
            }
        }
        Some(("installment", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let s = book.settle_recurring_installment(id, today)?;
            print!("Installment {} of obligation #{} paid", s.installment, id);
            if let Some(income) = s.income_id {
                print!(" (income #{})", income);
            }
            println!();
            if s.completed {
                println!("All installments paid; obligation closed");
            }
        }
        Some(("month", sub)) => {
            let person = sub.get_one::<String>("person").unwrap().trim();
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            match book.settle_month_for_person(person, &month, today)? {
                MonthSettlement::NothingPending => {
                    println!("Nothing pending from {} for {}", person, month)
                }
                MonthSettlement::Settled {
                    total, expense_ids, ..
                } => println!(
                    "Received {} from {} covering {} expense(s) in {}",
                    fmt_money(&total),
                    person,
                    expense_ids.len(),
                    month
                ),
            }
        }
        _ => {}
    }
    Ok(())
}
