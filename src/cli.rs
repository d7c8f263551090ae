// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, Arg, Command};

fn output_flags() -> [Arg; 2] {
    [
        arg!(--json "Print JSON instead of a table"),
        arg!(--jsonl "Print one JSON object per line"),
    ]
}

fn expense_fields(required: bool) -> [Arg; 5] {
    [
        arg!(--desc <TEXT> "Description").required(required),
        arg!(--amount <AMOUNT> "Amount").required(required),
        arg!(--category <NAME> "Category"),
        arg!(--payer <NAME> "Who owes it (default: self)"),
        arg!(--due <DATE> "Due date YYYY-MM-DD (default: today)"),
    ]
}

fn recurring_fields(required: bool) -> [Arg; 7] {
    [
        arg!(--desc <TEXT> "Description").required(required),
        arg!(--amount <AMOUNT> "Amount per month or per installment").required(required),
        arg!(--category <NAME> "Category"),
        arg!(--kind <KIND> "fixed|installment").required(required),
        arg!(--count <N> "Number of installments (installment plans)"),
        arg!(--payer <NAME> "Who owes it (default: self)"),
        arg!(--start <DATE> "Start date YYYY-MM-DD (default: today)"),
    ]
}

fn card_fields(required: bool) -> [Arg; 4] {
    [
        arg!(--name <NAME> "Card name").required(required),
        arg!(--limit <AMOUNT> "Credit limit").required(required),
        arg!(--closing <DAY> "Statement closing day 1-31").required(required),
        arg!(--"due-day" <DAY> "Payment due day 1-31").required(required),
    ]
}

fn purchase_fields(required: bool) -> [Arg; 6] {
    [
        arg!(--card <CARD> "Card id or name").required(required),
        arg!(--desc <TEXT> "Description").required(required),
        arg!(--amount <AMOUNT> "Total amount").required(required),
        arg!(--category <NAME> "Category"),
        arg!(--installments <N> "Number of installments (default: 1)"),
        arg!(--date <DATE> "Purchase date YYYY-MM-DD (default: today)"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("billfold")
        .about("Household bills, card statements and money owed by others")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            arg!(--"data-dir" <DIR> "Directory for the local store and snapshots")
                .env("BILLFOLD_DATA_DIR")
                .global(true),
        )
        .arg(
            arg!(--"remote-url" <URL> "REST record store base URL")
                .env("BILLFOLD_REMOTE_URL")
                .global(true),
        )
        .arg(
            arg!(--"remote-key" <KEY> "API key for the REST record store")
                .env("BILLFOLD_REMOTE_KEY")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            arg!(--"log-level" <FILTER> "Log filter, e.g. billfold=debug")
                .env("BILLFOLD_LOG")
                .global(true),
        )
        .arg(
            arg!(--today <DATE> "Treat this date as today")
                .env("BILLFOLD_TODAY")
                .global(true),
        )
        .subcommand(
            Command::new("expense")
                .about("Manage expenses")
                .subcommand(Command::new("add").args(expense_fields(true)))
                .subcommand(
                    Command::new("list")
                        .arg(arg!(--month <MONTH> "Only this month (YYYY-MM)"))
                        .arg(arg!(--payer <NAME> "Only this payer"))
                        .arg(arg!(--pending "Only unpaid expenses"))
                        .args(output_flags()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<id> "Expense id"))
                        .args(expense_fields(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<id> "Expense id")))
                .subcommand(
                    Command::new("pay")
                        .about("Mark one of your own expenses as paid")
                        .arg(arg!(<id> "Expense id")),
                ),
        )
        .subcommand(
            Command::new("income")
                .about("Manage income")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--desc <TEXT> "Description").required(true))
                        .arg(arg!(--amount <AMOUNT> "Amount").required(true))
                        .arg(arg!(--date <DATE> "Date YYYY-MM-DD (default: today)")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(arg!(--month <MONTH> "Only this month (YYYY-MM)"))
                        .args(output_flags()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<id> "Income id"))
                        .arg(arg!(--desc <TEXT> "Description"))
                        .arg(arg!(--amount <AMOUNT> "Amount"))
                        .arg(arg!(--date <DATE> "Date YYYY-MM-DD")),
                )
                .subcommand(Command::new("rm").arg(arg!(<id> "Income id"))),
        )
        .subcommand(
            Command::new("person")
                .about("Manage people who owe you money")
                .subcommand(Command::new("add").arg(arg!(<name> "Person name")))
                .subcommand(Command::new("list").args(output_flags()))
                .subcommand(
                    Command::new("rename")
                        .arg(arg!(<from> "Current name"))
                        .arg(arg!(<to> "New name")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a person; their expenses become yours")
                        .arg(arg!(<name> "Person name")),
                )
                .subcommand(
                    Command::new("forecast")
                        .about("What a person will owe over the coming months")
                        .arg(arg!(<name> "Person name"))
                        .args(output_flags()),
                ),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage fixed monthly bills and installment plans")
                .subcommand(Command::new("add").args(recurring_fields(true)))
                .subcommand(Command::new("list").args(output_flags()))
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<id> "Obligation id"))
                        .args(recurring_fields(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<id> "Obligation id")))
                .subcommand(Command::new("toggle").arg(arg!(<id> "Obligation id")))
                .subcommand(
                    Command::new("roll")
                        .about("Create a fixed bill's expense for another month")
                        .arg(arg!(<id> "Obligation id"))
                        .arg(arg!(--month <MONTH> "Target month YYYY-MM").required(true)),
                ),
        )
        .subcommand(
            Command::new("card")
                .about("Manage credit cards")
                .subcommand(Command::new("add").args(card_fields(true)))
                .subcommand(Command::new("list").args(output_flags()))
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<card> "Card id or name"))
                        .args(card_fields(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<card> "Card id or name")))
                .subcommand(
                    Command::new("show")
                        .about("Limit, statements and forecast for a card")
                        .arg(arg!(<card> "Card id or name"))
                        .arg(arg!(--horizon <MONTHS> "Forecast months (default: 6)"))
                        .args(output_flags()),
                ),
        )
        .subcommand(
            Command::new("purchase")
                .about("Manage card purchases")
                .subcommand(Command::new("add").args(purchase_fields(true)))
                .subcommand(
                    Command::new("list")
                        .arg(arg!(--card <CARD> "Only this card"))
                        .args(output_flags()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<id> "Purchase id"))
                        .args(purchase_fields(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<id> "Purchase id"))),
        )
        .subcommand(
            Command::new("settle")
                .about("Record payments received")
                .subcommand(
                    Command::new("partial")
                        .arg(arg!(<id> "Expense id"))
                        .arg(arg!(--amount <AMOUNT> "Amount received").required(true)),
                )
                .subcommand(
                    Command::new("installment")
                        .about("Pay the next installment of a plan")
                        .arg(arg!(<id> "Obligation id")),
                )
                .subcommand(
                    Command::new("month")
                        .arg(arg!(--person <NAME> "Who paid").required(true))
                        .arg(arg!(--month <MONTH> "Month YYYY-MM").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries")
                .subcommand(
                    Command::new("dashboard")
                        .arg(arg!(--month <MONTH> "Month YYYY-MM (default: current)"))
                        .args(output_flags()),
                )
                .subcommand(
                    Command::new("categories")
                        .arg(arg!(--month <MONTH> "Only this month (YYYY-MM)"))
                        .args(output_flags()),
                )
                .subcommand(
                    Command::new("evolution")
                        .arg(arg!(--months <N> "Trailing months (default: 6)"))
                        .args(output_flags()),
                )
                .subcommand(Command::new("recurring").args(output_flags()))
                .subcommand(Command::new("people").args(output_flags())),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("expenses")
                        .arg(arg!(--format <FMT> "csv|json").required(true))
                        .arg(arg!(--out <PATH> "Output file").required(true)),
                )
                .subcommand(
                    Command::new("incomes")
                        .arg(arg!(--format <FMT> "csv|json").required(true))
                        .arg(arg!(--out <PATH> "Output file").required(true)),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check installment counters and record links")
                .args(output_flags()),
        )
}
