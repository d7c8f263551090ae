// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use billfold::{cli, commands, config::Config};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    let cfg = Config::from_matches(&matches)?;

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if cfg.log_level.is_none() => EnvFilter::try_new(v)?,
        _ => EnvFilter::try_new(cfg.log_filter())?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if matches.subcommand().is_none() {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    }

    let today = cfg.today();
    let mut book = cfg.open_book()?;

    match matches.subcommand() {
        Some(("expense", sub)) => commands::expenses::handle(&mut book, today, sub)?,
        Some(("income", sub)) => commands::incomes::handle(&mut book, today, sub)?,
        Some(("person", sub)) => commands::people::handle(&mut book, today, sub)?,
        Some(("recurring", sub)) => commands::recurring::handle(&mut book, today, sub)?,
        Some(("card", sub)) => commands::cards::handle(&mut book, today, sub)?,
        Some(("purchase", sub)) => commands::purchases::handle(&mut book, today, sub)?,
        Some(("settle", sub)) => commands::settle::handle(&mut book, today, sub)?,
        Some(("report", sub)) => commands::reports::handle(book.ledger(), today, sub)?,
        Some(("export", sub)) => commands::exporter::handle(book.ledger(), sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(book.ledger(), sub)?,
        _ => {}
    }
    Ok(())
}
