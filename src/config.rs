// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::db;
use crate::remote::RemoteStore;
use crate::snapshot::SnapshotStore;
use crate::store::{RecordStore, SqliteStore};
use crate::utils::parse_date;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "billfold=warn";

/// Runtime settings taken from the global command-line options (or their
/// `BILLFOLD_*` environment variables).
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
    pub log_level: Option<String>,
    pub today: Option<NaiveDate>,
}

impl Config {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Config> {
        let data_dir = match m.get_one::<String>("data-dir") {
            Some(dir) => PathBuf::from(dir.trim()),
            None => db::default_data_dir()?,
        };
        let non_empty = |key: &str| {
            m.get_one::<String>(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let today = match m.get_one::<String>("today") {
            Some(s) => Some(parse_date(s)?),
            None => None,
        };
        Ok(Config {
            data_dir,
            remote_url: non_empty("remote-url"),
            remote_key: non_empty("remote-key"),
            log_level: non_empty("log-level"),
            today,
        })
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Opens the book on the remote store when one is configured, otherwise
    /// on the SQLite file in the data dir. Snapshots always live in the data
    /// dir.
    pub fn open_book(&self) -> Result<Book> {
        let owner = db::owner_key(&self.data_dir)?;
        let store: Box<dyn RecordStore> = match &self.remote_url {
            Some(url) => Box::new(RemoteStore::new(url, self.remote_key.clone())?),
            None => {
                let conn = db::open_or_init(&db::db_path(&self.data_dir)?)?;
                Box::new(SqliteStore::new(conn)?)
            }
        };
        Book::open(store, Some(SnapshotStore::new(&self.data_dir)), &owner)
    }
}
