// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable storage of whole record collections.
//!
//! Stores never see diffs: every save replaces the complete collection for
//! an owner key.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Expenses,
    Incomes,
    People,
    Recurring,
    Cards,
    Purchases,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Expenses => "expenses",
            Collection::Incomes => "incomes",
            Collection::People => "people",
            Collection::Recurring => "recurring",
            Collection::Cards => "cards",
            Collection::Purchases => "card_purchases",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait RecordStore {
    fn load_all(&self, owner_key: &str, collection: Collection) -> Result<Vec<Value>>;

    /// Deletes every record of `collection` for `owner_key`, then inserts
    /// `records` in order.
    fn replace_all(&self, owner_key: &str, collection: Collection, records: &[Value])
        -> Result<()>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<SqliteStore> {
        crate::db::init_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<SqliteStore> {
        SqliteStore::new(Connection::open_in_memory()?)
    }
}

impl RecordStore for SqliteStore {
    fn load_all(&self, owner_key: &str, collection: Collection) -> Result<Vec<Value>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM records WHERE owner_key=?1 AND collection=?2 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![owner_key, collection.name()], |r| {
            r.get::<_, String>(0)
        })?;
        let mut out = Vec::new();
        for row in rows {
            let body = row?;
            let v: Value = serde_json::from_str(&body)
                .with_context(|| format!("Corrupt {} record for {}", collection, owner_key))?;
            out.push(v);
        }
        Ok(out)
    }

    fn replace_all(
        &self,
        owner_key: &str,
        collection: Collection,
        records: &[Value],
    ) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM records WHERE owner_key=?1 AND collection=?2",
            params![owner_key, collection.name()],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records(owner_key, collection, position, body) VALUES (?1,?2,?3,?4)",
            )?;
            for (pos, record) in records.iter().enumerate() {
                stmt.execute(params![
                    owner_key,
                    collection.name(),
                    pos as i64,
                    serde_json::to_string(record)?
                ])?;
            }
        }
        tx.commit()
            .with_context(|| format!("Save {} for {}", collection, owner_key))?;
        Ok(())
    }
}
