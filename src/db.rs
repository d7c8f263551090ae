// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.billfold", "Billfold", "billfold"));

const OWNER_KEY_FILE: &str = "owner_key";

pub fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}

pub fn db_path(data_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("billfold.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS records(
        owner_key TEXT NOT NULL,
        collection TEXT NOT NULL,
        position INTEGER NOT NULL,
        body TEXT NOT NULL,
        saved_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(owner_key, collection, position)
    );
    "#,
    )?;
    Ok(())
}

/// Per-installation identifier the store partitions records by. Created on
/// first use and kept next to the database.
pub fn owner_key(data_dir: &Path) -> Result<String> {
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    let path = data_dir.join(OWNER_KEY_FILE);
    if let Ok(existing) = fs::read_to_string(&path) {
        let existing = existing.trim();
        if !existing.is_empty() {
            return Ok(existing.to_string());
        }
    }
    let key = format!("user_{}", uuid::Uuid::new_v4().simple());
    fs::write(&path, &key).with_context(|| format!("Write {}", path.display()))?;
    Ok(key)
}
