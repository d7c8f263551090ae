// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Collection;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// On-device copy of each collection, used when the record store cannot be
/// reached. One JSON file per collection.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: &Path) -> SnapshotStore {
        SnapshotStore {
            dir: dir.to_path_buf(),
        }
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("finance_{}.json", collection.name()))
    }

    /// `None` when no snapshot was ever written for `collection`.
    pub fn load(&self, collection: Collection) -> Result<Option<Vec<Value>>> {
        let path = self.path(collection);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).with_context(|| format!("Read {}", path.display()))?;
        let records = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid snapshot {}", path.display()))?;
        Ok(Some(records))
    }

    pub fn save(&self, collection: Collection, records: &[Value]) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create snapshot dir")?;
        let path = self.path(collection);
        fs::write(&path, serde_json::to_string(records)?)
            .with_context(|| format!("Write {}", path.display()))?;
        Ok(())
    }
}
