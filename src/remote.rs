// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{Collection, RecordStore};
use crate::utils::http_client;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record store backed by a PostgREST-style HTTP endpoint. Each collection is
/// a table of `{user_id, position, body}` rows.
pub struct RemoteStore {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    user_id: String,
    position: i64,
    body: Value,
}

impl RemoteStore {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<RemoteStore> {
        Ok(RemoteStore {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key,
            client: http_client()?,
        })
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.name())
    }

    fn request(
        &self,
        method: reqwest::Method,
        collection: Collection,
    ) -> reqwest::blocking::RequestBuilder {
        let mut req = self.client.request(method, self.table_url(collection));
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key).bearer_auth(key);
        }
        req
    }
}

impl RecordStore for RemoteStore {
    fn load_all(&self, owner_key: &str, collection: Collection) -> Result<Vec<Value>> {
        let filter = format!("eq.{}", owner_key);
        let rows: Vec<Row> = self
            .request(reqwest::Method::GET, collection)
            .query(&[
                ("user_id", filter.as_str()),
                ("select", "*"),
                ("order", "position.asc"),
            ])
            .send()
            .with_context(|| format!("Fetch {}", collection))?
            .error_for_status()?
            .json()
            .with_context(|| format!("Decode {}", collection))?;
        Ok(rows.into_iter().map(|r| r.body).collect())
    }

    fn replace_all(
        &self,
        owner_key: &str,
        collection: Collection,
        records: &[Value],
    ) -> Result<()> {
        let filter = format!("eq.{}", owner_key);
        self.request(reqwest::Method::DELETE, collection)
            .query(&[("user_id", filter.as_str())])
            .send()
            .with_context(|| format!("Clear {}", collection))?
            .error_for_status()?;
        if records.is_empty() {
            return Ok(());
        }
        let rows: Vec<Row> = records
            .iter()
            .enumerate()
            .map(|(pos, body)| Row {
                user_id: owner_key.to_string(),
                position: pos as i64,
                body: body.clone(),
            })
            .collect();
        self.request(reqwest::Method::POST, collection)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .with_context(|| format!("Insert {}", collection))?
            .error_for_status()?;
        Ok(())
    }
}
