// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    sled_utils::get_or_open_db_tree,
    DataStore,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sled::Tree;
use std::path::Path;
use tracing::info;

const DEFAULT_TREE: &str = "authorizations";

/// Durable store backed by a sled tree. Every write is flushed before returning so an entry
/// survives the process the same way a local storage write does.
#[derive(Clone)]
pub struct SledStore {
    db: Tree,
}

impl SledStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_tree(path, DEFAULT_TREE)
    }

    pub fn open_tree(path: &Path, tree: &str) -> Result<Self> {
        info!("Opening SledStore with {:?}", path);
        let db = get_or_open_db_tree(path, tree)?;
        Ok(Self { db })
    }
}

#[async_trait]
impl DataStore for SledStore {
    type Error = anyhow::Error;

    async fn insert(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .context("Could not insert data into db")?;
        self.db.flush().context("Could not flush db")?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let res = self
            .db
            .get(key.as_bytes())
            .with_context(|| format!("Failed to fetch {key}"))?;

        // Non UTF-8 bytes are surfaced as text so the caller sees a corrupted entry rather
        // than a storage failure.
        Ok(res.map(|v| String::from_utf8_lossy(&v).into_owned()))
    }

    async fn remove(&mut self, key: &str) -> Result<bool, Self::Error> {
        let removed = self
            .db
            .remove(key.as_bytes())
            .context("Could not remove data from db")?
            .is_some();
        self.db.flush().context("Could not flush db")?;
        Ok(removed)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Self::Error> {
        let mut keys = vec![];
        for entry in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, _) = entry.context("Could not scan db")?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sled_store_shares_handles_per_path() -> Result<()> {
        let temp_dir = tempdir()?;
        let db_path = temp_dir.path().join("cache.db");

        let mut store1 = SledStore::open(&db_path)?;
        store1.insert("reencrypt_0xabc", "{}").await?;

        // A second store on the same path sees the first store's writes
        let mut store2 = SledStore::open(&db_path)?;
        assert_eq!(store2.get("reencrypt_0xabc").await?, Some("{}".to_string()));

        store2.insert("reencrypt_0xdef", "[]").await?;
        assert_eq!(
            store1.keys_with_prefix("reencrypt_").await?,
            vec!["reencrypt_0xabc".to_string(), "reencrypt_0xdef".to_string()]
        );

        // Different path, different data
        let other = SledStore::open(&temp_dir.path().join("other.db"))?;
        assert!(other.get("reencrypt_0xabc").await?.is_none());

        assert!(store1.remove("reencrypt_0xabc").await?);
        assert!(store2.get("reencrypt_0xabc").await?.is_none());
        Ok(())
    }
}
