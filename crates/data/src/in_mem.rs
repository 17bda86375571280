// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::DataStore;
use async_trait::async_trait;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataOp {
    Insert { key: String, value: String },
    Remove { key: String },
}

/// Ephemeral store. When `capture` is set every mutation is recorded so tests can assert on
/// exactly what was written.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: BTreeMap<String, String>,
    log: Vec<DataOp>,
    capture: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capture() -> Self {
        Self {
            capture: true,
            ..Self::default()
        }
    }

    /// Operations recorded so far. Always empty unless created with [`Self::with_capture`].
    pub fn log(&self) -> &[DataOp] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    type Error = anyhow::Error;

    async fn insert(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.data.insert(key.to_owned(), value.to_owned());
        if self.capture {
            self.log.push(DataOp::Insert {
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.data.get(key).cloned())
    }

    async fn remove(&mut self, key: &str) -> Result<bool, Self::Error> {
        let removed = self.data.remove(key).is_some();
        if self.capture && removed {
            self.log.push(DataOp::Remove {
                key: key.to_owned(),
            });
        }
        Ok(removed)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Self::Error> {
        Ok(self
            .data
            .range(prefix.to_owned()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn test_insert_get_remove() -> Result<()> {
        let mut store = InMemoryStore::new();
        store.insert("a", "1").await?;
        assert_eq!(store.get("a").await?, Some("1".to_string()));
        assert!(store.remove("a").await?);
        assert!(!store.remove("a").await?);
        assert_eq!(store.get("a").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_prefix_scan_and_capture() -> Result<()> {
        let mut store = InMemoryStore::with_capture();
        store.insert("reencrypt_0xb", "b").await?;
        store.insert("other", "x").await?;
        store.insert("reencrypt_0xa", "a").await?;

        assert_eq!(
            store.keys_with_prefix("reencrypt_").await?,
            vec!["reencrypt_0xa".to_string(), "reencrypt_0xb".to_string()]
        );

        store.remove("missing").await?;
        assert_eq!(store.log().len(), 3, "removing a missing key is not logged");
        Ok(())
    }
}
