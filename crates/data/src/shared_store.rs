// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::DataStore;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle over a single store so every clone reads and writes the same entries
pub struct SharedStore<S> {
    inner: Arc<RwLock<S>>,
}

impl<S: DataStore> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        SharedStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DataStore> SharedStore<S> {
    pub fn new(store: S) -> SharedStore<S> {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Run a closure against the underlying store, mostly useful for inspection in tests
    pub async fn with_inner<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let guard = self.inner.read().await;
        f(&guard)
    }
}

#[async_trait]
impl<S: DataStore> DataStore for SharedStore<S> {
    type Error = S::Error;

    async fn insert(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.inner.write().await.insert(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.inner.read().await.get(key).await
    }

    async fn remove(&mut self, key: &str) -> Result<bool, Self::Error> {
        self.inner.write().await.remove(key).await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Self::Error> {
        self.inner.read().await.keys_with_prefix(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;
    use anyhow::Result;

    #[tokio::test]
    async fn test_clones_share_state() -> Result<()> {
        let mut a = SharedStore::new(InMemoryStore::new());
        let b = a.clone();
        a.insert("k", "v").await?;
        assert_eq!(b.get("k").await?, Some("v".to_string()));
        assert_eq!(b.with_inner(|s| s.len()).await, 1);
        Ok(())
    }
}
