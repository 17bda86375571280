// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DataStore, InMemoryStore, SledStore};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Store chosen at runtime from configuration
pub enum AnyStore {
    Memory(InMemoryStore),
    Sled(SledStore),
}

impl AnyStore {
    pub fn memory() -> Self {
        AnyStore::Memory(InMemoryStore::new())
    }

    pub fn sled(path: &Path) -> Result<Self> {
        Ok(AnyStore::Sled(SledStore::open(path)?))
    }
}

#[async_trait]
impl DataStore for AnyStore {
    type Error = anyhow::Error;

    async fn insert(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        match self {
            AnyStore::Memory(s) => s.insert(key, value).await,
            AnyStore::Sled(s) => s.insert(key, value).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match self {
            AnyStore::Memory(s) => s.get(key).await,
            AnyStore::Sled(s) => s.get(key).await,
        }
    }

    async fn remove(&mut self, key: &str) -> Result<bool, Self::Error> {
        match self {
            AnyStore::Memory(s) => s.remove(key).await,
            AnyStore::Sled(s) => s.remove(key).await,
        }
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Self::Error> {
        match self {
            AnyStore::Memory(s) => s.keys_with_prefix(prefix).await,
            AnyStore::Sled(s) => s.keys_with_prefix(prefix).await,
        }
    }
}
