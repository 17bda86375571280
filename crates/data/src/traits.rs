// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use async_trait::async_trait;
use std::fmt::Display;

/// Injectable string key/value storage, the client-side equivalent of browser local storage.
/// Values are stored verbatim so callers own their serialization format.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    type Error: Display + Send + Sync + 'static;

    async fn insert(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Remove the entry at `key`, returning true if something was removed
    async fn remove(&mut self, key: &str) -> Result<bool, Self::Error>;

    /// List every key that starts with `prefix` in lexicographic order
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Self::Error>;
}
