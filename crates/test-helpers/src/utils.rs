// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::{Address, B256};
use sha2::{Digest, Sha256};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Route logs of the current test thread to the test writer, filtered by `RUST_LOG`.
/// Logging stops when the guard drops.
pub fn init_test_tracing() -> DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Deterministic test address derived from a label
pub fn test_address(label: &str) -> Address {
    Address::from_slice(&digest(&[label.as_bytes()])[12..])
}

pub(crate) fn digest(parts: &[&[u8]]) -> B256 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    B256::from_slice(&hasher.finalize())
}
