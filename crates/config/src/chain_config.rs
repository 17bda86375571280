// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::rpc::RPC;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Hash, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: None,
        }
    }
}

impl ChainConfig {
    pub fn rpc(&self) -> Result<RPC> {
        RPC::from_url(&self.rpc_url)
            .map_err(|e| anyhow!("Failed to parse RPC URL for chain {}: {}", self.name, e))
    }
}
