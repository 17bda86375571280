// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Addresses of the deployed confidential contracts the client talks to
#[derive(Debug, Clone, Hash, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ContractAddresses {
    /// The liquidity pool receiving swaps and liquidity
    pub swap_pool: Address,
    /// First token of the pool
    pub token_a: Address,
    /// Second token of the pool
    pub token_b: Address,
    /// Tokens the mint form mints into, in order
    pub mint_tokens: Vec<Address>,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        // Rivest testnet deployment
        Self {
            swap_pool: address!("5550edF005ffFc7f398Dc7A2DD6d5021E8D97886"),
            token_a: address!("811945Cc1D17482359a27A4E7D43C352DFAE0540"),
            token_b: address!("79B912539834946DF7DFaA2539b31D2B4E487d76"),
            mint_tokens: vec![
                address!("86bFF69F59EBc79D73669481B0d1Bf3fB07Ba196"),
                address!("08F472c5b04Bf80Ffa6a6C25605aF19668A474Eb"),
            ],
        }
    }
}

impl ContractAddresses {
    /// The tokens whose balances are shown, in display order
    pub fn balance_tokens(&self) -> [Address; 2] {
        [self.token_a, self.token_b]
    }
}
