// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;

pub struct StoreKeys;

impl StoreKeys {
    pub const REENCRYPT_PREFIX: &'static str = "reencrypt_";

    /// Storage key of the re-encryption authorization for `contract`. Addresses render in their
    /// EIP-55 checksummed form so the key is stable regardless of how the address was typed.
    pub fn reencrypt(contract: &Address) -> String {
        format!("{}{}", Self::REENCRYPT_PREFIX, contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reencrypt_key_is_checksummed() {
        let lower: Address = "0x811945cc1d17482359a27a4e7d43c352dfae0540"
            .parse()
            .unwrap();
        assert_eq!(
            StoreKeys::reencrypt(&lower),
            "reencrypt_0x811945Cc1D17482359a27A4E7D43C352DFAE0540"
        );
    }
}
