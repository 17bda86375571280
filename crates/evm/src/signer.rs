// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    dyn_abi::TypedData,
    signers::{local::PrivateKeySigner, Signer},
};
use async_trait::async_trait;
use incoswap_fhevm::{
    Address, Eip712Domain, Eip712Types, FhevmError, Result, WalletSigner, REENCRYPT_TYPE,
};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Wallet backed by a private key held in the process
#[derive(Clone)]
pub struct LocalWalletSigner {
    signer: PrivateKeySigner,
}

impl LocalWalletSigner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    pub fn from_private_key(private_key: &str) -> eyre::Result<Self> {
        let signer: PrivateKeySigner = private_key.parse()?;
        Ok(Self::new(signer))
    }

    pub fn inner(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

/// Build the `eth_signTypedData_v4` payload for a re-encryption authorization
pub fn reencrypt_typed_data(
    domain: &Eip712Domain,
    types: &Eip712Types,
    message: &Map<String, Value>,
) -> Result<TypedData> {
    let payload = json!({
        "types": types,
        "primaryType": REENCRYPT_TYPE,
        "domain": {
            "name": domain.name,
            "version": domain.version,
            "chainId": format!("{:#x}", domain.chain_id),
            "verifyingContract": domain.verifying_contract,
        },
        "message": message,
    });
    serde_json::from_value(payload).map_err(|e| FhevmError::Fhe(format!("invalid typed data: {e}")))
}

#[async_trait]
impl WalletSigner for LocalWalletSigner {
    async fn get_address(&self) -> Result<Address> {
        Ok(self.signer.address())
    }

    async fn sign_typed_data(
        &self,
        domain: &Eip712Domain,
        types: &Eip712Types,
        message: &Map<String, Value>,
    ) -> Result<String> {
        let typed_data = reencrypt_typed_data(domain, types, message)?;
        let signature = self
            .signer
            .sign_dynamic_typed_data(&typed_data)
            .await
            .map_err(|e| FhevmError::Fhe(format!("failed to sign typed data: {e}")))?;
        debug!(signer = %self.signer.address(), "Signed re-encryption authorization");
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}
