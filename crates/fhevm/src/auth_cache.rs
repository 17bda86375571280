// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    Address, FheInstance, FhevmError, PrivateKey, ReencryptionAuthorization, Result, WalletSigner,
};
use incoswap_config::{StoreBackend, StoreKeys};
use incoswap_data::{AnyStore, DataStore, SharedStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Persisted layout of one authorization: `{publicKey, privateKey, signature}`
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct StoredAuthorization {
    public_key: String,
    private_key: PrivateKey,
    signature: String,
}

impl StoredAuthorization {
    fn parse(raw: &str) -> std::result::Result<Self, String> {
        let stored: StoredAuthorization = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        if stored.public_key.is_empty() {
            return Err("publicKey is empty".to_string());
        }
        if stored.private_key.expose().is_empty() {
            return Err("privateKey is empty".to_string());
        }
        let sig = stored
            .signature
            .strip_prefix("0x")
            .unwrap_or(&stored.signature);
        if sig.is_empty() || hex::decode(sig).is_err() {
            return Err("signature is not hex".to_string());
        }
        Ok(stored)
    }

    fn into_authorization(self, contract_address: Address) -> ReencryptionAuthorization {
        ReencryptionAuthorization {
            contract_address,
            public_key: self.public_key,
            private_key: self.private_key,
            signature: self.signature,
        }
    }
}

impl From<&ReencryptionAuthorization> for StoredAuthorization {
    fn from(value: &ReencryptionAuthorization) -> Self {
        Self {
            public_key: value.public_key.clone(),
            private_key: value.private_key.clone(),
            signature: value.signature.clone(),
        }
    }
}

/// Per-contract cache of re-encryption authorizations so the user signs at most once per
/// contract per device. Entries never expire; [`Self::clear`] is the only invalidation.
pub struct AuthorizationCache<S: DataStore> {
    store: SharedStore<S>,
}

impl<S: DataStore> Clone for AuthorizationCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: DataStore> AuthorizationCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: SharedStore::new(store),
        }
    }

    pub fn store(&self) -> &SharedStore<S> {
        &self.store
    }

    /// Read the cached authorization without creating one. A corrupted entry is an error.
    pub async fn get(&self, contract_address: Address) -> Result<Option<ReencryptionAuthorization>> {
        let key = StoreKeys::reencrypt(&contract_address);
        let Some(raw) = self.store.get(&key).await.map_err(FhevmError::storage)? else {
            return Ok(None);
        };
        match StoredAuthorization::parse(&raw) {
            Ok(stored) => Ok(Some(stored.into_authorization(contract_address))),
            Err(reason) => Err(FhevmError::CacheCorruption { key, reason }),
        }
    }

    /// Return the cached authorization for `contract_address`, or generate a keypair, ask the
    /// wallet to sign the typed data binding it to the contract and persist the result.
    ///
    /// A refused signature propagates and writes nothing. A corrupted entry is never trusted; it
    /// is replaced by a freshly signed one.
    pub async fn get_or_create(
        &self,
        contract_address: Address,
        signer: &dyn WalletSigner,
        fhe: &dyn FheInstance,
    ) -> Result<ReencryptionAuthorization> {
        match self.get(contract_address).await {
            Ok(Some(authorization)) => return Ok(authorization),
            Ok(None) => {}
            Err(e @ FhevmError::CacheCorruption { .. }) => {
                warn!(contract = %contract_address, error = %e, "Discarding cached authorization");
            }
            Err(e) => return Err(e),
        }

        let keypair = fhe.generate_keypair()?;
        let eip712 = fhe.create_eip712(&keypair.public_key, contract_address)?;
        let types = eip712.signing_types()?;

        info!(contract = %contract_address, "Requesting re-encryption authorization signature");
        let signature = signer
            .sign_typed_data(&eip712.domain, &types, &eip712.message)
            .await?;

        let authorization = ReencryptionAuthorization {
            contract_address,
            public_key: keypair.public_key.clone(),
            private_key: keypair.private_key.clone(),
            signature,
        };

        let value = serde_json::to_string(&StoredAuthorization::from(&authorization))
            .map_err(FhevmError::storage)?;
        let mut store = self.store.clone();
        store
            .insert(&StoreKeys::reencrypt(&contract_address), &value)
            .await
            .map_err(FhevmError::storage)?;

        info!(contract = %contract_address, "Stored re-encryption authorization");
        Ok(authorization)
    }

    /// Forget the authorization for one contract
    pub async fn clear(&self, contract_address: Address) -> Result<bool> {
        let mut store = self.store.clone();
        store
            .remove(&StoreKeys::reencrypt(&contract_address))
            .await
            .map_err(FhevmError::storage)
    }

    /// Forget every cached authorization, returning how many were removed
    pub async fn clear_all(&self) -> Result<usize> {
        let mut store = self.store.clone();
        let keys = store
            .keys_with_prefix(StoreKeys::REENCRYPT_PREFIX)
            .await
            .map_err(FhevmError::storage)?;
        let mut removed = 0;
        for key in keys {
            if store.remove(&key).await.map_err(FhevmError::storage)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl AuthorizationCache<AnyStore> {
    /// Open the cache on the configured backend
    pub fn open(backend: &StoreBackend) -> Result<Self> {
        let store = match backend {
            StoreBackend::Memory => AnyStore::memory(),
            StoreBackend::Sled(path) => AnyStore::sled(path).map_err(FhevmError::storage)?,
        };
        Ok(Self::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_the_persisted_layout() {
        let raw = r#"{"publicKey":"0x2000","privateKey":"0x1000","signature":"0xabcdef"}"#;
        let stored = StoredAuthorization::parse(raw).unwrap();
        assert_eq!(stored.public_key, "0x2000");
        assert_eq!(stored.private_key.expose(), "0x1000");

        let auth = stored.into_authorization(Address::ZERO);
        assert_eq!(auth.signature_without_prefix(), "abcdef");
        let round = serde_json::to_string(&StoredAuthorization::from(&auth)).unwrap();
        assert_eq!(round, raw);
    }

    #[test]
    fn test_parse_refuses_partial_entries() {
        assert!(StoredAuthorization::parse("not json").is_err());
        assert!(StoredAuthorization::parse(r#"{"publicKey":"a","privateKey":"b"}"#).is_err());
        assert!(
            StoredAuthorization::parse(r#"{"publicKey":"","privateKey":"b","signature":"0x00"}"#)
                .is_err()
        );
        assert!(StoredAuthorization::parse(
            r#"{"publicKey":"a","privateKey":"b","signature":"0xnothex"}"#
        )
        .is_err());
        assert!(StoredAuthorization::parse("null").is_err());
    }

    #[tokio::test]
    async fn test_open_memory_backend_starts_empty() {
        let cache = AuthorizationCache::<AnyStore>::open(&StoreBackend::Memory).unwrap();
        assert!(cache.get(Address::ZERO).await.unwrap().is_none());
        assert_eq!(cache.clear_all().await.unwrap(), 0);
    }
}
