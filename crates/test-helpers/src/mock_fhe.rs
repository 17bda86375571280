// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::utils::digest;
use async_trait::async_trait;
use incoswap_fhevm::{
    Address, Bytes, CiphertextHandle, Eip712Domain, Eip712Field, Eip712Request,
    EncryptedInputBuilder, EncryptedInputResult, FheInstance, FhevmError, Keypair, PrivateKey,
    ReencryptRequest, Result, B256, REENCRYPT_TYPE, U256,
};
use serde_json::{json, Map};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

pub const MOCK_CHAIN_ID: u64 = 9090;

#[derive(Default)]
struct Ledger {
    /// Plaintext behind every ciphertext handle the mock ever produced
    values: HashMap<U256, u64>,
    /// Contract each public key was bound to by its typed data
    bindings: HashMap<String, Address>,
    nonce: u64,
    keypairs: usize,
    inputs: usize,
    reencrypts: usize,
    fail_reencrypt: Option<String>,
}

/// Deterministic stand-in for the FHE SDK. Handles are hashes, "ciphertexts" are kept in a
/// shared ledger so contracts and re-encryption can resolve them.
#[derive(Clone, Default)]
pub struct MockFheInstance {
    ledger: Arc<Mutex<Ledger>>,
}

impl MockFheInstance {
    pub fn new() -> Self {
        Self::default()
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        match self.ledger.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Mint a fresh handle that re-encrypts to `value`
    pub fn register_ciphertext(&self, value: u64) -> CiphertextHandle {
        let mut ledger = self.ledger();
        ledger.nonce += 1;
        let handle = digest(&[b"ciphertext", &ledger.nonce.to_be_bytes(), &value.to_be_bytes()]);
        ledger.values.insert(U256::from_be_bytes(handle.0), value);
        CiphertextHandle::from(handle)
    }

    /// Plaintext behind `handle`, if the mock produced it
    pub fn value_of(&self, handle: B256) -> Option<u64> {
        self.ledger()
            .values
            .get(&U256::from_be_bytes(handle.0))
            .copied()
    }

    /// Make every following re-encryption fail with a service error
    pub fn fail_reencrypt(&self, reason: Option<&str>) {
        self.ledger().fail_reencrypt = reason.map(str::to_owned);
    }

    pub fn keypairs_generated(&self) -> usize {
        self.ledger().keypairs
    }

    pub fn inputs_created(&self) -> usize {
        self.ledger().inputs
    }

    pub fn reencrypt_calls(&self) -> usize {
        self.ledger().reencrypts
    }
}

/// Builder handed out by [`MockFheInstance`]
pub struct MockInputBuilder {
    ledger: Arc<Mutex<Ledger>>,
    contract_address: Address,
    user_address: Address,
    values: Vec<u64>,
}

impl EncryptedInputBuilder for MockInputBuilder {
    fn add64(&mut self, value: u64) {
        self.values.push(value);
    }

    fn encrypt(self: Box<Self>) -> Result<EncryptedInputResult> {
        let mut ledger = match self.ledger.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        ledger.nonce += 1;
        let nonce = ledger.nonce.to_be_bytes();

        let mut handles = Vec::with_capacity(self.values.len());
        for (index, value) in self.values.iter().enumerate() {
            let handle = digest(&[
                self.contract_address.as_slice(),
                self.user_address.as_slice(),
                &nonce,
                &(index as u64).to_be_bytes(),
                &value.to_be_bytes(),
            ]);
            ledger.values.insert(U256::from_be_bytes(handle.0), *value);
            handles.push(handle);
        }

        let mut proof_parts: Vec<&[u8]> = vec![b"proof", self.contract_address.as_slice()];
        proof_parts.extend(handles.iter().map(|h| h.as_slice()));
        let proof = digest(&proof_parts);

        Ok(EncryptedInputResult {
            handles,
            input_proof: Bytes::copy_from_slice(proof.as_slice()),
        })
    }
}

#[async_trait]
impl FheInstance for MockFheInstance {
    fn create_encrypted_input(
        &self,
        contract_address: Address,
        user_address: Address,
    ) -> Result<Box<dyn EncryptedInputBuilder>> {
        self.ledger().inputs += 1;
        Ok(Box::new(MockInputBuilder {
            ledger: self.ledger.clone(),
            contract_address,
            user_address,
            values: vec![],
        }))
    }

    fn generate_keypair(&self) -> Result<Keypair> {
        let mut ledger = self.ledger();
        ledger.keypairs += 1;
        let n = ledger.keypairs as u64;
        Ok(Keypair {
            public_key: format!("0x{}", hex::encode(digest(&[b"public", &n.to_be_bytes()]))),
            private_key: PrivateKey::new(format!(
                "0x{}",
                hex::encode(digest(&[b"private", &n.to_be_bytes()]))
            )),
        })
    }

    fn create_eip712(&self, public_key: &str, contract_address: Address) -> Result<Eip712Request> {
        self.ledger()
            .bindings
            .insert(public_key.to_owned(), contract_address);

        let mut message = Map::new();
        message.insert("publicKey".into(), json!(public_key));
        Ok(Eip712Request {
            domain: Eip712Domain {
                name: "Authorization token".into(),
                version: "1".into(),
                chain_id: MOCK_CHAIN_ID,
                verifying_contract: contract_address,
            },
            types: BTreeMap::from([
                (
                    "EIP712Domain".to_string(),
                    vec![
                        Eip712Field::new("name", "string"),
                        Eip712Field::new("version", "string"),
                        Eip712Field::new("chainId", "uint256"),
                        Eip712Field::new("verifyingContract", "address"),
                    ],
                ),
                (
                    REENCRYPT_TYPE.to_string(),
                    vec![Eip712Field::new("publicKey", "bytes32")],
                ),
            ]),
            message,
        })
    }

    async fn reencrypt(&self, request: ReencryptRequest<'_>) -> Result<String> {
        let mut ledger = self.ledger();
        ledger.reencrypts += 1;

        if let Some(reason) = &ledger.fail_reencrypt {
            return Err(FhevmError::Service(reason.clone()));
        }
        if request.signature.is_empty() || request.private_key.expose().is_empty() {
            return Err(FhevmError::Service("missing authorization".into()));
        }
        match ledger.bindings.get(request.public_key) {
            Some(bound) if *bound == request.contract_address => {}
            _ => {
                return Err(FhevmError::Service(format!(
                    "public key is not authorized for {}",
                    request.contract_address
                )))
            }
        }

        ledger
            .values
            .get(&request.handle.as_u256())
            .map(u64::to_string)
            .ok_or_else(|| FhevmError::Service(format!("unknown handle {}", request.handle)))
    }
}
