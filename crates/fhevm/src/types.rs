// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{FhevmError, Result};
pub use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Opaque on-chain reference to an encrypted value as returned by a balance accessor.
/// The zero handle means the account never received a balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CiphertextHandle(U256);

impl CiphertextHandle {
    pub const ZERO: CiphertextHandle = CiphertextHandle(U256::ZERO);

    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn to_b256(&self) -> B256 {
        B256::from(self.0)
    }
}

impl From<B256> for CiphertextHandle {
    fn from(value: B256) -> Self {
        Self(U256::from_be_bytes(value.0))
    }
}

impl From<U256> for CiphertextHandle {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

// Decimal, so the zero sentinel renders as "0"
impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A plaintext queued for encryption together with its encrypted type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputValue {
    Uint64(u64),
}

/// Ciphertext handles and the proof they were sealed with. Handles follow the insertion order
/// of their values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedInputResult {
    pub handles: Vec<B256>,
    pub input_proof: Bytes,
}

impl EncryptedInputResult {
    /// The argument pair for the value inserted at `index`
    pub fn arg(&self, index: usize) -> Option<EncryptedArg> {
        self.handles.get(index).map(|handle| EncryptedArg {
            handle: *handle,
            proof: self.input_proof.clone(),
        })
    }

    /// One argument pair per handle, each carrying the shared proof
    pub fn into_args(self) -> Vec<EncryptedArg> {
        let proof = self.input_proof;
        self.handles
            .into_iter()
            .map(|handle| EncryptedArg {
                handle,
                proof: proof.clone(),
            })
            .collect()
    }
}

/// A handle and the proof that must accompany it into a contract call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedArg {
    pub handle: B256,
    pub proof: Bytes,
}

impl EncryptedArg {
    /// The proof as a `0x` prefixed hex string
    pub fn proof_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.proof))
    }
}

/// Client-held secret half of a re-encryption keypair. Zeroized on drop and never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keypair {
    pub public_key: String,
    pub private_key: PrivateKey,
}

/// Keypair plus the user's signature binding the public key to one contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReencryptionAuthorization {
    pub contract_address: Address,
    pub public_key: String,
    pub private_key: PrivateKey,
    pub signature: String,
}

impl ReencryptionAuthorization {
    /// The signature as the FHE service expects it
    pub fn signature_without_prefix(&self) -> &str {
        self.signature
            .strip_prefix("0x")
            .unwrap_or(&self.signature)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl Eip712Field {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_owned(),
            ty: ty.to_owned(),
        }
    }
}

pub type Eip712Types = BTreeMap<String, Vec<Eip712Field>>;

/// The `Reencrypt` primary type every authorization signs
pub const REENCRYPT_TYPE: &str = "Reencrypt";

/// Typed data produced by the FHE instance for a re-encryption authorization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Request {
    pub domain: Eip712Domain,
    pub types: Eip712Types,
    pub message: serde_json::Map<String, serde_json::Value>,
}

impl Eip712Request {
    /// Only the `Reencrypt` type set goes to the wallet, the domain type is implied by the
    /// EIP-712 standard.
    pub fn signing_types(&self) -> Result<Eip712Types> {
        let fields = self.types.get(REENCRYPT_TYPE).ok_or_else(|| {
            FhevmError::Fhe(format!("typed data has no '{REENCRYPT_TYPE}' type"))
        })?;
        Ok(BTreeMap::from([(REENCRYPT_TYPE.to_string(), fields.clone())]))
    }
}

/// Decrypted plaintext in minor units, as a string of decimal digits
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecryptedBalance(String);

impl DecryptedBalance {
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    pub fn parse(value: &str) -> Result<Self> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FhevmError::Service(format!(
                "decrypted value '{value}' is not a decimal integer"
            )));
        }
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecryptedBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proof of a confirmed transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionConfirmation {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_handle_sentinel() {
        assert!(CiphertextHandle::ZERO.is_zero());
        assert_eq!(CiphertextHandle::ZERO.to_string(), "0");
        assert!(!CiphertextHandle::new(U256::from(7u64)).is_zero());
    }

    #[test]
    fn test_handle_from_b256_is_big_endian() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let handle = CiphertextHandle::from(B256::from(bytes));
        assert_eq!(handle.as_u256(), U256::from(1u64));
        assert_eq!(handle.to_b256(), B256::from(bytes));
    }

    #[test]
    fn test_args_share_the_proof() {
        let result = EncryptedInputResult {
            handles: vec![B256::repeat_byte(1), B256::repeat_byte(2)],
            input_proof: Bytes::from(vec![0xab, 0xcd]),
        };
        assert_eq!(result.arg(1).unwrap().handle, B256::repeat_byte(2));
        assert!(result.arg(2).is_none());

        let args = result.into_args();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].proof_hex(), "0xabcd");
        assert_eq!(args[0].proof, args[1].proof);
    }

    #[test]
    fn test_private_key_is_redacted() {
        let key = PrivateKey::new("deadbeef");
        assert_eq!(format!("{key:?}"), "PrivateKey(<redacted>)");
        assert_eq!(key.expose(), "deadbeef");
    }

    #[test]
    fn test_signature_prefix_is_stripped_once() {
        let auth = ReencryptionAuthorization {
            contract_address: Address::ZERO,
            public_key: "pk".into(),
            private_key: PrivateKey::new("sk"),
            signature: "0xabc0x".into(),
        };
        assert_eq!(auth.signature_without_prefix(), "abc0x");
    }

    #[test]
    fn test_decrypted_balance_must_be_digits() {
        assert!(DecryptedBalance::parse("1000000").is_ok());
        assert!(DecryptedBalance::parse("").is_err());
        assert!(DecryptedBalance::parse("-1").is_err());
        assert!(DecryptedBalance::parse("1e6").is_err());
    }
}
