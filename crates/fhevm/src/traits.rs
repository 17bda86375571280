// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    Address, CiphertextHandle, Eip712Domain, Eip712Request, Eip712Types, EncryptedArg,
    EncryptedInputResult, Keypair, PrivateKey, Result, TransactionConfirmation, B256,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// Wallet capability: an account that can sign EIP-712 typed data and send transactions
#[async_trait]
pub trait WalletSigner: Send + Sync {
    async fn get_address(&self) -> Result<Address>;

    /// Returns the `0x` prefixed signature. Suspends until the user approves in their wallet;
    /// a refusal must come back as [`crate::FhevmError::UserRejection`].
    async fn sign_typed_data(
        &self,
        domain: &Eip712Domain,
        types: &Eip712Types,
        message: &Map<String, Value>,
    ) -> Result<String>;
}

/// Accumulates plaintexts bound to one (contract, user) pair until sealed
pub trait EncryptedInputBuilder: Send {
    fn add64(&mut self, value: u64);

    /// Encrypt every added value under one proof
    fn encrypt(self: Box<Self>) -> Result<EncryptedInputResult>;
}

/// Everything the FHE service needs to re-encrypt one handle for one user
#[derive(Clone, Copy)]
pub struct ReencryptRequest<'a> {
    pub handle: CiphertextHandle,
    pub private_key: &'a PrivateKey,
    pub public_key: &'a str,
    /// Hex signature without its `0x` prefix
    pub signature: &'a str,
    pub contract_address: Address,
    pub user_address: Address,
}

impl fmt::Debug for ReencryptRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReencryptRequest")
            .field("handle", &self.handle)
            .field("contract_address", &self.contract_address)
            .field("user_address", &self.user_address)
            .finish_non_exhaustive()
    }
}

/// The FHE SDK instance
#[async_trait]
pub trait FheInstance: Send + Sync {
    fn create_encrypted_input(
        &self,
        contract_address: Address,
        user_address: Address,
    ) -> Result<Box<dyn EncryptedInputBuilder>>;

    fn generate_keypair(&self) -> Result<Keypair>;

    /// Typed data binding `public_key` to `contract_address`
    fn create_eip712(&self, public_key: &str, contract_address: Address) -> Result<Eip712Request>;

    /// A single round trip to the FHE service returning the plaintext as decimal digits
    async fn reencrypt(&self, request: ReencryptRequest<'_>) -> Result<String>;
}

/// State-mutating functions of the confidential contracts, each taking (handle, proof) pairs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractFunction {
    /// `_mint(bytes32 encryptedAmount, bytes inputProof)`
    Mint,
    /// `mockAddLiquidity(bytes32 amount0, bytes proof0, bytes32 amount1, bytes proof1)`
    MockAddLiquidity,
}

impl ContractFunction {
    pub fn name(&self) -> &'static str {
        match self {
            ContractFunction::Mint => "_mint",
            ContractFunction::MockAddLiquidity => "mockAddLiquidity",
        }
    }

    /// Number of encrypted (handle, proof) pairs the function takes
    pub fn arity(&self) -> usize {
        match self {
            ContractFunction::Mint => 1,
            ContractFunction::MockAddLiquidity => 2,
        }
    }
}

/// A submitted transaction that must be awaited until confirmed
#[async_trait]
pub trait PendingTransaction: Send {
    fn tx_hash(&self) -> B256;

    async fn wait(self: Box<Self>) -> Result<TransactionConfirmation>;
}

/// Ledger capability of one deployed confidential contract
#[async_trait]
pub trait ConfidentialContract: Send + Sync {
    fn address(&self) -> Address;

    async fn balance_of(&self, owner: Address) -> Result<CiphertextHandle>;

    /// Call `function` with `args` flattened in order as handle, proof, handle, proof..
    async fn send(
        &self,
        function: ContractFunction,
        args: &[EncryptedArg],
    ) -> Result<Box<dyn PendingTransaction>>;
}
