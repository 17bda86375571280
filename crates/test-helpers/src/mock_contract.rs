// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{utils::digest, MockFheInstance};
use async_trait::async_trait;
use incoswap_fhevm::{
    Address, CiphertextHandle, ConfidentialContract, ContractFunction, EncryptedArg, FhevmError,
    PendingTransaction, Result, TransactionConfirmation, B256,
};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};
use tracing::trace;

/// One state-changing call the contract accepted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub function: ContractFunction,
    pub args: Vec<EncryptedArg>,
}

#[derive(Default)]
struct ContractState {
    balances: HashMap<Address, CiphertextHandle>,
    calls: Vec<RecordedCall>,
    balance_reads: usize,
    revert: Option<String>,
    balance_error: Option<String>,
    block: u64,
}

/// Confidential token or pool double. `send` records the call and, for `_mint`, credits the
/// decrypted amount to the caller so a following balance read reflects it.
pub struct MockConfidentialContract {
    address: Address,
    caller: Address,
    fhe: MockFheInstance,
    state: Mutex<ContractState>,
}

impl MockConfidentialContract {
    pub fn new(address: Address, caller: Address, fhe: MockFheInstance) -> Self {
        Self {
            address,
            caller,
            fhe,
            state: Mutex::new(ContractState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ContractState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Give `owner` an encrypted balance of `value`
    pub fn set_balance(&self, owner: Address, value: u64) -> CiphertextHandle {
        let handle = self.fhe.register_ciphertext(value);
        self.state().balances.insert(owner, handle);
        handle
    }

    /// Revert every following transaction with `reason`
    pub fn revert_with(&self, reason: Option<&str>) {
        self.state().revert = reason.map(str::to_owned);
    }

    /// Fail every following balance read with a network error
    pub fn fail_balance_reads(&self, reason: Option<&str>) {
        self.state().balance_error = reason.map(str::to_owned);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn balance_reads(&self) -> usize {
        self.state().balance_reads
    }

    fn credit(&self, state: &mut ContractState, amount: B256) -> Result<()> {
        let minted = self
            .fhe
            .value_of(amount)
            .ok_or_else(|| FhevmError::Contract("execution reverted: invalid input".into()))?;
        let current = match state.balances.get(&self.caller) {
            Some(handle) if !handle.is_zero() => {
                self.fhe.value_of(handle.to_b256()).unwrap_or_default()
            }
            _ => 0,
        };
        let total = current
            .checked_add(minted)
            .ok_or_else(|| FhevmError::Contract("execution reverted: overflow".into()))?;
        let handle = self.fhe.register_ciphertext(total);
        state.balances.insert(self.caller, handle);
        Ok(())
    }
}

#[async_trait]
impl ConfidentialContract for MockConfidentialContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, owner: Address) -> Result<CiphertextHandle> {
        let mut state = self.state();
        state.balance_reads += 1;
        if let Some(reason) = &state.balance_error {
            return Err(FhevmError::Network(reason.clone()));
        }
        Ok(state
            .balances
            .get(&owner)
            .copied()
            .unwrap_or(CiphertextHandle::ZERO))
    }

    async fn send(
        &self,
        function: ContractFunction,
        args: &[EncryptedArg],
    ) -> Result<Box<dyn PendingTransaction>> {
        let mut state = self.state();
        if let Some(reason) = &state.revert {
            return Err(FhevmError::Contract(format!("execution reverted: {reason}")));
        }
        if function == ContractFunction::Mint {
            if let Some(arg) = args.first() {
                self.credit(&mut state, arg.handle)?;
            }
        }

        state.calls.push(RecordedCall {
            function,
            args: args.to_vec(),
        });
        state.block += 1;
        let nonce = state.calls.len() as u64;
        let tx_hash = digest(&[self.address.as_slice(), &nonce.to_be_bytes()]);
        trace!(function = function.name(), %tx_hash, "Mock transaction accepted");

        Ok(Box::new(MockPendingTransaction {
            tx_hash,
            block_number: state.block,
        }))
    }
}

pub struct MockPendingTransaction {
    tx_hash: B256,
    block_number: u64,
}

#[async_trait]
impl PendingTransaction for MockPendingTransaction {
    fn tx_hash(&self) -> B256 {
        self.tx_hash
    }

    async fn wait(self: Box<Self>) -> Result<TransactionConfirmation> {
        Ok(TransactionConfirmation {
            tx_hash: self.tx_hash,
            block_number: Some(self.block_number),
        })
    }
}
