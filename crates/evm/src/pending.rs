// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::classify_pending_error;
use alloy::{network::Ethereum, providers::PendingTransactionBuilder};
use async_trait::async_trait;
use incoswap_fhevm::{FhevmError, PendingTransaction, Result, TransactionConfirmation, B256};
use tracing::debug;

/// A broadcast transaction waiting for its receipt
pub struct EvmPendingTransaction {
    inner: PendingTransactionBuilder<Ethereum>,
}

impl EvmPendingTransaction {
    pub fn new(inner: PendingTransactionBuilder<Ethereum>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl PendingTransaction for EvmPendingTransaction {
    fn tx_hash(&self) -> B256 {
        *self.inner.tx_hash()
    }

    async fn wait(self: Box<Self>) -> Result<TransactionConfirmation> {
        let tx_hash = self.tx_hash();
        debug!(%tx_hash, "Waiting for receipt");
        let receipt = self
            .inner
            .get_receipt()
            .await
            .map_err(classify_pending_error)?;

        confirmation(receipt.transaction_hash, receipt.status(), receipt.block_number)
    }
}

/// A mined receipt with a failed status is a contract error
pub(crate) fn confirmation(
    tx_hash: B256,
    status: bool,
    block_number: Option<u64>,
) -> Result<TransactionConfirmation> {
    if !status {
        return Err(FhevmError::Contract(format!(
            "transaction {tx_hash} reverted"
        )));
    }
    Ok(TransactionConfirmation {
        tx_hash,
        block_number,
    })
}
