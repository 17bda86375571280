// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    providers::PendingTransactionError,
    transports::{RpcError, TransportErrorKind},
};
use incoswap_fhevm::FhevmError;

/// EIP-1193 code a wallet returns when the user declines a request
pub const USER_REJECTED_CODE: i64 = 4001;

/// An error response from the node or wallet means the request arrived and was refused. Anything
/// else means it never got an answer.
pub fn classify_rpc_error(err: &RpcError<TransportErrorKind>) -> FhevmError {
    match err.as_error_resp() {
        Some(payload) if payload.code == USER_REJECTED_CODE => {
            FhevmError::UserRejection(payload.message.to_string())
        }
        Some(_) => FhevmError::Contract(err.to_string()),
        None => FhevmError::Network(err.to_string()),
    }
}

pub fn classify_contract_error(err: alloy::contract::Error) -> FhevmError {
    match &err {
        alloy::contract::Error::TransportError(rpc) => classify_rpc_error(rpc),
        _ => FhevmError::Contract(err.to_string()),
    }
}

pub fn classify_pending_error(err: PendingTransactionError) -> FhevmError {
    match &err {
        PendingTransactionError::TransportError(rpc) => classify_rpc_error(rpc),
        _ => FhevmError::Network(err.to_string()),
    }
}
