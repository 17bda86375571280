// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use thiserror::Error;

pub type Result<T, E = FhevmError> = std::result::Result<T, E>;

/// Why a user supplied amount was refused before reaching the encryptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("amount must not be negative")]
    Negative,

    #[error("amount has more than {max} decimal places")]
    TooManyDecimals { max: u8 },

    #[error("amount does not fit in 64 bits once scaled by 10^{decimals}")]
    Overflow { decimals: u8 },

    #[error("an encrypted input needs at least one value")]
    NoValues,

    #[error("no token contracts to mint on")]
    NoContracts,

    #[error("the zero handle is uninitialized and cannot be re-encrypted")]
    ZeroHandle,
}

#[derive(Error, Debug)]
pub enum FhevmError {
    /// The wallet declined a signature or a transaction
    #[error("user rejected the request: {0}")]
    UserRejection(String),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The RPC node or FHE service could not be reached
    #[error("network failure: {0}")]
    Network(String),

    /// The transaction reverted or did not confirm successfully
    #[error("contract failure: {0}")]
    Contract(String),

    #[error("cached authorization at '{key}' is corrupted: {reason}")]
    CacheCorruption { key: String, reason: String },

    /// The local FHE SDK failed to produce keys, inputs or typed data
    #[error("fhe instance failure: {0}")]
    Fhe(String),

    /// The FHE service answered but refused the request
    #[error("fhe service rejected the request: {0}")]
    Service(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("{function} takes {expected} encrypted arguments but {actual} were given")]
    Arity {
        function: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Failure category, the coarse view callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UserRejection,
    Validation,
    Network,
    Contract,
    CacheCorruption,
    Fhe,
    Service,
    Storage,
}

impl FhevmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FhevmError::UserRejection(_) => ErrorKind::UserRejection,
            FhevmError::Validation(_) | FhevmError::Arity { .. } => ErrorKind::Validation,
            FhevmError::Network(_) => ErrorKind::Network,
            FhevmError::Contract(_) => ErrorKind::Contract,
            FhevmError::CacheCorruption { .. } => ErrorKind::CacheCorruption,
            FhevmError::Fhe(_) => ErrorKind::Fhe,
            FhevmError::Service(_) => ErrorKind::Service,
            FhevmError::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn storage(e: impl std::fmt::Display) -> Self {
        FhevmError::Storage(e.to_string())
    }
}
