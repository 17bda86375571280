// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    Address, EncryptedInputResult, FheInstance, FhevmError, InputValue, Result, ValidationError,
};
use tracing::debug;

/// Values waiting to be encrypted for one contract and one user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedInput {
    pub target_contract: Address,
    pub user_address: Address,
    pub values: Vec<InputValue>,
}

impl EncryptedInput {
    pub fn new(target_contract: Address, user_address: Address) -> Self {
        Self {
            target_contract,
            user_address,
            values: vec![],
        }
    }

    /// Append an amount already scaled to the token's minor units
    pub fn add64(mut self, value: u64) -> Self {
        self.values.push(InputValue::Uint64(value));
        self
    }

    /// Encrypt all values under one proof. Either every value is sealed or nothing is returned.
    pub fn encrypt(&self, fhe: &dyn FheInstance) -> Result<EncryptedInputResult> {
        if self.values.is_empty() {
            return Err(ValidationError::NoValues.into());
        }

        let mut builder = fhe.create_encrypted_input(self.target_contract, self.user_address)?;
        for value in &self.values {
            match *value {
                InputValue::Uint64(v) => builder.add64(v),
            }
        }
        let result = builder.encrypt()?;

        if result.handles.len() != self.values.len() {
            return Err(FhevmError::Fhe(format!(
                "encryptor returned {} handles for {} values",
                result.handles.len(),
                self.values.len()
            )));
        }

        debug!(
            contract = %self.target_contract,
            handles = result.handles.len(),
            proof_len = result.input_proof.len(),
            "Sealed encrypted input"
        );
        Ok(result)
    }
}

/// Encrypt `values` for `target_contract` on behalf of `user_address` in one builder
pub fn build_encrypted_input(
    fhe: &dyn FheInstance,
    target_contract: Address,
    user_address: Address,
    values: &[u64],
) -> Result<EncryptedInputResult> {
    values
        .iter()
        .fold(EncryptedInput::new(target_contract, user_address), |input, v| {
            input.add64(*v)
        })
        .encrypt(fhe)
}
