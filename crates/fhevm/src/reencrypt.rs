// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    Address, CiphertextHandle, ConfidentialContract, DecryptedBalance, FheInstance,
    ReencryptRequest, ReencryptionAuthorization, Result, ValidationError,
};
use tracing::debug;

/// Ask the FHE service to re-encrypt `handle` for `user_address` and return the plaintext.
///
/// The zero handle is refused: an uninitialized balance is known to be zero and must not reach
/// the service. The binding between `authorization` and `target_contract` is checked by the
/// service, not here.
pub async fn reencrypt(
    fhe: &dyn FheInstance,
    handle: CiphertextHandle,
    authorization: &ReencryptionAuthorization,
    target_contract: Address,
    user_address: Address,
) -> Result<DecryptedBalance> {
    if handle.is_zero() {
        return Err(ValidationError::ZeroHandle.into());
    }

    let request = ReencryptRequest {
        handle,
        private_key: &authorization.private_key,
        public_key: &authorization.public_key,
        signature: authorization.signature_without_prefix(),
        contract_address: target_contract,
        user_address,
    };
    debug!(?request, "Requesting re-encryption");

    let plaintext = fhe.reencrypt(request).await?;
    DecryptedBalance::parse(plaintext.trim())
}

/// Read the caller's balance handle from `token` and decrypt it, short-circuiting the zero
/// handle to a zero balance without contacting the FHE service.
pub async fn decrypt_balance_of(
    fhe: &dyn FheInstance,
    token: &dyn ConfidentialContract,
    authorization: &ReencryptionAuthorization,
    user_address: Address,
) -> Result<DecryptedBalance> {
    let handle = token.balance_of(user_address).await?;
    if handle.is_zero() {
        debug!(contract = %token.address(), "Balance handle is zero");
        return Ok(DecryptedBalance::zero());
    }
    reencrypt(fhe, handle, authorization, token.address(), user_address).await
}
