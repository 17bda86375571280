// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::utils::digest;
use async_trait::async_trait;
use incoswap_fhevm::{Address, Eip712Domain, Eip712Types, FhevmError, Result, WalletSigner};
use serde_json::{json, Map, Value};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

/// Wallet double that counts signature prompts and can be told to decline them
#[derive(Default)]
pub struct MockSigner {
    address: Address,
    prompts: AtomicUsize,
    reject: AtomicBool,
    last_request: Mutex<Option<Value>>,
}

impl MockSigner {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    /// Decline every following signature prompt as a user would
    pub fn reject_signatures(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Number of prompts shown, accepted or not
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    /// The last typed data the wallet was asked to sign
    pub fn last_request(&self) -> Option<Value> {
        match self.last_request.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl WalletSigner for MockSigner {
    async fn get_address(&self) -> Result<Address> {
        Ok(self.address)
    }

    async fn sign_typed_data(
        &self,
        domain: &Eip712Domain,
        types: &Eip712Types,
        message: &Map<String, Value>,
    ) -> Result<String> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let request = json!({ "domain": domain, "types": types, "message": message });
        let encoded = request.to_string();
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request);
        }

        if self.reject.load(Ordering::SeqCst) {
            return Err(FhevmError::UserRejection(
                "User denied message signature".into(),
            ));
        }

        let r = digest(&[b"r", self.address.as_slice(), encoded.as_bytes()]);
        let s = digest(&[b"s", self.address.as_slice(), encoded.as_bytes()]);
        Ok(format!("0x{}{}1b", hex::encode(r), hex::encode(s)))
    }
}
