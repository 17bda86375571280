// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! User-facing flows of the swap client. Each flow parses the typed amounts, encrypts them for
//! the contract that receives the call, submits and waits for confirmation. Balance slots are
//! decrypted one at a time so a failure in one leaves the others untouched.

use crate::{
    build_encrypted_input, decrypt_balance_of, parse_amount, run_form, submit, Address,
    AmountForm, AuthorizationCache, BalanceDisplay, ConfidentialContract, ContractFunction,
    DecryptedBalance, EncryptedArg, FheInstance, FhevmError, Result, TransactionConfirmation,
    ValidationError, WalletSigner,
};
use incoswap_config::AppConfig;
use incoswap_data::{AnyStore, DataStore};
use std::{fmt, sync::Arc};
use tracing::{error, info};

/// The wallet and FHE capabilities shared by every flow
#[derive(Clone)]
pub struct SessionContext {
    pub signer: Arc<dyn WalletSigner>,
    pub fhe: Arc<dyn FheInstance>,
}

impl SessionContext {
    pub fn new(signer: Arc<dyn WalletSigner>, fhe: Arc<dyn FheInstance>) -> Self {
        Self { signer, fhe }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenRole {
    TokenA,
    TokenB,
}

impl fmt::Display for TokenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenRole::TokenA => f.write_str("Token A"),
            TokenRole::TokenB => f.write_str("Token B"),
        }
    }
}

/// One balance shown to the user together with the token it is read from
pub struct TokenSlot {
    pub role: TokenRole,
    pub contract: Arc<dyn ConfidentialContract>,
    pub balance: BalanceDisplay,
}

impl TokenSlot {
    pub fn new(role: TokenRole, contract: Arc<dyn ConfidentialContract>) -> Self {
        Self {
            role,
            contract,
            balance: BalanceDisplay::Hidden,
        }
    }
}

/// How the two liquidity amounts are sealed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputPlan {
    /// One builder and one proof per amount
    #[default]
    Independent,
    /// Both amounts under one builder, the proof is passed twice
    Shared,
}

pub struct ConfidentialSession<S: DataStore> {
    ctx: SessionContext,
    cache: AuthorizationCache<S>,
    decimals: u8,
    decrypting: bool,
}

impl ConfidentialSession<AnyStore> {
    /// Session using the configured token decimals and authorization store
    pub fn from_config(ctx: SessionContext, config: &AppConfig) -> Result<Self> {
        let cache = AuthorizationCache::<AnyStore>::open(config.store())?;
        Ok(Self::new(ctx, cache, config.token_decimals()))
    }
}

impl<S: DataStore> ConfidentialSession<S> {
    pub fn new(ctx: SessionContext, cache: AuthorizationCache<S>, decimals: u8) -> Self {
        Self {
            ctx,
            cache,
            decimals,
            decrypting: false,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn cache(&self) -> &AuthorizationCache<S> {
        &self.cache
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// True while a balance decryption is in flight
    pub fn is_decrypting(&self) -> bool {
        self.decrypting
    }

    /// Mint the typed amount on `token`
    pub async fn mint(
        &self,
        token: &dyn ConfidentialContract,
        form: &mut AmountForm,
    ) -> Result<TransactionConfirmation> {
        let amounts = form.amounts().to_vec();
        run_form(form, "mint", async move {
            let values = self.scale_amounts(&amounts, ContractFunction::Mint)?;
            let user = self.ctx.signer.get_address().await?;
            let args = self.encrypt(token.address(), user, &values)?;
            submit(token, ContractFunction::Mint, &args).await
        })
        .await
    }

    /// Mint the same typed amount on every token in order. One failing token does not stop the
    /// others; the field is cleared only when all of them succeed. An empty token list is refused
    /// without touching the form.
    pub async fn mint_each(
        &self,
        tokens: &[Arc<dyn ConfidentialContract>],
        form: &mut AmountForm,
    ) -> Result<Vec<Result<TransactionConfirmation>>> {
        if tokens.is_empty() {
            let e = FhevmError::from(ValidationError::NoContracts);
            error!(flow = "mint_each", kind = ?e.kind(), error = %e, "Operation failed");
            return Err(e);
        }
        let amounts = form.amounts().to_vec();
        form.set_busy(true);
        let outcome = self.mint_each_inner(tokens, &amounts).await;
        form.set_busy(false);

        match &outcome {
            Ok(results) if results.iter().all(|r| r.is_ok()) => form.clear(),
            Ok(_) => {}
            Err(e) => error!(flow = "mint_each", kind = ?e.kind(), error = %e, "Operation failed"),
        }
        outcome
    }

    async fn mint_each_inner(
        &self,
        tokens: &[Arc<dyn ConfidentialContract>],
        amounts: &[String],
    ) -> Result<Vec<Result<TransactionConfirmation>>> {
        let values = self.scale_amounts(amounts, ContractFunction::Mint)?;
        let user = self.ctx.signer.get_address().await?;

        let mut results = Vec::with_capacity(tokens.len());
        for token in tokens {
            let result = match self.encrypt(token.address(), user, &values) {
                Ok(args) => submit(token.as_ref(), ContractFunction::Mint, &args).await,
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                error!(flow = "mint_each", contract = %token.address(), kind = ?e.kind(), error = %e, "Mint failed");
            }
            results.push(result);
        }
        Ok(results)
    }

    /// Swap is a mint of the typed amount on the pool contract
    pub async fn swap(
        &self,
        pool: &dyn ConfidentialContract,
        form: &mut AmountForm,
    ) -> Result<TransactionConfirmation> {
        let amounts = form.amounts().to_vec();
        run_form(form, "swap", async move {
            let values = self.scale_amounts(&amounts, ContractFunction::Mint)?;
            let user = self.ctx.signer.get_address().await?;
            let args = self.encrypt(pool.address(), user, &values)?;
            submit(pool, ContractFunction::Mint, &args).await
        })
        .await
    }

    /// Provide both typed amounts to the pool in one `mockAddLiquidity` call
    pub async fn add_liquidity(
        &self,
        pool: &dyn ConfidentialContract,
        form: &mut AmountForm,
        plan: InputPlan,
    ) -> Result<TransactionConfirmation> {
        let amounts = form.amounts().to_vec();
        run_form(form, "add_liquidity", async move {
            let values = self.scale_amounts(&amounts, ContractFunction::MockAddLiquidity)?;
            let user = self.ctx.signer.get_address().await?;
            let args = match plan {
                InputPlan::Shared => self.encrypt(pool.address(), user, &values)?,
                InputPlan::Independent => {
                    let mut args = Vec::with_capacity(values.len());
                    for value in &values {
                        args.extend(self.encrypt(pool.address(), user, &[*value])?);
                    }
                    args
                }
            };
            submit(pool, ContractFunction::MockAddLiquidity, &args).await
        })
        .await
    }

    /// Decrypt the caller's balance on `slot`. On failure the slot keeps what it showed before.
    pub async fn decrypt_balance(&mut self, slot: &mut TokenSlot) -> Result<DecryptedBalance> {
        self.decrypting = true;
        let result = self.fetch_balance(slot.contract.as_ref()).await;
        self.decrypting = false;

        match result {
            Ok(balance) => {
                info!(token = %slot.role, contract = %slot.contract.address(), "Balance decrypted");
                slot.balance = BalanceDisplay::Decrypted(balance.clone());
                Ok(balance)
            }
            Err(e) => {
                error!(token = %slot.role, kind = ?e.kind(), error = %e, "Decryption failed");
                Err(e)
            }
        }
    }

    /// Decrypt every slot in order, each independently of the others
    pub async fn decrypt_balances(
        &mut self,
        slots: &mut [TokenSlot],
    ) -> Vec<Result<DecryptedBalance>> {
        let mut results = Vec::with_capacity(slots.len());
        for slot in slots.iter_mut() {
            results.push(self.decrypt_balance(slot).await);
        }
        results
    }

    async fn fetch_balance(&self, token: &dyn ConfidentialContract) -> Result<DecryptedBalance> {
        let user = self.ctx.signer.get_address().await?;
        let authorization = self
            .cache
            .get_or_create(token.address(), self.ctx.signer.as_ref(), self.ctx.fhe.as_ref())
            .await?;
        decrypt_balance_of(self.ctx.fhe.as_ref(), token, &authorization, user).await
    }

    fn scale_amounts(&self, amounts: &[String], function: ContractFunction) -> Result<Vec<u64>> {
        if amounts.len() != function.arity() {
            return Err(FhevmError::Arity {
                function: function.name(),
                expected: function.arity(),
                actual: amounts.len(),
            });
        }
        amounts
            .iter()
            .map(|a| parse_amount(a, self.decimals).map_err(FhevmError::from))
            .collect()
    }

    fn encrypt(&self, target: Address, user: Address, values: &[u64]) -> Result<Vec<EncryptedArg>> {
        Ok(build_encrypted_input(self.ctx.fhe.as_ref(), target, user, values)?.into_args())
    }
}
