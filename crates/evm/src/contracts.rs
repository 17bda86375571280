// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{classify_contract_error, classify_rpc_error, EvmPendingTransaction};
use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    providers::fillers::{
        BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
    },
    providers::{Identity, Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    sol,
    sol_types::SolCall,
};
use async_trait::async_trait;
use eyre::{bail, Result as EyreResult};
use incoswap_config::AppConfig;
use incoswap_fhevm::{
    Address, Bytes, CiphertextHandle, ConfidentialContract, ContractFunction, EncryptedArg,
    FhevmError, PendingTransaction, Result,
};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Serializes broadcasts so nonces are filled in order
static SEND_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

sol! {
    #[sol(rpc)]
    contract ConfidentialERC20 {
        function balanceOf(address account) external view returns (uint256);
        function _mint(bytes32 encryptedAmount, bytes calldata inputProof) external;
    }

    #[sol(rpc)]
    contract ConfidentialSwapPool {
        function _mint(bytes32 encryptedAmount, bytes calldata inputProof) external;
        function mockAddLiquidity(
            bytes32 amount0,
            bytes calldata proof0,
            bytes32 amount1,
            bytes calldata proof1
        ) external;
    }
}

pub type WriteProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider,
>;

/// ABI encode `function` with its encrypted arguments as handle, proof pairs in order
pub fn encode_call(function: ContractFunction, args: &[EncryptedArg]) -> Result<Bytes> {
    let calldata = match (function, args) {
        (ContractFunction::Mint, [amount]) => ConfidentialERC20::_mintCall {
            encryptedAmount: amount.handle,
            inputProof: amount.proof.clone(),
        }
        .abi_encode(),
        (ContractFunction::MockAddLiquidity, [amount0, amount1]) => {
            ConfidentialSwapPool::mockAddLiquidityCall {
                amount0: amount0.handle,
                proof0: amount0.proof.clone(),
                amount1: amount1.handle,
                proof1: amount1.proof.clone(),
            }
            .abi_encode()
        }
        _ => {
            return Err(FhevmError::Arity {
                function: function.name(),
                expected: function.arity(),
                actual: args.len(),
            })
        }
    };
    Ok(Bytes::from(calldata))
}

/// A deployed confidential token or pool reached through an alloy provider
pub struct EvmConfidentialContract<P> {
    provider: Arc<P>,
    address: Address,
}

impl<P> Clone for EvmConfidentialContract<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            address: self.address,
        }
    }
}

impl<P: Provider> EvmConfidentialContract<P> {
    pub fn new(provider: Arc<P>, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn provider(&self) -> Arc<P> {
        self.provider.clone()
    }
}

#[async_trait]
impl<P> ConfidentialContract for EvmConfidentialContract<P>
where
    P: Provider + Send + Sync + 'static,
{
    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, owner: Address) -> Result<CiphertextHandle> {
        let contract = ConfidentialERC20::new(self.address, &*self.provider);
        let handle = contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(classify_contract_error)?;
        debug!(contract = %self.address, %owner, "Read balance handle");
        Ok(CiphertextHandle::new(handle))
    }

    async fn send(
        &self,
        function: ContractFunction,
        args: &[EncryptedArg],
    ) -> Result<Box<dyn PendingTransaction>> {
        let calldata = encode_call(function, args)?;
        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(calldata);

        let _guard = SEND_LOCK.lock().await;
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| classify_rpc_error(&e))?;

        Ok(Box::new(EvmPendingTransaction::new(pending)))
    }
}

/// The pool and tokens named in the configuration, sharing one provider
pub struct DeployedContracts {
    pub swap_pool: Arc<dyn ConfidentialContract>,
    pub token_a: Arc<dyn ConfidentialContract>,
    pub token_b: Arc<dyn ConfidentialContract>,
    pub mint_tokens: Vec<Arc<dyn ConfidentialContract>>,
}

pub struct ContractFactory;

impl ContractFactory {
    /// One contract that can both read and submit transactions signed by `signer`
    pub async fn create_write(
        http_rpc_url: &str,
        contract_address: Address,
        signer: PrivateKeySigner,
    ) -> EyreResult<EvmConfidentialContract<WriteProvider>> {
        let provider = Self::write_provider(http_rpc_url, signer).await?;
        Ok(EvmConfidentialContract::new(Arc::new(provider), contract_address))
    }

    /// Connect every configured contract. When the configuration pins a chain id the node must
    /// report the same one.
    pub async fn from_config(
        config: &AppConfig,
        signer: PrivateKeySigner,
    ) -> EyreResult<DeployedContracts> {
        let rpc = config.chain().rpc().map_err(|e| eyre::eyre!("{e}"))?;
        let url = rpc.as_http_url().map_err(|e| eyre::eyre!("{e}"))?;
        let provider = Arc::new(Self::write_provider(&url, signer).await?);

        if let Some(expected) = config.chain().chain_id {
            let actual = provider.get_chain_id().await?;
            ensure_chain_id(&config.chain().name, expected, actual)?;
        }

        let addresses = config.contracts();
        let connect = |address: Address| -> Arc<dyn ConfidentialContract> {
            Arc::new(EvmConfidentialContract::new(provider.clone(), address))
        };
        let [token_a, token_b] = addresses.balance_tokens();
        info!(chain = %config.chain().name, pool = %addresses.swap_pool, "Connected contracts");

        Ok(DeployedContracts {
            swap_pool: connect(addresses.swap_pool),
            token_a: connect(token_a),
            token_b: connect(token_b),
            mint_tokens: addresses.mint_tokens.iter().copied().map(connect).collect(),
        })
    }

    async fn write_provider(http_rpc_url: &str, signer: PrivateKeySigner) -> EyreResult<WriteProvider> {
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect(http_rpc_url)
            .await?;
        Ok(provider)
    }
}

fn ensure_chain_id(chain: &str, expected: u64, actual: u64) -> EyreResult<()> {
    if actual != expected {
        bail!("chain {chain} reports chain id {actual}, expected {expected}");
    }
    Ok(())
}
