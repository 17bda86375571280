// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    consensus::Transaction as _,
    node_bindings::{Anvil, AnvilInstance},
    primitives::{Address, Bytes, B256},
    providers::Provider,
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use eyre::{eyre, Result};
use incoswap_config::UnscopedAppConfig;
use incoswap_evm::{ConfidentialERC20, ConfidentialSwapPool, ContractFactory};
use incoswap_fhevm::{ConfidentialContract, ContractFunction, EncryptedArg, ErrorKind};
use incoswap_test_helpers::init_test_tracing;
use std::path::Path;
use tracing::warn;

// PUSH1 0 PUSH1 0 REVERT
const REVERTING_CODE: [u8; 5] = [0x60, 0x00, 0x60, 0x00, 0xfd];

// NOTE: Anvil must be available on $PATH, these tests are skipped otherwise
fn spawn_anvil() -> Option<AnvilInstance> {
    match Anvil::new().try_spawn() {
        Ok(anvil) => Some(anvil),
        Err(e) => {
            warn!(error = %e, "anvil not available, skipping");
            None
        }
    }
}

fn dev_signer(anvil: &AnvilInstance) -> Result<PrivateKeySigner> {
    Ok(PrivateKeySigner::from_slice(&anvil.keys()[0].to_bytes())?)
}

fn arg(handle: u8, proof: &[u8]) -> EncryptedArg {
    EncryptedArg {
        handle: B256::repeat_byte(handle),
        proof: Bytes::copy_from_slice(proof),
    }
}

#[tokio::test]
async fn test_mint_is_mined_with_encoded_calldata() -> Result<()> {
    let _guard = init_test_tracing();
    let Some(anvil) = spawn_anvil() else {
        return Ok(());
    };

    let token = Address::repeat_byte(0x42);
    let contract = ContractFactory::create_write(&anvil.endpoint(), token, dev_signer(&anvil)?).await?;
    let amount = arg(0x07, b"mint-proof");

    let pending = contract
        .send(ContractFunction::Mint, &[amount.clone()])
        .await?;
    let tx_hash = pending.tx_hash();
    let confirmation = pending.wait().await?;
    assert_eq!(confirmation.tx_hash, tx_hash);
    assert!(confirmation.block_number.is_some());

    let tx = contract
        .provider()
        .get_transaction_by_hash(tx_hash)
        .await?
        .ok_or_else(|| eyre!("transaction {tx_hash} not found"))?;
    assert_eq!(tx.to(), Some(token));
    let call = ConfidentialERC20::_mintCall::abi_decode(tx.input())?;
    assert_eq!(call.encryptedAmount, amount.handle);
    assert_eq!(call.inputProof, amount.proof);
    Ok(())
}

#[tokio::test]
async fn test_add_liquidity_sends_both_amounts_in_order() -> Result<()> {
    let _guard = init_test_tracing();
    let Some(anvil) = spawn_anvil() else {
        return Ok(());
    };

    let pool = ContractFactory::create_write(
        &anvil.endpoint(),
        Address::repeat_byte(0x43),
        dev_signer(&anvil)?,
    )
    .await?;
    let first = arg(0xa0, b"proof-0");
    let second = arg(0xb1, b"proof-1");

    let pending = pool
        .send(
            ContractFunction::MockAddLiquidity,
            &[first.clone(), second.clone()],
        )
        .await?;
    let tx_hash = pending.tx_hash();
    pending.wait().await?;

    let tx = pool
        .provider()
        .get_transaction_by_hash(tx_hash)
        .await?
        .ok_or_else(|| eyre!("transaction {tx_hash} not found"))?;
    let call = ConfidentialSwapPool::mockAddLiquidityCall::abi_decode(tx.input())?;
    assert_eq!(call.amount0, first.handle);
    assert_eq!(call.proof0, first.proof);
    assert_eq!(call.amount1, second.handle);
    assert_eq!(call.proof1, second.proof);
    Ok(())
}

#[tokio::test]
async fn test_reverting_contract_surfaces_as_contract_error() -> Result<()> {
    let _guard = init_test_tracing();
    let Some(anvil) = spawn_anvil() else {
        return Ok(());
    };

    let address = Address::repeat_byte(0x44);
    let contract = ContractFactory::create_write(&anvil.endpoint(), address, dev_signer(&anvil)?).await?;
    contract
        .provider()
        .raw_request::<_, ()>(
            "anvil_setCode".into(),
            (address, Bytes::from_static(&REVERTING_CODE)),
        )
        .await?;

    let err = match contract
        .send(ContractFunction::Mint, &[arg(0x01, b"p")])
        .await
    {
        Ok(_) => return Err(eyre!("send to a reverting contract succeeded")),
        Err(e) => e,
    };
    assert_eq!(err.kind(), ErrorKind::Contract);

    let err = contract.balance_of(Address::repeat_byte(0x01)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Contract);
    Ok(())
}

#[tokio::test]
async fn test_from_config_checks_the_chain_id() -> Result<()> {
    let _guard = init_test_tracing();
    let Some(anvil) = spawn_anvil() else {
        return Ok(());
    };

    let config_for = |chain_id: u64| -> Result<_> {
        let yaml = format!(
            r#"
chain:
  name: "anvil"
  rpc_url: "{}"
  chain_id: {chain_id}
contracts:
  swap_pool: "0x5550edF005ffFc7f398Dc7A2DD6d5021E8D97886"
  token_a: "0x811945cc1d17482359a27a4e7d43c352dfae0540"
  token_b: "0x79B912539834946DF7DFaA2539b31D2B4E487d76"
  mint_tokens: ["0x811945cc1d17482359a27a4e7d43c352dfae0540"]
store:
  type: memory
"#,
            anvil.endpoint()
        );
        let unscoped: UnscopedAppConfig = serde_yaml::from_str(&yaml)?;
        unscoped
            .resolve_with_defaults(Path::new("/default/data"), Path::new("/my/cwd"))
            .map_err(|e| eyre!("{e}"))
    };

    let matching = config_for(anvil.chain_id())?;
    let deployed = ContractFactory::from_config(&matching, dev_signer(&anvil)?).await?;
    assert_eq!(deployed.swap_pool.address(), matching.contracts().swap_pool);
    assert_eq!(deployed.token_a.address(), matching.contracts().token_a);
    assert_eq!(deployed.token_b.address(), matching.contracts().token_b);
    assert_eq!(deployed.mint_tokens.len(), 1);

    let wrong = config_for(anvil.chain_id() + 1)?;
    let err = match ContractFactory::from_config(&wrong, dev_signer(&anvil)?).await {
        Ok(_) => return Err(eyre!("mismatched chain id was accepted")),
        Err(e) => e,
    };
    assert!(err.to_string().contains("chain id"));
    Ok(())
}
