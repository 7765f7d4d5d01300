//! The four transfer legs
//!
//! Contract-chain legs price their fee in two phases: build with a zero
//! fee, cost the draft at the current base fee, rebuild with the real fee.
//! Rebuilding cannot change the cost because amounts are fixed-width on
//! the wire, so the estimate is already settled after one round. An
//! explicit fee collapses the whole dance to a single build. Platform-chain
//! legs pay the protocol's fixed fee and never estimate.

use std::time::{SystemTime, UNIX_EPOCH};

use flarebridge_core::{constants, TxError, TxId};
use flare_chain_client::ContractChain;
use flare_signer::{KeychainSigner, TxSigner, VaultSigner};
use flare_tx::{
    build_contract_export, build_contract_import, build_platform_export, build_platform_import,
    estimate_fee, integer_to_decimal, ContractExportRequest, PlatformExportRequest,
    PlatformImportRequest, UnsignedTx,
};

use crate::context::Context;
use crate::errors::Error;

/// Memo strings conventionally stamped on platform-chain transactions
pub const PLATFORM_IMPORT_MEMO: &[u8] =
    b"PlatformVM utility method buildImportTx to import FLR to the P-Chain from the C-Chain";
pub const PLATFORM_EXPORT_MEMO: &[u8] =
    b"PlatformVM utility method buildExportTx to export FLR from the P-Chain to the C-Chain";

/// What a completed pipeline run reports back
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub tx_id: TxId,
    /// Fee actually paid, as a decimal FLR string
    pub fee_used: Option<String>,
}

fn outcome(tx_id: TxId, fee: u64) -> TransferOutcome {
    TransferOutcome {
        tx_id,
        fee_used: Some(integer_to_decimal(fee, constants::FLR_DECIMALS)),
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Settle the fee for a contract-chain transaction: one build when the
/// caller fixed the fee, otherwise build-estimate-rebuild.
async fn settle_fee<F>(
    contract: &dyn ContractChain,
    explicit_fee: Option<u64>,
    build: F,
) -> Result<(UnsignedTx, u64), Error>
where
    F: Fn(u64) -> Result<UnsignedTx, TxError>,
{
    match explicit_fee {
        Some(fee) => Ok((build(fee)?, fee)),
        None => {
            let base_fee = contract.base_fee().await?;
            let draft = build(0)?;
            let fee = estimate_fee(&draft, base_fee);
            tracing::debug!(base_fee, fee, "estimated atomic transaction fee");
            Ok((build(fee)?, fee))
        }
    }
}

/// Export `amount` from the contract chain so it can be imported on the
/// platform chain. The exported sum is grossed up by the platform chain's
/// fixed fee so the later import leg is already paid for.
pub async fn export_to_platform(
    ctx: &Context,
    signer: &dyn TxSigner,
    amount: u64,
    explicit_fee: Option<u64>,
) -> Result<TransferOutcome, Error> {
    let from = ctx.eth_address_bytes()?;
    let to = ctx.bech32_payload_bytes()?;
    let nonce = ctx.contract.transaction_count(&ctx.identity.c_address_hex).await?;
    let exported = amount
        .checked_add(constants::P_CHAIN_TX_FEE)
        .ok_or_else(|| TxError::BuildFailed("amount overflows with import fee".into()))?;

    let (tx, fee) = settle_fee(ctx.contract.as_ref(), explicit_fee, |fee| {
        build_contract_export(ContractExportRequest {
            network_id: ctx.network.network_id,
            blockchain_id: ctx.chain_ids.contract_chain,
            destination_chain: ctx.chain_ids.platform_chain,
            asset_id: ctx.chain_ids.asset,
            from_address: from,
            to_address: to,
            amount: exported,
            fee,
            nonce,
        })
    })
    .await?;

    let signed = signer.sign(&tx).await?;
    let tx_id = ctx.contract.issue_tx(&signed.bytes()).await?;
    tracing::info!(%tx_id, fee, "contract-chain export broadcast");
    Ok(outcome(tx_id, fee))
}

/// Claim platform-exported funds on the contract chain
pub async fn import_from_platform(
    ctx: &Context,
    signer: &dyn TxSigner,
    explicit_fee: Option<u64>,
) -> Result<TransferOutcome, Error> {
    let to = ctx.eth_address_bytes()?;
    let addresses = vec![ctx.identity.c_address_bech32.clone()];
    let utxos = ctx.contract.fetch_utxos(&addresses, "P").await?;
    tracing::debug!(count = utxos.len(), "exported utxos available for import");

    let (tx, fee) = settle_fee(ctx.contract.as_ref(), explicit_fee, |fee| {
        build_contract_import(
            ctx.network.network_id,
            ctx.chain_ids.contract_chain,
            ctx.chain_ids.platform_chain,
            &utxos,
            to,
            fee,
        )
    })
    .await?;

    let signed = signer.sign(&tx).await?;
    let tx_id = ctx.contract.issue_tx(&signed.bytes()).await?;
    tracing::info!(%tx_id, fee, "contract-chain import broadcast");
    Ok(outcome(tx_id, fee))
}

/// Claim contract-exported funds on the platform chain (fixed fee)
pub async fn import_to_platform(
    ctx: &Context,
    signer: &dyn TxSigner,
) -> Result<TransferOutcome, Error> {
    let to = ctx.bech32_payload_bytes()?;
    let addresses = vec![ctx.identity.p_address_bech32.clone()];
    let utxos = ctx.platform.fetch_utxos(&addresses, Some("C")).await?;
    let fee = constants::P_CHAIN_TX_FEE;

    let tx = build_platform_import(PlatformImportRequest {
        network_id: ctx.network.network_id,
        source_chain: ctx.chain_ids.contract_chain,
        utxos: &utxos,
        to_address: to,
        asset_id: ctx.chain_ids.asset,
        fee,
        as_of: unix_now(),
        memo: PLATFORM_IMPORT_MEMO.to_vec(),
    })?;

    let signed = signer.sign(&tx).await?;
    let tx_id = ctx.platform.issue_tx(&signed.bytes()).await?;
    tracing::info!(%tx_id, "platform-chain import broadcast");
    Ok(outcome(tx_id, fee))
}

/// Export from the platform chain so the funds can be imported on the
/// contract chain. With no amount, exports the full unlocked balance
/// minus the fixed fee.
pub async fn export_from_platform(
    ctx: &Context,
    signer: &dyn TxSigner,
    amount: Option<u64>,
) -> Result<TransferOutcome, Error> {
    let payload = ctx.bech32_payload_bytes()?;
    let fee = constants::P_CHAIN_TX_FEE;
    let amount = match amount {
        Some(amount) => amount,
        None => {
            let balance = ctx.platform.balance(&ctx.identity.p_address_bech32).await?;
            balance
                .unlocked
                .checked_sub(fee)
                .ok_or(TxError::InsufficientFunds {
                    required: fee,
                    available: balance.unlocked,
                })?
        }
    };
    let addresses = vec![ctx.identity.p_address_bech32.clone()];
    let utxos = ctx.platform.fetch_utxos(&addresses, None).await?;

    let tx = build_platform_export(PlatformExportRequest {
        network_id: ctx.network.network_id,
        destination_chain: ctx.chain_ids.contract_chain,
        utxos: &utxos,
        to_address: payload,
        change_address: payload,
        asset_id: ctx.chain_ids.asset,
        amount,
        fee,
        as_of: unix_now(),
        memo: PLATFORM_EXPORT_MEMO.to_vec(),
    })?;

    let signed = signer.sign(&tx).await?;
    let tx_id = ctx.platform.issue_tx(&signed.bytes()).await?;
    tracing::info!(%tx_id, amount, "platform-chain export broadcast");
    Ok(outcome(tx_id, fee))
}

fn keychain(ctx: &Context) -> Result<KeychainSigner, Error> {
    Ok(KeychainSigner::new(&ctx.identity)?)
}

/// External signing must never sit next to a loaded private key
fn check_external(ctx: &Context) -> Result<(), Error> {
    if ctx.identity.can_sign() {
        return Err(Error::PrivateKeyForbidden);
    }
    Ok(())
}

pub async fn export_to_platform_with_keychain(
    ctx: &Context,
    amount: u64,
    explicit_fee: Option<u64>,
) -> Result<TransferOutcome, Error> {
    export_to_platform(ctx, &keychain(ctx)?, amount, explicit_fee).await
}

pub async fn export_to_platform_with_vault(
    ctx: &Context,
    vault: &VaultSigner,
    amount: u64,
    explicit_fee: Option<u64>,
) -> Result<TransferOutcome, Error> {
    check_external(ctx)?;
    export_to_platform(ctx, vault, amount, explicit_fee).await
}

pub async fn import_from_platform_with_keychain(
    ctx: &Context,
    explicit_fee: Option<u64>,
) -> Result<TransferOutcome, Error> {
    import_from_platform(ctx, &keychain(ctx)?, explicit_fee).await
}

pub async fn import_from_platform_with_vault(
    ctx: &Context,
    vault: &VaultSigner,
    explicit_fee: Option<u64>,
) -> Result<TransferOutcome, Error> {
    check_external(ctx)?;
    import_from_platform(ctx, vault, explicit_fee).await
}

pub async fn import_to_platform_with_keychain(ctx: &Context) -> Result<TransferOutcome, Error> {
    import_to_platform(ctx, &keychain(ctx)?).await
}

pub async fn import_to_platform_with_vault(
    ctx: &Context,
    vault: &VaultSigner,
) -> Result<TransferOutcome, Error> {
    check_external(ctx)?;
    import_to_platform(ctx, vault).await
}

pub async fn export_from_platform_with_keychain(
    ctx: &Context,
    amount: Option<u64>,
) -> Result<TransferOutcome, Error> {
    export_from_platform(ctx, &keychain(ctx)?, amount).await
}

pub async fn export_from_platform_with_vault(
    ctx: &Context,
    vault: &VaultSigner,
    amount: Option<u64>,
) -> Result<TransferOutcome, Error> {
    check_external(ctx)?;
    export_from_platform(ctx, vault, amount).await
}
