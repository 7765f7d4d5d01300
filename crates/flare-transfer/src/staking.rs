//! Stake delegation on the platform chain

use flarebridge_core::TxId;
use flare_signer::{KeychainSigner, TxSigner, VaultSigner};
use flare_tx::{build_add_delegator, DelegatorRequest, NodeId};

use crate::context::Context;
use crate::errors::Error;
use crate::transfer::unix_now;

/// Memo conventionally stamped on delegation transactions
pub const DELEGATION_MEMO: &[u8] =
    b"PlatformVM utility method buildAddDelegatorTx to add a delegator to the primary subnet";

/// Delegate `stake_amount` to a validator for the given window.
/// Delegations carry no fee; the ledger validates the time window and
/// the validator's capacity.
pub async fn add_delegator(
    ctx: &Context,
    signer: &dyn TxSigner,
    node_id: &str,
    stake_amount: u64,
    start_time: u64,
    end_time: u64,
) -> Result<TxId, Error> {
    let node_id = NodeId::parse(node_id)?;
    let owner = ctx.bech32_payload_bytes()?;
    let addresses = vec![ctx.identity.p_address_bech32.clone()];
    let utxos = ctx.platform.fetch_utxos(&addresses, None).await?;

    let tx = build_add_delegator(DelegatorRequest {
        network_id: ctx.network.network_id,
        utxos: &utxos,
        asset_id: ctx.chain_ids.asset,
        node_id,
        start_time,
        end_time,
        stake_amount,
        owner_address: owner,
        as_of: unix_now(),
        memo: DELEGATION_MEMO.to_vec(),
    })?;

    let signed = signer.sign(&tx).await?;
    let tx_id = ctx.platform.issue_tx(&signed.bytes()).await?;
    tracing::info!(%tx_id, %node_id, stake_amount, "delegation broadcast");
    Ok(tx_id)
}

pub async fn add_delegator_with_keychain(
    ctx: &Context,
    node_id: &str,
    stake_amount: u64,
    start_time: u64,
    end_time: u64,
) -> Result<TxId, Error> {
    let signer = KeychainSigner::new(&ctx.identity)?;
    add_delegator(ctx, &signer, node_id, stake_amount, start_time, end_time).await
}

pub async fn add_delegator_with_vault(
    ctx: &Context,
    vault: &VaultSigner,
    node_id: &str,
    stake_amount: u64,
    start_time: u64,
    end_time: u64,
) -> Result<TxId, Error> {
    if ctx.identity.can_sign() {
        return Err(Error::PrivateKeyForbidden);
    }
    add_delegator(ctx, vault, node_id, stake_amount, start_time, end_time).await
}
