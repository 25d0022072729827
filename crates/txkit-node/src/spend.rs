//! The linear P2PKH spend workflow.
//!
//! Resolve the destination, build the single-spend skeleton, fetch the
//! previous transaction, sign against the actual spent output's locking
//! script, verify locally, and submit. A transaction that fails local
//! verification is reported as invalid and never submitted.

use txkit_primitives::chainhash::Hash;
use txkit_primitives::ec::PrivateKey;
use txkit_script::Network;
use txkit_transaction::template::p2pkh;
use txkit_transaction::template::UnlockingScriptTemplate;
use txkit_transaction::{verify_input, OutPoint, Transaction, TransactionError};

use crate::client::NodeClient;
use crate::error::NodeError;

/// Parameters for a single P2PKH spend.
///
/// An explicit value passed into the workflow; nothing here is read
/// from process-wide state.
#[derive(Debug, Clone)]
pub struct SpendParams {
    /// The unspent output being consumed.
    pub prev_outpoint: OutPoint,
    /// The destination address string.
    pub destination: String,
    /// The value to send, in satoshis.
    pub value: i64,
    /// The network the destination address must belong to.
    pub network: Network,
    /// Lift the node's default fee-rate cap on submission.
    pub allow_high_fees: bool,
}

/// Build, sign, locally verify, and broadcast a single-input P2PKH spend.
///
/// The locking script signed against is always the one of the output
/// actually referenced by `prev_outpoint`, read from the fetched
/// previous transaction.
///
/// # Arguments
/// * `client` - The node collaborator.
/// * `params` - The spend parameters.
/// * `key` - The already-decoded signing key.
///
/// # Returns
/// The transaction ID accepted by the node. Fails with
/// `VerificationFailed` (without submitting) if the signed transaction
/// does not pass local script verification.
pub async fn send_p2pkh(
    client: &NodeClient,
    params: &SpendParams,
    key: &PrivateKey,
) -> Result<Hash, NodeError> {
    // Resolve the destination address into its locking script.
    let destination = p2pkh::lock_to_address(&params.destination, params.network)?;
    log::debug!(
        "resolved destination {} to {}",
        params.destination,
        destination
    );

    // Assemble the unsigned skeleton.
    let mut tx = Transaction::single_spend(params.prev_outpoint, destination, params.value)?;

    // Fetch the previous transaction and read the spent output.
    let prev_tx = client.fetch_transaction(&params.prev_outpoint.txid).await?;
    let prev_output = prev_tx
        .outputs
        .get(params.prev_outpoint.vout as usize)
        .ok_or_else(|| {
            NodeError::Transaction(TransactionError::InvalidTransaction(format!(
                "previous transaction {} has no output {}",
                params.prev_outpoint.txid, params.prev_outpoint.vout
            )))
        })?
        .clone();
    let prev_script = prev_output.locking_script.clone();
    tx.inputs[0].set_source_output(Some(prev_output));

    // Sign and attach the unlocking script.
    let unlocker = p2pkh::unlock(key.clone(), None);
    let unlocking_script = unlocker.sign(&tx, 0)?;
    tx.attach_unlocking_script(0, unlocking_script)?;
    log::debug!("signed transaction {}", tx.tx_id_hex());

    // Verify the combined script pair locally before touching the network.
    let valid = verify_input(&tx, 0, &prev_script)?;
    if !valid {
        return Err(NodeError::VerificationFailed(format!(
            "transaction {} does not satisfy the previous output's locking script",
            tx.tx_id_hex()
        )));
    }

    client.submit_transaction(&tx, params.allow_high_fees).await
}
