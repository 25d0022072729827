//! JSON-RPC client for a local full node.
//!
//! Exposes the two collaborator calls the transaction pipeline needs:
//! previous-transaction lookup (`getrawtransaction`) and raw broadcast
//! (`sendrawtransaction`). Each call is a single bounded-timeout HTTP
//! request with no automatic retries; fetches are idempotent so callers
//! may retry them, submission is left to the caller's judgment.

use serde::de::DeserializeOwned;
use std::time::Duration;

use txkit_primitives::chainhash::Hash;
use txkit_transaction::Transaction;

use crate::error::NodeError;
use crate::types::{NodeConfig, RpcRequest, RpcResponse};

/// bitcoind's RPC error code for a transaction the node has no record of.
const RPC_INVALID_ADDRESS_OR_KEY: i64 = -5;

/// Reject messages that indicate a consensus-level failure. Anything
/// else reported by the verify path is treated as policy.
const CONSENSUS_MARKERS: &[&str] = &[
    "bad-txns-",
    "mandatory-script-verify-flag-failed",
    "non-final",
];

/// HTTP client for a node's JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct NodeClient {
    /// Client configuration.
    config: NodeConfig,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl NodeClient {
    /// Create a new node client with the given configuration.
    ///
    /// The HTTP client applies `config.timeout_secs` to every request.
    pub fn new(config: NodeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client construction with static options");
        Self { config, client }
    }

    /// Fetch a previous transaction by its ID.
    ///
    /// Used to read the locking script of the output being spent.
    ///
    /// # Arguments
    /// * `txid` - The transaction ID to look up.
    ///
    /// # Returns
    /// The parsed transaction, or `NotFound` if the node has no record
    /// of it (pruned or unconfirmed-unknown).
    pub async fn fetch_transaction(&self, txid: &Hash) -> Result<Transaction, NodeError> {
        log::debug!("fetching previous transaction {}", txid);
        let raw_hex: String = self
            .call(
                "getrawtransaction",
                serde_json::json!([txid.to_string(), false]),
            )
            .await
            .map_err(|e| match e {
                NodeError::Rpc { code, .. } if code == RPC_INVALID_ADDRESS_OR_KEY => {
                    NodeError::NotFound(txid.to_string())
                }
                other => other,
            })?;
        Ok(Transaction::from_hex(&raw_hex)?)
    }

    /// Submit a signed transaction to the node for broadcast.
    ///
    /// # Arguments
    /// * `tx` - The signed transaction.
    /// * `allow_high_fees` - If true, lifts the node's default fee-rate
    ///   cap (`maxfeerate` 0).
    ///
    /// # Returns
    /// The accepted transaction's ID, `RejectedByPolicy` or
    /// `RejectedByConsensus` on rejection.
    pub async fn submit_transaction(
        &self,
        tx: &Transaction,
        allow_high_fees: bool,
    ) -> Result<Hash, NodeError> {
        let raw_hex = tx.to_hex();
        log::debug!("submitting transaction ({} bytes)", raw_hex.len() / 2);

        let params = if allow_high_fees {
            serde_json::json!([raw_hex, 0.0])
        } else {
            serde_json::json!([raw_hex])
        };

        let txid_hex: String = self
            .call("sendrawtransaction", params)
            .await
            .map_err(|e| match e {
                NodeError::Rpc { code, message } => classify_rejection(code, message),
                other => other,
            })?;

        log::info!("transaction accepted as {}", txid_hex);
        Ok(Hash::from_hex(&txid_hex)?)
    }

    /// Perform a single JSON-RPC call and decode its result.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, NodeError> {
        let request = RpcRequest::new(method, params);

        let resp = self
            .client
            .post(&self.config.url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&request)
            .send()
            .await?;

        let response: RpcResponse<T> = resp.json().await?;

        if let Some(err) = response.error {
            return Err(NodeError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        response.result.ok_or_else(|| {
            NodeError::Rpc {
                code: 0,
                message: format!("{} returned no result", method),
            }
        })
    }
}

/// Classify a broadcast rejection into policy vs consensus.
///
/// bitcoind reports both classes through the same RPC error codes, so
/// the reject message is inspected. Unrecognized messages default to
/// policy, since consensus failures are the ones local verification
/// should have caught before submission.
fn classify_rejection(code: i64, message: String) -> NodeError {
    if CONSENSUS_MARKERS.iter().any(|m| message.contains(m)) {
        NodeError::RejectedByConsensus { code, message }
    } else {
        NodeError::RejectedByPolicy { code, message }
    }
}
