//! Error types for node operations.

/// Errors that can occur when interacting with the node or running the
/// spend workflow.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// HTTP transport failure (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to serialize or deserialize JSON-RPC data.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The node has no record of the requested transaction (pruned or
    /// unconfirmed-unknown).
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// The node rejected the submitted transaction on policy grounds
    /// (fee too low, non-standard script).
    #[error("rejected by policy ({code}): {message}")]
    RejectedByPolicy {
        /// The node's RPC error code.
        code: i64,
        /// The node's reject message.
        message: String,
    },

    /// The node rejected the submitted transaction on consensus grounds
    /// (double-spend, invalid signature).
    #[error("rejected by consensus ({code}): {message}")]
    RejectedByConsensus {
        /// The node's RPC error code.
        code: i64,
        /// The node's reject message.
        message: String,
    },

    /// Any other RPC-level error reported by the node.
    #[error("rpc error ({code}): {message}")]
    Rpc {
        /// The node's RPC error code.
        code: i64,
        /// The node's error message.
        message: String,
    },

    /// Local script verification of the signed transaction failed; the
    /// transaction was not submitted.
    #[error("local verification failed: {0}")]
    VerificationFailed(String),

    /// An error from the transaction layer (building, signing, parsing).
    #[error("transaction error: {0}")]
    Transaction(#[from] txkit_transaction::TransactionError),

    /// An error from the script layer (address resolution).
    #[error("script error: {0}")]
    Script(#[from] txkit_script::ScriptError),

    /// An error from the primitives layer (hash parsing).
    #[error("primitives error: {0}")]
    Primitives(#[from] txkit_primitives::PrimitivesError),
}
