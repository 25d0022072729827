/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. index out of range or a
    /// negative output value).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// An error occurred during input signing (e.g. missing source output
    /// or a failing cryptographic primitive).
    #[error("signing error: {0}")]
    SigningError(String),

    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A script could not be parsed into opcodes at all.
    #[error("script parse error: {0}")]
    ScriptParse(String),

    /// An underlying script error (forwarded from `txkit-script`).
    #[error("script error: {0}")]
    Script(#[from] txkit_script::ScriptError),

    /// An underlying primitives error (forwarded from `txkit-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] txkit_primitives::PrimitivesError),
}
