#![deny(missing_docs)]

//! txkit - Legacy P2PKH transaction kit.
//!
//! Re-exports all txkit components for convenient single-crate usage.

pub use txkit_node as node;
pub use txkit_primitives as primitives;
pub use txkit_script as script;
pub use txkit_transaction as transaction;
