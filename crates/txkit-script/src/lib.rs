/// txkit - Script parsing, execution, and address handling.
///
/// Provides the Bitcoin Script type, opcode definitions, script chunk
/// parsing, P2PKH address generation/validation, and a script interpreter
/// engine covering the legacy P2PKH opcode subset.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod address;
pub mod interpreter;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::{Address, Network};
pub use chunk::ScriptChunk;
