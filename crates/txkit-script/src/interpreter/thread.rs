//! Script execution thread — the core interpreter engine.

use crate::opcodes::*;
use crate::Script;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::*;
use super::stack::*;
use super::TxContext;

/// Maximum allowed script size in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;
/// Maximum allowed size of a pushed stack element in bytes.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Maximum allowed stack depth.
pub const MAX_STACK_SIZE: usize = 1_000;
/// Maximum non-push operations per script.
pub const MAX_OPS_PER_SCRIPT: usize = 201;

/// The execution thread for the script interpreter.
///
/// Executes the unlocking script followed by the locking script over a
/// shared data stack, enforcing the legacy consensus limits.
pub struct Thread<'a> {
    /// The data stack shared by both scripts.
    pub dstack: Stack,
    /// The parsed scripts to execute (unlocking, then locking).
    pub scripts: Vec<ParsedScript>,
    /// Index of the currently executing script.
    pub script_idx: usize,
    /// Offset of the currently executing opcode within the current script.
    pub script_off: usize,
    /// Offset of the most recent OP_CODESEPARATOR in the current script.
    pub last_code_sep: usize,
    /// Running count of non-push opcodes executed.
    pub num_ops: usize,
    /// Optional transaction context for signature verification.
    pub tx_context: Option<&'a dyn TxContext>,
    /// The transaction input index being verified.
    pub input_idx: usize,
}

impl<'a> Thread<'a> {
    /// Create a new execution thread from unlocking and locking scripts.
    ///
    /// Validates script sizes and parses both scripts.
    pub fn new(
        unlocking_script: &Script,
        locking_script: &Script,
        tx_context: Option<&'a dyn TxContext>,
        input_idx: usize,
    ) -> Result<Self, InterpreterError> {
        if unlocking_script.len() > MAX_SCRIPT_SIZE {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ScriptTooBig,
                format!(
                    "unlocking script size {} is larger than the max allowed size {}",
                    unlocking_script.len(),
                    MAX_SCRIPT_SIZE
                ),
            ));
        }
        if locking_script.len() > MAX_SCRIPT_SIZE {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ScriptTooBig,
                format!(
                    "locking script size {} is larger than the max allowed size {}",
                    locking_script.len(),
                    MAX_SCRIPT_SIZE
                ),
            ));
        }

        // Two empty scripts evaluate to an empty stack.
        if unlocking_script.is_empty() && locking_script.is_empty() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EvalFalse,
                "false stack entry at end of script execution".to_string(),
            ));
        }

        let error_on_checksig = tx_context.is_none();
        let uscript = parse_script(unlocking_script, error_on_checksig)?;
        let lscript = parse_script(locking_script, error_on_checksig)?;

        let scripts = vec![uscript, lscript];
        let mut script_idx = 0;
        if unlocking_script.is_empty() {
            script_idx = 1;
        }

        Ok(Thread {
            dstack: Stack::new(),
            scripts,
            script_idx,
            script_off: 0,
            last_code_sep: 0,
            num_ops: 0,
            tx_context,
            input_idx,
        })
    }

    /// Execute all scripts to completion and check the final stack.
    pub fn execute(&mut self) -> Result<(), InterpreterError> {
        loop {
            let done = self.step()?;
            if done {
                break;
            }
        }
        self.check_error_condition()
    }

    /// Execute one opcode. Returns true if execution is complete.
    pub fn step(&mut self) -> Result<bool, InterpreterError> {
        if self.script_idx >= self.scripts.len() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidProgramCounter,
                format!(
                    "program counter past script {} of {}",
                    self.script_idx,
                    self.scripts.len()
                ),
            ));
        }
        if self.script_off >= self.scripts[self.script_idx].len() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidProgramCounter,
                format!(
                    "program counter past offset {} of script {}",
                    self.script_off, self.script_idx
                ),
            ));
        }

        let opcode = self.scripts[self.script_idx][self.script_off].clone();
        self.execute_opcode(&opcode)?;
        self.script_off += 1;

        if self.dstack.depth() > MAX_STACK_SIZE {
            return Err(InterpreterError::new(
                InterpreterErrorCode::StackOverflow,
                format!(
                    "stack size {} > max allowed {}",
                    self.dstack.depth(),
                    MAX_STACK_SIZE
                ),
            ));
        }

        // Advance past finished scripts (skipping empty ones).
        while self.script_idx < self.scripts.len()
            && self.script_off >= self.scripts[self.script_idx].len()
        {
            self.script_idx += 1;
            self.script_off = 0;
            self.last_code_sep = 0;
            self.num_ops = 0;
        }

        Ok(self.script_idx >= self.scripts.len())
    }

    /// Execute a single parsed opcode.
    fn execute_opcode(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        if pop.data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ElementTooBig,
                format!(
                    "element size {} exceeds max allowed {}",
                    pop.data.len(),
                    MAX_SCRIPT_ELEMENT_SIZE
                ),
            ));
        }

        // Count non-push operations.
        if pop.opcode > OP_16 {
            self.num_ops += 1;
            if self.num_ops > MAX_OPS_PER_SCRIPT {
                return Err(InterpreterError::new(
                    InterpreterErrorCode::TooManyOperations,
                    format!("exceeded max operation limit of {}", MAX_OPS_PER_SCRIPT),
                ));
            }
        }

        match pop.opcode {
            OP_0 => {
                self.dstack.push_byte_array(Vec::new());
                Ok(())
            }
            op if (OP_DATA_1..=OP_PUSHDATA4).contains(&op) => {
                self.dstack.push_byte_array(pop.data.clone());
                Ok(())
            }
            OP_1NEGATE => {
                self.dstack.push_byte_array(vec![0x81]);
                Ok(())
            }
            op if (OP_1..=OP_16).contains(&op) => {
                self.dstack.push_byte_array(vec![op - OP_1 + 1]);
                Ok(())
            }
            OP_NOP => Ok(()),
            OP_DUP => self.dstack.dup_top(),
            OP_DROP => {
                self.dstack.pop_byte_array()?;
                Ok(())
            }
            OP_VERIFY => {
                let verified = self.dstack.pop_bool()?;
                if !verified {
                    return Err(InterpreterError::new(
                        InterpreterErrorCode::Verify,
                        "OP_VERIFY failed".to_string(),
                    ));
                }
                Ok(())
            }
            OP_RETURN => Err(InterpreterError::new(
                InterpreterErrorCode::EarlyReturn,
                "script returned early".to_string(),
            )),
            OP_EQUAL => {
                let a = self.dstack.pop_byte_array()?;
                let b = self.dstack.pop_byte_array()?;
                self.dstack.push_bool(a == b);
                Ok(())
            }
            OP_EQUALVERIFY => {
                let a = self.dstack.pop_byte_array()?;
                let b = self.dstack.pop_byte_array()?;
                if a != b {
                    return Err(InterpreterError::new(
                        InterpreterErrorCode::EqualVerify,
                        "OP_EQUALVERIFY failed".to_string(),
                    ));
                }
                Ok(())
            }
            OP_SHA256 => self.op_hash(super::ops_crypto::HashKind::Sha256),
            OP_HASH160 => self.op_hash(super::ops_crypto::HashKind::Hash160),
            OP_HASH256 => self.op_hash(super::ops_crypto::HashKind::Hash256),
            OP_CODESEPARATOR => {
                self.last_code_sep = self.script_off;
                Ok(())
            }
            OP_CHECKSIG => self.op_checksig(),
            OP_CHECKSIGVERIFY => {
                self.op_checksig()?;
                let verified = self.dstack.pop_bool()?;
                if !verified {
                    return Err(InterpreterError::new(
                        InterpreterErrorCode::CheckSigVerify,
                        "OP_CHECKSIGVERIFY failed".to_string(),
                    ));
                }
                Ok(())
            }
            op => Err(InterpreterError::new(
                InterpreterErrorCode::ReservedOpcode,
                format!("opcode {} is not in the supported subset", opcode_to_string(op)),
            )),
        }
    }

    /// Check the final stack state after all scripts have executed.
    ///
    /// Execution succeeds iff the stack holds a truthy top element.
    fn check_error_condition(&mut self) -> Result<(), InterpreterError> {
        if self.dstack.depth() == 0 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EvalFalse,
                "stack empty at end of script execution".to_string(),
            ));
        }
        let top = self.dstack.pop_byte_array()?;
        if !as_bool(&top) {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EvalFalse,
                "false stack entry at end of script execution".to_string(),
            ));
        }
        Ok(())
    }
}
