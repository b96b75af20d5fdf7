//! Symbolic CIL instruction model.
//!
//! The instruction model is the vocabulary shared by the signature compiler,
//! the pattern matcher and the stream editor: a closed [`OpCode`] set and an
//! immutable [`Instruction`] value type with structural equality.

mod instruction;
mod opcodes;

pub use instruction::{Immediate, Instruction, Operand};
pub use opcodes::{OpCode, FE_PREFIX};
