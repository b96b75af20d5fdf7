//! CIL instruction representation and operand types.
//!
//! This module defines the value types for one unit of a method's compiled
//! instruction stream. An [`Instruction`] pairs an [`OpCode`](crate::assembly::OpCode)
//! with an [`Operand`]; both are immutable value objects with structural equality,
//! which is what exact pattern matching compares.
//!
//! # Key Components
//!
//! - [`Instruction`] - One opcode plus its operand
//! - [`Operand`] - Tagged union over the operand kinds this crate models
//! - [`Immediate`] - Numeric constant operands with their CIL widths
//!
//! # Usage Examples
//!
//! ```rust
//! use cilsplice::assembly::{Immediate, Instruction, OpCode, Operand};
//!
//! let load = Instruction::with_operand(
//!     OpCode::LdcI4,
//!     Operand::Immediate(Immediate::Int32(42)),
//! );
//! assert_eq!(load.to_string(), "ldc.i4 42");
//!
//! let ret = Instruction::new(OpCode::Ret);
//! assert_eq!(ret.operand, Operand::None);
//! ```
//!
//! # Integration
//!
//! Instructions are produced by [`crate::compiler`] (signature lowering), consumed
//! by [`crate::pattern`] (matching) and spliced by [`crate::editor`].

use std::fmt;

use crate::assembly::OpCode;
use crate::member::{MemberRef, TypeRef};

/// A numeric constant embedded in an instruction.
///
/// Variants mirror the widths the `ldc.*` opcode family pushes. Equality is
/// structural; two immediates of different widths are never equal even when
/// their values coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Immediate {
    /// Signed 32-bit immediate value
    Int32(i32),
    /// Signed 64-bit immediate value
    Int64(i64),
    /// 32-bit floating point immediate value
    Float32(f32),
    /// 64-bit floating point immediate value
    Float64(f64),
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Immediate::Int32(value) => write!(f, "{value}"),
            Immediate::Int64(value) => write!(f, "{value}"),
            Immediate::Float32(value) => write!(f, "{value}"),
            Immediate::Float64(value) => write!(f, "{value}"),
        }
    }
}

/// An instruction operand.
///
/// High-level, symbolic representation of what an instruction references: nothing,
/// an inline constant, a string literal, a member, or a type. Member and type
/// operands carry symbolic descriptors instead of raw metadata tokens, so streams
/// can be constructed and matched without a loaded assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand present
    None,
    /// Inline numeric constant
    Immediate(Immediate),
    /// Inline string literal (`ldstr`)
    Str(String),
    /// Reference to a field, method or constructor
    Member(MemberRef),
    /// Reference to a type (`isinst`, `castclass`, `box`, ...)
    Type(TypeRef),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Immediate(imm) => write!(f, "{imm}"),
            Operand::Str(s) => write!(f, "\"{s}\""),
            Operand::Member(member) => write!(f, "{member}"),
            Operand::Type(ty) => write!(f, "{ty}"),
        }
    }
}

/// One unit of a method's compiled instruction stream.
///
/// Immutable value object; equality is structural over opcode and operand.
/// Streams are plain `Vec<Instruction>` / `&[Instruction]` — ordering and
/// cursor state belong to [`crate::editor::StreamEditor`], not to the
/// instruction itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The operation code
    pub opcode: OpCode,
    /// The operand, or [`Operand::None`]
    pub operand: Operand,
}

impl Instruction {
    /// Creates an instruction without an operand.
    #[must_use]
    pub fn new(opcode: OpCode) -> Self {
        Instruction {
            opcode,
            operand: Operand::None,
        }
    }

    /// Creates an instruction with the given operand.
    #[must_use]
    pub fn with_operand(opcode: OpCode, operand: Operand) -> Self {
        Instruction { opcode, operand }
    }

    /// Creates an instruction referencing a member.
    #[must_use]
    pub fn with_member(opcode: OpCode, member: MemberRef) -> Self {
        Instruction {
            opcode,
            operand: Operand::Member(member),
        }
    }

    /// Creates an instruction referencing a type.
    #[must_use]
    pub fn with_type(opcode: OpCode, ty: TypeRef) -> Self {
        Instruction {
            opcode,
            operand: Operand::Type(ty),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operand == Operand::None {
            write!(f, "{}", self.opcode)
        } else {
            write!(f, "{} {}", self.opcode, self.operand)
        }
    }
}
