//! CIL opcode enumeration (ECMA-335).
//!
//! This module provides the closed set of CIL opcodes this crate emits and matches.
//! Each variant carries its mnemonic for [`std::fmt::Display`] rendering and knows
//! its raw encoding. Single-byte opcodes encode as one byte; comparison opcodes
//! (`ceq`, `cgt`, ...) use the shared `0xFE` prefix, exposed as [`FE_PREFIX`].
//!
//! The set deliberately covers only what a signature compiler for side-effect-free
//! expressions can produce, plus the branch and stack-manipulation opcodes that
//! appear in method bodies being matched against. It is not a full ECMA-335
//! instruction set.

use strum::Display;

/// Shared first byte of two-byte (`0xFE`-prefixed) opcodes.
pub const FE_PREFIX: u8 = 0xFE;

/// A CIL operation code.
///
/// The variants mirror the ECMA-335 mnemonics. [`std::fmt::Display`] renders the
/// canonical lowercase mnemonic (e.g. `ldc.i4`, `cgt.un`), which is what pattern
/// diagnostics print.
///
/// # Examples
///
/// ```rust
/// use cilsplice::assembly::OpCode;
///
/// assert_eq!(OpCode::LdcI4.to_string(), "ldc.i4");
/// assert_eq!(OpCode::CgtUn.to_string(), "cgt.un");
/// assert_eq!(OpCode::Isinst.encoding(), (None, 0x75));
/// assert_eq!(OpCode::CgtUn.encoding(), (Some(0xFE), 0x03));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum OpCode {
    /// No operation
    #[strum(serialize = "nop")]
    Nop,
    /// Load argument by index
    #[strum(serialize = "ldarg")]
    Ldarg,
    /// Load local by index
    #[strum(serialize = "ldloc")]
    Ldloc,
    /// Store local by index
    #[strum(serialize = "stloc")]
    Stloc,
    /// Push a null reference
    #[strum(serialize = "ldnull")]
    Ldnull,
    /// Push a 32-bit integer constant
    #[strum(serialize = "ldc.i4")]
    LdcI4,
    /// Push a 64-bit integer constant
    #[strum(serialize = "ldc.i8")]
    LdcI8,
    /// Push a 32-bit float constant
    #[strum(serialize = "ldc.r4")]
    LdcR4,
    /// Push a 64-bit float constant
    #[strum(serialize = "ldc.r8")]
    LdcR8,
    /// Push a string literal
    #[strum(serialize = "ldstr")]
    Ldstr,
    /// Duplicate the top of stack
    #[strum(serialize = "dup")]
    Dup,
    /// Discard the top of stack
    #[strum(serialize = "pop")]
    Pop,
    /// Call a method (static binding)
    #[strum(serialize = "call")]
    Call,
    /// Call a method (virtual binding)
    #[strum(serialize = "callvirt")]
    Callvirt,
    /// Allocate and construct an object
    #[strum(serialize = "newobj")]
    Newobj,
    /// Return from the current method
    #[strum(serialize = "ret")]
    Ret,
    /// Unconditional branch
    #[strum(serialize = "br")]
    Br,
    /// Branch when the top of stack is true
    #[strum(serialize = "brtrue")]
    Brtrue,
    /// Branch when the top of stack is false
    #[strum(serialize = "brfalse")]
    Brfalse,
    /// Load an instance field
    #[strum(serialize = "ldfld")]
    Ldfld,
    /// Store an instance field
    #[strum(serialize = "stfld")]
    Stfld,
    /// Load a static field
    #[strum(serialize = "ldsfld")]
    Ldsfld,
    /// Store a static field
    #[strum(serialize = "stsfld")]
    Stsfld,
    /// Box a value type
    #[strum(serialize = "box")]
    Box,
    /// Unbox to the given value type
    #[strum(serialize = "unbox.any")]
    UnboxAny,
    /// Cast with exception on failure
    #[strum(serialize = "castclass")]
    Castclass,
    /// Type test: push the cast reference or null
    #[strum(serialize = "isinst")]
    Isinst,
    /// Compare equal
    #[strum(serialize = "ceq")]
    Ceq,
    /// Compare greater than (signed)
    #[strum(serialize = "cgt")]
    Cgt,
    /// Compare greater than (unsigned/unordered)
    #[strum(serialize = "cgt.un")]
    CgtUn,
    /// Compare less than (signed)
    #[strum(serialize = "clt")]
    Clt,
    /// Compare less than (unsigned/unordered)
    #[strum(serialize = "clt.un")]
    CltUn,
}

impl OpCode {
    /// Returns the raw ECMA-335 encoding of this opcode as `(prefix, byte)`.
    ///
    /// Single-byte opcodes return `(None, byte)`. Two-byte opcodes return
    /// `(Some(0xFE), second_byte)` with the shared [`FE_PREFIX`].
    #[must_use]
    pub const fn encoding(&self) -> (Option<u8>, u8) {
        match self {
            OpCode::Nop => (None, 0x00),
            OpCode::Ldarg => (None, 0x0E),  // ldarg.s form
            OpCode::Ldloc => (None, 0x11),  // ldloc.s form
            OpCode::Stloc => (None, 0x13),  // stloc.s form
            OpCode::Ldnull => (None, 0x14),
            OpCode::LdcI4 => (None, 0x20),
            OpCode::LdcI8 => (None, 0x21),
            OpCode::LdcR4 => (None, 0x22),
            OpCode::LdcR8 => (None, 0x23),
            OpCode::Dup => (None, 0x25),
            OpCode::Pop => (None, 0x26),
            OpCode::Call => (None, 0x28),
            OpCode::Ret => (None, 0x2A),
            OpCode::Br => (None, 0x38),
            OpCode::Brfalse => (None, 0x39),
            OpCode::Brtrue => (None, 0x3A),
            OpCode::Callvirt => (None, 0x6F),
            OpCode::Ldstr => (None, 0x72),
            OpCode::Newobj => (None, 0x73),
            OpCode::Castclass => (None, 0x74),
            OpCode::Isinst => (None, 0x75),
            OpCode::Ldfld => (None, 0x7B),
            OpCode::Stfld => (None, 0x7D),
            OpCode::Ldsfld => (None, 0x7E),
            OpCode::Stsfld => (None, 0x80),
            OpCode::Box => (None, 0x8C),
            OpCode::UnboxAny => (None, 0xA5),
            OpCode::Ceq => (Some(FE_PREFIX), 0x01),
            OpCode::Cgt => (Some(FE_PREFIX), 0x02),
            OpCode::CgtUn => (Some(FE_PREFIX), 0x03),
            OpCode::Clt => (Some(FE_PREFIX), 0x04),
            OpCode::CltUn => (Some(FE_PREFIX), 0x05),
        }
    }

    /// Returns true for the comparison opcodes that use the `0xFE` prefix.
    #[must_use]
    pub const fn is_prefixed(&self) -> bool {
        matches!(
            self,
            OpCode::Ceq | OpCode::Cgt | OpCode::CgtUn | OpCode::Clt | OpCode::CltUn
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonics() {
        let test_cases = vec![
            (OpCode::Nop, "nop"),
            (OpCode::LdcI4, "ldc.i4"),
            (OpCode::Ldsfld, "ldsfld"),
            (OpCode::Isinst, "isinst"),
            (OpCode::CgtUn, "cgt.un"),
            (OpCode::UnboxAny, "unbox.any"),
        ];

        for (opcode, expected) in test_cases {
            assert_eq!(opcode.to_string(), expected);
        }
    }

    #[test]
    fn test_encoding_prefix_agreement() {
        // encoding() and is_prefixed() must agree for every comparison opcode
        for opcode in [
            OpCode::Ceq,
            OpCode::Cgt,
            OpCode::CgtUn,
            OpCode::Clt,
            OpCode::CltUn,
        ] {
            assert!(opcode.is_prefixed());
            assert_eq!(opcode.encoding().0, Some(FE_PREFIX));
        }

        assert!(!OpCode::Isinst.is_prefixed());
        assert_eq!(OpCode::Isinst.encoding(), (None, 0x75));
    }
}
