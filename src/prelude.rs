//! Convenient re-exports of the most commonly used types and traits.
//!
//! # Example
//!
//! ```rust
//! use cilsplice::prelude::*;
//!
//! let ret = Instruction::new(OpCode::Ret);
//! let pattern = Pattern::exact(&[ret.clone()])?;
//! assert_eq!(pattern.find_first(&[ret], 0), Some(0));
//! # Ok::<(), cilsplice::Error>(())
//! ```

pub use crate::assembly::{Immediate, Instruction, OpCode, Operand};
pub use crate::compiler::{compile, CompareOp, CompiledSignature, Expr, Value};
pub use crate::editor::StreamEditor;
pub use crate::member::{
    matching_constructor, MemberKind, MemberModifiers, MemberRef, TypeModel, TypeRef,
};
pub use crate::patch::{apply_patch, FacadeLog, PatchLog};
pub use crate::pattern::{MatchMode, Pattern, PatternElement};
pub use crate::{Error, Result};
