//! Signature compiler: expression trees lowered to instruction sequences.
//!
//! Patch authors describe *what to search for* and *what to substitute* as typed
//! expression trees instead of hand-written instruction sequences. This module
//! lowers such a tree to the deterministic sequence of instructions a conforming
//! code generator would emit to evaluate it, in evaluation order (operands before
//! operators, left-to-right for binary operations).
//!
//! # Architecture
//!
//! Lowering is a straightforward recursive descent over [`Expr`]. Every rule is
//! fixed and documented on its arm, so re-compiling the same expression shape
//! always yields a byte-for-byte identical sequence — existing patterns keep
//! matching across runs.
//!
//! # Key Components
//!
//! - [`Expr`] - The expression surrogate (constants, member access, calls,
//!   comparisons, type tests)
//! - [`compile`] - Lowering entry point
//! - [`CompiledSignature`] - The produced sequence, with the caller-controlled
//!   [`CompiledSignature::drop_trailing`] trim
//!
//! # Trailing suffixes
//!
//! Some expression shapes compile to trailing instructions irrelevant to the
//! semantic pattern. The prominent case is a type test used as a value: the
//! generator appends `ldnull`, `cgt.un` to materialize the boolean. This
//! compiler always emits that pair for [`Expr::TypeTest`]; callers that want the
//! bare `isinst` pattern strip it explicitly:
//!
//! ```rust
//! use cilsplice::compiler::{compile, Expr};
//! use cilsplice::member::{MemberModifiers, MemberRef, TypeRef};
//!
//! let zone = MemberRef::field(
//!     TypeRef::new("Verse.EMono"),
//!     "_zone",
//!     TypeRef::new("Verse.Zone"),
//!     MemberModifiers::PUBLIC | MemberModifiers::STATIC,
//! );
//! let expr = Expr::type_test(Expr::static_field(zone), TypeRef::new("Verse.Region"));
//!
//! let signature = compile(&expr)?;            // ldsfld, isinst, ldnull, cgt.un
//! let pattern = signature.drop_trailing(2)?;  // ldsfld, isinst
//! assert_eq!(pattern.len(), 2);
//! # Ok::<(), cilsplice::Error>(())
//! ```
//!
//! The suffix length is never inferred — auto-detecting "irrelevant" suffixes is
//! out of scope and a historical source of fragility.

use crate::assembly::{Immediate, Instruction, OpCode, Operand};
use crate::member::{MemberRef, TypeRef};
use crate::Result;

/// A constant value in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null reference
    Null,
    /// A boolean constant
    Bool(bool),
    /// A 32-bit integer constant
    Int32(i32),
    /// A 64-bit integer constant
    Int64(i64),
    /// A 32-bit float constant
    Float32(f32),
    /// A 64-bit float constant
    Float64(f64),
    /// A string literal
    Str(String),
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equality
    Eq,
    /// Inequality (lowered as negated equality)
    Ne,
    /// Signed greater-than
    Gt,
    /// Unsigned/unordered greater-than
    GtUn,
    /// Signed less-than
    Lt,
    /// Unsigned/unordered less-than
    LtUn,
}

/// A typed, side-effect-free expression tree.
///
/// The surrogate for the host language's expression trees: just enough shape to
/// describe the computations patch signatures are built from. Side-effecting
/// shapes ([`Expr::Assign`], [`Expr::Block`]) are representable but rejected by
/// [`compile`] with [`crate::Error::UnsupportedExpression`] — a pattern that
/// mutates state is a definition-time bug.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A constant
    Constant(Value),
    /// Field access; `receiver` is `None` for static fields
    Field {
        /// Receiver expression, absent for static fields
        receiver: Option<Box<Expr>>,
        /// The field descriptor
        field: MemberRef,
    },
    /// Property access through its getter; `receiver` is `None` for static properties
    Property {
        /// Receiver expression, absent for static properties
        receiver: Option<Box<Expr>>,
        /// The getter method descriptor
        getter: MemberRef,
    },
    /// Method call; `receiver` is `None` for static methods
    Call {
        /// Receiver expression, absent for static methods
        receiver: Option<Box<Expr>>,
        /// The method descriptor
        method: MemberRef,
        /// Argument expressions, in call order
        args: Vec<Expr>,
    },
    /// Type test (`operand is Type`), yielding a boolean
    TypeTest {
        /// The tested expression
        operand: Box<Expr>,
        /// The tested-against type
        ty: TypeRef,
    },
    /// Binary comparison
    Compare {
        /// The operator
        op: CompareOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// Assignment — never lowerable, kept so definition-time misuse fails loudly
    Assign {
        /// Assignment target
        target: Box<Expr>,
        /// Assigned value
        value: Box<Expr>,
    },
    /// Statement block — never lowerable
    Block(Vec<Expr>),
}

impl Expr {
    /// Shorthand for a static field access.
    #[must_use]
    pub fn static_field(field: MemberRef) -> Self {
        Expr::Field {
            receiver: None,
            field,
        }
    }

    /// Shorthand for an instance field access.
    #[must_use]
    pub fn field_of(receiver: Expr, field: MemberRef) -> Self {
        Expr::Field {
            receiver: Some(Box::new(receiver)),
            field,
        }
    }

    /// Shorthand for an instance property access through `getter`.
    #[must_use]
    pub fn property_of(receiver: Expr, getter: MemberRef) -> Self {
        Expr::Property {
            receiver: Some(Box::new(receiver)),
            getter,
        }
    }

    /// Shorthand for a static method call.
    #[must_use]
    pub fn static_call(method: MemberRef, args: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: None,
            method,
            args,
        }
    }

    /// Shorthand for a type test.
    #[must_use]
    pub fn type_test(operand: Expr, ty: TypeRef) -> Self {
        Expr::TypeTest {
            operand: Box::new(operand),
            ty,
        }
    }
}

/// The instruction sequence produced by [`compile`].
///
/// Immutable apart from the caller-controlled [`CompiledSignature::drop_trailing`]
/// trim. Convert into a search pattern via
/// [`Pattern::from_signature`](crate::pattern::Pattern::from_signature) or take
/// the instructions for use as a replacement via
/// [`CompiledSignature::into_instructions`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSignature(Vec<Instruction>);

impl CompiledSignature {
    /// Returns the compiled instructions.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.0
    }

    /// Returns the number of compiled instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the signature holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes a known, fixed-size suffix of `n` instructions.
    ///
    /// This is the documented, caller-controlled trim for code-generator
    /// suffixes (see the module docs). The result keeps the first `len - n`
    /// instructions unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] when `n` exceeds the signature
    /// length.
    pub fn drop_trailing(mut self, n: usize) -> Result<Self> {
        if n > self.0.len() {
            return Err(invalid_pattern!(
                "cannot drop {} trailing instructions from a signature of length {}",
                n,
                self.0.len()
            ));
        }

        self.0.truncate(self.0.len() - n);
        Ok(self)
    }

    /// Consumes the signature and returns its instructions.
    #[must_use]
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.0
    }
}

/// Compiles an expression tree into the instruction sequence a conforming code
/// generator would emit to evaluate it.
///
/// Lowering is deterministic: the same expression shape always produces a
/// byte-for-byte identical sequence. See the module docs for the per-node rules.
///
/// # Errors
///
/// Returns [`crate::Error::UnsupportedExpression`] when the tree contains a
/// node the compiler does not lower ([`Expr::Assign`], [`Expr::Block`]).
pub fn compile(expr: &Expr) -> Result<CompiledSignature> {
    let mut out = Vec::new();
    lower(expr, &mut out)?;
    Ok(CompiledSignature(out))
}

fn lower(expr: &Expr, out: &mut Vec<Instruction>) -> Result<()> {
    match expr {
        Expr::Constant(value) => {
            out.push(lower_constant(value));
        }
        Expr::Field { receiver, field } => {
            let opcode = match receiver {
                Some(receiver) => {
                    lower(receiver, out)?;
                    OpCode::Ldfld
                }
                None => OpCode::Ldsfld,
            };
            out.push(Instruction::with_member(opcode, field.clone()));
        }
        Expr::Property { receiver, getter } => {
            lower_call(receiver.as_deref(), getter, &[], out)?;
        }
        Expr::Call {
            receiver,
            method,
            args,
        } => {
            lower_call(receiver.as_deref(), method, args, out)?;
        }
        Expr::TypeTest { operand, ty } => {
            lower(operand, out)?;
            out.push(Instruction::with_type(OpCode::Isinst, ty.clone()));
            // Boolean materialization the generator appends when the test is
            // used as a value; callers strip it with drop_trailing(2).
            out.push(Instruction::new(OpCode::Ldnull));
            out.push(Instruction::new(OpCode::CgtUn));
        }
        Expr::Compare { op, lhs, rhs } => {
            lower(lhs, out)?;
            lower(rhs, out)?;
            match op {
                CompareOp::Eq => out.push(Instruction::new(OpCode::Ceq)),
                CompareOp::Gt => out.push(Instruction::new(OpCode::Cgt)),
                CompareOp::GtUn => out.push(Instruction::new(OpCode::CgtUn)),
                CompareOp::Lt => out.push(Instruction::new(OpCode::Clt)),
                CompareOp::LtUn => out.push(Instruction::new(OpCode::CltUn)),
                CompareOp::Ne => {
                    // a != b lowers as !(a == b)
                    out.push(Instruction::new(OpCode::Ceq));
                    out.push(Instruction::with_operand(
                        OpCode::LdcI4,
                        Operand::Immediate(Immediate::Int32(0)),
                    ));
                    out.push(Instruction::new(OpCode::Ceq));
                }
            }
        }
        Expr::Assign { .. } => {
            return Err(crate::Error::UnsupportedExpression { kind: "Assign" });
        }
        Expr::Block(_) => {
            return Err(crate::Error::UnsupportedExpression { kind: "Block" });
        }
    }

    Ok(())
}

fn lower_constant(value: &Value) -> Instruction {
    match value {
        Value::Null => Instruction::new(OpCode::Ldnull),
        Value::Bool(b) => Instruction::with_operand(
            OpCode::LdcI4,
            Operand::Immediate(Immediate::Int32(i32::from(*b))),
        ),
        Value::Int32(v) => {
            Instruction::with_operand(OpCode::LdcI4, Operand::Immediate(Immediate::Int32(*v)))
        }
        Value::Int64(v) => {
            Instruction::with_operand(OpCode::LdcI8, Operand::Immediate(Immediate::Int64(*v)))
        }
        Value::Float32(v) => {
            Instruction::with_operand(OpCode::LdcR4, Operand::Immediate(Immediate::Float32(*v)))
        }
        Value::Float64(v) => {
            Instruction::with_operand(OpCode::LdcR8, Operand::Immediate(Immediate::Float64(*v)))
        }
        Value::Str(s) => Instruction::with_operand(OpCode::Ldstr, Operand::Str(s.clone())),
    }
}

/// Receiver (if any), then arguments left-to-right, then the call itself.
/// Instance calls bind virtually, static calls bind statically.
fn lower_call(
    receiver: Option<&Expr>,
    method: &MemberRef,
    args: &[Expr],
    out: &mut Vec<Instruction>,
) -> Result<()> {
    let opcode = match receiver {
        Some(receiver) => {
            lower(receiver, out)?;
            OpCode::Callvirt
        }
        None => OpCode::Call,
    };

    for arg in args {
        lower(arg, out)?;
    }

    out.push(Instruction::with_member(opcode, method.clone()));
    Ok(())
}
