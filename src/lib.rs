// Copyright 2026 cilsplice contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # cilsplice
//!
//! Pattern-based matching and splicing over CIL (Common Intermediate Language)
//! method-body instruction streams, for runtime method-patching tools. The host
//! patching framework supplies one method's compiled instruction stream; this
//! crate locates a symbolic pattern in it, splices in a replacement, and hands
//! back a fresh stream.
//!
//! ## Features
//!
//! - **Symbolic instruction model** - Opcodes plus operands referencing members
//!   and types by descriptor, no loaded assembly required
//! - **Signature compilation** - Describe search patterns and replacements as
//!   typed expression trees instead of hand-written instruction sequences
//! - **Flexible matching** - Per-element match modes: exact, opcode-only, or a
//!   caller-supplied operand predicate
//! - **Atomic splicing** - A failed match leaves the stream untouched; a missing
//!   pattern is surfaced loudly, never silently skipped
//!
//! ## Quick Start
//!
//! ```rust
//! use cilsplice::prelude::*;
//!
//! // The method being patched (diagnostics only)
//! let method = MemberRef::method(
//!     TypeRef::new("Verse.Scene"),
//!     "OnUpdate",
//!     vec![],
//!     TypeRef::new("System.Void"),
//!     MemberModifiers::PUBLIC,
//! );
//!
//! // What to search for: the lowering of `EMono._zone is Region`, minus the
//! // boolean materialization suffix the code generator appends
//! let zone = MemberRef::field(
//!     TypeRef::new("Verse.EMono"),
//!     "_zone",
//!     TypeRef::new("Verse.Zone"),
//!     MemberModifiers::PUBLIC | MemberModifiers::STATIC,
//! );
//! let signature = compile(&Expr::type_test(
//!     Expr::static_field(zone.clone()),
//!     TypeRef::new("Verse.Region"),
//! ))?;
//! let pattern = Pattern::from_signature(signature.drop_trailing(2)?)?;
//!
//! // What to substitute: a call to the replacement routine
//! let replacement = compile(&Expr::static_call(
//!     MemberRef::method(
//!         TypeRef::new("NoSquash.ScenePatch"),
//!         "IsSafeTransition",
//!         vec![],
//!         TypeRef::new("System.Boolean"),
//!         MemberModifiers::STATIC,
//!     ),
//!     vec![],
//! ))?
//! .into_instructions();
//!
//! let body = vec![
//!     Instruction::with_member(OpCode::Ldsfld, zone),
//!     Instruction::with_type(OpCode::Isinst, TypeRef::new("Verse.Region")),
//!     Instruction::new(OpCode::Ldnull),
//!     Instruction::new(OpCode::CgtUn),
//!     Instruction::new(OpCode::Ret),
//! ];
//!
//! let mut editor = StreamEditor::new(&body, &method);
//! editor.seek_to_start().replace(&pattern, &replacement)?;
//! let rewritten = editor.emit_result();
//! assert_eq!(rewritten.len(), body.len() - pattern.len() + replacement.len());
//! # Ok::<(), cilsplice::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`assembly`] - The symbolic instruction model ([`assembly::Instruction`],
//!   [`assembly::OpCode`], [`assembly::Operand`])
//! - [`compiler`] - Expression trees lowered to deterministic instruction
//!   sequences ([`compiler::compile`], [`compiler::CompiledSignature`])
//! - [`pattern`] - Instruction templates and the subsequence matcher
//!   ([`pattern::Pattern`], [`pattern::MatchMode`])
//! - [`editor`] - Cursor-based search-and-splice over a private stream copy
//!   ([`editor::StreamEditor`])
//! - [`member`] - Symbolic member descriptors, pretty-printing and constructor
//!   overload resolution
//! - [`patch`] - The host-driver boundary and injected logging
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Pattern definition bugs
//! surface as [`Error::UnsupportedExpression`] or [`Error::InvalidPattern`];
//! a target method that changed shape surfaces as [`Error::PatternNotFound`],
//! which is always fatal to that one patch application.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and functions.
pub mod prelude;

/// Symbolic CIL instruction model: opcodes, operands, instructions.
pub mod assembly;

/// Signature compiler: typed expression trees lowered to instruction sequences.
pub mod compiler;

/// Cursor-based stream editor for method-body rewriting.
pub mod editor;

/// Symbolic member descriptors and reflection-style utilities.
pub mod member;

/// Patch application boundary and injected logging.
pub mod patch;

/// Instruction patterns and the contiguous subsequence matcher.
pub mod pattern;

/// `cilsplice` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is
/// always [`Error`]. Used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `cilsplice` Error type
///
/// The main error type for all operations in this crate. Covers pattern
/// definition errors ([`Error::UnsupportedExpression`], [`Error::InvalidPattern`]),
/// pattern application errors ([`Error::PatternNotFound`]) and member resolution
/// errors ([`Error::NoMatchingConstructor`]).
pub use error::Error;

/// Main entry points for defining and applying rewrites.
///
/// See [`pattern::Pattern`] for pattern construction and matching, and
/// [`editor::StreamEditor`] for the cursor-based splice pass over one method
/// body.
pub use editor::StreamEditor;
pub use pattern::Pattern;
