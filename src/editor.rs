//! Cursor-based stream editor for method-body rewriting.
//!
//! The editor owns a private copy of the target method's instruction stream and
//! a logical cursor. Rewrites run as a left-to-right pass: seek, search forward
//! for a pattern, splice a replacement in, repeat. The original stream is only
//! borrowed at construction; [`StreamEditor::emit_result`] materializes a fresh
//! stream for hand-off to the host driver, so input and output never alias.
//!
//! # Failure semantics
//!
//! A pattern that fails to match is fatal to the whole patch application.
//! [`StreamEditor::replace`] and [`StreamEditor::advance_to_match`] return
//! [`crate::Error::PatternNotFound`] and leave the buffer untouched — there is
//! no partial-success mode, and a missing pattern is never silently skipped:
//! it means the target method changed shape and the rewrite no longer applies.
//!
//! # Examples
//!
//! ```rust
//! use cilsplice::assembly::{Instruction, OpCode};
//! use cilsplice::editor::StreamEditor;
//! use cilsplice::member::{MemberModifiers, MemberRef, TypeRef};
//! use cilsplice::pattern::Pattern;
//!
//! let method = MemberRef::method(
//!     TypeRef::new("Verse.Scene"),
//!     "OnUpdate",
//!     vec![],
//!     TypeRef::new("System.Void"),
//!     MemberModifiers::PUBLIC,
//! );
//! let body = vec![Instruction::new(OpCode::Nop), Instruction::new(OpCode::Ret)];
//!
//! let mut editor = StreamEditor::new(&body, &method);
//! let pattern = Pattern::exact(&[Instruction::new(OpCode::Nop)])?;
//! editor
//!     .seek_to_start()
//!     .replace(&pattern, &[Instruction::new(OpCode::Ldnull), Instruction::new(OpCode::Pop)])?;
//!
//! let rewritten = editor.emit_result();
//! assert_eq!(rewritten.len(), 3);
//! # Ok::<(), cilsplice::Error>(())
//! ```

use crate::assembly::Instruction;
use crate::member::MemberRef;
use crate::pattern::Pattern;
use crate::Result;

/// A stateful cursor over a privately owned instruction stream.
///
/// One editor instance serves one method-body rewrite; it is never shared.
/// Sequential [`StreamEditor::replace`] calls operate over strictly increasing
/// cursor positions, so a pattern is never matched against already-replaced
/// output in the same pass unless the cursor is explicitly reset with
/// [`StreamEditor::seek_to_start`].
#[derive(Debug, Clone)]
pub struct StreamEditor {
    buffer: Vec<Instruction>,
    cursor: usize,
    method: String,
}

impl StreamEditor {
    /// Creates an editor over a copy of `instructions`. The method descriptor
    /// is used only for diagnostic messages, never for control flow.
    #[must_use]
    pub fn new(instructions: &[Instruction], method: &MemberRef) -> Self {
        StreamEditor {
            buffer: instructions.to_vec(),
            cursor: 0,
            method: method.full_description(),
        }
    }

    /// Resets the cursor to the start of the stream.
    pub fn seek_to_start(&mut self) -> &mut Self {
        self.cursor = 0;
        self
    }

    /// Current cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The current state of the edited stream.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.buffer
    }

    /// Searches for `pattern` from the current cursor and moves the cursor to
    /// the match start.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::PatternNotFound`] when the pattern does not occur
    /// at or after the cursor; the cursor and buffer are left unchanged.
    pub fn advance_to_match(&mut self, pattern: &Pattern) -> Result<&mut Self> {
        match pattern.find_first(&self.buffer, self.cursor) {
            Some(index) => {
                self.cursor = index;
                Ok(self)
            }
            None => Err(self.not_found(pattern)),
        }
    }

    /// Finds `pattern` from the current cursor and splices `replacement` over
    /// the matched region. The cursor ends immediately after the inserted
    /// region, never inside the removed range.
    ///
    /// Atomic from the caller's perspective: either the pattern is found and
    /// the full splice happens, or the call fails and the stream is left
    /// unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::PatternNotFound`] when the pattern does not occur
    /// at or after the cursor.
    pub fn replace(&mut self, pattern: &Pattern, replacement: &[Instruction]) -> Result<&mut Self> {
        let Some(index) = pattern.find_first(&self.buffer, self.cursor) else {
            return Err(self.not_found(pattern));
        };

        self.buffer
            .splice(index..index + pattern.len(), replacement.iter().cloned());
        self.cursor = index + replacement.len();
        Ok(self)
    }

    /// Consumes the editor and materializes the final edited stream for
    /// hand-off to the host driver.
    #[must_use]
    pub fn emit_result(self) -> Vec<Instruction> {
        self.buffer
    }

    fn not_found(&self, pattern: &Pattern) -> crate::Error {
        crate::Error::PatternNotFound {
            pattern: pattern.to_string(),
            method: self.method.clone(),
        }
    }
}
