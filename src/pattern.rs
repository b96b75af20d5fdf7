//! Instruction patterns and the contiguous subsequence matcher.
//!
//! A [`Pattern`] is a non-empty sequence of instruction templates, each paired
//! with a [`MatchMode`] deciding how strictly the template compares against a
//! stream instruction. [`Pattern::find_first`] locates the pattern as a
//! contiguous subsequence of a method body.
//!
//! # Matching algorithm
//!
//! The scan is the naive one: every candidate start position is tested until
//! all elements match. Patterns are single-digit to low-double-digit length and
//! haystacks are single method bodies, so the flexibility of per-element match
//! modes matters far more than asymptotic complexity here.
//!
//! # Examples
//!
//! ```rust
//! use cilsplice::assembly::{Instruction, OpCode, Operand};
//! use cilsplice::member::TypeRef;
//! use cilsplice::pattern::{MatchMode, Pattern, PatternElement};
//!
//! let haystack = vec![
//!     Instruction::new(OpCode::Ldnull),
//!     Instruction::with_type(OpCode::Isinst, TypeRef::new("Verse.Region")),
//! ];
//!
//! // Opcode-only: matches any isinst regardless of the tested type
//! let pattern = Pattern::new(vec![PatternElement::new(
//!     Instruction::with_type(OpCode::Isinst, TypeRef::new("Verse.Zone_Tent")),
//!     MatchMode::OpcodeOnly,
//! )])?;
//! assert_eq!(pattern.find_first(&haystack, 0), Some(1));
//! # Ok::<(), cilsplice::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;

use crate::assembly::{Instruction, Operand};
use crate::compiler::CompiledSignature;
use crate::Result;

/// A caller-supplied predicate over an instruction operand.
///
/// `Send + Sync` so compiled patterns stay shareable read-only across rewrite
/// passes.
pub type OperandPredicate = Arc<dyn Fn(&Operand) -> bool + Send + Sync>;

/// The equivalence rule applied to one pattern element during matching.
#[derive(Clone)]
pub enum MatchMode {
    /// Opcode and operand must be structurally equal
    Exact,
    /// Opcode must be equal; the operand is ignored
    OpcodeOnly,
    /// Opcode must be equal and the predicate must accept the operand
    Predicate(OperandPredicate),
}

impl fmt::Debug for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Exact => f.write_str("Exact"),
            MatchMode::OpcodeOnly => f.write_str("OpcodeOnly"),
            MatchMode::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// One instruction template of a [`Pattern`].
#[derive(Debug, Clone)]
pub struct PatternElement {
    instruction: Instruction,
    mode: MatchMode,
}

impl PatternElement {
    /// Creates a pattern element with the given match mode.
    #[must_use]
    pub fn new(instruction: Instruction, mode: MatchMode) -> Self {
        PatternElement { instruction, mode }
    }

    /// Creates an exact-match element.
    #[must_use]
    pub fn exact(instruction: Instruction) -> Self {
        PatternElement::new(instruction, MatchMode::Exact)
    }

    /// The template instruction.
    #[must_use]
    pub fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    /// The match mode of this element.
    #[must_use]
    pub fn mode(&self) -> &MatchMode {
        &self.mode
    }

    /// Tests this element against one stream instruction.
    #[must_use]
    pub fn matches(&self, candidate: &Instruction) -> bool {
        if self.instruction.opcode != candidate.opcode {
            return false;
        }

        match &self.mode {
            MatchMode::Exact => self.instruction.operand == candidate.operand,
            MatchMode::OpcodeOnly => true,
            MatchMode::Predicate(predicate) => predicate(&candidate.operand),
        }
    }
}

/// An immutable, non-empty sequence of instruction templates.
///
/// Built once per patch definition and reusable across multiple target streams.
/// Empty patterns are rejected at construction, so the matcher never has to
/// consider them.
#[derive(Debug, Clone)]
pub struct Pattern {
    elements: Vec<PatternElement>,
}

impl Pattern {
    /// Creates a pattern from explicit elements.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] when `elements` is empty.
    pub fn new(elements: Vec<PatternElement>) -> Result<Self> {
        if elements.is_empty() {
            return Err(invalid_pattern!("a pattern must contain at least one element"));
        }

        Ok(Pattern { elements })
    }

    /// Creates an all-exact pattern from a compiled signature.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] when the signature is empty
    /// (e.g. fully consumed by [`CompiledSignature::drop_trailing`]).
    pub fn from_signature(signature: CompiledSignature) -> Result<Self> {
        Pattern::new(
            signature
                .into_instructions()
                .into_iter()
                .map(PatternElement::exact)
                .collect(),
        )
    }

    /// Creates an all-exact pattern from raw instructions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] when `instructions` is empty.
    pub fn exact(instructions: &[Instruction]) -> Result<Self> {
        Pattern::new(
            instructions
                .iter()
                .cloned()
                .map(PatternElement::exact)
                .collect(),
        )
    }

    /// The pattern elements, in match order.
    #[must_use]
    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    /// The pattern length in instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false; kept for slice-like API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Finds the first occurrence of this pattern in `haystack` at or after
    /// `start`.
    ///
    /// Returns the index of the first matched instruction, or `None` when no
    /// contiguous subsequence satisfies every element's match mode. A pattern
    /// longer than the remaining haystack fails without attempting comparisons.
    /// Pure; no side effects.
    #[must_use]
    pub fn find_first(&self, haystack: &[Instruction], start: usize) -> Option<usize> {
        let len = self.elements.len();
        if start > haystack.len() || len > haystack.len() - start {
            return None;
        }

        (start..=haystack.len() - len).find(|&i| {
            self.elements
                .iter()
                .zip(&haystack[i..i + len])
                .all(|(element, candidate)| element.matches(candidate))
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", element.instruction())?;
            match element.mode() {
                MatchMode::Exact => {}
                MatchMode::OpcodeOnly => f.write_str(" (opcode-only)")?,
                MatchMode::Predicate(_) => f.write_str(" (predicate)")?,
            }
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::OpCode;
    use crate::member::{MemberModifiers, MemberRef, TypeRef};

    fn field(name: &str) -> Instruction {
        Instruction::with_member(
            OpCode::Ldfld,
            MemberRef::field(
                TypeRef::new("Verse.Player"),
                name,
                TypeRef::new("Verse.Zone"),
                MemberModifiers::PUBLIC,
            ),
        )
    }

    fn haystack() -> Vec<Instruction> {
        vec![
            field("a"),
            field("b"),
            Instruction::with_type(OpCode::Isinst, TypeRef::new("Verse.Region")),
            Instruction::new(OpCode::Ldnull),
            Instruction::new(OpCode::CgtUn),
        ]
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(matches!(
            Pattern::new(vec![]),
            Err(crate::Error::InvalidPattern { .. })
        ));
        assert!(matches!(
            Pattern::exact(&[]),
            Err(crate::Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_exact_match_first_index() {
        let haystack = haystack();
        let pattern = Pattern::exact(&haystack[1..3]).unwrap();
        assert_eq!(pattern.find_first(&haystack, 0), Some(1));

        // Searching past the match start finds nothing
        assert_eq!(pattern.find_first(&haystack, 2), None);
    }

    #[test]
    fn test_exact_match_smallest_index_wins() {
        let stream = vec![
            Instruction::new(OpCode::Ldnull),
            Instruction::new(OpCode::Nop),
            Instruction::new(OpCode::Ldnull),
        ];
        let pattern = Pattern::exact(&[Instruction::new(OpCode::Ldnull)]).unwrap();
        assert_eq!(pattern.find_first(&stream, 0), Some(0));
        assert_eq!(pattern.find_first(&stream, 1), Some(2));
    }

    #[test]
    fn test_opcode_only_ignores_operand() {
        let haystack = haystack();
        let pattern = Pattern::new(vec![PatternElement::new(
            Instruction::with_type(OpCode::Isinst, TypeRef::new("Verse.Zone_Tent")),
            MatchMode::OpcodeOnly,
        )])
        .unwrap();

        assert_eq!(pattern.find_first(&haystack, 0), Some(2));
    }

    #[test]
    fn test_predicate_mode() {
        let haystack = haystack();
        let pattern = Pattern::new(vec![PatternElement::new(
            Instruction::new(OpCode::Ldfld),
            MatchMode::Predicate(Arc::new(|operand| {
                matches!(operand, Operand::Member(m) if m.name == "b")
            })),
        )])
        .unwrap();

        assert_eq!(pattern.find_first(&haystack, 0), Some(1));
    }

    #[test]
    fn test_pattern_longer_than_remaining_haystack() {
        let haystack = haystack();
        let pattern = Pattern::exact(&haystack).unwrap();

        assert_eq!(pattern.find_first(&haystack, 0), Some(0));
        assert_eq!(pattern.find_first(&haystack, 1), None);
        assert_eq!(pattern.find_first(&haystack[..3], 0), None);
        assert_eq!(pattern.find_first(&[], 0), None);
    }

    #[test]
    fn test_start_past_end() {
        let haystack = haystack();
        let pattern = Pattern::exact(&haystack[..1]).unwrap();
        assert_eq!(pattern.find_first(&haystack, haystack.len() + 1), None);
    }

    #[test]
    fn test_display_rendering() {
        let pattern = Pattern::new(vec![
            PatternElement::exact(Instruction::new(OpCode::Ldnull)),
            PatternElement::new(
                Instruction::with_type(OpCode::Isinst, TypeRef::new("Verse.Region")),
                MatchMode::OpcodeOnly,
            ),
        ])
        .unwrap();

        assert_eq!(
            pattern.to_string(),
            "[ldnull, isinst Verse.Region (opcode-only)]"
        );
    }
}
