//! Symbolic member descriptors and reflection-style utilities.
//!
//! This module defines the portable stand-ins for runtime reflection handles:
//! [`TypeRef`] for type names, [`MemberRef`] for fields, properties, methods and
//! constructors, and [`MemberModifiers`] for their access/binding flags. On top of
//! the descriptors it provides the two reflection conveniences the patching host
//! relies on:
//!
//! - [`MemberRef::full_description`] - C#-style human-readable member signatures
//!   for diagnostics (never used for control flow)
//! - [`matching_constructor`] - overload resolution by parameter assignability
//!   against a caller-populated [`TypeModel`]
//!
//! # Key Components
//!
//! - [`TypeRef`] - Symbolic full type name with structural equality
//! - [`MemberRef`] - Member descriptor (name, declaring type, kind, modifiers, signature)
//! - [`MemberKind`] - Field / Property / Method / Constructor discriminant
//! - [`TypeModel`] - Reflexive, transitive subtype registry for assignability checks
//!
//! # Examples
//!
//! ```rust
//! use cilsplice::member::{MemberModifiers, MemberRef, TypeRef};
//!
//! let field = MemberRef::field(
//!     TypeRef::new("Verse.Player"),
//!     "lastTransition",
//!     TypeRef::new("Verse.Transition"),
//!     MemberModifiers::PUBLIC,
//! );
//! assert_eq!(
//!     field.full_description(),
//!     "public Verse.Transition Verse.Player::lastTransition"
//! );
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use bitflags::bitflags;

use crate::Result;

/// A symbolic reference to a type, by its full name.
///
/// Types are opaque to this crate: two [`TypeRef`]s are the same type iff their
/// names are equal. Relationships between types (for assignability) live in a
/// [`TypeModel`], not on the reference itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(String);

impl TypeRef {
    /// Creates a type reference from a full type name.
    #[must_use]
    pub fn new(full_name: impl Into<String>) -> Self {
        TypeRef(full_name.into())
    }

    /// Returns the full type name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.0
    }

    /// Returns the simple name, i.e. the segment after the last `.`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        TypeRef::new(value)
    }
}

/// The kind of member a [`MemberRef`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A field
    Field,
    /// A property (described by its accessor in instruction operands)
    Property,
    /// A method
    Method,
    /// An instance or static constructor
    Constructor,
}

bitflags! {
    /// Access and binding flags of a member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberModifiers: u8 {
        /// Member is publicly accessible
        const PUBLIC = 0x01;
        /// Member is static (no receiver)
        const STATIC = 0x02;
        /// Member participates in virtual dispatch
        const VIRTUAL = 0x04;
        /// Member is a compile-time constant
        const CONST = 0x08;
    }
}

/// A symbolic member descriptor.
///
/// Carries everything the matcher, signature compiler and diagnostics need to
/// know about a field, property, method or constructor: name, declaring type,
/// kind, modifiers, and the parameter/return types of its signature. Equality is
/// structural, which is what instruction operand matching relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRef {
    /// Member name (e.g. `lastZone`, `get_lastZone`, `.ctor`)
    pub name: String,
    /// The type declaring this member
    pub declaring_type: TypeRef,
    /// What kind of member this is
    pub kind: MemberKind,
    /// Access and binding flags
    pub modifiers: MemberModifiers,
    /// Parameter types, in order (empty for fields and properties)
    pub params: Vec<TypeRef>,
    /// Return type for methods, field type for fields, constructed type for constructors
    pub return_type: TypeRef,
}

impl MemberRef {
    /// Creates a field descriptor.
    #[must_use]
    pub fn field(
        declaring_type: TypeRef,
        name: impl Into<String>,
        field_type: TypeRef,
        modifiers: MemberModifiers,
    ) -> Self {
        MemberRef {
            name: name.into(),
            declaring_type,
            kind: MemberKind::Field,
            modifiers,
            params: Vec::new(),
            return_type: field_type,
        }
    }

    /// Creates a method descriptor.
    #[must_use]
    pub fn method(
        declaring_type: TypeRef,
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: TypeRef,
        modifiers: MemberModifiers,
    ) -> Self {
        MemberRef {
            name: name.into(),
            declaring_type,
            kind: MemberKind::Method,
            modifiers,
            params,
            return_type,
        }
    }

    /// Creates the getter method descriptor for a property, following the
    /// `get_Name` accessor naming convention.
    #[must_use]
    pub fn property_getter(
        declaring_type: TypeRef,
        property_name: &str,
        property_type: TypeRef,
        modifiers: MemberModifiers,
    ) -> Self {
        MemberRef {
            name: format!("get_{property_name}"),
            declaring_type,
            kind: MemberKind::Method,
            modifiers,
            params: Vec::new(),
            return_type: property_type,
        }
    }

    /// Creates a constructor descriptor for the declaring type.
    #[must_use]
    pub fn constructor(
        declaring_type: TypeRef,
        params: Vec<TypeRef>,
        modifiers: MemberModifiers,
    ) -> Self {
        let return_type = declaring_type.clone();
        MemberRef {
            name: if modifiers.contains(MemberModifiers::STATIC) {
                ".cctor".to_string()
            } else {
                ".ctor".to_string()
            },
            declaring_type,
            kind: MemberKind::Constructor,
            modifiers,
            params,
            return_type,
        }
    }

    /// Returns true when this member binds statically (no receiver).
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(MemberModifiers::STATIC)
    }

    /// Renders a C#-style human-readable description of this member.
    ///
    /// Fields and properties render as `[modifiers] Type Declaring::name`;
    /// methods and constructors additionally carry their parameter list:
    /// `public static Verse.Zone Verse.Player::get_lastZone()`.
    ///
    /// The output is for diagnostics only and makes no round-trip guarantee.
    #[must_use]
    pub fn full_description(&self) -> String {
        let mut out = String::new();

        if self.modifiers.contains(MemberModifiers::PUBLIC) {
            out.push_str("public ");
        }

        if self.modifiers.contains(MemberModifiers::CONST) {
            out.push_str("const ");
        } else if self.is_static() {
            out.push_str("static ");
        }

        if self.modifiers.contains(MemberModifiers::VIRTUAL) {
            out.push_str("virtual ");
        }

        out.push_str(self.return_type.full_name());
        out.push(' ');
        out.push_str(self.declaring_type.full_name());
        out.push_str("::");
        out.push_str(&self.name);

        match self.kind {
            MemberKind::Field => {}
            MemberKind::Property => out.push_str(" { get; }"),
            MemberKind::Method | MemberKind::Constructor => {
                out.push('(');
                for (i, param) in self.params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(param.full_name());
                }
                out.push(')');
            }
        }

        out
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}

/// A registry of subtype relationships used for assignability checks.
///
/// The host runtime knows the real type hierarchy; this crate only sees the
/// edges a caller registers. [`TypeModel::is_assignable`] is reflexive and
/// transitive over those edges: `register_subtype(Zone_Tent, Zone)` makes a
/// `Zone_Tent` assignable to `Zone` and to anything `Zone` was registered under.
#[derive(Debug, Clone, Default)]
pub struct TypeModel {
    supertypes: HashMap<TypeRef, HashSet<TypeRef>>,
}

impl TypeModel {
    /// Creates an empty type model. Every type is assignable only to itself.
    #[must_use]
    pub fn new() -> Self {
        TypeModel::default()
    }

    /// Records that `subtype` is a direct subtype of `supertype`
    /// (class inheritance or interface implementation).
    pub fn register_subtype(&mut self, subtype: TypeRef, supertype: TypeRef) {
        self.supertypes.entry(subtype).or_default().insert(supertype);
    }

    /// Returns true when a value of type `from` can be assigned to a slot of
    /// type `to`. Reflexive and transitive over the registered edges.
    #[must_use]
    pub fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        if from == to {
            return true;
        }

        let mut visited = HashSet::new();
        let mut queue: Vec<&TypeRef> = vec![from];

        while let Some(current) = queue.pop() {
            if !visited.insert(current) {
                continue;
            }

            if let Some(supers) = self.supertypes.get(current) {
                if supers.contains(to) {
                    return true;
                }
                queue.extend(supers.iter());
            }
        }

        false
    }

    /// Element-wise assignability of `from` types into `to` slots.
    /// False when the lists differ in length.
    #[must_use]
    pub fn are_assignable(&self, from: &[TypeRef], to: &[TypeRef]) -> bool {
        from.len() == to.len()
            && from
                .iter()
                .zip(to.iter())
                .all(|(f, t)| self.is_assignable(f, t))
    }
}

/// Finds a constructor whose parameters best match the given argument types.
///
/// Resolution runs in two phases over `candidates`, in order:
///
/// 1. first constructor whose parameters are assignable *from* the arguments
///    (arguments widen into the parameters), then
/// 2. first constructor whose parameters are assignable *to* the arguments.
///
/// Non-constructor descriptors and static/instance mismatches (per
/// `search_static`) are skipped. Fails with
/// [`crate::Error::NoMatchingConstructor`] listing the considered candidates.
///
/// # Errors
///
/// Returns [`crate::Error::NoMatchingConstructor`] when neither phase produces
/// a match.
pub fn matching_constructor<'a>(
    candidates: &'a [MemberRef],
    arg_types: &[TypeRef],
    model: &TypeModel,
    search_static: bool,
) -> Result<&'a MemberRef> {
    let considered: Vec<&MemberRef> = candidates
        .iter()
        .filter(|c| c.kind == MemberKind::Constructor && c.is_static() == search_static)
        .collect();

    if let Some(found) = considered
        .iter()
        .copied()
        .find(|c| model.are_assignable(arg_types, &c.params))
    {
        return Ok(found);
    }

    if let Some(found) = considered
        .iter()
        .copied()
        .find(|c| model.are_assignable(&c.params, arg_types))
    {
        return Ok(found);
    }

    let listing: Vec<String> = considered.iter().map(|c| c.full_description()).collect();
    Err(crate::Error::NoMatchingConstructor(format!(
        "No constructor found for type: {}, parameters: [{}], static: {}, found constructors: [{}]",
        candidates
            .first()
            .map_or_else(|| "<none>".to_string(), |c| c.declaring_type.to_string()),
        arg_types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        search_static,
        listing.join("; "),
    )))
}
