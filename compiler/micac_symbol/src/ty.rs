//! Contains the definition of [`Type`], the type terms of the language.

use std::fmt;

use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Contains all primitive types in the language.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumAsInner,
    Serialize,
    Deserialize,
    derive_more::Display,
    EnumIter,
)]
#[allow(missing_docs)]
pub enum Primitive {
    #[display(fmt = "integer")]
    Int,
    #[display(fmt = "char")]
    Char,
}

/// Represents an array type, denoted by `array [N] of T` syntax.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Array {
    /// The number of elements in the array. Always positive.
    pub length: u32,

    /// The type of the elements in the array. May itself be an array,
    /// nested to an arbitrary depth.
    pub element: Box<Type>,
}

/// Represents a type term of the language.
///
/// Equality is structural: two terms are equal iff their shapes match —
/// primitives by kind, arrays by length and (recursively) element type. The
/// name a type was declared under never participates in the comparison.
/// [`Clone`] performs a deep copy, so a duplicate shares no storage with
/// the original.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumAsInner,
    Serialize,
    Deserialize,
    derive_more::From,
)]
pub enum Type {
    /// A primitive type.
    Primitive(Primitive),

    /// An array type.
    Array(Array),
}

impl Type {
    /// The `integer` primitive type.
    pub const INT: Self = Self::Primitive(Primitive::Int);

    /// The `char` primitive type.
    pub const CHAR: Self = Self::Primitive(Primitive::Char);

    /// Creates a new array type with the given element count and element
    /// type, taking ownership of the element term.
    #[must_use]
    pub fn array(length: u32, element: Self) -> Self {
        Self::Array(Array { length, element: Box::new(element) })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Array(array) => {
                write!(f, "array [{}] of {}", array.length, array.element)
            }
        }
    }
}
