//! Contains the definition of [`ConstantValue`].

use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::ty::Primitive;

/// Represents the literal value carried by a constant symbol.
///
/// The payload is a plain scalar, so duplication is a [`Copy`] and carries
/// no nested ownership.
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
    derive_more::From,
)]
pub enum ConstantValue {
    /// An integer literal value.
    #[display(fmt = "{}", _0)]
    Int(i32),

    /// A character literal value.
    #[display(fmt = "'{}'", _0)]
    Char(char),
}

impl ConstantValue {
    /// Returns the primitive type that the value inhabits.
    #[must_use]
    pub const fn ty(&self) -> Primitive {
        match self {
            Self::Int(_) => Primitive::Int,
            Self::Char(_) => Primitive::Char,
        }
    }
}
