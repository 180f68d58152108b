//! Contains the code related to the symbol table of the compiler.
//!
//! The crate models the entities a Pascal-like program declares — the
//! program itself, constants, named types, variables, functions, procedures
//! and parameters — together with the lexical scopes they are declared in
//! and the [`table::Table`] controller that a driving parser uses to enter
//! and exit blocks and to declare objects.
//!
//! All entities live in typed arenas ([`micac_arena::Arena`]) and reference
//! each other through [`micac_arena::ID`] handles. A handle held by an
//! owning list (a scope's object list, the table's global list) is the one
//! that drives destruction; every other handle (a parameter's owner, a
//! variable's declaring scope, a scope's enclosing scope, a routine's
//! parameter list) is purely navigational.

use derive_new::new;
use enum_as_inner::EnumAsInner;
use micac_arena::ID;
use serde::{Deserialize, Serialize};

use crate::{constant::ConstantValue, table::Table, ty::Type};

pub mod constant;
pub mod error;
pub mod table;
pub mod ty;

mod arbitrary;

/// Represents the parameter-passing convention of a parameter symbol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Passing {
    /// The argument is copied into the parameter.
    #[display(fmt = "value")]
    Value,

    /// The parameter aliases the argument variable.
    #[display(fmt = "reference")]
    Reference,
}

/// Contains the data of the program symbol.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new,
)]
pub struct Program {
    /// The scope of the program body, owned by this symbol.
    pub scope: ID<Scope>,
}

/// Contains the data of the constant symbol.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new,
)]
pub struct Constant {
    /// The literal value of the constant.
    pub value: ConstantValue,
}

/// Contains the data of a named type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct TypeAlias {
    /// The type the declaration denotes. `None` until the declaration has
    /// been resolved.
    pub actual_type: Option<Type>,
}

/// Contains the data of the variable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Variable {
    /// The type of the variable.
    pub ty: Type,

    /// The scope the variable was declared in (non-owning back-reference).
    pub scope: ID<Scope>,
}

/// Contains the data of the function symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// The parameters of the function in declaration order.
    ///
    /// These are references only: the parameter objects themselves are
    /// owned by the function's [`scope`](Self::scope).
    pub parameters: Vec<ID<Object>>,

    /// The return type of the function. `None` until the signature has
    /// been resolved.
    pub return_type: Option<Type>,

    /// The scope of the function body, owned by this symbol.
    pub scope: ID<Scope>,
}

/// Contains the data of the procedure symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    /// The parameters of the procedure in declaration order.
    ///
    /// These are references only: the parameter objects themselves are
    /// owned by the procedure's [`scope`](Self::scope).
    pub parameters: Vec<ID<Object>>,

    /// The scope of the procedure body, owned by this symbol.
    pub scope: ID<Scope>,
}

/// Contains the data of the parameter symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Parameter {
    /// How the argument is passed to the parameter.
    pub passing: Passing,

    /// The type of the parameter.
    pub ty: Type,

    /// The function or procedure the parameter belongs to (non-owning
    /// back-reference).
    pub owner: ID<Object>,
}

/// Is an enumeration of the kind-specific data of an [`Object`].
///
/// Exactly one variant exists per object kind, so an object can never carry
/// data that disagrees with its kind.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumAsInner,
    derive_more::From,
)]
#[allow(missing_docs)]
pub enum Kind {
    Program(Program),
    Constant(Constant),
    TypeAlias(TypeAlias),
    Variable(Variable),
    Function(Function),
    Procedure(Procedure),
    Parameter(Parameter),
}

impl Kind {
    /// Returns the ID of the scope this kind *owns*, if any.
    ///
    /// Only programs, functions and procedures own a scope. A variable's
    /// declaring scope is a back-reference, not ownership, and is therefore
    /// not reported here.
    #[must_use]
    pub const fn owned_scope(&self) -> Option<ID<Scope>> {
        match self {
            Self::Program(program) => Some(program.scope),
            Self::Function(function) => Some(function.scope),
            Self::Procedure(procedure) => Some(procedure.scope),

            Self::Constant(_)
            | Self::TypeAlias(_)
            | Self::Variable(_)
            | Self::Parameter(_) => None,
        }
    }
}

/// Represents a declared entity of the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Object {
    /// The name of the object.
    pub name: String,

    /// The kind-specific data of the object.
    pub kind: Kind,
}

/// Represents a lexical scope holding declared objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Scope {
    /// The objects declared in this scope, in declaration order.
    ///
    /// This is the owning membership list: removing a scope removes every
    /// object listed here.
    #[new(default)]
    pub objects: Vec<ID<Object>>,

    /// The object this scope is the body of (non-owning back-reference).
    pub owner: ID<Object>,

    /// The lexically enclosing scope. `None` for the program's top scope
    /// and for detached scopes.
    pub outer: Option<ID<Scope>>,
}

/// Contains a display object that requires the table to render.
///
/// Primarily used for implementing the [`std::fmt::Display`] trait on
/// values that hold [`ID`]s which only the table can resolve.
#[derive(Debug, Clone, Copy)]
pub struct DisplayObject<'a, D: ?Sized> {
    /// The table in which the display object will be resolved.
    pub table: &'a Table,

    /// The display object that requires the table.
    pub display: &'a D,
}

impl<D: Display + ?Sized> std::fmt::Display for DisplayObject<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.display.fmt(self.table, f)
    }
}

/// Similar to [`std::fmt::Display`] but with the table that the rendered
/// value belongs to.
pub trait Display {
    #[allow(missing_docs, clippy::missing_errors_doc)]
    fn fmt(
        &self,
        table: &Table,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result;
}

impl Display for Object {
    fn fmt(
        &self,
        table: &Table,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match &self.kind {
            Kind::Program(_) => write!(f, "program {}", self.name),

            Kind::Constant(constant) => {
                write!(f, "const {} = {}", self.name, constant.value)
            }

            Kind::TypeAlias(alias) => match &alias.actual_type {
                Some(ty) => write!(f, "type {} = {ty}", self.name),
                None => write!(f, "type {} = <unresolved>", self.name),
            },

            Kind::Variable(variable) => {
                write!(f, "var {}: {}", self.name, variable.ty)
            }

            Kind::Function(function) => {
                write!(f, "function {}(", self.name)?;
                display_parameters(&function.parameters, table, f)?;
                write!(f, ")")?;

                match &function.return_type {
                    Some(ty) => write!(f, ": {ty}"),
                    None => write!(f, ": <unresolved>"),
                }
            }

            Kind::Procedure(procedure) => {
                write!(f, "procedure {}(", self.name)?;
                display_parameters(&procedure.parameters, table, f)?;
                write!(f, ")")
            }

            Kind::Parameter(parameter) => {
                if parameter.passing == Passing::Reference {
                    write!(f, "var ")?;
                }

                write!(f, "{}: {}", self.name, parameter.ty)
            }
        }
    }
}

impl Display for ID<Object> {
    fn fmt(
        &self,
        table: &Table,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match table.get(*self) {
            Some(object) => object.fmt(table, f),
            None => write!(f, "<invalid object>"),
        }
    }
}

fn display_parameters(
    parameters: &[ID<Object>],
    table: &Table,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    for (index, parameter) in parameters.iter().enumerate() {
        if index != 0 {
            write!(f, "; ")?;
        }

        parameter.fmt(table, f)?;
    }

    Ok(())
}
