//! Contains the definition of all errors returned by the symbol [`Table`].
//!
//! [`Table`]: crate::table::Table

use micac_arena::ID;

use crate::{Object, Scope};

/// The error type returned by the operations of the symbol
/// [`Table`](crate::table::Table).
///
/// Every variant corresponds to a caller-misuse condition that would be
/// undefined behavior in a manually managed implementation; here each one is
/// an explicit, recoverable result instead.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error,
)]
pub enum Error {
    /// An operation that requires an active scope was invoked while no
    /// scope had been entered.
    #[error("no scope is currently active")]
    NoActiveScope,

    /// `exit_block` was invoked at the outermost scope, where there is no
    /// enclosing scope to return to.
    #[error("exited a block with no enclosing scope to return to")]
    ScopeUnderflow,

    /// The given scope ID is not (or no longer) present in the table.
    #[error("the scope {0:?} is not present in the table")]
    InvalidScopeId(ID<Scope>),

    /// The given object ID is not (or no longer) present in the table.
    #[error("the object {0:?} is not present in the table")]
    InvalidObjectId(ID<Object>),

    /// A parameter was created for, or declared under, an owner that is
    /// neither a function nor a procedure.
    #[error("the object {0:?} is not a function or procedure")]
    ParameterOutsideRoutine(ID<Object>),
}

/// A result type defaulting its error to [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
