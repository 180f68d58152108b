//! Contains the definition of [`Table`], the symbol table of the compiler.

use getset::{CopyGetters, Getters};
use log::{debug, trace};
use micac_arena::{Arena, ID};
use serde::{Deserialize, Serialize};

use crate::{
    constant::ConstantValue, error::Error, ty::Type, Constant, Function, Kind,
    Object, Parameter, Passing, Procedure, Program, Scope, TypeAlias, Variable,
};

mod intrinsic;

#[cfg(test)]
mod tests;

/// Represents the symbol table of the compiler.
///
/// The table owns every [`Object`] and [`Scope`] of a compilation through
/// its arenas and tracks the scope that declarations are currently routed
/// to. It is an explicit context object: a parser drives it by creating
/// objects through the factory methods, entering and exiting blocks, and
/// declaring objects into the active scope.
///
/// Dropping the table releases the whole ownership graph at once; there is
/// no separate teardown step that could run twice or be forgotten.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Getters,
    CopyGetters,
    Serialize,
    Deserialize,
)]
pub struct Table {
    /// The arena owning every object of the compilation.
    #[get = "pub"]
    objects: Arena<Object>,

    /// The arena owning every scope of the compilation.
    #[get = "pub"]
    scopes: Arena<Scope>,

    /// The top-level object list: the built-in routines followed by any
    /// global declarations, in registration order.
    #[get = "pub"]
    global_objects: Vec<ID<Object>>,

    /// The program object, once one has been created.
    #[get_copy = "pub"]
    program: Option<ID<Object>>,

    /// The scope that declarations are currently routed to, or `None` when
    /// no block has been entered.
    #[get_copy = "pub"]
    current_scope: Option<ID<Scope>>,
}

impl Table {
    /// Creates a new symbol table with the built-in I/O routines registered
    /// in the global object list.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            objects: Arena::new(),
            scopes: Arena::new(),
            global_objects: Vec::new(),
            program: None,
            current_scope: None,
        };

        table.create_intrinsic_routines();
        debug!(
            "symbol table initialized with {} built-in routines",
            table.global_objects.len()
        );

        table
    }

    /// Gets a reference to the object with the given ID.
    #[must_use]
    pub fn get(&self, id: ID<Object>) -> Option<&Object> {
        self.objects.get(id)
    }

    /// Gets a mutable reference to the object with the given ID.
    #[must_use]
    pub fn get_mut(&mut self, id: ID<Object>) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    /// Gets a reference to the scope with the given ID.
    #[must_use]
    pub fn get_scope(&self, id: ID<Scope>) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// Gets a mutable reference to the scope with the given ID.
    #[must_use]
    pub fn get_scope_mut(&mut self, id: ID<Scope>) -> Option<&mut Scope> {
        self.scopes.get_mut(id)
    }

    /// Creates a new detached scope owned by the given object.
    ///
    /// The scope starts with an empty object list and is not entered; use
    /// [`Table::enter_block`] to route declarations to it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidObjectId`]: if `owner` is not present in the table.
    /// - [`Error::InvalidScopeId`]: if `outer` is given but not present in
    ///   the table.
    pub fn create_scope(
        &mut self,
        owner: ID<Object>,
        outer: Option<ID<Scope>>,
    ) -> Result<ID<Scope>, Error> {
        if !self.objects.contains_id(owner) {
            return Err(Error::InvalidObjectId(owner));
        }

        if let Some(outer) = outer {
            if !self.scopes.contains_id(outer) {
                return Err(Error::InvalidScopeId(outer));
            }
        }

        Ok(self.scopes.insert(Scope::new(owner, outer)))
    }

    /// Creates the program object along with its top scope (which has no
    /// enclosing scope) and records it as the program of this table.
    pub fn create_program_object(
        &mut self,
        name: impl Into<String>,
    ) -> ID<Object> {
        let name = name.into();
        let id = self.objects.insert_with(|id| Object {
            name,
            kind: Kind::Program(Program::new(
                self.scopes.insert(Scope::new(id, None)),
            )),
        });

        self.program = Some(id);
        debug!("created program object {id:?}");

        id
    }

    /// Creates a constant object carrying the given literal value.
    pub fn create_constant_object(
        &mut self,
        name: impl Into<String>,
        value: ConstantValue,
    ) -> ID<Object> {
        self.objects.insert(Object::new(
            name.into(),
            Kind::Constant(Constant::new(value)),
        ))
    }

    /// Creates a named type declaration object.
    ///
    /// The declaration starts unresolved; once the denoted type is known,
    /// fill [`TypeAlias::actual_type`] through [`Table::get_mut`].
    pub fn create_type_object(
        &mut self,
        name: impl Into<String>,
    ) -> ID<Object> {
        self.objects.insert(Object::new(
            name.into(),
            Kind::TypeAlias(TypeAlias::new(None)),
        ))
    }

    /// Creates a variable object of the given type, recording the currently
    /// active scope as its declaring scope.
    ///
    /// # Errors
    ///
    /// - [`Error::NoActiveScope`]: if no block has been entered.
    /// - [`Error::InvalidScopeId`]: if the active scope is no longer
    ///   present in the table.
    pub fn create_variable_object(
        &mut self,
        name: impl Into<String>,
        ty: Type,
    ) -> Result<ID<Object>, Error> {
        let scope = self.current_scope.ok_or(Error::NoActiveScope)?;
        if !self.scopes.contains_id(scope) {
            return Err(Error::InvalidScopeId(scope));
        }

        Ok(self.objects.insert(Object::new(
            name.into(),
            Kind::Variable(Variable::new(ty, scope)),
        )))
    }

    /// Creates a function object along with its body scope. The scope is
    /// owned by the new function and encloses into the currently active
    /// scope; the parameter list starts empty and the return type is
    /// unresolved until the signature has been parsed.
    pub fn create_function_object(
        &mut self,
        name: impl Into<String>,
    ) -> ID<Object> {
        let name = name.into();
        let outer = self.current_scope;

        self.objects.insert_with(|id| Object {
            name,
            kind: Kind::Function(Function {
                parameters: Vec::new(),
                return_type: None,
                scope: self.scopes.insert(Scope::new(id, outer)),
            }),
        })
    }

    /// Creates a procedure object along with its body scope, mirroring
    /// [`Table::create_function_object`] without a return type.
    pub fn create_procedure_object(
        &mut self,
        name: impl Into<String>,
    ) -> ID<Object> {
        let name = name.into();
        let outer = self.current_scope;

        self.objects.insert_with(|id| Object {
            name,
            kind: Kind::Procedure(Procedure {
                parameters: Vec::new(),
                scope: self.scopes.insert(Scope::new(id, outer)),
            }),
        })
    }

    /// Creates a parameter object of the given type and passing convention,
    /// owned by the given function or procedure.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidObjectId`]: if `owner` is not present in the table.
    /// - [`Error::ParameterOutsideRoutine`]: if `owner` is neither a
    ///   function nor a procedure.
    pub fn create_parameter_object(
        &mut self,
        name: impl Into<String>,
        passing: Passing,
        ty: Type,
        owner: ID<Object>,
    ) -> Result<ID<Object>, Error> {
        let owner_object =
            self.objects.get(owner).ok_or(Error::InvalidObjectId(owner))?;

        if !matches!(owner_object.kind, Kind::Function(_) | Kind::Procedure(_))
        {
            return Err(Error::ParameterOutsideRoutine(owner));
        }

        Ok(self.objects.insert(Object::new(
            name.into(),
            Kind::Parameter(Parameter::new(passing, ty, owner)),
        )))
    }

    /// Enters the given scope, routing subsequent declarations to it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidScopeId`]: if the scope is not present in the
    ///   table.
    pub fn enter_block(&mut self, scope: ID<Scope>) -> Result<(), Error> {
        if !self.scopes.contains_id(scope) {
            return Err(Error::InvalidScopeId(scope));
        }

        trace!("entering scope {scope:?}");
        self.current_scope = Some(scope);

        Ok(())
    }

    /// Exits the currently active scope, restoring its enclosing scope as
    /// the active one (`None` if the exited scope had no enclosing scope).
    ///
    /// # Errors
    ///
    /// - [`Error::ScopeUnderflow`]: if no scope is active.
    /// - [`Error::InvalidScopeId`]: if the active scope is no longer
    ///   present in the table.
    pub fn exit_block(&mut self) -> Result<(), Error> {
        let current = self.current_scope.ok_or(Error::ScopeUnderflow)?;
        let outer = self
            .scopes
            .get(current)
            .ok_or(Error::InvalidScopeId(current))?
            .outer;

        trace!("exiting scope {current:?} into {outer:?}");
        self.current_scope = outer;

        Ok(())
    }

    /// Declares the given object into the currently active scope.
    ///
    /// The scope's object list takes ownership of the object. A parameter
    /// is additionally referenced from the parameter list of the routine
    /// owning the active scope; that list never owns the parameter, which
    /// is released exactly once through the scope. Both insertions happen
    /// together: on any error the table is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::NoActiveScope`]: if no block has been entered.
    /// - [`Error::InvalidScopeId`]: if the active scope is no longer
    ///   present in the table.
    /// - [`Error::InvalidObjectId`]: if `id` (or, for a parameter, the
    ///   owner of the active scope) is not present in the table.
    /// - [`Error::ParameterOutsideRoutine`]: if a parameter is declared
    ///   while the active scope is owned by anything other than a function
    ///   or procedure.
    pub fn declare_object(&mut self, id: ID<Object>) -> Result<(), Error> {
        let scope_id = self.current_scope.ok_or(Error::NoActiveScope)?;
        if !self.scopes.contains_id(scope_id) {
            return Err(Error::InvalidScopeId(scope_id));
        }

        let is_parameter = self
            .objects
            .get(id)
            .ok_or(Error::InvalidObjectId(id))?
            .kind
            .is_parameter();

        if is_parameter {
            let owner_id = self.scopes[scope_id].owner;
            let owner = self
                .objects
                .get_mut(owner_id)
                .ok_or(Error::InvalidObjectId(owner_id))?;

            match &mut owner.kind {
                Kind::Function(function) => function.parameters.push(id),
                Kind::Procedure(procedure) => procedure.parameters.push(id),
                _ => return Err(Error::ParameterOutsideRoutine(owner_id)),
            }
        }

        self.scopes[scope_id].objects.push(id);
        trace!("declared object {id:?} into scope {scope_id:?}");

        Ok(())
    }

    /// Appends the given object to the global object list, giving it
    /// top-level visibility without entering any scope.
    ///
    /// The global list owns its members the same way a scope's object list
    /// does; built-in routines are registered through this list.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidObjectId`]: if the object is not present in the
    ///   table.
    pub fn declare_global_object(
        &mut self,
        id: ID<Object>,
    ) -> Result<(), Error> {
        if !self.objects.contains_id(id) {
            return Err(Error::InvalidObjectId(id));
        }

        self.global_objects.push(id);
        trace!("declared object {id:?} into the global list");

        Ok(())
    }

    /// Finds the first object in the given list whose name matches exactly.
    ///
    /// The scan is linear and first-match-wins, which is what makes
    /// shadowing resolve to the nearest declaration when callers search
    /// scope lists from the innermost scope outwards. IDs no longer present
    /// in the table are skipped.
    #[must_use]
    pub fn find_object(
        &self,
        objects: &[ID<Object>],
        name: &str,
    ) -> Option<ID<Object>> {
        objects.iter().copied().find(|id| {
            self.objects.get(*id).is_some_and(|object| object.name == name)
        })
    }

    /// Looks a name up through the chain of active scopes, innermost first,
    /// falling back to the global object list.
    ///
    /// Returns the nearest declaration of the name, so inner declarations
    /// shadow outer ones and every declaration shadows a built-in routine
    /// of the same name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ID<Object>> {
        if let Some(current) = self.current_scope {
            for scope_id in self.scope_walker(current) {
                if let Some(scope) = self.scopes.get(scope_id) {
                    if let Some(found) =
                        self.find_object(&scope.objects, name)
                    {
                        return Some(found);
                    }
                }
            }
        }

        self.find_object(&self.global_objects, name)
    }

    /// Gets the [`ScopeWalker`] that walks from the given scope outwards
    /// through the enclosing scopes.
    ///
    /// See [`ScopeWalker`] for more information.
    #[must_use]
    pub const fn scope_walker(&self, from: ID<Scope>) -> ScopeWalker<'_> {
        ScopeWalker { table: self, current: Some(from) }
    }

    /// Removes the given object and everything it transitively owns.
    ///
    /// A program, function or procedure takes its body scope with it, and
    /// the scope takes every object declared in it. A routine's parameter
    /// list is *not* traversed: the parameters it references are owned by
    /// the routine's scope and are removed exactly once through that list.
    ///
    /// The removed object is also unlinked from the global object list, and
    /// the active scope is reset if it was removed along the way. Stale IDs
    /// remaining in other scopes' object lists are skipped by
    /// [`Table::find_object`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidObjectId`]: if the object is not present in the
    ///   table.
    pub fn remove_object(&mut self, id: ID<Object>) -> Result<(), Error> {
        let object =
            self.objects.remove(id).ok_or(Error::InvalidObjectId(id))?;

        debug!("removing object {:?} `{}`", id, object.name);

        if let Some(scope) = object.kind.owned_scope() {
            self.remove_scope(scope);
        }

        self.global_objects.retain(|global| *global != id);

        if self.program == Some(id) {
            self.program = None;
        }

        if self
            .current_scope
            .is_some_and(|scope| !self.scopes.contains_id(scope))
        {
            self.current_scope = None;
        }

        Ok(())
    }

    fn remove_scope(&mut self, id: ID<Scope>) {
        let Some(scope) = self.scopes.remove(id) else { return };

        for object_id in scope.objects {
            let Some(object) = self.objects.remove(object_id) else {
                continue;
            };

            if let Some(owned) = object.kind.owned_scope() {
                self.remove_scope(owned);
            }
        }
    }
}

impl Default for Table {
    fn default() -> Self { Self::new() }
}

/// Represents an iterator that walks from a scope outwards through its
/// enclosing scopes until it reaches a scope with no enclosing one.
///
/// The iterator yields the starting scope first.
#[derive(Debug, Clone)]
pub struct ScopeWalker<'a> {
    table: &'a Table,
    current: Option<ID<Scope>>,
}

impl Iterator for ScopeWalker<'_> {
    type Item = ID<Scope>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current {
            Some(current) => {
                let next = self
                    .table
                    .scopes
                    .get(current)
                    .and_then(|scope| scope.outer);

                self.current = next;
                Some(current)
            }
            None => None,
        }
    }
}
