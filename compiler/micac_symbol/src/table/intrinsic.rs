//! Registration of the built-in I/O routines of the language.

use micac_arena::ID;

use super::Table;
use crate::{ty::Type, Kind, Object, Parameter, Passing};

impl Table {
    /// Registers the built-in I/O routines into the global object list.
    ///
    /// The routine names, their parameter types and their registration
    /// order are a fixed contract:
    ///
    /// | name      | kind      | signature        |
    /// |-----------|-----------|------------------|
    /// | `READC`   | function  | `(): char`       |
    /// | `READI`   | function  | `(): integer`    |
    /// | `WRITEI`  | procedure | `(i: integer)`   |
    /// | `WRITEC`  | procedure | `(ch: char)`     |
    /// | `WRITELN` | procedure | `()`             |
    pub(super) fn create_intrinsic_routines(&mut self) {
        let readc = self.create_function_object("READC");
        self.objects[readc].kind.as_function_mut().unwrap().return_type =
            Some(Type::CHAR);
        self.global_objects.push(readc);

        let readi = self.create_function_object("READI");
        self.objects[readi].kind.as_function_mut().unwrap().return_type =
            Some(Type::INT);
        self.global_objects.push(readi);

        let writei = self.create_procedure_object("WRITEI");
        self.attach_intrinsic_parameter(writei, "i", Type::INT);
        self.global_objects.push(writei);

        let writec = self.create_procedure_object("WRITEC");
        self.attach_intrinsic_parameter(writec, "ch", Type::CHAR);
        self.global_objects.push(writec);

        let writeln = self.create_procedure_object("WRITELN");
        self.global_objects.push(writeln);
    }

    /// Attaches a single by-value parameter to a built-in procedure,
    /// inserting it into both the procedure's parameter list and its body
    /// scope, the same dual membership [`Table::declare_object`] produces.
    fn attach_intrinsic_parameter(
        &mut self,
        routine: ID<Object>,
        name: &str,
        ty: Type,
    ) {
        let parameter = self.objects.insert(Object::new(
            name.to_owned(),
            Kind::Parameter(Parameter::new(Passing::Value, ty, routine)),
        ));

        let procedure = self.objects[routine].kind.as_procedure_mut().unwrap();
        procedure.parameters.push(parameter);
        let scope = procedure.scope;

        self.scopes[scope].objects.push(parameter);
    }
}
