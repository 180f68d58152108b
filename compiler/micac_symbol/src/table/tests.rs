use super::Table;
use crate::{
    constant::ConstantValue,
    error::Error,
    ty::Type,
    DisplayObject, Passing,
};

fn new_table() -> Table {
    let _ = env_logger::builder().is_test(true).try_init();

    Table::new()
}

#[test]
fn intrinsic_routines_are_registered_in_order() {
    let table = new_table();
    let globals = table.global_objects();

    assert_eq!(globals.len(), 5);

    let names = globals
        .iter()
        .map(|id| table.get(*id).unwrap().name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["READC", "READI", "WRITEI", "WRITEC", "WRITELN"]);

    let readc = table.get(globals[0]).unwrap().kind.as_function().unwrap();
    assert_eq!(readc.return_type, Some(Type::CHAR));
    assert!(readc.parameters.is_empty());

    let readi = table.get(globals[1]).unwrap().kind.as_function().unwrap();
    assert_eq!(readi.return_type, Some(Type::INT));
    assert!(readi.parameters.is_empty());

    let writei = table.get(globals[2]).unwrap().kind.as_procedure().unwrap();
    assert_eq!(writei.parameters.len(), 1);

    let parameter = table.get(writei.parameters[0]).unwrap();
    assert_eq!(parameter.name, "i");
    let parameter = parameter.kind.as_parameter().unwrap();
    assert_eq!(parameter.passing, Passing::Value);
    assert_eq!(parameter.ty, Type::INT);
    assert_eq!(parameter.owner, globals[2]);

    // the parameter is owned by the procedure's body scope
    let scope = table.get_scope(writei.scope).unwrap();
    assert_eq!(scope.objects, writei.parameters);

    let writec = table.get(globals[3]).unwrap().kind.as_procedure().unwrap();
    assert_eq!(writec.parameters.len(), 1);

    let parameter = table.get(writec.parameters[0]).unwrap();
    assert_eq!(parameter.name, "ch");
    let parameter = parameter.kind.as_parameter().unwrap();
    assert_eq!(parameter.passing, Passing::Value);
    assert_eq!(parameter.ty, Type::CHAR);

    let writeln = table.get(globals[4]).unwrap().kind.as_procedure().unwrap();
    assert!(writeln.parameters.is_empty());
}

#[test]
fn program_object_registers_itself() {
    let mut table = new_table();

    let program = table.create_program_object("MAIN");
    assert_eq!(table.program(), Some(program));

    let scope_id = table.get(program).unwrap().kind.owned_scope().unwrap();
    let scope = table.get_scope(scope_id).unwrap();
    assert_eq!(scope.owner, program);
    assert_eq!(scope.outer, None);
    assert!(scope.objects.is_empty());
}

#[test]
fn detached_scope_keeps_declarations_after_exit() {
    let mut table = new_table();

    let owner = table.create_program_object("MAIN");
    let scope = table.create_scope(owner, None).unwrap();
    assert_eq!(table.current_scope(), None);

    table.enter_block(scope).unwrap();
    assert_eq!(table.current_scope(), Some(scope));

    let variable = table.create_variable_object("X", Type::INT).unwrap();
    table.declare_object(variable).unwrap();

    table.exit_block().unwrap();
    assert_eq!(table.current_scope(), None);

    // the scope is detached from the active chain, yet its object list is
    // still searchable
    let objects = &table.get_scope(scope).unwrap().objects;
    assert_eq!(table.find_object(objects, "X"), Some(variable));
}

#[test]
fn find_object_returns_the_first_inserted_on_collision() {
    let mut table = new_table();

    let program = table.create_program_object("MAIN");
    let scope = table.get(program).unwrap().kind.owned_scope().unwrap();
    table.enter_block(scope).unwrap();

    let first = table.create_variable_object("X", Type::INT).unwrap();
    let second = table.create_variable_object("X", Type::CHAR).unwrap();
    table.declare_object(first).unwrap();
    table.declare_object(second).unwrap();

    let objects = &table.get_scope(scope).unwrap().objects;
    assert_eq!(objects.len(), 2);
    assert_eq!(table.find_object(objects, "X"), Some(first));

    // the scan is case-sensitive
    assert_eq!(table.find_object(objects, "x"), None);
}

#[test]
fn parameter_is_shared_between_routine_and_scope_and_removed_once() {
    let mut table = new_table();

    let program = table.create_program_object("MAIN");
    let program_scope =
        table.get(program).unwrap().kind.owned_scope().unwrap();
    table.enter_block(program_scope).unwrap();

    let objects_before = table.objects().len();
    let scopes_before = table.scopes().len();

    let function = table.create_function_object("F");
    table.declare_object(function).unwrap();

    let function_scope =
        table.get(function).unwrap().kind.owned_scope().unwrap();
    table.enter_block(function_scope).unwrap();

    let parameter = table
        .create_parameter_object("A", Passing::Value, Type::INT, function)
        .unwrap();
    table.declare_object(parameter).unwrap();

    let local = table.create_variable_object("Y", Type::CHAR).unwrap();
    table.declare_object(local).unwrap();

    table.exit_block().unwrap();

    // dual membership: the routine references the parameter, the scope owns
    // it
    let function_data =
        table.get(function).unwrap().kind.as_function().unwrap();
    assert_eq!(function_data.parameters, vec![parameter]);
    assert_eq!(
        table.get_scope(function_scope).unwrap().objects,
        vec![parameter, local]
    );

    // removing the function releases the function, its scope and everything
    // the scope owns, each exactly once
    table.remove_object(function).unwrap();

    assert_eq!(table.objects().len(), objects_before);
    assert_eq!(table.scopes().len(), scopes_before);
    assert!(table.get(function).is_none());
    assert!(table.get(parameter).is_none());
    assert!(table.get(local).is_none());
    assert!(table.get_scope(function_scope).is_none());

    // the stale ID left in the program scope's list is skipped by lookups
    let program_objects = &table.get_scope(program_scope).unwrap().objects;
    assert_eq!(table.find_object(program_objects, "F"), None);
}

#[test]
fn removing_the_routine_of_the_active_scope_clears_it() {
    let mut table = new_table();

    let program = table.create_program_object("MAIN");
    let program_scope =
        table.get(program).unwrap().kind.owned_scope().unwrap();
    table.enter_block(program_scope).unwrap();

    let function = table.create_function_object("F");
    let function_scope =
        table.get(function).unwrap().kind.owned_scope().unwrap();
    table.enter_block(function_scope).unwrap();

    table.remove_object(function).unwrap();

    assert_eq!(table.current_scope(), None);
}

#[test]
fn removing_the_program_clears_the_program_reference() {
    let mut table = new_table();

    let program = table.create_program_object("MAIN");
    table.remove_object(program).unwrap();

    assert_eq!(table.program(), None);
    assert_eq!(
        table.remove_object(program),
        Err(Error::InvalidObjectId(program))
    );
}

#[test]
fn exit_block_underflows_at_the_top() {
    let mut table = new_table();

    assert_eq!(table.exit_block(), Err(Error::ScopeUnderflow));
}

#[test]
fn declarations_require_an_active_scope() {
    let mut table = new_table();

    assert_eq!(
        table.create_variable_object("X", Type::INT),
        Err(Error::NoActiveScope)
    );

    let constant =
        table.create_constant_object("LIMIT", ConstantValue::Int(100));
    assert_eq!(table.declare_object(constant), Err(Error::NoActiveScope));
}

#[test]
fn parameters_are_rejected_outside_routines() {
    let mut table = new_table();

    let program = table.create_program_object("MAIN");

    // creation already requires a routine owner
    assert_eq!(
        table.create_parameter_object(
            "A",
            Passing::Value,
            Type::INT,
            program
        ),
        Err(Error::ParameterOutsideRoutine(program))
    );

    // declaring one under a scope owned by a non-routine is rejected too
    let function = table.create_function_object("F");
    let parameter = table
        .create_parameter_object("A", Passing::Reference, Type::INT, function)
        .unwrap();

    let program_scope =
        table.get(program).unwrap().kind.owned_scope().unwrap();
    table.enter_block(program_scope).unwrap();

    assert_eq!(
        table.declare_object(parameter),
        Err(Error::ParameterOutsideRoutine(program))
    );
    assert!(table.get_scope(program_scope).unwrap().objects.is_empty());
}

#[test]
fn entering_a_removed_scope_is_an_error() {
    let mut table = new_table();

    let function = table.create_function_object("F");
    let scope = table.get(function).unwrap().kind.owned_scope().unwrap();
    table.remove_object(function).unwrap();

    assert_eq!(table.enter_block(scope), Err(Error::InvalidScopeId(scope)));
}

#[test]
fn scope_walker_goes_from_inner_to_outer() {
    let mut table = new_table();

    let program = table.create_program_object("MAIN");
    let program_scope =
        table.get(program).unwrap().kind.owned_scope().unwrap();
    table.enter_block(program_scope).unwrap();

    let function = table.create_function_object("F");
    table.declare_object(function).unwrap();
    let function_scope =
        table.get(function).unwrap().kind.owned_scope().unwrap();

    let chain = table.scope_walker(function_scope).collect::<Vec<_>>();
    assert_eq!(chain, vec![function_scope, program_scope]);
}

#[test]
fn lookup_prefers_the_nearest_declaration() {
    let mut table = new_table();

    let program = table.create_program_object("MAIN");
    let program_scope =
        table.get(program).unwrap().kind.owned_scope().unwrap();
    table.enter_block(program_scope).unwrap();

    let outer = table.create_variable_object("X", Type::INT).unwrap();
    table.declare_object(outer).unwrap();

    let function = table.create_function_object("F");
    table.declare_object(function).unwrap();
    let function_scope =
        table.get(function).unwrap().kind.owned_scope().unwrap();
    table.enter_block(function_scope).unwrap();

    let inner = table.create_variable_object("X", Type::CHAR).unwrap();
    table.declare_object(inner).unwrap();

    // the inner declaration shadows the outer one
    assert_eq!(table.lookup("X"), Some(inner));

    // built-ins are reachable from any scope
    let writeln = table.global_objects()[4];
    assert_eq!(table.lookup("WRITELN"), Some(writeln));

    assert_eq!(table.lookup("MISSING"), None);

    table.exit_block().unwrap();
    assert_eq!(table.current_scope(), Some(program_scope));
    assert_eq!(table.lookup("X"), Some(outer));
}

#[test]
fn lookup_falls_back_to_the_globals_with_no_active_scope() {
    let mut table = new_table();

    assert_eq!(table.current_scope(), None);
    assert_eq!(table.lookup("READC"), Some(table.global_objects()[0]));

    let constant =
        table.create_constant_object("MAXINT", ConstantValue::Int(i32::MAX));
    table.declare_global_object(constant).unwrap();

    assert_eq!(table.lookup("MAXINT"), Some(constant));
    assert_eq!(table.global_objects().len(), 6);
}

#[test]
fn display_renders_routine_signatures() {
    let mut table = new_table();

    let readi = table.lookup("READI").unwrap();
    assert_eq!(
        DisplayObject { table: &table, display: &readi }.to_string(),
        "function READI(): integer"
    );

    let writec = table.lookup("WRITEC").unwrap();
    assert_eq!(
        DisplayObject { table: &table, display: &writec }.to_string(),
        "procedure WRITEC(ch: char)"
    );

    let procedure = table.create_procedure_object("SWAP");
    let scope = table.get(procedure).unwrap().kind.owned_scope().unwrap();
    table.enter_block(scope).unwrap();

    for name in ["A", "B"] {
        let parameter = table
            .create_parameter_object(
                name,
                Passing::Reference,
                Type::INT,
                procedure,
            )
            .unwrap();
        table.declare_object(parameter).unwrap();
    }

    table.exit_block().unwrap();

    assert_eq!(
        DisplayObject { table: &table, display: &procedure }.to_string(),
        "procedure SWAP(var A: integer; var B: integer)"
    );
}

#[test]
fn table_round_trips_through_ron() {
    let mut table = new_table();

    let program = table.create_program_object("MAIN");
    let scope = table.get(program).unwrap().kind.owned_scope().unwrap();
    table.enter_block(scope).unwrap();

    let constant =
        table.create_constant_object("NEWLINE", ConstantValue::Char('\n'));
    table.declare_object(constant).unwrap();

    let variable = table
        .create_variable_object("GRID", Type::array(3, Type::array(3, Type::INT)))
        .unwrap();
    table.declare_object(variable).unwrap();

    let encoded = ron::to_string(&table).unwrap();
    let decoded = ron::from_str::<Table>(&encoded).unwrap();

    assert_eq!(decoded, table);
}
