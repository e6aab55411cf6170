//! End-to-end scenarios from the compiler's testable-properties table:
//! DDL generation, projection aliasing, selection type preservation,
//! group-by aggregate shape, list literals, and the string/int `repeat`
//! dispatch.

use indexmap::IndexMap;

use preqlc_core::compiler::{compile_type_def, literal, projection, selection};
use preqlc_core::{
    evaluate, AccessLevel, Ast, Binding, CompilerConfig, DbTarget, Dialect, Instance, PqlError,
    PqlFunction, PqlValue, Result, Stdlib, TableType, Type,
};
use preqlc_core::ast::{Arith, Attr, Compare, Const, FuncCall, Name, NamedField, Projection, Selection};
use preqlc_core::meta::SourceMeta;
use preqlc_core::sql::Sql;
use preqlc_core::state::State;

// ==== fixtures ====

struct Repeat;
impl PqlFunction for Repeat {
    fn call(&self, _state: &mut State, args: Vec<Instance>) -> Result<Instance> {
        let string = args[0].code().clone();
        let count = args[1].code().clone();
        Ok(Instance::scalar(
            Sql::RawSql {
                ty: Type::string(),
                text: format!("repeat({string:?}, {count:?})"),
            },
            Type::string(),
            args,
        ))
    }
}

struct Count;
impl PqlFunction for Count {
    fn call(&self, _state: &mut State, args: Vec<Instance>) -> Result<Instance> {
        Ok(Instance::scalar(
            Sql::RawSql {
                ty: Type::int(),
                text: "count(...)".to_string(),
            },
            Type::int(),
            args,
        ))
    }
}

struct TestStdlib;
impl Stdlib for TestStdlib {
    fn lookup(&self, name: &str) -> Option<&dyn PqlFunction> {
        match name {
            "repeat" => Some(&Repeat),
            "count" => Some(&Count),
            _ => None,
        }
    }
}

fn state() -> State<'static> {
    State::new(
        DbTarget::new(Dialect::Sqlite),
        AccessLevel::Compile,
        CompilerConfig::default(),
        &TestStdlib,
    )
}

fn name(n: &str) -> Ast {
    Ast::Name(Name {
        meta: SourceMeta::default(),
        name: n.to_string(),
    })
}

fn const_int(v: i64) -> Ast {
    Ast::Const(Const {
        meta: SourceMeta::default(),
        ty: Type::int(),
        value: PqlValue::Int(v),
    })
}

fn const_str(v: &str) -> Ast {
    Ast::Const(Const {
        meta: SourceMeta::default(),
        ty: Type::string(),
        value: PqlValue::String(v.to_string()),
    })
}

fn users_table_type() -> std::rc::Rc<TableType> {
    let mut columns = preqlc_core::types::FieldMap::new();
    columns.insert("id".to_string(), Type::Id);
    columns.insert("name".to_string(), Type::string());
    columns.insert("age".to_string(), Type::int());
    columns.insert("country".to_string(), Type::string());
    TableType::new("users", columns, false, vec![vec!["id".to_string()]])
}

fn users_instance() -> Instance {
    let table_ty = users_table_type();
    let mut columns = IndexMap::new();
    for (col_name, col_ty) in &table_ty.columns {
        columns.insert(
            col_name.clone(),
            Instance::column(
                Sql::Name {
                    ty: col_ty.clone(),
                    name: col_name.clone(),
                },
                col_ty.clone(),
                vec![],
            ),
        );
    }
    Instance::table(
        Sql::Name {
            ty: Type::Table(table_ty.clone()),
            name: "users".to_string(),
        },
        table_ty,
        vec![],
        columns,
    )
}

fn users_frame() -> IndexMap<String, Binding> {
    let mut frame = IndexMap::new();
    frame.insert("users".to_string(), Binding::Instance(users_instance()));
    frame
}

// ==== scenario 1: DDL generation ====

#[test]
fn scenario_1_ddl_matches_sqlite_and_postgres() {
    let sqlite = State::new(
        DbTarget::new(Dialect::Sqlite),
        AccessLevel::Compile,
        CompilerConfig::default(),
        &TestStdlib,
    );
    let ddl = compile_type_def(&sqlite, &users_table_type()).unwrap();
    let Sql::RawSql { text, .. } = ddl else {
        panic!("expected RawSql")
    };
    assert!(text.starts_with("CREATE TABLE IF NOT EXISTS users ("));
    assert!(text.contains("id INTEGER NOT NULL"));

    let postgres = State::new(
        DbTarget::new(Dialect::Postgres),
        AccessLevel::Compile,
        CompilerConfig::default(),
        &TestStdlib,
    );
    let ddl = compile_type_def(&postgres, &users_table_type()).unwrap();
    let Sql::RawSql { text, .. } = ddl else {
        panic!("expected RawSql")
    };
    assert!(text.contains("id SERIAL NOT NULL"));
}

// ==== scenario 2: projection aliasing ====

#[test]
fn scenario_2_projection_has_name_and_age_columns() {
    let proj = Projection {
        meta: SourceMeta::default(),
        table: Box::new(name("users")),
        fields: vec![
            NamedField {
                meta: SourceMeta::default(),
                name: None,
                value: name("name"),
            },
            NamedField {
                meta: SourceMeta::default(),
                name: None,
                value: name("age"),
            },
        ],
        groupby: false,
        agg_fields: vec![],
    };

    let mut s = state();
    let result = s
        .with_scope(users_frame(), |state| projection::compile_projection(state, &proj))
        .unwrap();
    let Type::Table(table_ty) = result.ty() else {
        panic!("expected a Table result")
    };
    assert_eq!(
        table_ty.columns.keys().cloned().collect::<Vec<_>>(),
        vec!["name".to_string(), "age".to_string()]
    );
    let columns = result.columns().unwrap();
    assert_eq!(*columns["name"].ty(), Type::string());
    assert_eq!(*columns["age"].ty(), Type::int());
}

// ==== scenario 3: selection preserves TableType ====

#[test]
fn scenario_3_selection_preserves_table_type_and_wraps_with_table_selection() {
    let cond = Ast::Compare(Compare {
        meta: SourceMeta::default(),
        op: ">".to_string(),
        op_meta: SourceMeta::default(),
        args: vec![
            Ast::Attr(Attr {
                meta: SourceMeta::default(),
                expr: Box::new(name("this")),
                name: "age".to_string(),
            }),
            const_int(18),
        ],
    });
    let sel = Selection {
        meta: SourceMeta::default(),
        table: Box::new(name("users")),
        conds: vec![cond],
    };

    let mut s = state();
    let result = s
        .with_scope(users_frame(), |state| selection::compile_selection(state, &sel))
        .unwrap();
    assert_eq!(result.ty(), &Type::Table(users_table_type()));
    assert!(matches!(result.code(), Sql::TableSelection { .. }));
    assert_eq!(
        result.columns().unwrap().keys().cloned().collect::<Vec<_>>(),
        vec![
            "id".to_string(),
            "name".to_string(),
            "age".to_string(),
            "country".to_string(),
        ]
    );
}

// ==== scenario 4: group-by shape ====

#[test]
fn scenario_4_groupby_aggregates_and_shapes_group_by_list() {
    let proj = Projection {
        meta: SourceMeta::default(),
        table: Box::new(name("users")),
        fields: vec![NamedField {
            meta: SourceMeta::default(),
            name: None,
            value: name("country"),
        }],
        groupby: true,
        agg_fields: vec![NamedField {
            meta: SourceMeta::default(),
            name: Some("count".to_string()),
            value: Ast::FuncCall(FuncCall {
                meta: SourceMeta::default(),
                func: Box::new(name("count")),
                args: vec![Ast::Attr(Attr {
                    meta: SourceMeta::default(),
                    expr: Box::new(name("this")),
                    name: "id".to_string(),
                })],
            }),
        }],
    };

    let mut s = state();
    let result = s
        .with_scope(users_frame(), |state| projection::compile_projection(state, &proj))
        .unwrap();
    let Sql::Select { group_by, fields, .. } = result.code() else {
        panic!("expected a Select node")
    };
    assert_eq!(group_by.len(), 1);
    assert_eq!(fields.len(), 2);
    let columns = result.columns().unwrap();
    assert!(matches!(columns["count"].ty(), Type::Aggregated(_)));
}

// ==== scenario 5: list literal ====

#[test]
fn scenario_5_list_literal_registers_one_subquery() {
    let mut s = state();
    let elems = vec![const_int(1), const_int(2), const_int(3)];
    let result = literal::compile_list(&mut s, &elems, SourceMeta::default()).unwrap();

    assert!(matches!(result.ty(), Type::Table(_)));
    assert_eq!(result.subqueries().len(), 1);
    let (alloc_name, subquery) = result.subqueries().iter().next().unwrap();
    assert!(alloc_name.starts_with("list"));
    assert!(matches!(subquery, Sql::SetArith { .. } | Sql::Select { .. }));
}

// ==== scenario 6: string/int repeat dispatch ====

#[test]
fn scenario_6_string_times_int_dispatches_to_repeat_either_order() {
    let mut s = state();

    let lhs_string = Ast::Arith(Arith {
        meta: SourceMeta::default(),
        op: "*".to_string(),
        op_meta: SourceMeta::default(),
        args: vec![const_str("ab"), const_int(3)],
    });
    let inst = evaluate(&mut s, &lhs_string).unwrap();
    assert_eq!(*inst.ty(), Type::string());

    let rhs_string = Ast::Arith(Arith {
        meta: SourceMeta::default(),
        op: "*".to_string(),
        op_meta: SourceMeta::default(),
        args: vec![const_int(3), const_str("ab")],
    });
    let inst2 = evaluate(&mut s, &rhs_string).unwrap();
    assert_eq!(*inst2.ty(), Type::string());
    assert_eq!(inst.code(), inst2.code());
}

#[test]
fn scenario_6_string_plus_int_is_a_type_error() {
    let mut s = state();
    let bad = Ast::Arith(Arith {
        meta: SourceMeta::default(),
        op: "+".to_string(),
        op_meta: SourceMeta::default(),
        args: vec![const_str("ab"), const_int(3)],
    });
    let err = evaluate(&mut s, &bad).unwrap_err();
    assert!(matches!(err, PqlError::Type { .. }));
}
