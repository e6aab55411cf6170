//! `Const`, list literals, and dict literals.

use indexmap::IndexMap;

use crate::ast::Ast;
use crate::error::{PqlError, Result};
use crate::eval::evaluate_seq;
use crate::instance::{Instance, PqlValue};
use crate::meta::SourceMeta;
use crate::sql::Sql;
use crate::state::State;
use crate::types::{effective_type, StructType, Type};

/// Builds a `ValueInstance` from a literal already known at compile time
/// (the non-null branch of `Const`; the null singleton is handled by the
/// evaluator directly).
pub fn make_value_instance(value: PqlValue, ty: Type) -> Instance {
    let code = Sql::RawSql {
        ty: ty.clone(),
        text: value.to_sql_literal(),
    };
    Instance::value(code, ty, value)
}

/// A list literal compiles to a named subquery unioning one single-row
/// `SELECT` per element, registered on the resulting `Table` instance
/// under a freshly allocated name.
pub fn compile_list(state: &mut State, elems: &[Ast], meta: SourceMeta) -> Result<Instance> {
    let instances = evaluate_seq(state, elems)?;

    let elem_ty = match instances.first() {
        Some(first) => {
            let want = effective_type(first.ty());
            for other in &instances[1..] {
                if effective_type(other.ty()) != want {
                    return Err(PqlError::type_error(
                        Some(meta),
                        "all elements of a list literal must share a type",
                    ));
                }
            }
            first.ty().clone()
        }
        // Empty list: no element type is known yet.
        None => Type::Null,
    };

    let name = state.unique_name("list");
    let codes: Vec<Sql> = instances.iter().map(|i| i.code().clone()).collect();
    let (table_code, subquery) = Sql::create_list(elem_ty.clone(), &name, codes);

    let table_ty = match table_code.ty() {
        Type::Table(t) => t,
        _ => unreachable!("Sql::create_list always returns a table-typed reference"),
    };

    let value_column = Instance::column(
        Sql::Name {
            ty: elem_ty.clone(),
            name: "value".to_string(),
        },
        elem_ty,
        vec![],
    );
    let mut columns = IndexMap::new();
    columns.insert("value".to_string(), value_column);

    let mut inst = Instance::table(table_code, table_ty, instances, columns);
    inst.register_subquery(name, subquery);
    Ok(inst)
}

/// A dict literal compiles to an anonymous row: an inline `RowDict` and a
/// `StructColumn` instance whose members are the dict's named values.
pub fn compile_dict(state: &mut State, elems: &[(String, Ast)]) -> Result<Instance> {
    let mut members = IndexMap::new();
    let mut refs = Vec::new();
    let mut row = IndexMap::new();

    for (name, value_ast) in elems {
        let inst = crate::eval::evaluate(state, value_ast)?;
        row.insert(name.clone(), inst.code().clone());
        refs.push(inst.clone());
        members.insert(name.clone(), inst);
    }

    let fields = members.iter().map(|(n, i)| (n.clone(), i.ty().clone())).collect();
    let struct_ty = StructType::new("_dict", fields);
    let code = Sql::RowDict(row);
    Ok(Instance::struct_column(code, struct_ty, refs, members))
}
