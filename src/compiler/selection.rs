//! `Selection`: row filtering, and generic-type application
//! ([`apply_type_generics`]) when the selected-over position evaluates to
//! a type rather than a value.

use indexmap::IndexMap;

use crate::ast::{Ast, Selection};
use crate::error::{PqlError, Result};
use crate::eval::evaluate_seq;
use crate::instance::Instance;
use crate::meta::SourceMeta;
use crate::sql::Sql;
use crate::state::{Binding, State};
use crate::types::Type;

pub fn compile_selection(state: &mut State, sel: &Selection) -> Result<Instance> {
    match eval_table_position(state, &sel.table)? {
        TableOrType::Type(base) => apply_type_generics(state, base, &sel.conds, sel.meta),
        TableOrType::Instance(table_inst) => compile_filter(state, table_inst, &sel.conds, sel.meta),
    }
}

/// Whichever a `Selection`'s `table` position names: a bound value, or a
/// bound type (generic-application position, e.g. `List[int]`).
enum TableOrType {
    Type(Type),
    Instance(Instance),
}

fn eval_table_position(state: &mut State, ast: &Ast) -> Result<TableOrType> {
    match ast {
        Ast::Name(n) => match state.scope().lookup(&n.name) {
            Some(Binding::Type(t)) => Ok(TableOrType::Type(t.clone())),
            Some(Binding::Instance(i)) => Ok(TableOrType::Instance(i.clone())),
            None => Err(PqlError::compile_error(
                Some(n.meta),
                format!("name '{}' is not bound in the current scope", n.name),
            )),
        },
        Ast::TypeRef(t) => Ok(TableOrType::Type(t.clone())),
        other => Ok(TableOrType::Instance(crate::eval::evaluate(state, other)?)),
    }
}

/// Applies one type argument to a generic container, e.g. `List[int]`.
/// The result is surfaced as a zero-ref `Scalar` instance whose `ty`
/// carries the applied type — there is no further value to compute, so
/// its SQL code is a placeholder never meant to be rendered.
fn apply_type_generics(
    state: &mut State,
    base: Type,
    conds: &[Ast],
    meta: SourceMeta,
) -> Result<Instance> {
    if conds.len() != 1 {
        return Err(PqlError::type_error(
            Some(meta),
            "generic type application takes exactly one type argument",
        ));
    }
    let arg_ty = match eval_table_position(state, &conds[0])? {
        TableOrType::Type(t) => t,
        TableOrType::Instance(inst) => inst.ty().clone(),
    };
    let applied = base.apply_inner_type(arg_ty).map_err(|_| {
        PqlError::type_error(
            Some(meta),
            format!("'{base:?}' is not a generic container and cannot be applied to a type argument"),
        )
    })?;
    let code = Sql::RawSql {
        ty: applied.clone(),
        text: format!("<type {applied:?}>"),
    };
    Ok(Instance::scalar(code, applied, vec![]))
}

fn compile_filter(
    state: &mut State,
    table_inst: Instance,
    conds: &[Ast],
    meta: SourceMeta,
) -> Result<Instance> {
    let table_ty = match table_inst.ty() {
        Type::Table(t) => t.clone(),
        other => {
            return Err(PqlError::type_error(
                Some(meta),
                format!("selection requires a table, found {other:?}"),
            ))
        }
    };

    let this_inst = table_inst
        .to_struct_column()
        .expect("a Table instance always yields a struct_column view");
    let mut frame = IndexMap::new();
    frame.insert("this".to_string(), Binding::Instance(this_inst));

    let cond_instances = state.with_scope(frame, |state| evaluate_seq(state, conds))?;
    let cond_codes: Vec<Sql> = cond_instances.iter().map(|i| i.code().clone()).collect();
    let code = Sql::table_selection(table_inst.code(), cond_codes);

    let mut refs = vec![table_inst.clone()];
    refs.extend(cond_instances);
    // Filtering rows never changes the table's shape.
    Ok(Instance::table(
        code,
        table_ty,
        refs,
        table_inst.columns().cloned().unwrap_or_default(),
    ))
}
