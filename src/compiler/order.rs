//! `Order`, `DescOrder`, and `Slice`.

use indexmap::IndexMap;

use crate::ast::{DescOrder, Order, Slice};
use crate::error::{PqlError, Result};
use crate::eval::evaluate_seq;
use crate::instance::Instance;
use crate::sql::Sql;
use crate::state::{Binding, State};
use crate::types::Type;

pub fn compile_order(state: &mut State, order: &Order) -> Result<Instance> {
    let table_inst = crate::eval::evaluate(state, &order.table)?;
    let table_ty = match table_inst.ty() {
        Type::Table(t) => t.clone(),
        other => {
            return Err(PqlError::type_error(
                Some(order.meta),
                format!("order requires a table, found {other:?}"),
            ))
        }
    };

    let this_inst = table_inst
        .to_struct_column()
        .expect("a Table instance always yields a struct_column view");
    let mut frame = IndexMap::new();
    frame.insert("this".to_string(), Binding::Instance(this_inst));

    let key_instances = state.with_scope(frame, |state| evaluate_seq(state, &order.fields))?;
    let keys: Vec<Sql> = key_instances.iter().map(|i| i.code().clone()).collect();
    let code = Sql::table_order(table_inst.code(), keys);

    let mut refs = vec![table_inst.clone()];
    refs.extend(key_instances);
    Ok(Instance::table(
        code,
        table_ty,
        refs,
        table_inst.columns().cloned().unwrap_or_default(),
    ))
}

/// `DescOrder` only makes sense inside an `Order`'s field list; it wraps
/// the inner key's SQL in `Desc` without changing its type.
pub fn compile_desc_order(state: &mut State, desc: &DescOrder) -> Result<Instance> {
    let inner = crate::eval::evaluate(state, &desc.value)?;
    let code = Sql::Desc(Box::new(inner.code().clone()));
    let ty = inner.ty().clone();
    Ok(Instance::scalar(code, ty, vec![inner]))
}

pub fn compile_slice(state: &mut State, slice: &Slice) -> Result<Instance> {
    let table_inst = crate::eval::evaluate(state, &slice.table)?;
    let table_ty = match table_inst.ty() {
        Type::Table(t) => t.clone(),
        other => {
            return Err(PqlError::type_error(
                Some(slice.meta),
                format!("slice requires a table, found {other:?}"),
            ))
        }
    };

    let start_inst = match &slice.range.start {
        Some(ast) => Some(crate::eval::evaluate(state, ast)?),
        None => None,
    };
    let stop_inst = match &slice.range.stop {
        Some(ast) => Some(crate::eval::evaluate(state, ast)?),
        None => None,
    };

    let start_code = start_inst
        .as_ref()
        .map(|i| i.code().clone())
        .unwrap_or_else(|| Sql::RawSql {
            ty: Type::int(),
            text: "0".to_string(),
        });
    let stop_code = stop_inst.as_ref().map(|i| i.code().clone());

    let code = Sql::table_slice(table_inst.code(), start_code, stop_code);

    let mut refs = vec![table_inst.clone()];
    refs.extend(start_inst);
    refs.extend(stop_inst);
    Ok(Instance::table(
        code,
        table_ty,
        refs,
        table_inst.columns().cloned().unwrap_or_default(),
    ))
}
