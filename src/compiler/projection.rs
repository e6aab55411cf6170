//! `Projection`: the largest single compiling function — ellipsis
//! expansion, `this`-scoped field evaluation, group-by aggregate lifting,
//! name-collision handling, and struct-vs-table branching.

use indexmap::IndexMap;

use crate::ast::{Ast, Ellipsis, NamedField, Projection};
use crate::error::{PqlError, Result};
use crate::instance::Instance;
use crate::sql::Sql;
use crate::state::{Binding, State};
use crate::types::{find_duplicate_name, FieldMap, StructType, TableType, Type};

pub fn compile_projection(state: &mut State, proj: &Projection) -> Result<Instance> {
    reject_duplicate_explicit_names(proj)?;

    let table_inst = crate::eval::evaluate(state, &proj.table)?;
    let is_table_source = matches!(table_inst.ty(), Type::Table(_));
    let this_inst = bind_this(&table_inst, proj.meta)?;

    let mut frame = IndexMap::new();
    frame.insert("this".to_string(), Binding::Instance(this_inst.clone()));

    state.with_scope(frame, |state| {
        let key_fields = expand_ellipsis(&proj.fields, &this_inst)?;

        let mut output: IndexMap<String, Instance> = IndexMap::new();
        let mut group_by_codes = Vec::new();

        for field in &key_fields {
            let processed = process_field(state, field, false)?;
            group_by_codes.push(Sql::Name {
                ty: processed.instance.ty().clone(),
                name: processed.name.clone(),
            });
            insert_unique(&mut output, processed.name, processed.instance);
        }

        if proj.groupby {
            for field in &proj.agg_fields {
                let processed = process_field(state, field, true)?;
                insert_unique(&mut output, processed.name, processed.instance);
            }
        }

        let fields_sql: Vec<Sql> = output
            .iter()
            .map(|(name, inst)| {
                Sql::column_alias(
                    inst.code().clone(),
                    Sql::Name {
                        ty: inst.ty().clone(),
                        name: name.clone(),
                    },
                )
            })
            .collect();

        let mut refs = vec![table_inst.clone()];
        refs.extend(output.values().cloned());

        // A projection over a real table (or any group-by) always yields a
        // fresh relation; projecting a bare struct literal's fields yields
        // another struct.
        if is_table_source || proj.groupby {
            let fields_map: FieldMap = output.iter().map(|(n, i)| (n.clone(), i.ty().clone())).collect();
            let table_ty = TableType::new(state.unique_name("proj"), fields_map, true, vec![]);
            let select = Sql::Select {
                ty: Type::Table(table_ty.clone()),
                source: Box::new(table_inst.code().clone()),
                fields: fields_sql,
                group_by: if proj.groupby { group_by_codes } else { vec![] },
            };
            Ok(Instance::table(select, table_ty, refs, output))
        } else {
            let fields_map: FieldMap = output.iter().map(|(n, i)| (n.clone(), i.ty().clone())).collect();
            let struct_ty = StructType::new(state.unique_name("proj_struct"), fields_map);
            let row = Sql::RowDict(output.iter().map(|(n, i)| (n.clone(), i.code().clone())).collect());
            Ok(Instance::struct_column(row, struct_ty, refs, output))
        }
    })
}

/// Two explicitly named fields colliding is always an error, regardless of
/// `insert_unique`'s suffixing for inferred names: `users{x: a, x: b}`
/// means the author asked for the same output name twice, which can only
/// be a mistake. Checked once, up front, over `fields` and `agg_fields`
/// together so a name can't collide across the group-by/aggregate split
/// either.
fn reject_duplicate_explicit_names(proj: &Projection) -> Result<()> {
    let explicit_names: Vec<&String> = proj
        .fields
        .iter()
        .chain(proj.agg_fields.iter())
        .filter_map(|f| f.name.as_ref())
        .collect();
    if let Some(dup) = find_duplicate_name(explicit_names.into_iter()) {
        return Err(PqlError::type_error(
            Some(proj.meta),
            format!("field name '{dup}' is used more than once in this projection"),
        ));
    }
    Ok(())
}

fn bind_this(table_inst: &Instance, meta: crate::meta::SourceMeta) -> Result<Instance> {
    if let Some(sc) = table_inst.to_struct_column() {
        return Ok(sc);
    }
    if table_inst.members().is_some() {
        return Ok(table_inst.clone());
    }
    Err(PqlError::type_error(
        Some(meta),
        "a projection's source must be a table or a struct",
    ))
}

/// Expands at most one `Ellipsis` field into one `NamedField` per column
/// of `this` not already named explicitly and not excluded.
fn expand_ellipsis(fields: &[NamedField], this_inst: &Instance) -> Result<Vec<NamedField>> {
    let explicit_names: Vec<String> = fields
        .iter()
        .filter_map(|f| f.name.clone().or_else(|| crate::compiler::field_name::guess_field_name(&f.value)))
        .collect();

    let mut ellipsis_seen = false;
    let mut out = Vec::new();
    for field in fields {
        if let Ast::Ellipsis(e) = &field.value {
            if field.name.is_some() {
                return Err(PqlError::syntax_error(
                    Some(field.meta),
                    "an ellipsis field cannot carry an explicit name",
                ));
            }
            if ellipsis_seen {
                return Err(PqlError::syntax_error(
                    Some(field.meta),
                    "at most one ellipsis is allowed per projection",
                ));
            }
            ellipsis_seen = true;
            out.extend(expand_one_ellipsis(field.meta, e, this_inst, &explicit_names));
        } else {
            out.push(field.clone());
        }
    }
    Ok(out)
}

fn expand_one_ellipsis(
    meta: crate::meta::SourceMeta,
    ellipsis: &Ellipsis,
    this_inst: &Instance,
    explicit_names: &[String],
) -> Vec<NamedField> {
    let available = this_inst.members().cloned().unwrap_or_default();
    available
        .keys()
        .filter(|name| !ellipsis.exclude.contains(name) && !explicit_names.contains(name))
        .map(|name| NamedField {
            meta,
            name: Some(name.clone()),
            value: Ast::Name(crate::ast::Name {
                meta,
                name: name.clone(),
            }),
        })
        .collect()
}

struct ProcessedField {
    name: String,
    instance: Instance,
}

/// Evaluates one projected field, optionally lifting it into `Aggregated`
/// scope via `MakeArray` (for `agg_fields` under a group-by), then infers
/// its output name.
fn process_field(state: &mut State, field: &NamedField, aggregated: bool) -> Result<ProcessedField> {
    let mut inst = crate::eval::evaluate(state, &field.value)?;
    if aggregated {
        let inner_ty = inst.ty().clone();
        let code = Sql::MakeArray {
            ty: Type::Aggregated(Box::new(inner_ty.clone())),
            inner: Box::new(inst.code().clone()),
        };
        inst = Instance::scalar(code, Type::Aggregated(Box::new(inner_ty)), vec![inst]);
    }
    let name = field
        .name
        .clone()
        .or_else(|| crate::compiler::field_name::guess_field_name(&field.value))
        .ok_or_else(|| {
            PqlError::compile_error(
                Some(field.meta),
                "cannot infer a name for this projected field; give it an explicit name",
            )
        })?;
    Ok(ProcessedField { name, instance: inst })
}

/// Inserts under `name`, or `name_2`, `name_3`, ... on collision. Explicit
/// collisions are already rejected by `reject_duplicate_explicit_names`
/// before this runs, so a collision here only ever involves an inferred
/// or ellipsis-expanded name.
fn insert_unique(output: &mut IndexMap<String, Instance>, name: String, instance: Instance) {
    if !output.contains_key(&name) {
        output.insert(name, instance);
        return;
    }
    let mut suffix = 2u32;
    loop {
        let candidate = format!("{name}_{suffix}");
        if !output.contains_key(&candidate) {
            output.insert(candidate, instance);
            return;
        }
        suffix += 1;
    }
}
