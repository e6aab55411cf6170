//! The Compiler: turns every `Ast` node the Evaluator doesn't resolve
//! directly into an `Instance`. `compile_remote` is the dispatch entry
//! point: an exhaustive `match` over the `Ast` enum rather than open
//! dispatch.

pub mod arith;
pub mod compare;
pub mod field_name;
pub mod literal;
pub mod order;
pub mod projection;
pub mod selection;
pub mod type_compiler;

pub use type_compiler::{compile_type, compile_type_def};

use crate::ast::{Ast, FuncCall, Parameter};
use crate::error::{PqlError, Result};
use crate::instance::Instance;
use crate::state::{AccessLevel, Binding, State};

pub fn compile_remote(state: &mut State, node: &Ast) -> Result<Instance> {
    match node {
        Ast::Compare(c) => compare::compile_compare(state, c),
        Ast::Arith(a) => arith::compile_arith(state, a),
        Ast::Like(l) => compare::compile_like(state, l),
        Ast::Projection(p) => projection::compile_projection(state, p),
        Ast::Selection(s) => selection::compile_selection(state, s),
        Ast::Order(o) => order::compile_order(state, o),
        Ast::DescOrder(d) => order::compile_desc_order(state, d),
        Ast::Slice(s) => order::compile_slice(state, s),
        Ast::List(l) => literal::compile_list(state, &l.elems, l.meta),
        Ast::Dict(d) => literal::compile_dict(state, &d.elems),
        Ast::Ellipsis(e) => Err(PqlError::syntax_error(
            Some(e.meta),
            "ellipsis can only appear inside a projection's field list",
        )),
        Ast::Parameter(p) => compile_parameter(state, p),
        Ast::FuncCall(f) => compile_func_call(state, f),
        Ast::TypeRef(_) => Err(PqlError::type_error(
            None,
            "a type cannot be used as a value in this position",
        )),
        Ast::Name(_) | Ast::Attr(_) | Ast::Const(_) => {
            unreachable!("the evaluator resolves Name/Attr/Const before reaching compile_remote")
        }
    }
}

/// At `Compile` access level, a `Parameter` becomes a late-bound SQL
/// placeholder. At `Evaluate`, the caller is expected to have pre-bound
/// the parameter's concrete value under its own name in scope; if it
/// hasn't, this is a request the current `State` cannot satisfy, and the
/// caller must retry after binding it (see [`PqlError::InsufficientAccessLevel`]).
fn compile_parameter(state: &mut State, p: &Parameter) -> Result<Instance> {
    match state.access_level {
        AccessLevel::Compile => {
            let code = crate::sql::Sql::Parameter {
                ty: p.ty.clone(),
                name: p.name.clone(),
            };
            Ok(Instance::scalar(code, p.ty.clone(), vec![]))
        }
        AccessLevel::Evaluate => match state.scope().lookup(&p.name) {
            Some(Binding::Instance(inst)) => Ok(inst.clone()),
            _ => Err(PqlError::insufficient_access_level(
                Some(p.meta),
                format!("parameter '{}' has no bound value available to evaluate", p.name),
            )),
        },
    }
}

fn compile_func_call(state: &mut State, f: &FuncCall) -> Result<Instance> {
    let func_name = match f.func.as_ref() {
        Ast::Name(n) => n.name.clone(),
        _ => {
            return Err(PqlError::compile_error(
                Some(f.meta),
                "function calls must name a standard-library function directly",
            ))
        }
    };
    let args = crate::eval::evaluate_seq(state, &f.args)?;
    let func = state
        .stdlib
        .lookup(&func_name)
        .ok_or_else(|| PqlError::compile_error(Some(f.meta), format!("unknown function '{func_name}'")))?;
    func.call(state, args).map_err(|e| e.rewrap(Some(f.meta)))
}
