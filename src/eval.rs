//! The Evaluator: recursive dispatch from AST nodes to Instances, resolving
//! `Name`/`Attr`/`Const` directly and delegating everything else to the
//! Compiler ([`crate::compiler::compile_remote`]).

use tracing::trace;

use crate::ast::Ast;
use crate::error::{PqlError, Result};
use crate::instance::Instance;
use crate::state::{Binding, State};

/// Evaluates one AST node to an Instance.
pub fn evaluate(state: &mut State, node: &Ast) -> Result<Instance> {
    trace!(node = ?node_kind(node), "evaluate");
    match node {
        Ast::Name(n) => match state.scope().lookup(&n.name) {
            Some(Binding::Instance(inst)) => Ok(inst.clone()),
            Some(Binding::Type(_)) => Err(PqlError::type_error(
                Some(n.meta),
                format!("'{}' is a type, not a value, in this position", n.name),
            )),
            None => Err(PqlError::compile_error(
                Some(n.meta),
                format!("name '{}' is not bound in the current scope", n.name),
            )),
        },
        Ast::Attr(a) => {
            let base = evaluate(state, &a.expr)?;
            resolve_attr(&base, &a.name, a.meta)
        }
        Ast::Const(c) => {
            if matches!(c.ty, crate::types::Type::Null) {
                Ok(Instance::null())
            } else {
                Ok(crate::compiler::literal::make_value_instance(
                    c.value.clone(),
                    c.ty.clone(),
                ))
            }
        }
        other => crate::compiler::compile_remote(state, other),
    }
}

/// Evaluates a sequence of AST nodes left to right, so name allocations
/// and subquery registrations during evaluation of earlier elements
/// observe that order relative to later ones.
pub fn evaluate_seq(state: &mut State, nodes: &[Ast]) -> Result<Vec<Instance>> {
    nodes.iter().map(|n| evaluate(state, n)).collect()
}

/// Resolves `base.name`: a struct-column member, or a table's column.
fn resolve_attr(base: &Instance, name: &str, meta: crate::meta::SourceMeta) -> Result<Instance> {
    if let Some(members) = base.members() {
        return members
            .get(name)
            .cloned()
            .ok_or_else(|| PqlError::type_error(Some(meta), format!("no such member '{name}'")));
    }
    if let Some(columns) = base.columns() {
        return columns
            .get(name)
            .cloned()
            .ok_or_else(|| PqlError::type_error(Some(meta), format!("no such column '{name}'")));
    }
    Err(PqlError::type_error(
        Some(meta),
        format!("cannot access attribute '{name}' on a value with no members or columns"),
    ))
}

fn node_kind(node: &Ast) -> &'static str {
    match node {
        Ast::Name(_) => "Name",
        Ast::Attr(_) => "Attr",
        Ast::Const(_) => "Const",
        Ast::Compare(_) => "Compare",
        Ast::Arith(_) => "Arith",
        Ast::Like(_) => "Like",
        Ast::Projection(_) => "Projection",
        Ast::Selection(_) => "Selection",
        Ast::Order(_) => "Order",
        Ast::DescOrder(_) => "DescOrder",
        Ast::Slice(_) => "Slice",
        Ast::List(_) => "List",
        Ast::Dict(_) => "Dict",
        Ast::Ellipsis(_) => "Ellipsis",
        Ast::Parameter(_) => "Parameter",
        Ast::FuncCall(_) => "FuncCall",
        Ast::TypeRef(_) => "TypeRef",
    }
}
