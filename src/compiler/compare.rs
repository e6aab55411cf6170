//! `Like` and `Compare`, including the `Contains` dispatch for `in`/`!in`.

use crate::ast::{Compare, Like};
use crate::error::{PqlError, Result};
use crate::eval::evaluate_seq;
use crate::instance::Instance;
use crate::sql::{CompareOp, ContainsOp, Sql};
use crate::state::State;
use crate::types::Type;

pub fn compile_like(state: &mut State, like: &Like) -> Result<Instance> {
    let string = crate::eval::evaluate(state, &like.str_expr)?;
    let pattern = crate::eval::evaluate(state, &like.pattern)?;
    let code = Sql::Like {
        string: Box::new(string.code().clone()),
        pattern: Box::new(pattern.code().clone()),
    };
    Ok(Instance::scalar(code, Type::bool(), vec![string, pattern]))
}

pub fn compile_compare(state: &mut State, cmp: &Compare) -> Result<Instance> {
    if let Some(op) = ContainsOp::from_surface(&cmp.op) {
        return compile_contains(state, cmp, op);
    }
    let op = CompareOp::from_surface(&cmp.op).ok_or_else(|| {
        PqlError::compile_error(
            Some(cmp.op_meta),
            format!("unknown comparison operator '{}'", cmp.op),
        )
    })?;
    if cmp.args.len() != 2 {
        return Err(PqlError::compile_error(
            Some(cmp.meta),
            "comparison requires exactly two operands",
        ));
    }
    let instances = evaluate_seq(state, &cmp.args)?;
    let args = instances.iter().map(|i| i.code().clone()).collect();
    let code = Sql::Compare { op, args };
    Ok(Instance::scalar(code, Type::bool(), instances))
}

fn compile_contains(state: &mut State, cmp: &Compare, op: ContainsOp) -> Result<Instance> {
    if cmp.args.len() != 2 {
        return Err(PqlError::compile_error(
            Some(cmp.meta),
            "'in' requires exactly two operands",
        ));
    }
    let instances = evaluate_seq(state, &cmp.args)?;
    let lhs = coerce_struct_to_first_member(&instances[0]);
    let rhs = coerce_struct_to_first_member(&instances[1]);
    let code = Sql::Contains {
        op,
        args: vec![lhs.code().clone(), rhs.code().clone()],
    };
    Ok(Instance::scalar(code, Type::bool(), vec![lhs, rhs]))
}

/// `Contains` compares scalars; a struct-shaped operand (e.g. `this` bound
/// to a single-column table) is coerced to its first member so
/// single-column tables and lists can be compared against directly.
fn coerce_struct_to_first_member(inst: &Instance) -> Instance {
    if let Some(members) = inst.members() {
        if let Some((_, first)) = members.iter().next() {
            return first.clone();
        }
    }
    inst.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ast;
    use crate::config::CompilerConfig;
    use crate::dialect::{DbTarget, Dialect};
    use crate::instance::PqlValue;
    use crate::meta::SourceMeta;
    use crate::state::AccessLevel;
    use crate::stdlib::{PqlFunction, Stdlib};

    struct NoStdlib;
    impl Stdlib for NoStdlib {
        fn lookup(&self, _name: &str) -> Option<&dyn PqlFunction> {
            None
        }
    }

    fn state() -> State<'static> {
        State::new(
            DbTarget::new(Dialect::Sqlite),
            AccessLevel::Compile,
            CompilerConfig::default(),
            &NoStdlib,
        )
    }

    fn const_int(v: i64) -> Ast {
        Ast::Const(crate::ast::Const {
            meta: SourceMeta::default(),
            ty: Type::int(),
            value: PqlValue::Int(v),
        })
    }

    #[test]
    fn equality_rewrites_to_sql_eq_never_emits_source_spelling() {
        let mut s = state();
        let cmp = Compare {
            meta: SourceMeta::default(),
            op: "==".to_string(),
            op_meta: SourceMeta::default(),
            args: vec![const_int(1), const_int(1)],
        };
        let inst = compile_compare(&mut s, &cmp).unwrap();
        let Sql::Compare { op, .. } = inst.code() else {
            panic!("expected Compare node")
        };
        assert_eq!(op.as_sql_str(), "=");
    }

    #[test]
    fn not_in_routes_through_contains_not_compare() {
        let mut s = state();
        let cmp = Compare {
            meta: SourceMeta::default(),
            op: "!in".to_string(),
            op_meta: SourceMeta::default(),
            args: vec![const_int(1), const_int(2)],
        };
        let inst = compile_compare(&mut s, &cmp).unwrap();
        assert!(matches!(inst.code(), Sql::Contains { op: ContainsOp::NotIn, .. }));
    }
}
