//! `Arith`: table/table dispatch to the standard library, Int*String
//! `repeat` dispatch, constant folding, and numeric widening.

use crate::ast::Arith;
use crate::error::{PqlError, Result};
use crate::eval::evaluate_seq;
use crate::instance::Instance;
use crate::meta::SourceMeta;
use crate::sql::{ArithOp, Sql};
use crate::state::State;
use crate::stdlib::table_arith_function_name;
use crate::types::{effective_type, Primitive, Type};

pub fn compile_arith(state: &mut State, arith: &Arith) -> Result<Instance> {
    if arith.args.len() != 2 {
        return Err(PqlError::compile_error(
            Some(arith.meta),
            "arithmetic requires exactly two operands",
        ));
    }
    let instances = evaluate_seq(state, &arith.args)?;
    let lhs = &instances[0];
    let rhs = &instances[1];

    if matches!(lhs.ty(), Type::Table(_)) && matches!(rhs.ty(), Type::Table(_)) {
        return dispatch_table_arith(state, &arith.op, instances.clone(), arith.op_meta, arith.meta);
    }

    if arith.op == "*" {
        let lhs_eff = effective_type(lhs.ty());
        let rhs_eff = effective_type(rhs.ty());
        if is_string(&lhs_eff) && is_int(&rhs_eff) {
            return dispatch_repeat(state, lhs.clone(), rhs.clone(), arith.meta);
        }
        if is_int(&lhs_eff) && is_string(&rhs_eff) {
            // `repeat` always takes (string, count); reorder to match.
            return dispatch_repeat(state, rhs.clone(), lhs.clone(), arith.meta);
        }
    }

    if state.config.optimize && arith.op == "+" {
        if let (Some(a), Some(b)) = (lhs.local_value(), rhs.local_value()) {
            if let Some(folded) = a.add(b) {
                let ty = folded.ty();
                let code = Sql::RawSql {
                    ty: ty.clone(),
                    text: folded.to_sql_literal(),
                };
                return Ok(Instance::value(code, ty, folded));
            }
        }
    }

    let op = ArithOp::from_surface(&arith.op).ok_or_else(|| {
        PqlError::compile_error(
            Some(arith.op_meta),
            format!("unknown arithmetic operator '{}'", arith.op),
        )
    })?;
    let result_ty = widen_numeric(lhs.ty(), rhs.ty(), arith.meta)?;
    let code = Sql::Arith {
        ty: result_ty.clone(),
        op,
        args: vec![lhs.code().clone(), rhs.code().clone()],
    };
    Ok(Instance::scalar(code, result_ty, instances))
}

fn is_string(ty: &Type) -> bool {
    matches!(ty, Type::Primitive(Primitive::String) | Type::Primitive(Primitive::Text))
}

fn is_int(ty: &Type) -> bool {
    matches!(ty, Type::Primitive(Primitive::Int))
}

fn widen_numeric(l: &Type, r: &Type, meta: SourceMeta) -> Result<Type> {
    let (le, re) = (effective_type(l), effective_type(r));
    match (&le, &re) {
        (Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Int)) => Ok(Type::int()),
        (Type::Primitive(Primitive::Float), Type::Primitive(Primitive::Int))
        | (Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Float))
        | (Type::Primitive(Primitive::Float), Type::Primitive(Primitive::Float)) => {
            Ok(Type::Primitive(Primitive::Float))
        }
        _ => Err(PqlError::type_error(
            Some(meta),
            format!("cannot apply arithmetic to {le:?} and {re:?}"),
        )),
    }
}

fn dispatch_table_arith(
    state: &mut State,
    op: &str,
    args: Vec<Instance>,
    op_meta: SourceMeta,
    meta: SourceMeta,
) -> Result<Instance> {
    let fname = table_arith_function_name(op).ok_or_else(|| {
        PqlError::compile_error(Some(op_meta), format!("no table-level operator for '{op}'"))
    })?;
    let func = state.stdlib.lookup(fname).ok_or_else(|| {
        PqlError::compile_error(
            Some(meta),
            format!("standard library function '{fname}' is not available"),
        )
    })?;
    func.call(state, args).map_err(|e| e.rewrap(Some(meta)))
}

fn dispatch_repeat(state: &mut State, string: Instance, count: Instance, meta: SourceMeta) -> Result<Instance> {
    let func = state.stdlib.lookup("repeat").ok_or_else(|| {
        PqlError::compile_error(Some(meta), "standard library function 'repeat' is not available")
    })?;
    func.call(state, vec![string, count])
        .map_err(|e| e.rewrap(Some(meta)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, Const};
    use crate::config::CompilerConfig;
    use crate::dialect::{DbTarget, Dialect};
    use crate::instance::PqlValue;
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
        Ast::Const(Const {
            meta: SourceMeta::default(),
            ty: Type::int(),
            value: PqlValue::Int(v),
        })
    }

    #[test]
    fn constant_folds_int_addition_under_optimize() {
        let mut s = state();
        let arith = Arith {
            meta: SourceMeta::default(),
            op: "+".to_string(),
            op_meta: SourceMeta::default(),
            args: vec![const_int(2), const_int(3)],
        };
        let inst = compile_arith(&mut s, &arith).unwrap();
        assert_eq!(inst.local_value(), Some(&PqlValue::Int(5)));
    }

    #[test]
    fn int_plus_float_widens_to_float() {
        let mut s = state();
        let float_const = Ast::Const(Const {
            meta: SourceMeta::default(),
            ty: Type::Primitive(Primitive::Float),
            value: PqlValue::Float(1.5),
        });
        let arith = Arith {
            meta: SourceMeta::default(),
            op: "-".to_string(),
            op_meta: SourceMeta::default(),
            args: vec![const_int(2), float_const],
        };
        let inst = compile_arith(&mut s, &arith).unwrap();
        assert_eq!(*inst.ty(), Type::Primitive(Primitive::Float));
    }

    #[test]
    fn string_int_multiply_without_stdlib_reports_missing_function() {
        let mut s = state();
        let string_const = Ast::Const(Const {
            meta: SourceMeta::default(),
            ty: Type::string(),
            value: PqlValue::String("ab".to_string()),
        });
        let arith = Arith {
            meta: SourceMeta::default(),
            op: "*".to_string(),
            op_meta: SourceMeta::default(),
            args: vec![string_const, const_int(3)],
        };
        let err = compile_arith(&mut s, &arith).unwrap_err();
        assert!(err.to_string().contains("repeat"));
    }
}
