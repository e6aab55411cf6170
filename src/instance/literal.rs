//! Known literal values carried by `Instance::Value`, enabling constant
//! folding in [`crate::compiler::arith::compile_arith`].

use std::fmt;

use crate::types::{Primitive, Type};

/// A Preql literal value known at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum PqlValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

impl PqlValue {
    pub fn ty(&self) -> Type {
        match self {
            PqlValue::Int(_) => Type::Primitive(Primitive::Int),
            PqlValue::Float(_) => Type::Primitive(Primitive::Float),
            PqlValue::String(_) => Type::Primitive(Primitive::String),
            PqlValue::Bool(_) => Type::Primitive(Primitive::Bool),
            PqlValue::Null => Type::Null,
        }
    }

    /// Renders the value as a SQL literal. This is a convenience for
    /// building `RawSql` fragments at the compiler layer; an external IR
    /// renderer is free to re-derive this from the structured `Value`
    /// instance if it needs dialect-specific literal syntax.
    pub fn to_sql_literal(&self) -> String {
        match self {
            PqlValue::Int(i) => i.to_string(),
            PqlValue::Float(f) => f.to_string(),
            PqlValue::String(s) => format!("'{}'", s.replace('\'', "''")),
            PqlValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            PqlValue::Null => "NULL".to_string(),
        }
    }

    /// Constant-folds `self + other` for same-typed numeric literals.
    /// Returns `None` for any pairing that isn't numeric addition.
    pub fn add(&self, other: &PqlValue) -> Option<PqlValue> {
        match (self, other) {
            (PqlValue::Int(a), PqlValue::Int(b)) => Some(PqlValue::Int(a + b)),
            (PqlValue::Float(a), PqlValue::Float(b)) => Some(PqlValue::Float(a + b)),
            (PqlValue::String(a), PqlValue::String(b)) => {
                Some(PqlValue::String(format!("{a}{b}")))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql_literal())
    }
}
