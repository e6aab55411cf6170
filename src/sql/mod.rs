//! The SQL intermediate representation.
//!
//! `Sql` is a tree of relational fragments the Compiler produces and an
//! external IR renderer turns into dialect-specific text. Each node is a
//! flat Rust `enum` variant, not a class hierarchy, dispatched over with
//! an exhaustive `match`.

mod ops;

pub use ops::{ArithOp, CompareOp, ContainsOp};

use indexmap::IndexMap;

use crate::types::Type;

/// One SQL fragment. Carries enough of its own result type for the
/// Compiler to avoid re-deriving it, and a list of child fragments for
/// nodes that embed sub-expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Sql {
    /// Verbatim SQL text the compiler has already rendered (e.g. a `CREATE
    /// TABLE` statement, or a literal).
    RawSql { ty: Type, text: String },

    /// A bare name/alias reference, e.g. a column alias introduced by a
    /// projection.
    Name { ty: Type, name: String },

    /// `{source} AS {target}` inside a `SELECT` field list.
    ColumnAlias {
        source: Box<Sql>,
        target: Box<Sql>,
    },

    /// A `SELECT ... FROM {source} [GROUP BY ...]`.
    Select {
        ty: Type,
        source: Box<Sql>,
        fields: Vec<Sql>,
        group_by: Vec<Sql>,
    },

    Compare {
        op: CompareOp,
        args: Vec<Sql>,
    },

    Arith {
        ty: Type,
        op: ArithOp,
        args: Vec<Sql>,
    },

    Like {
        string: Box<Sql>,
        pattern: Box<Sql>,
    },

    Contains {
        op: ContainsOp,
        args: Vec<Sql>,
    },

    /// Wraps a scalar instance as a one-row array, used to lift an
    /// aggregate-scope scalar into a projected column; see
    /// [`crate::compiler::projection::process_field`].
    MakeArray { ty: Type, inner: Box<Sql> },

    /// An inline `{k: v, ...}` row literal.
    RowDict(IndexMap<String, Sql>),

    /// `{inner} DESC`.
    Desc(Box<Sql>),

    /// A late-bound placeholder produced at `AccessLevel::Compile`.
    Parameter { ty: Type, name: String },

    /// `{table} ORDER BY {keys}`.
    TableOrder { table: Box<Sql>, keys: Vec<Sql> },

    /// `{table} LIMIT/OFFSET`-style slice.
    TableSlice {
        table: Box<Sql>,
        start: Box<Sql>,
        stop: Option<Box<Sql>>,
    },

    /// `{table} WHERE {conds}`.
    TableSelection { table: Box<Sql>, conds: Vec<Sql> },

    /// A set operation between two table-shaped operands (`UNION`,
    /// `INTERSECT`, ...), emitted by the Preql-level `concat`/`union`/
    /// `intersect`/`substract` functions the compiler dispatches Arith's
    /// table/table branch to.
    SetArith {
        ty: Type,
        op: SetOp,
        left: Box<Sql>,
        right: Box<Sql>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Concat,
    Union,
    Intersect,
    Substract,
}

impl Sql {
    pub fn ty(&self) -> Type {
        match self {
            Sql::RawSql { ty, .. }
            | Sql::Name { ty, .. }
            | Sql::Select { ty, .. }
            | Sql::Arith { ty, .. }
            | Sql::MakeArray { ty, .. }
            | Sql::Parameter { ty, .. }
            | Sql::SetArith { ty, .. } => ty.clone(),
            Sql::ColumnAlias { target, .. } => target.ty(),
            Sql::Compare { .. } | Sql::Contains { .. } | Sql::Like { .. } => {
                Type::Primitive(crate::types::Primitive::Bool)
            }
            Sql::RowDict(_) => Type::Null,
            Sql::Desc(inner) => inner.ty(),
            Sql::TableOrder { table, .. }
            | Sql::TableSlice { table, .. }
            | Sql::TableSelection { table, .. } => table.ty(),
        }
    }

    pub fn column_alias(source: Sql, target: Sql) -> Sql {
        Sql::ColumnAlias {
            source: Box::new(source),
            target: Box::new(target),
        }
    }

    pub fn table_order(table: &Sql, keys: Vec<Sql>) -> Sql {
        Sql::TableOrder {
            table: Box::new(table.clone()),
            keys,
        }
    }

    pub fn table_slice(table: &Sql, start: Sql, stop: Option<Sql>) -> Sql {
        Sql::TableSlice {
            table: Box::new(table.clone()),
            start: Box::new(start),
            stop: stop.map(Box::new),
        }
    }

    pub fn table_selection(table: &Sql, conds: Vec<Sql>) -> Sql {
        Sql::TableSelection {
            table: Box::new(table.clone()),
            conds,
        }
    }

    /// Builds the `(table_code, subquery)` pair for a list literal: a
    /// named subquery unioning one single-row `SELECT ... AS value` per
    /// element, and a reference to it as the list's table code.
    pub fn create_list(elem_ty: Type, name: &str, elems: Vec<Sql>) -> (Sql, Sql) {
        let list_table_ty = crate::types::TableType::new(
            name,
            crate::types::FieldMap::from([("value".to_string(), elem_ty.clone())]),
            true,
            vec![],
        );
        let row_select = |elem: Sql| Sql::Select {
            ty: Type::Table(list_table_ty.clone()),
            source: Box::new(Sql::RawSql {
                ty: Type::Null,
                text: String::new(),
            }),
            fields: vec![Sql::column_alias(
                elem,
                Sql::Name {
                    ty: elem_ty.clone(),
                    name: "value".to_string(),
                },
            )],
            group_by: vec![],
        };

        let mut iter = elems.into_iter().map(row_select);
        let subquery = match iter.next() {
            Some(first) => iter.fold(first, |acc, next| Sql::SetArith {
                ty: Type::Table(list_table_ty.clone()),
                op: SetOp::Union,
                left: Box::new(acc),
                right: Box::new(next),
            }),
            None => Sql::RawSql {
                ty: Type::Table(list_table_ty.clone()),
                text: "<empty list literal>".to_string(),
            },
        };
        let table_code = Sql::Name {
            ty: Type::Table(list_table_ty),
            name: name.to_string(),
        };
        (table_code, subquery)
    }
}
