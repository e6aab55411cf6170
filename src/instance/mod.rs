//! The value model: the compiler's currency.
//!
//! Modeled as a tagged `Instance` enum (`Scalar | Value | Column |
//! StructColumn | Table`) rather than a class hierarchy with
//! conditionally-present fields. Functions that operate uniformly across
//! variants (`flatten`) are inherent methods with an exhaustive match;
//! variant-specific operations (`to_struct_column`) are only defined
//! where they make sense and return `None`/`Option` otherwise.

mod literal;

pub use literal::PqlValue;

use indexmap::IndexMap;

use crate::sql::Sql;
use crate::types::{StructType, TableType, Type};

/// One compiler-internal value: a type, the SQL fragment that computes
/// it, the instances it was derived from (lineage, forms a DAG per
/// compilation), and any named subqueries it or its lineage introduced.
#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
    /// The generic case: a scalar SQL expression with no further
    /// structure (the result of `Like`, `Compare`, scalar `Arith`, ...).
    Scalar {
        ty: Type,
        code: Sql,
        refs: Vec<Instance>,
        subqueries: IndexMap<String, Sql>,
    },

    /// A scalar with a statically-known literal value, enabling constant
    /// folding in [`crate::compiler::arith::compile_arith`].
    Value {
        ty: Type,
        code: Sql,
        refs: Vec<Instance>,
        subqueries: IndexMap<String, Sql>,
        local_value: PqlValue,
    },

    /// A single database column.
    Column {
        ty: Type,
        code: Sql,
        refs: Vec<Instance>,
        subqueries: IndexMap<String, Sql>,
    },

    /// An ordered group of named columns with no backing table (a
    /// projected struct, or `this` bound to a table).
    StructColumn {
        ty: Type,
        code: Sql,
        refs: Vec<Instance>,
        subqueries: IndexMap<String, Sql>,
        members: IndexMap<String, Instance>,
    },

    /// A relation: an ordered map of column name to `Column` or
    /// `StructColumn` instance.
    Table {
        ty: Type,
        code: Sql,
        refs: Vec<Instance>,
        subqueries: IndexMap<String, Sql>,
        columns: IndexMap<String, Instance>,
    },
}

/// Subqueries accumulate, append-only, from every instance in `refs`: an
/// instance's subqueries are always a superset of its lineage's.
fn collect_subqueries(refs: &[Instance]) -> IndexMap<String, Sql> {
    let mut out = IndexMap::new();
    for r in refs {
        for (name, sql) in r.subqueries() {
            out.entry(name.clone()).or_insert_with(|| sql.clone());
        }
    }
    out
}

impl Instance {
    pub fn scalar(code: Sql, ty: Type, refs: Vec<Instance>) -> Instance {
        let subqueries = collect_subqueries(&refs);
        Instance::Scalar {
            ty,
            code,
            refs,
            subqueries,
        }
    }

    pub fn value(code: Sql, ty: Type, local_value: PqlValue) -> Instance {
        Instance::Value {
            ty,
            code,
            refs: Vec::new(),
            subqueries: IndexMap::new(),
            local_value,
        }
    }

    pub fn column(code: Sql, ty: Type, refs: Vec<Instance>) -> Instance {
        let subqueries = collect_subqueries(&refs);
        Instance::Column {
            ty,
            code,
            refs,
            subqueries,
        }
    }

    pub fn struct_column(
        code: Sql,
        struct_ty: std::rc::Rc<StructType>,
        refs: Vec<Instance>,
        members: IndexMap<String, Instance>,
    ) -> Instance {
        let mut subqueries = collect_subqueries(&refs);
        for m in members.values() {
            for (name, sql) in m.subqueries() {
                subqueries.entry(name.clone()).or_insert_with(|| sql.clone());
            }
        }
        Instance::StructColumn {
            ty: Type::Struct(struct_ty),
            code,
            refs,
            subqueries,
            members,
        }
    }

    pub fn table(
        code: Sql,
        table_ty: std::rc::Rc<TableType>,
        refs: Vec<Instance>,
        columns: IndexMap<String, Instance>,
    ) -> Instance {
        let mut subqueries = collect_subqueries(&refs);
        for c in columns.values() {
            for (name, sql) in c.subqueries() {
                subqueries.entry(name.clone()).or_insert_with(|| sql.clone());
            }
        }
        Instance::Table {
            ty: Type::Table(table_ty),
            code,
            refs,
            subqueries,
            columns,
        }
    }

    /// The cached null singleton: `Const` compiles `null` to this rather
    /// than a fresh instance each time.
    pub fn null() -> Instance {
        Instance::value(
            Sql::RawSql {
                ty: Type::Null,
                text: "NULL".to_string(),
            },
            Type::Null,
            PqlValue::Null,
        )
    }

    pub fn ty(&self) -> &Type {
        match self {
            Instance::Scalar { ty, .. }
            | Instance::Value { ty, .. }
            | Instance::Column { ty, .. }
            | Instance::StructColumn { ty, .. }
            | Instance::Table { ty, .. } => ty,
        }
    }

    pub fn code(&self) -> &Sql {
        match self {
            Instance::Scalar { code, .. }
            | Instance::Value { code, .. }
            | Instance::Column { code, .. }
            | Instance::StructColumn { code, .. }
            | Instance::Table { code, .. } => code,
        }
    }

    pub fn refs(&self) -> &[Instance] {
        match self {
            Instance::Scalar { refs, .. }
            | Instance::Value { refs, .. }
            | Instance::Column { refs, .. }
            | Instance::StructColumn { refs, .. }
            | Instance::Table { refs, .. } => refs,
        }
    }

    pub fn subqueries(&self) -> &IndexMap<String, Sql> {
        match self {
            Instance::Scalar { subqueries, .. }
            | Instance::Value { subqueries, .. }
            | Instance::Column { subqueries, .. }
            | Instance::StructColumn { subqueries, .. }
            | Instance::Table { subqueries, .. } => subqueries,
        }
    }

    pub fn subqueries_mut(&mut self) -> &mut IndexMap<String, Sql> {
        match self {
            Instance::Scalar { subqueries, .. }
            | Instance::Value { subqueries, .. }
            | Instance::Column { subqueries, .. }
            | Instance::StructColumn { subqueries, .. }
            | Instance::Table { subqueries, .. } => subqueries,
        }
    }

    /// Appends a named subquery, keeping the append-only discipline the
    /// rest of this module relies on.
    pub fn register_subquery(&mut self, name: String, sql: Sql) {
        self.subqueries_mut().entry(name).or_insert(sql);
    }

    pub fn local_value(&self) -> Option<&PqlValue> {
        match self {
            Instance::Value { local_value, .. } => Some(local_value),
            _ => None,
        }
    }

    pub fn members(&self) -> Option<&IndexMap<String, Instance>> {
        match self {
            Instance::StructColumn { members, .. } => Some(members),
            _ => None,
        }
    }

    pub fn columns(&self) -> Option<&IndexMap<String, Instance>> {
        match self {
            Instance::Table { columns, .. } => Some(columns),
            _ => None,
        }
    }

    /// `Column` yields itself; `StructColumn` concatenates its members'
    /// flattenings in declaration order. Other variants behave as
    /// single-leaf columns for the purpose of flattening.
    pub fn flatten(&self) -> Vec<Instance> {
        match self {
            Instance::StructColumn { members, .. } => {
                members.values().flat_map(Instance::flatten).collect()
            }
            _ => vec![self.clone()],
        }
    }

    /// Converts a `Table` instance into a `StructColumn` with the same
    /// columns, used to bind `this` inside a projection/selection/order
    /// scope.
    pub fn to_struct_column(&self) -> Option<Instance> {
        let columns = self.columns()?;
        let fields = columns
            .iter()
            .map(|(name, col)| (name.clone(), col.ty().clone()))
            .collect();
        let struct_ty = StructType::new(format!("{}_struct", self.ty_name()), fields);
        Some(Instance::struct_column(
            self.code().clone(),
            struct_ty,
            vec![],
            columns.clone(),
        ))
    }

    fn ty_name(&self) -> &str {
        match self.ty() {
            Type::Table(t) => &t.name,
            Type::Struct(s) => &s.name,
            _ => "anon",
        }
    }
}
