//! The type lattice: a closed catalogue of Preql types.
//!
//! Modeled as a tagged `enum` dispatched over with an exhaustive `match`
//! rather than open multimethods, with `TableType`/`StructType` payloads
//! held behind `Rc` since projections and selections routinely derive
//! fresh types that share structure with their source.

mod coerce;
mod ops;

pub use coerce::effective_type;
pub use ops::{find_duplicate_name, FlattenedColumn};

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{PqlError, Result};
use crate::meta::SourceMeta;

/// Primitive scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    String,
    Float,
    Bool,
    Text,
    DateTime,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Int,
        Primitive::String,
        Primitive::Float,
        Primitive::Bool,
        Primitive::Text,
        Primitive::DateTime,
    ];

    /// The name as it appears in Preql source and in the primitive->DDL
    /// mapping table used by [`crate::compiler::type_compiler::compile_primitive`].
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::String => "string",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::Text => "text",
            Primitive::DateTime => "datetime",
        }
    }

    pub fn by_name(name: &str) -> Option<Primitive> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// An ordered, named field mapping shared by [`StructType`] and
/// [`TableType`]. `IndexMap` preserves declaration order, which
/// `flatten_type` and DDL generation both depend on.
pub type FieldMap = IndexMap<String, Type>;

/// A struct type: an anonymous or named bag of fields with no backing
/// table.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub name: String,
    pub fields: FieldMap,
}

impl StructType {
    pub fn new(name: impl Into<String>, fields: FieldMap) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            fields,
        })
    }
}

/// A relational table type: an ordered column mapping, a temporariness
/// flag, and the primary-key column paths.
#[derive(Debug, Clone, PartialEq)]
pub struct TableType {
    pub name: String,
    pub columns: FieldMap,
    pub temporary: bool,
    /// Each path is a sequence of nested field names, e.g. `["addr",
    /// "zip"]` for a primary key on a struct-column's nested field.
    pub primary_keys: Vec<Vec<String>>,
}

impl TableType {
    pub fn new(
        name: impl Into<String>,
        columns: FieldMap,
        temporary: bool,
        primary_keys: Vec<Vec<String>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            columns,
            temporary,
            primary_keys,
        })
    }

    /// Flattens nested struct/table columns into a leaf-only, dotted-name
    /// ordered sequence; the basis for DDL generation in
    /// [`crate::compiler::type_compiler::compile_type_def`].
    pub fn flatten_type(&self) -> Vec<FlattenedColumn> {
        let mut out = Vec::new();
        for (name, ty) in &self.columns {
            ops::flatten_into(name, ty, &mut out);
        }
        out
    }

    /// Validates this table's structural invariants: unique column names
    /// and primary-key paths that reference existing columns.
    pub fn validate(&self, meta: Option<SourceMeta>) -> Result<()> {
        if let Some(dup) = find_duplicate_name(self.columns.keys()) {
            return Err(PqlError::type_error(
                meta,
                format!("duplicate column name '{dup}' in table '{}'", self.name),
            ));
        }
        let flat: std::collections::HashSet<String> =
            self.flatten_type().into_iter().map(|c| c.dotted_name).collect();
        for pk in &self.primary_keys {
            let dotted = pk.join(".");
            if !flat.contains(&dotted) && !self.columns.contains_key(&dotted) {
                return Err(PqlError::type_error(
                    meta,
                    format!("primary key references unknown column path '{dotted}'"),
                ));
            }
        }
        Ok(())
    }
}

/// The type lattice. Every Preql value has exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    /// Auto-assigned integer primary key marker.
    Id,
    Null,
    Optional(Box<Type>),
    List(Box<Type>),
    /// Marks a value as living inside a group-by aggregate scope; see
    /// [`crate::compiler::projection`]'s `MakeArray` lifting.
    Aggregated(Box<Type>),
    Struct(Rc<StructType>),
    /// A foreign-key column referencing another table's `id`.
    RelationalColumn(Rc<TableType>),
    /// A column wrapping a primitive/struct/etc.
    DatumColumn(Box<Type>),
    Table(Rc<TableType>),
}

impl Type {
    pub fn string() -> Type {
        Type::Primitive(Primitive::String)
    }

    pub fn int() -> Type {
        Type::Primitive(Primitive::Int)
    }

    pub fn bool() -> Type {
        Type::Primitive(Primitive::Bool)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Type::Table(_) | Type::List(_))
    }

    pub fn as_table(&self) -> Option<&Rc<TableType>> {
        match self {
            Type::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Applies one type argument to a generic container type, e.g.
    /// `List[int]`. Only `List`, `Optional`, and `Aggregated` accept an
    /// inner-type argument; anything else is "not a container".
    pub fn apply_inner_type(&self, inner: Type) -> std::result::Result<Type, ()> {
        match self {
            Type::List(_) => Ok(Type::List(Box::new(inner))),
            Type::Optional(_) => Ok(Type::Optional(Box::new(inner))),
            Type::Aggregated(_) => Ok(Type::Aggregated(Box::new(inner))),
            _ => Err(()),
        }
    }
}
