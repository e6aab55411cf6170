//! Structural helpers over the type lattice: flattening and duplicate
//! detection, split out of `mod.rs` to keep one concern per file under
//! `types/`.

use std::collections::HashSet;
use std::hash::Hash;

use super::Type;

/// One leaf column produced by [`super::TableType::flatten_type`]: its
/// dotted path name and its (always non-struct, non-table) type.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedColumn {
    pub dotted_name: String,
    pub ty: Type,
}

pub(super) fn flatten_into(prefix: &str, ty: &Type, out: &mut Vec<FlattenedColumn>) {
    match ty {
        Type::Struct(s) => {
            for (name, field_ty) in &s.fields {
                flatten_into(&format!("{prefix}.{name}"), field_ty, out);
            }
        }
        Type::Table(t) => {
            for (name, col_ty) in &t.columns {
                flatten_into(&format!("{prefix}.{name}"), col_ty, out);
            }
        }
        Type::DatumColumn(inner) => flatten_into(prefix, inner, out),
        _ => out.push(FlattenedColumn {
            dotted_name: prefix.to_string(),
            ty: ty.clone(),
        }),
    }
}

/// Returns the first name that appears more than once, preserving
/// first-occurrence iteration order so error messages are deterministic.
pub fn find_duplicate_name<'a, I, T>(names: I) -> Option<T>
where
    I: IntoIterator<Item = &'a T>,
    T: Eq + Hash + Clone + 'a,
{
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Some(name.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldMap, Primitive, StructType, TableType};

    #[test]
    fn flatten_is_leaf_only_and_ordered() {
        let addr = StructType::new(
            "Address",
            FieldMap::from([
                ("street".to_string(), Type::Primitive(Primitive::String)),
                ("zip".to_string(), Type::Primitive(Primitive::Int)),
            ]),
        );
        let table = TableType::new(
            "users",
            FieldMap::from([
                ("id".to_string(), Type::Id),
                ("addr".to_string(), Type::Struct(addr)),
            ]),
            false,
            vec![vec!["id".to_string()]],
        );
        let flat = table.flatten_type();
        let names: Vec<_> = flat.iter().map(|c| c.dotted_name.as_str()).collect();
        assert_eq!(names, vec!["id", "addr.street", "addr.zip"]);
    }

    #[test]
    fn duplicate_detection_finds_first_repeat() {
        let names = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(find_duplicate_name(names.iter()), Some("a".to_string()));
        let unique = vec!["a".to_string(), "b".to_string()];
        assert_eq!(find_duplicate_name(unique.iter()), None);
    }
}
