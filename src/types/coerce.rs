//! Effective-type projection: strips the wrapper types that don't affect
//! comparability (`Id`, `Optional`, `Aggregated`, `DatumColumn`) so that
//! `Contains` (`in`/`!in`, see [`crate::compiler::compare`]) can compare
//! an id column against a plain int, or an aggregated value against its
//! unwrapped type.

use super::{Primitive, Type};

pub fn effective_type(ty: &Type) -> Type {
    match ty {
        Type::Id => Type::Primitive(Primitive::Int),
        Type::Optional(inner) => effective_type(inner),
        Type::Aggregated(inner) => effective_type(inner),
        Type::DatumColumn(inner) => effective_type(inner),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_effectively_int() {
        assert_eq!(effective_type(&Type::Id), Type::Primitive(Primitive::Int));
    }

    #[test]
    fn nested_wrappers_unwrap_fully() {
        let ty = Type::Aggregated(Box::new(Type::Optional(Box::new(Type::Id))));
        assert_eq!(effective_type(&ty), Type::Primitive(Primitive::Int));
    }

    #[test]
    fn plain_primitive_is_unchanged() {
        let ty = Type::Primitive(Primitive::String);
        assert_eq!(effective_type(&ty), ty);
    }
}
