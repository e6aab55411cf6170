//! Field-name inference for projection fields with no explicit name.

use crate::ast::Ast;

/// Recurses into the common "this expression obviously has a name"
/// shapes. Returns `None` when nothing sensible can be guessed, in which
/// case the caller requires an explicit name.
pub fn guess_field_name(ast: &Ast) -> Option<String> {
    match ast {
        Ast::Name(n) => Some(n.name.clone()),
        Ast::Attr(a) => Some(a.name.clone()),
        Ast::FuncCall(f) => guess_field_name(&f.func),
        Ast::Projection(p) => guess_field_name(&p.table),
        Ast::Selection(s) => guess_field_name(&s.table),
        Ast::Order(o) => guess_field_name(&o.table),
        Ast::Slice(s) => guess_field_name(&s.table),
        Ast::DescOrder(d) => guess_field_name(&d.value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Attr, Name};
    use crate::meta::SourceMeta;

    #[test]
    fn name_guesses_itself() {
        let ast = Ast::Name(Name {
            meta: SourceMeta::default(),
            name: "age".to_string(),
        });
        assert_eq!(guess_field_name(&ast), Some("age".to_string()));
    }

    #[test]
    fn attr_guesses_its_member_name() {
        let base = Ast::Name(Name {
            meta: SourceMeta::default(),
            name: "addr".to_string(),
        });
        let ast = Ast::Attr(Attr {
            meta: SourceMeta::default(),
            expr: Box::new(base),
            name: "zip".to_string(),
        });
        assert_eq!(guess_field_name(&ast), Some("zip".to_string()));
    }

    #[test]
    fn const_has_no_guessable_name() {
        let ast = Ast::Const(crate::ast::Const {
            meta: SourceMeta::default(),
            ty: crate::types::Type::int(),
            value: crate::instance::PqlValue::Int(1),
        });
        assert_eq!(guess_field_name(&ast), None);
    }
}
