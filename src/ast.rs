//! The AST node shapes this crate consumes from the upstream parser.
//! Every node carries a `meta` region used solely in error construction.

use crate::meta::SourceMeta;
use crate::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub meta: SourceMeta,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub meta: SourceMeta,
    pub expr: Box<Ast>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub meta: SourceMeta,
    pub ty: Type,
    pub value: crate::instance::PqlValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub meta: SourceMeta,
    pub op: String,
    pub op_meta: SourceMeta,
    pub args: Vec<Ast>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arith {
    pub meta: SourceMeta,
    pub op: String,
    pub op_meta: SourceMeta,
    pub args: Vec<Ast>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Like {
    pub meta: SourceMeta,
    pub str_expr: Box<Ast>,
    pub pattern: Box<Ast>,
}

/// A field inside a `Projection`'s `fields`/`agg_fields` list. `name` is
/// `None` when the field's name should be inferred, via
/// [`crate::compiler::field_name::guess_field_name`].
#[derive(Debug, Clone, PartialEq)]
pub struct NamedField {
    pub meta: SourceMeta,
    pub name: Option<String>,
    pub value: Ast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub meta: SourceMeta,
    pub table: Box<Ast>,
    pub fields: Vec<NamedField>,
    pub groupby: bool,
    pub agg_fields: Vec<NamedField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub meta: SourceMeta,
    pub table: Box<Ast>,
    pub conds: Vec<Ast>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub meta: SourceMeta,
    pub table: Box<Ast>,
    pub fields: Vec<Ast>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescOrder {
    pub meta: SourceMeta,
    pub value: Box<Ast>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub start: Option<Box<Ast>>,
    pub stop: Option<Box<Ast>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub meta: SourceMeta,
    pub table: Box<Ast>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub meta: SourceMeta,
    pub elems: Vec<Ast>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dict {
    pub meta: SourceMeta,
    pub elems: Vec<(String, Ast)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsis {
    pub meta: SourceMeta,
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub meta: SourceMeta,
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncCall {
    pub meta: SourceMeta,
    pub func: Box<Ast>,
    pub args: Vec<Ast>,
}

/// The typed AST the Evaluator/Compiler dispatch over.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    Name(Name),
    Attr(Attr),
    Const(Const),
    Compare(Compare),
    Arith(Arith),
    Like(Like),
    Projection(Projection),
    Selection(Selection),
    Order(Order),
    DescOrder(DescOrder),
    Slice(Slice),
    List(List),
    Dict(Dict),
    Ellipsis(Ellipsis),
    Parameter(Parameter),
    FuncCall(FuncCall),
    /// A type reference used as an operand, e.g. the base of a `Selection`
    /// in generic-type-application position; see
    /// [`crate::compiler::selection`].
    TypeRef(Type),
}

impl Ast {
    pub fn meta(&self) -> Option<SourceMeta> {
        match self {
            Ast::Name(n) => Some(n.meta),
            Ast::Attr(n) => Some(n.meta),
            Ast::Const(n) => Some(n.meta),
            Ast::Compare(n) => Some(n.meta),
            Ast::Arith(n) => Some(n.meta),
            Ast::Like(n) => Some(n.meta),
            Ast::Projection(n) => Some(n.meta),
            Ast::Selection(n) => Some(n.meta),
            Ast::Order(n) => Some(n.meta),
            Ast::DescOrder(n) => Some(n.meta),
            Ast::Slice(n) => Some(n.meta),
            Ast::List(n) => Some(n.meta),
            Ast::Dict(n) => Some(n.meta),
            Ast::Ellipsis(n) => Some(n.meta),
            Ast::Parameter(n) => Some(n.meta),
            Ast::FuncCall(n) => Some(n.meta),
            Ast::TypeRef(_) => None,
        }
    }
}
