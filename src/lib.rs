//! `preqlc-core`: compiles a typed Preql AST into a SQL intermediate
//! representation. This crate owns the [`eval::evaluate`] / [`compile_remote`]
//! pipeline only; parsing, the standard library's own implementation, IR
//! rendering, and database execution are external collaborators reached
//! through [`stdlib::Stdlib`] and [`state::State`].

pub mod ast;
pub mod compiler;
pub mod config;
pub mod dialect;
pub mod error;
pub mod eval;
pub mod instance;
pub mod meta;
pub mod sql;
pub mod state;
pub mod stdlib;
pub mod types;

pub use ast::Ast;
pub use compiler::{compile_remote, compile_type, compile_type_def};
pub use config::CompilerConfig;
pub use dialect::{DbTarget, Dialect};
pub use error::{PqlError, Result};
pub use eval::{evaluate, evaluate_seq};
pub use instance::{Instance, PqlValue};
pub use state::{AccessLevel, Binding, Scope, State};
pub use stdlib::{PqlFunction, Stdlib};
pub use types::{Primitive, StructType, TableType, Type};
