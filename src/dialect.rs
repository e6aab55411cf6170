//! Database target negotiation.

/// The SQL engine a compiled statement targets. Read by
/// [`crate::compiler::type_compiler::compile_type`] to pick `Id` DDL
/// (`SERIAL` vs `INTEGER`), and is the hook for future dialect-specific
/// decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

/// The compiler's view of the database the compiled SQL will run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbTarget {
    pub dialect: Dialect,
}

impl DbTarget {
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn is_postgres(&self) -> bool {
        matches!(self.dialect, Dialect::Postgres)
    }
}
