//! Process-wide compiler settings, threaded through [`crate::state::State`]
//! rather than kept as module globals.
//!
//! Only `optimize` currently has compiler-observable behavior (it gates
//! constant folding in [`crate::compiler::arith`]); the rest are carried
//! for downstream consumers (the IR renderer, the database driver) to
//! read off shared state.

/// Compiler-wide configuration flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Enables constant folding of literal arithmetic in [`crate::compiler::arith::compile_arith`].
    pub optimize: bool,
    /// Hint for a downstream consumer to echo compiled SQL for debugging.
    pub print_sql: bool,
    /// Enables verbose diagnostics in the evaluator/compiler.
    pub debug: bool,
    /// Hint for a downstream consumer to cache compiled statements.
    pub cache: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            optimize: true,
            print_sql: false,
            debug: false,
            cache: false,
        }
    }
}
