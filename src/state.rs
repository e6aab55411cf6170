//! Process-wide execution context.
//!
//! `State` is threaded through every compiler call: there is no shared
//! mutable state beyond it, and the compiler never suspends or retries on
//! its own. Scoped name resolution is an explicit stack of maps owned by
//! `State`; see [`State::with_scope`] for how pushes/pops are guaranteed
//! to pair up even when a child compile fails.

use indexmap::IndexMap;

use crate::config::CompilerConfig;
use crate::dialect::DbTarget;
use crate::error::Result;
use crate::instance::Instance;
use crate::stdlib::Stdlib;
use crate::types::Type;

/// Controls whether `Parameter` AST nodes compile to placeholders or
/// resolve to bound values; see [`crate::compiler::compile_parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Parameters compile to `Sql::Parameter` placeholders.
    Compile,
    /// Parameters resolve to their bound value in scope.
    Evaluate,
}

/// What a name in scope is bound to. `Type` bindings back generic-type
/// application (see [`crate::compiler::selection::apply_type_generics`]);
/// `Instance` bindings are the common case (columns, `this`,
/// list/projection results).
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Instance(Instance),
    Type(Type),
}

impl Binding {
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Binding::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Binding::Type(t) => Some(t),
            _ => None,
        }
    }
}

/// A stack of name-to-binding maps. Pushed on entering a scoped block
/// (projection body, selection predicate, order key), popped on exit.
/// Lookup walks the stack top-down, so inner bindings shadow outer ones.
#[derive(Debug, Default)]
pub struct Scope {
    frames: Vec<IndexMap<String, Binding>>,
}

impl Scope {
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    fn push(&mut self, frame: IndexMap<String, Binding>) {
        self.frames.push(frame);
    }

    fn pop(&mut self) {
        self.frames.pop();
    }
}

/// `{ db-target, access-level, scope-stack, name-counter }`, plus a
/// handle to the standard-library lookup seam ([`crate::stdlib::Stdlib`])
/// the Arith compiler dispatches table-level operators and mixed
/// string/int multiplication through.
pub struct State<'a> {
    pub db: DbTarget,
    pub access_level: AccessLevel,
    pub config: CompilerConfig,
    pub stdlib: &'a dyn Stdlib,
    scope: Scope,
    name_counter: u64,
}

impl<'a> State<'a> {
    pub fn new(
        db: DbTarget,
        access_level: AccessLevel,
        config: CompilerConfig,
        stdlib: &'a dyn Stdlib,
    ) -> Self {
        Self {
            db,
            access_level,
            config,
            stdlib,
            scope: Scope::default(),
            name_counter: 0,
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Allocates a unique name by incrementing the per-`State` counter and
    /// concatenating it to `prefix`. Within one compilation, produced
    /// aliases are guaranteed unique.
    pub fn unique_name(&mut self, prefix: &str) -> String {
        self.name_counter += 1;
        format!("{prefix}{}", self.name_counter)
    }

    /// Runs `f` with `frame` pushed on top of the scope stack, popping it
    /// again before returning — on every exit path, including an `Err`
    /// from `f`, since the pop happens unconditionally after `f` returns
    /// rather than relying on unwinding.
    ///
    /// A `Drop`-based guard would have to borrow `self.scope` for the
    /// duration of the closure, which conflicts with `f` also needing
    /// `&mut State` for nested compiles (e.g. to allocate more unique
    /// names); pairing push/pop around an ordinary function call sidesteps
    /// that without losing the guarantee, since this compiler is pure
    /// `Result`-based and never panics on a well-formed AST.
    pub fn with_scope<R>(
        &mut self,
        frame: IndexMap<String, Binding>,
        f: impl FnOnce(&mut State<'a>) -> Result<R>,
    ) -> Result<R> {
        self.scope.push(frame);
        let result = f(self);
        self.scope.pop();
        result
    }
}
