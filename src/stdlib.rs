//! The interface to the Preql standard library: an external collaborator
//! providing `concat`, `intersect`, `union`, `substract`, and `repeat`
//! under a uniform `(state, args) -> Instance` calling convention. The
//! standard library's own implementation lives outside this crate; this
//! module only defines the seam the Compiler calls through.

use crate::error::Result;
use crate::instance::Instance;
use crate::state::State;

/// One Preql-level function reachable from the compiler's Arith
/// table-dispatch branch ([`crate::compiler::arith::compile_arith`]) or
/// from mixed int/string multiplication (dispatches to `repeat`).
pub trait PqlFunction {
    fn call(&self, state: &mut State, args: Vec<Instance>) -> Result<Instance>;
}

/// Looks up standard-library functions by name. The orchestrator supplies
/// an implementation backed by the loaded Preql standard library; tests
/// in this crate supply a stub.
pub trait Stdlib {
    fn lookup(&self, name: &str) -> Option<&dyn PqlFunction>;
}

/// The four table-arithmetic operator names the Arith compiler dispatches
/// to when both operands are tables.
pub fn table_arith_function_name(op: &str) -> Option<&'static str> {
    match op {
        "+" => Some("concat"),
        "&" => Some("intersect"),
        "|" => Some("union"),
        "-" => Some("substract"),
        _ => None,
    }
}
