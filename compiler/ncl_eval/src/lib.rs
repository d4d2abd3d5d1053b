//! Ncl Eval - call-by-need evaluation of ncl expressions.
//!
//! This crate provides:
//! - `Value`: runtime values in weak head normal form, with lazy lists
//!   (`ListValue`) and records (`RecordValue`)
//! - `Thunk`: memoized suspensions, safe to force from several threads
//! - `Env`: immutable lexical environments
//! - `Interpreter`: the evaluator, configured through `InterpreterBuilder`
//! - the builtin library (record reflection and list primitives)
//! - lazy checking of resolved type annotations
//! - `prelude`: `lists.map`, `map2`, `generate` and `foldl`, written in
//!   the language itself
//!
//! # Architecture
//!
//! ```text
//! ExprArena + ResolvedAnnotations
//!              |
//!              v
//!        Interpreter --force--> Thunk --resume--> Interpreter
//!              |
//!              v
//!            Value
//! ```

mod builtins;
mod check;
mod config;
mod env;
pub mod errors;
mod interpreter;
pub mod prelude;
mod thunk;
mod value;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use builtins::{fields_of, has_field, map_fields};
pub use check::TypePath;
pub use config::{EvalConfig, DEFAULT_MAX_DEPTH};
pub use env::Env;
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use thunk::Thunk;
pub use value::{
    ClosureValue, ListCursor, ListValue, NativeFn, NativeFunction, PartialBuiltin, RecordValue,
    Value,
};
