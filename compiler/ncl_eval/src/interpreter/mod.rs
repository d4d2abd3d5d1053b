//! Tree-walking, call-by-need interpreter.
//!
//! `Interpreter` evaluates `ExprId`s from an `ExprArena` to weak head normal
//! form. Arguments, `let` bindings, list elements and record fields are
//! suspended as `Thunk`s and forced on demand.
//!
//! # Stack discipline
//!
//! Tail positions (`let` body, `if` branches, the body of an applied
//! closure, the second operand of `seq`) are evaluated in a loop rather than
//! by recursion, so tail-recursive folds run in constant native stack. All
//! other nesting goes through `eval`, which grows the stack on demand and
//! counts against `EvalConfig::max_depth`.

mod builder;
mod eval;
mod operators;

use std::borrow::Cow;

use ncl_ir::{ExprArena, ExprId, StringInterner};
use ncl_stack::DepthLimit;
use ncl_types::ResolvedAnnotations;

pub use builder::InterpreterBuilder;

use crate::builtins;
use crate::errors::{native_failure, not_callable, EvalResult};
use crate::thunk::Suspension;
use crate::{Env, EvalConfig, Thunk, Value};

/// Evaluator over one expression arena.
///
/// Not `Sync`: the depth counter is per interpreter. Thunks and values are
/// shared freely, so several interpreters over the same arena may force the
/// same thunks from different threads.
pub struct Interpreter<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    annotations: Cow<'a, ResolvedAnnotations>,
    config: EvalConfig,
    depth: DepthLimit,
}

impl<'a> Interpreter<'a> {
    /// Interpreter with default settings and no annotations.
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        InterpreterBuilder::new(interner, arena).build()
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    pub fn arena(&self) -> &'a ExprArena {
        self.arena
    }

    pub fn annotations(&self) -> &ResolvedAnnotations {
        &self.annotations
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate `expr` in `env`.
    ///
    /// With `deep_force` set, the result is forced completely so every
    /// latent error (including deferred annotation checks) surfaces here.
    #[tracing::instrument(level = "debug", skip_all, fields(expr = expr.index()))]
    pub fn evaluate(&self, expr: ExprId, env: &Env) -> EvalResult {
        let value = self.eval(expr, env)?;
        if self.config.deep_force {
            self.deep_force(value)
        } else {
            Ok(value)
        }
    }

    /// Force a thunk to weak head normal form.
    #[inline]
    pub fn force(&self, thunk: &Thunk) -> EvalResult {
        thunk.force(self)
    }

    /// Run the computation behind a thunk.
    pub(crate) fn resume(&self, suspension: Suspension) -> EvalResult {
        tracing::trace!(kind = suspension.kind(), "forcing thunk");
        match suspension {
            Suspension::Expr { expr, env } => self.eval(expr, &env),
            Suspension::Apply { func, args } => {
                let func = self.force(&func)?;
                self.call(func, args)
            }
            Suspension::Check { inner, ty, path } => {
                let value = self.force(&inner)?;
                self.check_at(value, ty, &path)
            }
            Suspension::CheckList {
                source,
                elem,
                path,
                index,
            } => self.check_list_cell(&source, elem, path, index),
        }
    }

    /// Apply a function value to one suspended argument.
    pub fn apply(&self, func: Value, arg: Thunk) -> EvalResult {
        match func {
            Value::Closure(closure) => {
                let env = closure.env.bind(closure.param, arg);
                self.eval(closure.body, &env)
            }
            Value::Builtin(mut partial) => {
                partial.args.push(arg);
                if partial.remaining() == 0 {
                    builtins::dispatch(self, partial.op, &partial.args)
                } else {
                    Ok(Value::Builtin(partial))
                }
            }
            Value::Native(native) => {
                let arg = self.force(&arg)?;
                native
                    .call(arg)
                    .map_err(|message| native_failure(native.name(), message))
            }
            other => Err(not_callable(other.type_name())),
        }
    }

    /// Apply a function to several arguments, left to right.
    pub fn call(&self, func: Value, args: impl IntoIterator<Item = Thunk>) -> EvalResult {
        args.into_iter()
            .try_fold(func, |func, arg| self.apply(func, arg))
    }

    /// Force every list element and record field reachable from `value`.
    ///
    /// Iterative, so long or deeply nested data does not exhaust the stack.
    /// Functions are left alone. Returns `value` itself; its thunks now all
    /// hold results.
    pub fn deep_force(&self, value: Value) -> EvalResult {
        let mut work = vec![value.clone()];
        while let Some(current) = work.pop() {
            match current {
                Value::List(list) => {
                    let mut cursor = list.cursor();
                    while let Some(item) = cursor.next(self)? {
                        work.push(self.force(&item)?);
                    }
                }
                Value::Record(record) => {
                    for field in record.thunks() {
                        work.push(self.force(field)?);
                    }
                }
                Value::Int(_)
                | Value::Float(_)
                | Value::Bool(_)
                | Value::Str(_)
                | Value::Closure(_)
                | Value::Builtin(_)
                | Value::Native(_) => {}
            }
        }
        Ok(value)
    }
}
