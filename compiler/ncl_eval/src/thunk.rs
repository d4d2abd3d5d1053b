//! Memoized suspensions.
//!
//! A `Thunk` is a shared cell holding either a suspended computation or its
//! outcome. Forcing runs the computation at most once: the result (value or
//! error) is cached and every holder observes the same outcome.
//!
//! # States
//!
//! ```text
//! Suspended --force--> InProgress(owner) --ok--> Forced(value)
//!                                        \--err-> Failed(error)
//! ```
//!
//! A thread that finds a thunk `InProgress` under another thread waits on
//! the cell's condition variable instead of recomputing. Finding it
//! `InProgress` under the *same* thread means the value depends on itself,
//! reported as `InfiniteRecursion`. A computation that unwinds (a panicking
//! host callback) leaves the cell `Failed` with `Interrupted`, so waiters
//! wake up.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};
use smallvec::SmallVec;

use ncl_ir::ExprId;
use ncl_types::TypeId;

use crate::check::TypePath;
use crate::errors::{infinite_recursion, interrupted, EvalError, EvalResult};
use crate::value::ListValue;
use crate::{Env, Interpreter, Value};

/// The deferred work held by an unforced thunk.
pub(crate) enum Suspension {
    /// Evaluate an expression in an environment.
    Expr { expr: ExprId, env: Env },
    /// Apply a function to arguments, left to right.
    Apply {
        func: Thunk,
        args: SmallVec<[Thunk; 2]>,
    },
    /// Check a value against a resolved annotation.
    Check {
        inner: Thunk,
        ty: TypeId,
        path: TypePath,
    },
    /// Produce the next cell of a checked list.
    CheckList {
        source: ListValue,
        elem: TypeId,
        path: TypePath,
        index: usize,
    },
}

impl Suspension {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Suspension::Expr { .. } => "expr",
            Suspension::Apply { .. } => "apply",
            Suspension::Check { .. } => "check",
            Suspension::CheckList { .. } => "check-list",
        }
    }
}

enum ThunkState {
    Suspended(Suspension),
    InProgress(ThreadId),
    Forced(Value),
    Failed(EvalError),
}

struct ThunkCell {
    state: Mutex<ThunkState>,
    done: Condvar,
}

impl ThunkCell {
    fn settle(&self, outcome: ThunkState) {
        *self.state.lock() = outcome;
        self.done.notify_all();
    }
}

/// Settles an `InProgress` cell when dropped, including during unwinding.
struct Settle<'a> {
    cell: &'a ThunkCell,
    outcome: Option<ThunkState>,
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        let outcome = self
            .outcome
            .take()
            .unwrap_or_else(|| ThunkState::Failed(interrupted()));
        self.cell.settle(outcome);
    }
}

/// Shared, memoized lazy value.
#[derive(Clone)]
pub struct Thunk(Arc<ThunkCell>);

impl Thunk {
    fn from_state(state: ThunkState) -> Self {
        Thunk(Arc::new(ThunkCell {
            state: Mutex::new(state),
            done: Condvar::new(),
        }))
    }

    /// An already evaluated thunk.
    pub fn ready(value: Value) -> Self {
        Self::from_state(ThunkState::Forced(value))
    }

    /// Defer `expr` in `env`.
    pub fn suspended(expr: ExprId, env: Env) -> Self {
        Self::from_state(ThunkState::Suspended(Suspension::Expr { expr, env }))
    }

    pub(crate) fn deferred(suspension: Suspension) -> Self {
        Self::from_state(ThunkState::Suspended(suspension))
    }

    /// Defer `func args...`.
    pub(crate) fn deferred_apply(func: Thunk, args: SmallVec<[Thunk; 2]>) -> Self {
        Self::deferred(Suspension::Apply { func, args })
    }

    /// Defer checking `inner` against `ty`.
    pub(crate) fn deferred_check(inner: Thunk, ty: TypeId, path: TypePath) -> Self {
        Self::deferred(Suspension::Check { inner, ty, path })
    }

    /// Rebind the environment of a suspended expression.
    ///
    /// Used by recursive `let`: the thunk is created first, bound in the
    /// environment, then pointed at the environment that contains itself.
    pub(crate) fn close_over(&self, env: Env) {
        let mut state = self.0.state.lock();
        if let ThunkState::Suspended(Suspension::Expr { env: slot, .. }) = &mut *state {
            *slot = env;
        }
    }

    /// The cached value, if this thunk has been forced successfully.
    pub fn peek(&self) -> Option<Value> {
        match &*self.0.state.lock() {
            ThunkState::Forced(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Whether forcing has finished, successfully or not.
    pub fn is_evaluated(&self) -> bool {
        matches!(
            &*self.0.state.lock(),
            ThunkState::Forced(_) | ThunkState::Failed(_)
        )
    }

    pub fn ptr_eq(&self, other: &Thunk) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Evaluate to weak head normal form, at most once.
    pub fn force(&self, interp: &Interpreter<'_>) -> EvalResult {
        let me = thread::current().id();
        let suspension = {
            let mut state = self.0.state.lock();
            loop {
                match &*state {
                    ThunkState::Forced(value) => return Ok(value.clone()),
                    ThunkState::Failed(err) => return Err(err.clone()),
                    ThunkState::InProgress(owner) if *owner == me => {
                        return Err(infinite_recursion());
                    }
                    ThunkState::InProgress(_) => self.0.done.wait(&mut state),
                    ThunkState::Suspended(_) => break,
                }
            }
            match std::mem::replace(&mut *state, ThunkState::InProgress(me)) {
                ThunkState::Suspended(suspension) => suspension,
                // Checked under the same lock above.
                _ => unreachable!("thunk left the suspended state while locked"),
            }
        };

        let mut settle = Settle {
            cell: &self.0,
            outcome: None,
        };
        let result = interp.resume(suspension);
        settle.outcome = Some(match &result {
            Ok(value) => ThunkState::Forced(value.clone()),
            Err(err) => ThunkState::Failed(err.clone()),
        });
        drop(settle);
        result
    }

    /// Take the list held by a uniquely owned, forced thunk.
    ///
    /// Lets long list spines be torn down iteratively.
    pub(crate) fn into_list(self) -> Option<ListValue> {
        let cell = Arc::try_unwrap(self.0).ok()?;
        match cell.state.into_inner() {
            ThunkState::Forced(Value::List(list)) => Some(list),
            ThunkState::Suspended(Suspension::CheckList { source, .. }) => Some(source),
            _ => None,
        }
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Release the lock before formatting: the value may reach this cell again.
        let forced = match &*self.0.state.lock() {
            ThunkState::Suspended(_) => return f.write_str("Thunk(<suspended>)"),
            ThunkState::InProgress(_) => return f.write_str("Thunk(<in progress>)"),
            ThunkState::Failed(err) => return write!(f, "Thunk(<failed: {err}>)"),
            ThunkState::Forced(value) => value.clone(),
        };
        write!(f, "Thunk({forced})")
    }
}
