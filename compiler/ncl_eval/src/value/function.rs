//! Callable values.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use ncl_ir::{Builtin, ExprId, Name};

use crate::{Env, Thunk, Value};

/// A lambda together with the environment it was created in.
pub struct ClosureValue {
    pub param: Name,
    pub body: ExprId,
    pub env: Env,
}

/// A builtin applied to fewer arguments than its arity.
#[derive(Clone)]
pub struct PartialBuiltin {
    pub op: Builtin,
    pub args: SmallVec<[Thunk; 2]>,
}

impl PartialBuiltin {
    pub fn new(op: Builtin) -> Self {
        Self {
            op,
            args: SmallVec::new(),
        }
    }

    /// Arguments still missing before the builtin runs.
    pub fn remaining(&self) -> usize {
        self.op.arity().saturating_sub(self.args.len())
    }
}

/// Host callback signature.
pub type NativeFn = dyn Fn(Value) -> Result<Value, String> + Send + Sync;

/// A function implemented by the embedding program.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: &str,
        func: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, arg: Value) -> Result<Value, String> {
        (self.func)(arg)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}
