//! Runtime values.
//!
//! Values are in weak head normal form: the outermost constructor is known,
//! but list elements and record fields stay behind `Thunk`s until forced.
//! Everything is cheap to clone (scalars by copy, aggregates by `Arc`).

mod function;
mod list;
mod record;

use std::fmt;
use std::sync::Arc;

use ncl_ir::{Builtin, ExprId, Name};

pub use function::{ClosureValue, NativeFn, NativeFunction, PartialBuiltin};
pub use list::{ListCursor, ListValue};
pub use record::RecordValue;

use crate::Env;

/// Upper bound on list elements written by `Display`.
const DISPLAY_LIMIT: usize = 10_000;

/// A runtime value in weak head normal form.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Arc<str>),
    List(ListValue),
    Record(RecordValue),
    Closure(Arc<ClosureValue>),
    /// A builtin still waiting for arguments.
    Builtin(PartialBuiltin),
    /// A host function.
    Native(NativeFunction),
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    pub fn closure(param: Name, body: ExprId, env: Env) -> Self {
        Value::Closure(Arc::new(ClosureValue { param, body, env }))
    }

    /// An unapplied builtin.
    pub fn builtin(op: Builtin) -> Self {
        Value::Builtin(PartialBuiltin::new(op))
    }

    /// Wrap a host function of one argument. The argument is forced first.
    pub fn native(
        name: &str,
        func: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Value::Native(NativeFunction::new(name, func))
    }

    /// Name of the value's type, as used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) | Value::Float(_) => "Num",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "Str",
            Value::List(_) => "List",
            Value::Record(_) => "Record",
            Value::Closure(_) | Value::Builtin(_) | Value::Native(_) => "Function",
        }
    }

    pub fn is_num(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            Value::Closure(_) | Value::Builtin(_) | Value::Native(_)
        )
    }

    /// Numeric value widened to `f64`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "mixed arithmetic promotes to float"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Integral numeric value. Floats qualify when they hold a whole number.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "whole floats inside the i64 range convert exactly"
    )]
    pub fn as_integer(&self) -> Option<i64> {
        // 2^63
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(n) if n.fract() == 0.0 && (-LIMIT..LIMIT).contains(n) => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(list) => {
                let (items, complete) = list.peek_items(DISPLAY_LIMIT);
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_thunk(f, item)?;
                }
                if !complete {
                    f.write_str(if items.is_empty() { ".." } else { ", .." })?;
                }
                f.write_str("]")
            }
            Value::Record(record) => {
                if record.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (name, value)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name} = ")?;
                    write_thunk(f, value)?;
                }
                f.write_str(" }")
            }
            Value::Closure(_) => f.write_str("<function>"),
            Value::Builtin(partial) => write!(f, "<builtin {}>", partial.op.name()),
            Value::Native(native) => write!(f, "<native {}>", native.name()),
        }
    }
}

/// Unforced parts print as `?`.
fn write_thunk(f: &mut fmt::Formatter<'_>, thunk: &crate::Thunk) -> fmt::Result {
    match thunk.peek() {
        Some(value) => write!(f, "{value}"),
        None => f.write_str("?"),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({self})", self.type_name())
    }
}

/// Equality of already evaluated structure.
///
/// Numbers compare across `Int`/`Float`. Lists and records compare their
/// forced parts; an unforced element never equals anything. Functions are
/// equal only to themselves. For language-level `==` see
/// `Interpreter::values_equal`, which forces as it goes.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                let (xs, xs_complete) = a.peek_items(usize::MAX);
                let (ys, ys_complete) = b.peek_items(usize::MAX);
                xs_complete
                    && ys_complete
                    && xs.len() == ys.len()
                    && xs.iter().zip(&ys).all(|(x, y)| forced_eq(x, y))
            }
            (Value::Record(a), Value::Record(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && forced_eq(va, vb))
            }
            (Value::Closure(a), Value::Closure(b)) => Arc::ptr_eq(a, b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

fn forced_eq(a: &crate::Thunk, b: &crate::Thunk) -> bool {
    match (a.peek(), b.peek()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
