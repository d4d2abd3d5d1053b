//! Builtin library.
//!
//! `dispatch` receives exactly `op.arity()` suspended arguments and forces
//! only what the primitive needs. Record reflection lives in `records`,
//! list primitives in `lists`.

mod lists;
mod records;

pub use records::{fields_of, has_field, map_fields};

use ncl_ir::Builtin;

use crate::errors::{not_a_list, not_a_record, unexpected_type, EvalError, EvalResult};
use crate::value::{ListValue, RecordValue};
use crate::{Interpreter, Thunk, Value};

/// Run a saturated builtin.
pub(crate) fn dispatch(interp: &Interpreter<'_>, op: Builtin, args: &[Thunk]) -> EvalResult {
    tracing::trace!(builtin = op.name(), "builtin dispatch");
    match op {
        Builtin::MapRec => {
            let record = force_record(interp, &args[1], op)?;
            Ok(Value::Record(map_fields(&args[0], &record)))
        }
        Builtin::FieldsOf => {
            let record = force_record(interp, &args[0], op)?;
            Ok(Value::List(fields_of(&record)))
        }
        Builtin::HasField => {
            let name = interp.force(&args[0])?;
            let Some(name) = name.as_str() else {
                return Err(unexpected_type("Str", name.type_name(), "`hasField`"));
            };
            let record = force_record(interp, &args[1], op)?;
            Ok(Value::Bool(has_field(&record, name)))
        }
        Builtin::Head => lists::head(interp, &force_list(interp, &args[0], op)?),
        Builtin::Tail => lists::tail(interp, &force_list(interp, &args[0], op)?),
        Builtin::Length => lists::length(interp, &force_list(interp, &args[0], op)?),
        Builtin::ElemAt => {
            let list = force_list(interp, &args[0], op)?;
            let index = interp.force(&args[1])?;
            lists::elem_at(interp, &list, &index)
        }
        Builtin::Range => lists::range(&interp.force(&args[0])?),
        Builtin::Seq => {
            interp.force(&args[0])?;
            interp.force(&args[1])
        }
        Builtin::DeepSeq => {
            let first = interp.force(&args[0])?;
            interp.deep_force(first)?;
            interp.force(&args[1])
        }
        Builtin::IsNum => Ok(Value::Bool(interp.force(&args[0])?.is_num())),
        Builtin::IsStr => Ok(Value::Bool(matches!(interp.force(&args[0])?, Value::Str(_)))),
        Builtin::IsBool => Ok(Value::Bool(matches!(interp.force(&args[0])?, Value::Bool(_)))),
        Builtin::IsList => Ok(Value::Bool(matches!(interp.force(&args[0])?, Value::List(_)))),
        Builtin::IsRecord => Ok(Value::Bool(matches!(
            interp.force(&args[0])?,
            Value::Record(_)
        ))),
        Builtin::IsFun => Ok(Value::Bool(interp.force(&args[0])?.is_function())),
    }
}

fn force_record(
    interp: &Interpreter<'_>,
    arg: &Thunk,
    op: Builtin,
) -> Result<RecordValue, EvalError> {
    match interp.force(arg)? {
        Value::Record(record) => Ok(record),
        other => Err(not_a_record(op.name(), other.type_name())),
    }
}

fn force_list(interp: &Interpreter<'_>, arg: &Thunk, op: Builtin) -> Result<ListValue, EvalError> {
    match interp.force(arg)? {
        Value::List(list) => Ok(list),
        other => Err(not_a_list(op.name(), other.type_name())),
    }
}

#[cfg(test)]
mod tests;
