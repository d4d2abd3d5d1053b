//! List primitives.

use crate::errors::{domain_error, empty_list, index_out_of_bounds, EvalResult};
use crate::value::ListValue;
use crate::{Interpreter, Value};

pub(super) fn head(interp: &Interpreter<'_>, list: &ListValue) -> EvalResult {
    match list.uncons(interp)? {
        Some((head, _)) => interp.force(&head),
        None => Err(empty_list("head")),
    }
}

pub(super) fn tail(interp: &Interpreter<'_>, list: &ListValue) -> EvalResult {
    match list.uncons(interp)? {
        Some((_, rest)) => Ok(Value::List(rest)),
        None => Err(empty_list("tail")),
    }
}

pub(super) fn length(interp: &Interpreter<'_>, list: &ListValue) -> EvalResult {
    let length = list.length(interp)?;
    i64::try_from(length)
        .map(Value::Int)
        .map_err(|_| domain_error("length", format!("{length} does not fit in a number")))
}

pub(super) fn elem_at(interp: &Interpreter<'_>, list: &ListValue, index: &Value) -> EvalResult {
    let Some(n) = index.as_integer() else {
        return Err(domain_error(
            "elemAt",
            format!("index must be an integer, got {index}"),
        ));
    };
    let Ok(position) = usize::try_from(n) else {
        return Err(index_out_of_bounds(n, list.length(interp)?));
    };
    match list.elem_at(interp, position)? {
        Some(item) => interp.force(&item),
        None => Err(index_out_of_bounds(n, list.length(interp)?)),
    }
}

/// The lazy list `[0, n)`. `n` must be a non-negative integer.
pub(super) fn range(n: &Value) -> EvalResult {
    match n.as_integer() {
        Some(end) if end >= 0 => Ok(Value::List(ListValue::range(end))),
        _ => Err(domain_error(
            "range",
            format!("expected a non-negative integer, got {n}"),
        )),
    }
}
