//! Unary and binary operators.
//!
//! Integer arithmetic is checked and stays integral (`/` truncates toward
//! zero); any float operand promotes the operation to `f64`. Leaving the
//! `i64` range is an `IntegerOverflow` error, never a silent promotion.

use std::cmp::Ordering;

use ncl_ir::{BinaryOp, ExprId, UnaryOp};

use super::Interpreter;
use crate::errors::{
    division_by_zero, integer_overflow, not_a_list, operand_mismatch, unexpected_type, EvalError,
    EvalResult,
};
use crate::value::ListValue;
use crate::{Env, Value};

impl Interpreter<'_> {
    pub(super) fn eval_binary(
        &self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        env: &Env,
    ) -> EvalResult {
        match op {
            BinaryOp::And | BinaryOp::Or => {
                let left = self.eval(left, env)?;
                let short_circuit = op == BinaryOp::Or;
                if self.expect_bool(&left, "left operand of a logical operator")? == short_circuit {
                    return Ok(Value::Bool(short_circuit));
                }
                let right = self.eval(right, env)?;
                Ok(Value::Bool(
                    self.expect_bool(&right, "right operand of a logical operator")?,
                ))
            }
            BinaryOp::ListConcat => {
                let left = match self.eval(left, env)? {
                    Value::List(list) => list,
                    other => return Err(not_a_list("left operand of `@`", other.type_name())),
                };
                Ok(Value::List(ListValue::concat(left, self.suspend(right, env))))
            }
            _ => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                self.binary_values(op, left, right)
            }
        }
    }

    /// Apply a strict binary operator to evaluated operands.
    pub fn binary_values(&self, op: BinaryOp, left: Value, right: Value) -> EvalResult {
        match op {
            BinaryOp::Eq => Ok(Value::Bool(self.values_equal(&left, &right)?)),
            BinaryOp::NotEq => Ok(Value::Bool(!self.values_equal(&left, &right)?)),
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                arithmetic(op, &left, &right)
            }
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                let ordering = compare(op, &left, &right)?;
                Ok(Value::Bool(match op {
                    BinaryOp::Lt => ordering == Ordering::Less,
                    BinaryOp::LtEq => ordering != Ordering::Greater,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }))
            }
            BinaryOp::StrConcat => match (&left, &right) {
                (Value::Str(a), Value::Str(b)) => Ok(Value::string(&format!("{a}{b}"))),
                _ => Err(mismatch(op, &left, &right)),
            },
            BinaryOp::And | BinaryOp::Or => match (&left, &right) {
                (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinaryOp::And {
                    *a && *b
                } else {
                    *a || *b
                })),
                _ => Err(mismatch(op, &left, &right)),
            },
            BinaryOp::ListConcat => match left {
                Value::List(list) => Ok(Value::List(ListValue::concat(
                    list,
                    crate::Thunk::ready(right),
                ))),
                other => Err(not_a_list("left operand of `@`", other.type_name())),
            },
        }
    }

    pub(super) fn eval_unary(&self, op: UnaryOp, operand: Value) -> EvalResult {
        match (op, operand) {
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Neg, Value::Int(n)) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| integer_overflow(op.as_symbol())),
            (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
            (UnaryOp::Not, other) => Err(unexpected_type("Bool", other.type_name(), "`!`")),
            (UnaryOp::Neg, other) => Err(unexpected_type("Num", other.type_name(), "unary `-`")),
        }
    }

    /// Structural equality, forcing both sides as far as needed.
    ///
    /// Lists of different lengths compare unequal as soon as one runs out;
    /// comparing functions is an error.
    #[expect(clippy::float_cmp, reason = "numeric equality is exact")]
    pub fn values_equal(&self, left: &Value, right: &Value) -> Result<bool, EvalError> {
        let mut work = vec![(left.clone(), right.clone())];
        while let Some(pair) = work.pop() {
            match pair {
                (Value::Int(a), Value::Int(b)) => {
                    if a != b {
                        return Ok(false);
                    }
                }
                (Value::Str(a), Value::Str(b)) => {
                    if a != b {
                        return Ok(false);
                    }
                }
                (Value::Bool(a), Value::Bool(b)) => {
                    if a != b {
                        return Ok(false);
                    }
                }
                (Value::List(a), Value::List(b)) => {
                    let mut xs = a.cursor();
                    let mut ys = b.cursor();
                    loop {
                        match (xs.next(self)?, ys.next(self)?) {
                            (Some(x), Some(y)) => work.push((self.force(&x)?, self.force(&y)?)),
                            (None, None) => break,
                            _ => return Ok(false),
                        }
                    }
                }
                (Value::Record(a), Value::Record(b)) => {
                    if a.len() != b.len() || a.names().zip(b.names()).any(|(x, y)| x != y) {
                        return Ok(false);
                    }
                    for (x, y) in a.thunks().zip(b.thunks()) {
                        work.push((self.force(x)?, self.force(y)?));
                    }
                }
                (a, b) if a.is_function() || b.is_function() => {
                    return Err(operand_mismatch("==", a.type_name(), b.type_name()));
                }
                (a, b) => match (a.as_f64(), b.as_f64()) {
                    (Some(x), Some(y)) => {
                        if x != y {
                            return Ok(false);
                        }
                    }
                    _ => return Ok(false),
                },
            }
        }
        Ok(true)
    }
}

fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    operand_mismatch(op.as_symbol(), left.type_name(), right.type_name())
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => float_arithmetic(op, a, b),
            _ => Err(mismatch(op, left, right)),
        },
    }
}

fn int_arithmetic(op: BinaryOp, a: i64, b: i64) -> EvalResult {
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b == 0 {
        return Err(division_by_zero());
    }
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => a.checked_div(b),
        _ => a.checked_rem(b),
    };
    result
        .map(Value::Int)
        .ok_or_else(|| integer_overflow(op.as_symbol()))
}

fn float_arithmetic(op: BinaryOp, a: f64, b: f64) -> EvalResult {
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b == 0.0 {
        return Err(division_by_zero());
    }
    Ok(Value::Float(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        _ => a % b,
    }))
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).ok_or_else(|| mismatch(op, left, right)),
            _ => Err(mismatch(op, left, right)),
        },
    }
}
