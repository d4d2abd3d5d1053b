//! Expression evaluation.

use std::collections::BTreeMap;
use std::sync::Arc;

use smallvec::SmallVec;

use ncl_ir::{Builtin, Expr, ExprId, Name, ParsedTypeId, RecordField};
use ncl_stack::ensure_sufficient_stack;
use ncl_types::TypeId;

use super::Interpreter;
use crate::builtins;
use crate::check::TypePath;
use crate::errors::{
    arity_mismatch, duplicate_field, missing_field, not_a_record, stack_overflow,
    unbound_identifier, unexpected_type, unresolved_annotation, EvalError, EvalResult,
};
use crate::value::{ListValue, PartialBuiltin, RecordValue};
use crate::{Env, Thunk, Value};

impl Interpreter<'_> {
    /// Evaluate one nested expression.
    pub(crate) fn eval(&self, expr: ExprId, env: &Env) -> EvalResult {
        let _guard = self
            .depth
            .enter()
            .map_err(|exceeded| stack_overflow(exceeded.limit))?;
        ensure_sufficient_stack(|| self.eval_loop(expr, env.clone()))
    }

    fn eval_loop(&self, mut expr: ExprId, mut env: Env) -> EvalResult {
        loop {
            match self.arena.expr(expr) {
                Expr::Int(n) => return Ok(Value::Int(*n)),
                Expr::Float(n) => return Ok(Value::Float(*n)),
                Expr::Str(s) => return Ok(Value::string(self.interner.lookup(*s))),
                Expr::Bool(b) => return Ok(Value::Bool(*b)),
                Expr::Ident(name) => return self.force(&self.lookup(*name, &env)?),
                Expr::Lambda { param, body } => return Ok(Value::closure(*param, *body, env)),

                // Tail positions continue the loop.
                Expr::Let { name, value, body } => {
                    env = self.bind_recursive(&env, *name, *value);
                    expr = *body;
                }
                Expr::If {
                    cond,
                    then_branch,
                    else_branch,
                } => {
                    let cond = self.eval(*cond, &env)?;
                    expr = if self.expect_bool(&cond, "`if` condition")? {
                        *then_branch
                    } else {
                        *else_branch
                    };
                }
                Expr::Apply { func, arg } => {
                    let func = self.eval(*func, &env)?;
                    let arg = self.suspend(*arg, &env);
                    match func {
                        Value::Closure(closure) => {
                            env = closure.env.bind(closure.param, arg);
                            expr = closure.body;
                        }
                        other => return self.apply(other, arg),
                    }
                }
                Expr::Builtin {
                    op: Builtin::Seq,
                    args,
                } if args.len() == 2 => {
                    self.eval(args[0], &env)?;
                    expr = args[1];
                }
                Expr::Builtin {
                    op: Builtin::DeepSeq,
                    args,
                } if args.len() == 2 => {
                    let value = self.eval(args[0], &env)?;
                    self.deep_force(value)?;
                    expr = args[1];
                }
                Expr::TypeAlias { body, .. } => expr = *body,

                Expr::Builtin { op, args } => return self.eval_builtin(*op, args, &env),
                Expr::Binary { op, left, right } => {
                    return self.eval_binary(*op, *left, *right, &env);
                }
                Expr::Unary { op, operand } => {
                    let operand = self.eval(*operand, &env)?;
                    return self.eval_unary(*op, operand);
                }
                Expr::List(items) => {
                    let items = items.iter().map(|&item| self.suspend(item, &env)).collect();
                    return Ok(Value::List(ListValue::from_thunks(items)));
                }
                Expr::Record(fields) => return self.eval_record(fields, &env),
                Expr::Field { receiver, field } => {
                    let receiver = self.eval(*receiver, &env)?;
                    let thunk = self.field_thunk(&receiver, *field)?;
                    return self.force(&thunk).map_err(|err| {
                        err.with_note(format!(
                            "while evaluating field `{}`",
                            self.interner.lookup(*field)
                        ))
                    });
                }
                Expr::Ascribe { expr: inner, ty } => {
                    let ty = self.annotation(*ty)?;
                    let value = self.eval(*inner, &env)?;
                    return self.check(value, ty);
                }
            }
        }
    }

    /// Suspend `expr` in `env` without evaluating it.
    ///
    /// Variables reuse the bound thunk, and literals and lambdas are built
    /// directly, since evaluating them costs nothing and cannot fail.
    pub(crate) fn suspend(&self, expr: ExprId, env: &Env) -> Thunk {
        match self.arena.expr(expr) {
            Expr::Ident(name) => env
                .lookup(*name)
                .unwrap_or_else(|| Thunk::suspended(expr, env.clone())),
            Expr::Int(n) => Thunk::ready(Value::Int(*n)),
            Expr::Float(n) => Thunk::ready(Value::Float(*n)),
            Expr::Bool(b) => Thunk::ready(Value::Bool(*b)),
            Expr::Str(s) => Thunk::ready(Value::string(self.interner.lookup(*s))),
            Expr::Lambda { param, body } => {
                Thunk::ready(Value::closure(*param, *body, env.clone()))
            }
            _ => Thunk::suspended(expr, env.clone()),
        }
    }

    /// `let name = value in ...`: `name` is in scope inside `value`.
    fn bind_recursive(&self, env: &Env, name: Name, value: ExprId) -> Env {
        let thunk = Thunk::suspended(value, Env::new());
        let env = env.bind(name, thunk.clone());
        thunk.close_over(env.clone());
        env
    }

    fn lookup(&self, name: Name, env: &Env) -> Result<Thunk, EvalError> {
        env.lookup(name)
            .ok_or_else(|| unbound_identifier(self.interner.lookup(name)))
    }

    pub(crate) fn annotation(&self, ty: ParsedTypeId) -> Result<TypeId, EvalError> {
        self.annotations.get(ty).ok_or_else(unresolved_annotation)
    }

    /// `%op% args...`. Too few arguments yield a partial application.
    fn eval_builtin(&self, op: Builtin, args: &[ExprId], env: &Env) -> EvalResult {
        if args.len() > op.arity() {
            return Err(arity_mismatch(op.name(), op.arity(), args.len()));
        }
        let args: SmallVec<[Thunk; 2]> = args.iter().map(|&arg| self.suspend(arg, env)).collect();
        if args.len() < op.arity() {
            return Ok(Value::Builtin(PartialBuiltin { op, args }));
        }
        builtins::dispatch(self, op, &args)
    }

    /// Every field becomes its own thunk; annotated fields are checked when forced.
    fn eval_record(&self, fields: &[RecordField], env: &Env) -> EvalResult {
        let mut record = BTreeMap::new();
        for field in fields {
            let name: Arc<str> = Arc::from(self.interner.lookup(field.name));
            let mut thunk = self.suspend(field.value, env);
            if let Some(ty) = field.ty {
                let path = TypePath::root().field(&name);
                thunk = Thunk::deferred_check(thunk, self.annotation(ty)?, path);
            }
            if record.insert(name.clone(), thunk).is_some() {
                return Err(duplicate_field(&name));
            }
        }
        Ok(Value::Record(RecordValue::new(record)))
    }

    fn field_thunk(&self, receiver: &Value, field: Name) -> Result<Thunk, EvalError> {
        let Value::Record(record) = receiver else {
            return Err(not_a_record("field access", receiver.type_name()));
        };
        let name = self.interner.lookup(field);
        record.get(name).cloned().ok_or_else(|| missing_field(name))
    }

    pub(crate) fn expect_bool(
        &self,
        value: &Value,
        context: &'static str,
    ) -> Result<bool, EvalError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(unexpected_type("Bool", other.type_name(), context)),
        }
    }
}
