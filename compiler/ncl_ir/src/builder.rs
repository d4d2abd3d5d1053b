//! Programmatic construction of expressions and annotations.
//!
//! `AstBuilder` is the surface an external parser (or a test) uses to
//! produce an `ExprArena`. It interns every identifier it is given, so
//! callers work with plain `&str`.

use crate::{
    AliasDef, BinaryOp, Builtin, Expr, ExprArena, ExprId, Name, ParsedType, ParsedTypeId,
    RecordField, SharedInterner, UnaryOp,
};

/// Builder that owns an arena while it is being filled.
pub struct AstBuilder {
    interner: SharedInterner,
    arena: ExprArena,
}

impl AstBuilder {
    pub fn new(interner: &SharedInterner) -> Self {
        Self {
            interner: interner.clone(),
            arena: ExprArena::new(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Hand the finished arena over to the caller.
    pub fn finish(self) -> ExprArena {
        self.arena
    }

    #[inline]
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    #[inline]
    pub fn expr(&mut self, expr: Expr) -> ExprId {
        self.arena.alloc_expr(expr)
    }

    // Literals and variables

    pub fn int(&mut self, n: i64) -> ExprId {
        self.expr(Expr::Int(n))
    }

    pub fn float(&mut self, n: f64) -> ExprId {
        self.expr(Expr::Float(n))
    }

    pub fn str(&mut self, s: &str) -> ExprId {
        let name = self.name(s);
        self.expr(Expr::Str(name))
    }

    pub fn bool(&mut self, b: bool) -> ExprId {
        self.expr(Expr::Bool(b))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        let name = self.name(name);
        self.expr(Expr::Ident(name))
    }

    // Functions

    pub fn lambda(&mut self, param: &str, body: ExprId) -> ExprId {
        let param = self.name(param);
        self.expr(Expr::Lambda { param, body })
    }

    /// `fun a b c => body`, curried right to left.
    pub fn lambdas(&mut self, params: &[&str], body: ExprId) -> ExprId {
        params
            .iter()
            .rev()
            .fold(body, |body, param| self.lambda(param, body))
    }

    pub fn apply(&mut self, func: ExprId, arg: ExprId) -> ExprId {
        self.expr(Expr::Apply { func, arg })
    }

    /// `func a b c`, applied left to right.
    pub fn call(&mut self, func: ExprId, args: &[ExprId]) -> ExprId {
        args.iter().fold(func, |func, &arg| self.apply(func, arg))
    }

    /// Apply the variable `func` to `args`.
    pub fn call_named(&mut self, func: &str, args: &[ExprId]) -> ExprId {
        let func = self.ident(func);
        self.call(func, args)
    }

    // Bindings and control flow

    pub fn let_in(&mut self, name: &str, value: ExprId, body: ExprId) -> ExprId {
        let name = self.name(name);
        self.expr(Expr::Let { name, value, body })
    }

    /// `let name : ty = value in body`
    pub fn let_typed(
        &mut self,
        name: &str,
        ty: ParsedTypeId,
        value: ExprId,
        body: ExprId,
    ) -> ExprId {
        let value = self.ascribe(value, ty);
        self.let_in(name, value, body)
    }

    pub fn if_then_else(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    ) -> ExprId {
        self.expr(Expr::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(Expr::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(Expr::Unary { op, operand })
    }

    pub fn ascribe(&mut self, expr: ExprId, ty: ParsedTypeId) -> ExprId {
        self.expr(Expr::Ascribe { expr, ty })
    }

    // Collections

    pub fn list(&mut self, items: &[ExprId]) -> ExprId {
        self.expr(Expr::List(items.to_vec()))
    }

    pub fn record(&mut self, fields: &[(&str, ExprId)]) -> ExprId {
        let fields = fields
            .iter()
            .map(|&(name, value)| RecordField {
                name: self.name(name),
                ty: None,
                value,
            })
            .collect();
        self.expr(Expr::Record(fields))
    }

    /// Record literal whose fields may carry annotations.
    pub fn record_typed(&mut self, fields: &[(&str, Option<ParsedTypeId>, ExprId)]) -> ExprId {
        let fields = fields
            .iter()
            .map(|&(name, ty, value)| RecordField {
                name: self.name(name),
                ty,
                value,
            })
            .collect();
        self.expr(Expr::Record(fields))
    }

    pub fn field(&mut self, receiver: ExprId, field: &str) -> ExprId {
        let field = self.name(field);
        self.expr(Expr::Field { receiver, field })
    }

    /// `receiver.a.b.c`
    pub fn field_path(&mut self, receiver: ExprId, path: &[&str]) -> ExprId {
        path.iter()
            .fold(receiver, |receiver, field| self.field(receiver, field))
    }

    pub fn builtin(&mut self, op: Builtin, args: &[ExprId]) -> ExprId {
        self.expr(Expr::Builtin {
            op,
            args: args.to_vec(),
        })
    }

    /// Invoke a builtin by its reserved name; `None` if the name is unknown.
    pub fn builtin_named(&mut self, name: &str, args: &[ExprId]) -> Option<ExprId> {
        Builtin::from_name(name).map(|op| self.builtin(op, args))
    }

    pub fn typealias(&mut self, name: &str, ty: ParsedTypeId, body: ExprId) -> ExprId {
        self.typealias_group(&[(name, ty)], body)
    }

    /// A group of aliases that can refer to each other.
    pub fn typealias_group(&mut self, defs: &[(&str, ParsedTypeId)], body: ExprId) -> ExprId {
        let defs = defs
            .iter()
            .map(|&(name, ty)| AliasDef {
                name: self.name(name),
                ty,
            })
            .collect();
        self.expr(Expr::TypeAlias { defs, body })
    }

    // Types

    pub fn ty(&mut self, ty: ParsedType) -> ParsedTypeId {
        self.arena.alloc_type(ty)
    }

    pub fn ty_num(&mut self) -> ParsedTypeId {
        self.ty(ParsedType::Num)
    }

    pub fn ty_str(&mut self) -> ParsedTypeId {
        self.ty(ParsedType::Str)
    }

    pub fn ty_bool(&mut self) -> ParsedTypeId {
        self.ty(ParsedType::Bool)
    }

    pub fn ty_dyn(&mut self) -> ParsedTypeId {
        self.ty(ParsedType::Dyn)
    }

    pub fn ty_list(&mut self, elem: ParsedTypeId) -> ParsedTypeId {
        self.ty(ParsedType::List(elem))
    }

    pub fn ty_record(&mut self, fields: &[(&str, ParsedTypeId)]) -> ParsedTypeId {
        let fields = fields
            .iter()
            .map(|&(name, ty)| (self.name(name), ty))
            .collect();
        self.ty(ParsedType::Record(fields))
    }

    pub fn ty_dict(&mut self, elem: ParsedTypeId) -> ParsedTypeId {
        self.ty(ParsedType::Dict(elem))
    }

    pub fn ty_fn(&mut self, param: ParsedTypeId, ret: ParsedTypeId) -> ParsedTypeId {
        self.ty(ParsedType::Function { param, ret })
    }

    /// `a -> b -> ret`
    pub fn ty_fns(&mut self, params: &[ParsedTypeId], ret: ParsedTypeId) -> ParsedTypeId {
        params
            .iter()
            .rev()
            .fold(ret, |ret, &param| self.ty_fn(param, ret))
    }

    /// `forall a b. body`
    pub fn ty_forall(&mut self, vars: &[&str], body: ParsedTypeId) -> ParsedTypeId {
        vars.iter().rev().fold(body, |body, var| {
            let var = self.name(var);
            self.ty(ParsedType::ForAll { var, body })
        })
    }

    pub fn ty_var(&mut self, name: &str) -> ParsedTypeId {
        let name = self.name(name);
        self.ty(ParsedType::Var(name))
    }

    pub fn ty_alias(&mut self, name: &str) -> ParsedTypeId {
        let name = self.name(name);
        self.ty(ParsedType::Named(name))
    }
}
