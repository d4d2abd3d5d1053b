//! Expression nodes and the arena that owns them.
//!
//! Expressions reference their children by `ExprId`; a closure or thunk only
//! needs to keep an `ExprId` plus its environment, never a borrowed subtree.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::{Builtin, Name, ParsedType, ParsedTypeId};

/// Index of an `Expr` in an `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    /// String concatenation `++`.
    StrConcat,
    /// Lazy list concatenation `@`.
    ListConcat,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::StrConcat => "++",
            BinaryOp::ListConcat => "@",
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        }
    }
}

/// One field of a record literal.
#[derive(Clone, PartialEq, Debug)]
pub struct RecordField {
    pub name: Name,
    /// Optional annotation, checked when the field is forced.
    pub ty: Option<ParsedTypeId>,
    pub value: ExprId,
}

/// One definition of a `typealias` group.
#[derive(Clone, PartialEq, Debug)]
pub struct AliasDef {
    pub name: Name,
    pub ty: ParsedTypeId,
}

/// Expression node.
#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    Int(i64),
    Float(f64),
    /// String literal (interned content).
    Str(Name),
    Bool(bool),
    Ident(Name),
    /// `fun param => body`
    Lambda { param: Name, body: ExprId },
    /// `func arg`
    Apply { func: ExprId, arg: ExprId },
    /// `let name = value in body`; `name` is in scope inside `value`.
    Let {
        name: Name,
        value: ExprId,
        body: ExprId,
    },
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary { op: UnaryOp, operand: ExprId },
    List(Vec<ExprId>),
    Record(Vec<RecordField>),
    /// `receiver.field`
    Field { receiver: ExprId, field: Name },
    /// Reserved-syntax primitive call, possibly partial.
    Builtin { op: Builtin, args: Vec<ExprId> },
    /// `expr : ty`
    Ascribe { expr: ExprId, ty: ParsedTypeId },
    /// `typealias A = T [and B = U ...] in body`
    TypeAlias { defs: Vec<AliasDef>, body: ExprId },
}

/// Flat storage for expressions and parsed types.
#[derive(Clone, Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    types: Vec<ParsedType>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` expressions.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("expression arena exceeded {} nodes", u32::MAX));
        self.exprs.push(expr);
        ExprId::new(id)
    }

    /// Allocate a parsed type.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` types.
    pub fn alloc_type(&mut self, ty: ParsedType) -> ParsedTypeId {
        let id = u32::try_from(self.types.len())
            .unwrap_or_else(|_| panic!("type arena exceeded {} nodes", u32::MAX));
        self.types.push(ty);
        ParsedTypeId::new(id)
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn parsed_type(&self, id: ParsedTypeId) -> &ParsedType {
        &self.types[id.index()]
    }
}

impl Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        self.expr(id)
    }
}

impl Index<ParsedTypeId> for ExprArena {
    type Output = ParsedType;

    fn index(&self, id: ParsedTypeId) -> &ParsedType {
        self.parsed_type(id)
    }
}

/// An arena shared between the driver and interpreters.
pub type SharedArena = Arc<ExprArena>;
