//! Ncl IR - names, expressions and type annotations.
//!
//! This crate holds everything the evaluator consumes from the outside world:
//!
//! - `Name`: compact interned identifiers, produced by `StringInterner`
//! - `ExprArena`: flat storage for expressions (`ExprId`) and parsed type
//!   annotations (`ParsedTypeId`)
//! - `Builtin`: the reserved primitive operations and their arities
//! - `AstBuilder`: the construction API an external parser targets
//!
//! # Design Notes
//! - No `Box<Expr>`, children are referenced through `ExprId(u32)` indices
//! - Annotations stay unresolved here; alias expansion happens in `ncl_types`

mod ast;
mod builder;
mod builtin;
mod interner;
mod name;
mod parsed_type;

pub use ast::{AliasDef, BinaryOp, Expr, ExprArena, ExprId, RecordField, SharedArena, UnaryOp};
pub use builder::AstBuilder;
pub use builtin::Builtin;
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use parsed_type::{ParsedType, ParsedTypeId};
