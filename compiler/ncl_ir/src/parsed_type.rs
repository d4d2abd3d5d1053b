//! Type annotations as written, before alias resolution.
//!
//! `ParsedType` keeps alias references by name (`Named`). The resolver in
//! `ncl_types` turns each annotation into a structural `TypeId` using the
//! alias scope that is active where the annotation appears.

use crate::Name;

/// Index of a `ParsedType` in an `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParsedTypeId(u32);

impl ParsedTypeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ParsedTypeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A parsed type expression.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParsedType {
    /// `Num`
    Num,
    /// `Str`
    Str,
    /// `Bool`
    Bool,
    /// `Dyn`, accepts any value.
    Dyn,
    /// `List T`
    List(ParsedTypeId),
    /// `{ foo : T, bar : U }`, an exact field set.
    Record(Vec<(Name, ParsedTypeId)>),
    /// `{ _ : T }`, any field set with uniform value type.
    Dict(ParsedTypeId),
    /// `T -> U`
    Function {
        param: ParsedTypeId,
        ret: ParsedTypeId,
    },
    /// `forall a. T`
    ForAll { var: Name, body: ParsedTypeId },
    /// A type variable bound by an enclosing `forall`.
    Var(Name),
    /// A reference to a type alias.
    Named(Name),
}

impl ParsedType {
    /// Whether this node is a structural constructor.
    ///
    /// Alias references below a constructor are guarded: expanding them
    /// lazily always makes progress.
    pub fn is_constructor(&self) -> bool {
        matches!(
            self,
            ParsedType::List(_)
                | ParsedType::Record(_)
                | ParsedType::Dict(_)
                | ParsedType::Function { .. }
        )
    }
}
