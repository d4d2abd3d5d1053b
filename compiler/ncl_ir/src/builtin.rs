//! Reserved primitive operations.

use std::fmt;

/// A primitive implemented by the evaluator itself.
///
/// Builtins are invoked through reserved syntax (`%name% args...`) and are
/// curried: supplying fewer arguments than `arity()` yields a partial
/// application.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    /// `map : (Str -> a -> b) -> Record<a> -> Record<b>`, also reachable as `mapRec`.
    MapRec,
    /// `fieldsOf : Dyn -> List Str`
    FieldsOf,
    /// `hasField : Str -> Dyn -> Bool`
    HasField,
    Head,
    Tail,
    Length,
    ElemAt,
    /// `range : Num -> List Num`, the lazy sequence `[0, n)`.
    Range,
    /// Force the first argument to weak head normal form, return the second.
    Seq,
    /// Force the first argument completely, return the second.
    DeepSeq,
    IsNum,
    IsStr,
    IsBool,
    IsList,
    IsRecord,
    IsFun,
}

impl Builtin {
    pub const ALL: [Builtin; 16] = [
        Builtin::MapRec,
        Builtin::FieldsOf,
        Builtin::HasField,
        Builtin::Head,
        Builtin::Tail,
        Builtin::Length,
        Builtin::ElemAt,
        Builtin::Range,
        Builtin::Seq,
        Builtin::DeepSeq,
        Builtin::IsNum,
        Builtin::IsStr,
        Builtin::IsBool,
        Builtin::IsList,
        Builtin::IsRecord,
        Builtin::IsFun,
    ];

    /// Resolve a reserved name. `map` and `mapRec` denote the same primitive.
    pub fn from_name(name: &str) -> Option<Builtin> {
        let op = match name {
            "map" | "mapRec" => Builtin::MapRec,
            "fieldsOf" => Builtin::FieldsOf,
            "hasField" => Builtin::HasField,
            "head" => Builtin::Head,
            "tail" => Builtin::Tail,
            "length" => Builtin::Length,
            "elemAt" => Builtin::ElemAt,
            "range" => Builtin::Range,
            "seq" => Builtin::Seq,
            "deepSeq" => Builtin::DeepSeq,
            "isNum" => Builtin::IsNum,
            "isStr" => Builtin::IsStr,
            "isBool" => Builtin::IsBool,
            "isList" => Builtin::IsList,
            "isRecord" => Builtin::IsRecord,
            "isFun" => Builtin::IsFun,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical reserved name.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::MapRec => "map",
            Builtin::FieldsOf => "fieldsOf",
            Builtin::HasField => "hasField",
            Builtin::Head => "head",
            Builtin::Tail => "tail",
            Builtin::Length => "length",
            Builtin::ElemAt => "elemAt",
            Builtin::Range => "range",
            Builtin::Seq => "seq",
            Builtin::DeepSeq => "deepSeq",
            Builtin::IsNum => "isNum",
            Builtin::IsStr => "isStr",
            Builtin::IsBool => "isBool",
            Builtin::IsList => "isList",
            Builtin::IsRecord => "isRecord",
            Builtin::IsFun => "isFun",
        }
    }

    /// Number of arguments needed before the primitive runs.
    pub fn arity(self) -> usize {
        match self {
            Builtin::MapRec
            | Builtin::HasField
            | Builtin::ElemAt
            | Builtin::Seq
            | Builtin::DeepSeq => 2,
            Builtin::FieldsOf
            | Builtin::Head
            | Builtin::Tail
            | Builtin::Length
            | Builtin::Range
            | Builtin::IsNum
            | Builtin::IsStr
            | Builtin::IsBool
            | Builtin::IsList
            | Builtin::IsRecord
            | Builtin::IsFun => 1,
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}%", self.name())
    }
}
