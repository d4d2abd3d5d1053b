//! Arena of resolved structural types.

use std::fmt::Write as _;

use ncl_ir::{Name, StringInterner};

/// Index of a resolved type in a `TypePool`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A resolved type node.
#[derive(Clone, PartialEq, Debug)]
pub enum TypeData {
    Num,
    Str,
    Bool,
    Dyn,
    List(TypeId),
    /// Exact field set, in declaration order.
    Record(Vec<(Name, TypeId)>),
    Dict(TypeId),
    Function { param: TypeId, ret: TypeId },
    ForAll { var: Name, body: TypeId },
    /// A type variable; opaque to the checker.
    Var(Name),
    /// An alias slot. `target` is filled once the alias group is resolved.
    Alias { name: Name, target: Option<TypeId> },
}

/// Append-only storage for resolved types.
///
/// Recursive aliases are represented as cycles through `Alias` slots, so the
/// pool is a graph, not a tree.
#[derive(Clone, Default, Debug)]
pub struct TypePool {
    types: Vec<TypeData>,
}

impl TypePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    ///
    /// # Panics
    /// Panics if the pool exceeds `u32::MAX` nodes.
    pub fn push(&mut self, data: TypeData) -> TypeId {
        let id = u32::try_from(self.types.len())
            .unwrap_or_else(|_| panic!("type pool exceeded {} nodes", u32::MAX));
        self.types.push(data);
        TypeId(id)
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeData {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Point an alias slot at its definition.
    pub(crate) fn set_alias_target(&mut self, slot: TypeId, resolved: TypeId) {
        if let TypeData::Alias { target, .. } = &mut self.types[slot.index()] {
            *target = Some(resolved);
        }
    }

    /// Follow alias links to the first structural node.
    ///
    /// Unguarded alias cycles are rejected during resolution, so the walk
    /// terminates; the step bound only protects against pools assembled by
    /// hand.
    pub fn follow(&self, mut id: TypeId) -> TypeId {
        for _ in 0..=self.types.len() {
            match self.get(id) {
                TypeData::Alias {
                    target: Some(next), ..
                } => id = *next,
                _ => return id,
            }
        }
        id
    }

    /// Render a type for diagnostics.
    ///
    /// The outermost alias is expanded one level; nested aliases print by
    /// name so recursive types stay finite.
    pub fn display(&self, id: TypeId, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.write_type(&mut out, self.follow(id), interner, false);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, interner: &StringInterner, nested: bool) {
        match self.get(id) {
            TypeData::Num => out.push_str("Num"),
            TypeData::Str => out.push_str("Str"),
            TypeData::Bool => out.push_str("Bool"),
            TypeData::Dyn => out.push_str("Dyn"),
            TypeData::List(elem) => {
                if nested {
                    out.push('(');
                }
                out.push_str("List ");
                self.write_type(out, *elem, interner, true);
                if nested {
                    out.push(')');
                }
            }
            TypeData::Record(fields) => {
                out.push('{');
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{} : ", interner.lookup(*name));
                    self.write_type(out, *ty, interner, false);
                }
                out.push('}');
            }
            TypeData::Dict(elem) => {
                out.push_str("{_ : ");
                self.write_type(out, *elem, interner, false);
                out.push('}');
            }
            TypeData::Function { param, ret } => {
                if nested {
                    out.push('(');
                }
                self.write_type(out, *param, interner, true);
                out.push_str(" -> ");
                self.write_type(out, *ret, interner, false);
                if nested {
                    out.push(')');
                }
            }
            TypeData::ForAll { var, body } => {
                if nested {
                    out.push('(');
                }
                let _ = write!(out, "forall {}. ", interner.lookup(*var));
                self.write_type(out, *body, interner, false);
                if nested {
                    out.push(')');
                }
            }
            TypeData::Var(name) | TypeData::Alias { name, .. } => {
                out.push_str(interner.lookup(*name));
            }
        }
    }
}
