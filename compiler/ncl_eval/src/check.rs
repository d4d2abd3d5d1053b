//! Annotation checking.
//!
//! `e : T` checks the value of `e` against the resolved type `T` when that
//! value is forced. Only the outermost shape is verified immediately; list
//! elements and record fields are wrapped in checking thunks, so a check
//! never forces more than the program itself demands and works on infinite
//! lists. Each wrapper extends the `TypePath` reported on mismatch.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use ncl_types::{TypeData, TypeId};

use crate::errors::{type_mismatch, unresolved_annotation, EvalResult};
use crate::thunk::Suspension;
use crate::value::{ListValue, RecordValue};
use crate::{Interpreter, Thunk, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
enum PathSegment {
    Field(Arc<str>),
    Index(usize),
}

/// Location of a checked value inside the annotated one.
///
/// Renders as `recrec.rec.bar` or `items[2].name`.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct TypePath(SmallVec<[PathSegment; 4]>);

impl TypePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn field(&self, name: &Arc<str>) -> Self {
        let mut path = self.clone();
        path.0.push(PathSegment::Field(name.clone()));
        path
    }

    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(PathSegment::Index(index));
        path
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<value>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Interpreter<'_> {
    /// Check `value` against `ty`, returning the (possibly wrapped) value.
    pub fn check(&self, value: Value, ty: TypeId) -> EvalResult {
        self.check_at(value, ty, &TypePath::root())
    }

    /// A function type only requires a callable value. Its domain and
    /// codomain are not checked, at the call or on the result.
    pub(crate) fn check_at(&self, value: Value, ty: TypeId, path: &TypePath) -> EvalResult {
        let pool = self.annotations().pool();
        let mut ty = pool.follow(ty);
        loop {
            match pool.get(ty) {
                // Type variables are opaque: a generic value is only checked
                // against its abstract shape.
                TypeData::Dyn | TypeData::Var(_) => return Ok(value),
                TypeData::ForAll { body, .. } => ty = pool.follow(*body),
                TypeData::Num if value.is_num() => return Ok(value),
                TypeData::Str if matches!(value, Value::Str(_)) => return Ok(value),
                TypeData::Bool if matches!(value, Value::Bool(_)) => return Ok(value),
                TypeData::Function { .. } if value.is_function() => return Ok(value),
                TypeData::List(elem) => {
                    return match value {
                        Value::List(list) => Ok(Value::List(checked_list(list, *elem, path))),
                        other => Err(self.mismatch(ty, other.type_name(), path)),
                    };
                }
                TypeData::Record(fields) => {
                    return match value {
                        Value::Record(record) => self.check_record(&record, fields, path),
                        other => Err(self.mismatch(ty, other.type_name(), path)),
                    };
                }
                TypeData::Dict(elem) => {
                    return match value {
                        Value::Record(record) => Ok(Value::Record(
                            record
                                .iter()
                                .map(|(name, field)| {
                                    let checked = self.wrap(field, *elem, path.field(name));
                                    (name.clone(), checked)
                                })
                                .collect(),
                        )),
                        other => Err(self.mismatch(ty, other.type_name(), path)),
                    };
                }
                TypeData::Alias { .. } => return Err(unresolved_annotation()),
                TypeData::Num | TypeData::Str | TypeData::Bool | TypeData::Function { .. } => {
                    return Err(self.mismatch(ty, value.type_name(), path));
                }
            }
        }
    }

    /// Exact field set now, field types on demand.
    fn check_record(
        &self,
        record: &RecordValue,
        fields: &[(ncl_ir::Name, TypeId)],
        path: &TypePath,
    ) -> EvalResult {
        let pool = self.annotations().pool();
        let mut checked = Vec::with_capacity(fields.len());
        for &(name, field_ty) in fields {
            let name: Arc<str> = Arc::from(self.interner().lookup(name));
            let Some(field) = record.get(&name) else {
                return Err(type_mismatch(
                    pool.display(field_ty, self.interner()),
                    "missing field",
                    path.field(&name).to_string(),
                ));
            };
            let thunk = self.wrap(field, field_ty, path.field(&name));
            checked.push((name, thunk));
        }
        if let Some(extra) = record
            .names()
            .find(|name| !checked.iter().any(|(expected, _)| expected == *name))
        {
            return Err(type_mismatch(
                "no such field".to_owned(),
                "unexpected field",
                path.field(extra).to_string(),
            ));
        }
        Ok(Value::Record(checked.into_iter().collect()))
    }

    /// Defer the check of `inner`; `Dyn` needs no wrapper.
    fn wrap(&self, inner: &Thunk, ty: TypeId, path: TypePath) -> Thunk {
        let pool = self.annotations().pool();
        match pool.get(pool.follow(ty)) {
            TypeData::Dyn | TypeData::Var(_) => inner.clone(),
            _ => Thunk::deferred_check(inner.clone(), ty, path),
        }
    }

    fn mismatch(&self, ty: TypeId, found: &'static str, path: &TypePath) -> crate::EvalError {
        type_mismatch(
            self.annotations().pool().display(ty, self.interner()),
            found,
            path.to_string(),
        )
    }

    /// Next cell of a checked list: the checked head and a suspended tail.
    pub(crate) fn check_list_cell(
        &self,
        source: &ListValue,
        elem: TypeId,
        path: TypePath,
        index: usize,
    ) -> EvalResult {
        let Some((head, rest)) = source.uncons(self)? else {
            return Ok(Value::List(ListValue::empty()));
        };
        let head = self.wrap(&head, elem, path.index(index));
        let tail = Thunk::deferred(Suspension::CheckList {
            source: rest,
            elem,
            path,
            index: index + 1,
        });
        Ok(Value::List(ListValue::concat(
            ListValue::from_thunks(vec![head]),
            tail,
        )))
    }
}

/// A list whose elements are checked against `elem` as they are produced.
fn checked_list(source: ListValue, elem: TypeId, path: &TypePath) -> ListValue {
    let cells = Thunk::deferred(Suspension::CheckList {
        source,
        elem,
        path: path.clone(),
        index: 0,
    });
    ListValue::concat(ListValue::empty(), cells)
}

#[cfg(test)]
mod tests;
