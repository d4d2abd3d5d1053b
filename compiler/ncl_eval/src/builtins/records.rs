//! Record reflection.
//!
//! None of these force a field value: `fieldsOf` and `hasField` only read
//! the key set, and `map` wraps each field in a deferred application.

use smallvec::smallvec;

use crate::value::{ListValue, RecordValue};
use crate::{Thunk, Value};

/// Field names, in sorted order.
pub fn fields_of(record: &RecordValue) -> ListValue {
    ListValue::from_values(record.names().map(|name| Value::Str(name.clone())))
}

pub fn has_field(record: &RecordValue, name: &str) -> bool {
    record.contains(name)
}

/// Same field set; field `k` becomes the suspended application `f k v`.
pub fn map_fields(f: &Thunk, record: &RecordValue) -> RecordValue {
    record
        .iter()
        .map(|(name, value)| {
            let key = Thunk::ready(Value::Str(name.clone()));
            let mapped = Thunk::deferred_apply(f.clone(), smallvec![key, value.clone()]);
            (name.clone(), mapped)
        })
        .collect()
}
