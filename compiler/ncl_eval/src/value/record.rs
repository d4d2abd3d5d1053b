//! Record values.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Thunk;

/// An immutable record: field names mapped to lazily evaluated fields.
///
/// Fields are kept sorted by name, which fixes the order `fieldsOf`
/// reports and makes structural comparison a single merge walk.
#[derive(Clone, Default)]
pub struct RecordValue(Arc<BTreeMap<Arc<str>, Thunk>>);

impl RecordValue {
    pub fn new(fields: BTreeMap<Arc<str>, Thunk>) -> Self {
        RecordValue(Arc::new(fields))
    }

    pub fn get(&self, name: &str) -> Option<&Thunk> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Thunk)> {
        self.0.iter()
    }

    pub fn thunks(&self) -> impl Iterator<Item = &Thunk> {
        self.0.values()
    }
}

impl FromIterator<(Arc<str>, Thunk)> for RecordValue {
    fn from_iter<I: IntoIterator<Item = (Arc<str>, Thunk)>>(iter: I) -> Self {
        RecordValue::new(iter.into_iter().collect())
    }
}
