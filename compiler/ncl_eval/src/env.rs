//! Lexical environments.
//!
//! An `Env` is an immutable linked list of frames; binding returns a new
//! environment that shares its tail with the old one, so closures capture
//! their scope in O(1).

use std::sync::Arc;

use ncl_ir::Name;

use crate::Thunk;

struct Frame {
    name: Name,
    value: Thunk,
    parent: Env,
}

/// Immutable variable environment.
#[derive(Clone, Default)]
pub struct Env(Option<Arc<Frame>>);

impl Env {
    pub fn new() -> Self {
        Env(None)
    }

    /// Extend with `name = value`, shadowing any outer binding.
    #[must_use]
    pub fn bind(&self, name: Name, value: Thunk) -> Env {
        Env(Some(Arc::new(Frame {
            name,
            value,
            parent: self.clone(),
        })))
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: Name) -> Option<Thunk> {
        let mut current = self.0.as_deref();
        while let Some(frame) = current {
            if frame.name == name {
                return Some(frame.value.clone());
            }
            current = frame.parent.0.as_deref();
        }
        None
    }

    pub fn contains(&self, name: Name) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of frames, shadowed ones included.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.0.as_deref();
        while let Some(frame) = current {
            depth += 1;
            current = frame.parent.0.as_deref();
        }
        depth
    }
}
