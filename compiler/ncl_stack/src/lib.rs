//! Stack safety for deeply recursive evaluation.
//!
//! Two complementary tools:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand, so long
//!   chains of nested forcing (a left fold over a long list, a deeply
//!   nested record) do not crash the process.
//! - [`DepthLimit`] bounds nesting explicitly, turning runaway recursion into
//!   an ordinary error instead of unbounded memory growth.

use std::cell::Cell;
use std::fmt;

/// Grow the stack when less than this remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; run `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Error returned when nesting exceeds the configured limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    pub limit: usize,
}

impl fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nesting depth exceeded (limit: {})", self.limit)
    }
}

impl std::error::Error for DepthExceeded {}

/// Single-threaded nesting counter.
///
/// Each [`DepthLimit::enter`] returns a guard; the depth drops back when the
/// guard is dropped, including on early `?` returns.
#[derive(Debug)]
pub struct DepthLimit {
    current: Cell<usize>,
    limit: usize,
}

impl DepthLimit {
    pub fn new(limit: usize) -> Self {
        Self {
            current: Cell::new(0),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn current(&self) -> usize {
        self.current.get()
    }

    /// Enter one more level of nesting.
    pub fn enter(&self) -> Result<DepthGuard<'_>, DepthExceeded> {
        let depth = self.current.get();
        if depth >= self.limit {
            return Err(DepthExceeded { limit: self.limit });
        }
        self.current.set(depth + 1);
        Ok(DepthGuard { owner: self })
    }
}

/// Decrements the owning [`DepthLimit`] on drop.
#[derive(Debug)]
pub struct DepthGuard<'a> {
    owner: &'a DepthLimit,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let depth = self.owner.current.get();
        self.owner.current.set(depth.saturating_sub(1));
    }
}
