//! Checker-time errors raised while resolving annotations.

use thiserror::Error;

/// Error found before evaluation starts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    /// An alias is referenced outside the `typealias ... in` scope that defines it.
    #[error("unbound type alias `{name}`")]
    UnboundAlias { name: String },

    /// Expanding an alias group never reaches a structural constructor.
    #[error("type alias cycle: {}", .cycle.join(" -> "))]
    AliasCycle { cycle: Vec<String> },

    /// A type variable is used outside any `forall` binding it.
    #[error("unbound type variable `{name}`")]
    UnboundTypeVariable { name: String },
}
