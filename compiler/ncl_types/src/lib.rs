//! Ncl Types - structural types and the type alias resolver.
//!
//! Annotations arrive as `ParsedType` trees that may mention aliases by
//! name. Resolution interns them into a `TypePool`, replacing each alias
//! reference with a link to the alias definition that is in scope at the
//! annotation site:
//!
//! ```text
//! typealias T1 = {foo : Num, bar : Str} in
//! typealias T2 = {rec : T1, foobool : Bool} in
//! let x : T2 = ...            // T2 -> {rec : <T1>, foobool : Bool}
//! ```
//!
//! Aliases may be recursive as long as every cycle passes through a
//! structural constructor (`List`, record, dict, function). Unguarded
//! cycles such as `typealias A = A` are rejected up front.

mod error;
mod pool;
mod resolve;

pub use error::TypeError;
pub use pool::{TypeData, TypeId, TypePool};
pub use resolve::{resolve_annotations, AliasScope, ResolvedAnnotations, TypeResolver};
