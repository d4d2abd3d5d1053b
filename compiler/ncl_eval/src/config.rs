//! Evaluator settings.

/// Default bound on nested evaluations before `StackOverflow` is reported.
pub const DEFAULT_MAX_DEPTH: usize = 100_000;

/// Knobs for one interpreter instance.
///
/// Numeric range is not configurable. Integer arithmetic stays in `i64` and
/// reports `IntegerOverflow` past it instead of rounding to a float: summing
/// `x * (x * x / 2)` over `0..n` fails from about `n = 93_000`. A float
/// operand anywhere in the chain avoids the limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum nesting of non-tail evaluations.
    pub max_depth: usize,
    /// Force results completely (elements and fields) before returning them.
    pub deep_force: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            deep_force: true,
        }
    }
}
