//! `InterpreterBuilder` for creating `Interpreter` instances.

use std::borrow::Cow;

use ncl_ir::{ExprArena, StringInterner};
use ncl_stack::DepthLimit;
use ncl_types::ResolvedAnnotations;

use super::Interpreter;
use crate::EvalConfig;

/// Builder for `Interpreter`.
///
/// Programs containing annotations must pass the output of
/// `ncl_types::resolve_annotations` through `annotations`; evaluating an
/// annotation that was never resolved fails with `UnresolvedAnnotation`.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    annotations: Option<&'a ResolvedAnnotations>,
    config: EvalConfig,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        Self {
            interner,
            arena,
            annotations: None,
            config: EvalConfig::default(),
        }
    }

    /// Resolved annotation types for the arena.
    #[must_use]
    pub fn annotations(mut self, annotations: &'a ResolvedAnnotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Replace all settings at once.
    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Maximum nesting of non-tail evaluations.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Force `evaluate` results completely.
    #[must_use]
    pub fn deep_force(mut self, deep_force: bool) -> Self {
        self.config.deep_force = deep_force;
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        Interpreter {
            interner: self.interner,
            arena: self.arena,
            annotations: self
                .annotations
                .map_or_else(|| Cow::Owned(ResolvedAnnotations::default()), Cow::Borrowed),
            depth: DepthLimit::new(self.config.max_depth),
            config: self.config,
        }
    }
}
