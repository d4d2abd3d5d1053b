//! Ncl driver.
//!
//! Ties the pipeline together for programs built through `AstBuilder`:
//!
//! ```text
//! AstBuilder -> Program -> resolve_annotations -> Interpreter -> Value
//! ```
//!
//! The bundled programs live in `demos`; the `nclc` binary lists, checks
//! and runs them.

pub mod demos;

use std::sync::{Arc, Once};

use ncl_eval::{Env, EvalConfig, EvalError, InterpreterBuilder, Value};
use ncl_ir::{AstBuilder, ExprArena, ExprId, SharedArena, SharedInterner, StringInterner};
use ncl_types::{resolve_annotations, ResolvedAnnotations, TypeError};
use thiserror::Error;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Does nothing unless `NCL_LOG` (or, failing that, `RUST_LOG`) holds a
/// valid filter. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let filter =
            EnvFilter::try_from_env("NCL_LOG").or_else(|_| EnvFilter::try_from_default_env());
        if let Ok(filter) = filter {
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        }
    });
}

/// Failure of a whole program run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RunError {
    /// Annotation resolution failed; nothing was evaluated.
    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

/// A complete program: its arena, root expression and names.
#[derive(Clone, Debug)]
pub struct Program {
    interner: SharedInterner,
    arena: SharedArena,
    root: ExprId,
}

impl Program {
    /// Build a program with a fresh interner.
    pub fn build(build: impl FnOnce(&mut AstBuilder) -> ExprId) -> Self {
        let interner = SharedInterner::new();
        let mut builder = AstBuilder::new(&interner);
        let root = build(&mut builder);
        Program {
            interner,
            arena: Arc::new(builder.finish()),
            root,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn root(&self) -> ExprId {
        self.root
    }
}

/// Resolve every annotation of `program`.
pub fn check_program(program: &Program) -> Result<ResolvedAnnotations, RunError> {
    Ok(resolve_annotations(
        program.arena(),
        program.root,
        program.interner(),
    )?)
}

/// Resolve and evaluate `program` in an empty environment.
#[tracing::instrument(level = "debug", skip_all, fields(root = program.root.index()))]
pub fn run_program(program: &Program, config: &EvalConfig) -> Result<Value, RunError> {
    let annotations = check_program(program)?;
    let interpreter = InterpreterBuilder::new(program.interner(), program.arena())
        .annotations(&annotations)
        .config(*config)
        .build();
    let value = interpreter.evaluate(program.root, &Env::new())?;
    tracing::debug!(result = value.type_name(), "program finished");
    Ok(value)
}
