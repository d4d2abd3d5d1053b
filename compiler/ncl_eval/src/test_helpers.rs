//! Shared fixtures for unit tests.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ncl_ir::{AstBuilder, ExprArena, ExprId, SharedInterner};
use ncl_types::{resolve_annotations, ResolvedAnnotations};

use crate::{Env, EvalResult, Interpreter, InterpreterBuilder, Value};

/// A built and resolved program.
pub(crate) struct TestProgram {
    pub interner: SharedInterner,
    pub arena: ExprArena,
    pub root: ExprId,
    pub annotations: ResolvedAnnotations,
}

pub(crate) fn program(build: impl FnOnce(&mut AstBuilder) -> ExprId) -> TestProgram {
    let interner = SharedInterner::new();
    let mut b = AstBuilder::new(&interner);
    let root = build(&mut b);
    let arena = b.finish();
    let annotations = resolve_annotations(&arena, root, &interner).unwrap();
    TestProgram {
        interner,
        arena,
        root,
        annotations,
    }
}

impl TestProgram {
    pub fn interpreter(&self) -> Interpreter<'_> {
        InterpreterBuilder::new(&self.interner, &self.arena)
            .annotations(&self.annotations)
            .build()
    }

    /// Evaluate the root and force the result completely.
    pub fn eval(&self) -> EvalResult {
        self.interpreter().evaluate(self.root, &Env::new())
    }

    /// Evaluate the root in `env`, forcing only the outermost constructor.
    pub fn eval_shallow_in(&self, env: &Env) -> EvalResult {
        InterpreterBuilder::new(&self.interner, &self.arena)
            .annotations(&self.annotations)
            .deep_force(false)
            .build()
            .evaluate(self.root, env)
    }

    pub fn eval_in(&self, env: &Env) -> EvalResult {
        self.interpreter().evaluate(self.root, env)
    }

    pub fn name(&self, s: &str) -> ncl_ir::Name {
        self.interner.intern(s)
    }
}

/// Build, resolve and fully evaluate.
pub(crate) fn eval(build: impl FnOnce(&mut AstBuilder) -> ExprId) -> EvalResult {
    program(build).eval()
}

/// A host function returning its argument and counting its calls.
pub(crate) fn counting_identity(calls: &Arc<AtomicUsize>) -> Value {
    let calls = Arc::clone(calls);
    Value::native("probe", move |arg| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(arg)
    })
}

/// Environment binding `probe` to a counting identity.
pub(crate) fn probe_env(program: &TestProgram, calls: &Arc<AtomicUsize>) -> Env {
    Env::new().bind(
        program.name("probe"),
        crate::Thunk::ready(counting_identity(calls)),
    )
}

/// Integers of a fully forced list.
pub(crate) fn ints(value: &Value) -> Vec<i64> {
    let Value::List(list) = value else {
        panic!("expected a list, got {value}");
    };
    let (items, complete) = list.peek_items(usize::MAX);
    assert!(complete, "list was not fully forced");
    items
        .iter()
        .map(|item| match item.peek().unwrap() {
            Value::Int(n) => n,
            other => panic!("expected an integer, got {other}"),
        })
        .collect()
}

/// Strings of a fully forced list.
pub(crate) fn strs(value: &Value) -> Vec<String> {
    let Value::List(list) = value else {
        panic!("expected a list, got {value}");
    };
    let (items, _) = list.peek_items(usize::MAX);
    items
        .iter()
        .map(|item| match item.peek().unwrap() {
            Value::Str(s) => s.to_string(),
            other => panic!("expected a string, got {other}"),
        })
        .collect()
}
