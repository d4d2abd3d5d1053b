#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use ncl_ir::{AstBuilder, BinaryOp, Builtin, ExprId};

use super::{member, with_prelude};
use crate::errors::EvalErrorKind;
use crate::test_helpers::{eval, ints, probe_env, program};
use crate::Value;

fn identity(b: &mut AstBuilder) -> ExprId {
    let x = b.ident("x");
    b.lambda("x", x)
}

/// `fun a b => a <op> b`
fn operator(b: &mut AstBuilder, op: BinaryOp) -> ExprId {
    let a = b.ident("a");
    let y = b.ident("b");
    let body = b.binary(op, a, y);
    b.lambdas(&["a", "b"], body)
}

fn int_list(b: &mut AstBuilder, values: &[i64]) -> ExprId {
    let items: Vec<_> = values.iter().map(|&n| b.int(n)).collect();
    b.list(&items)
}

/// `lists.generate f n`
fn generate(b: &mut AstBuilder, f: ExprId, n: i64) -> ExprId {
    let generate = member(b, "generate");
    let n = b.int(n);
    b.call(generate, &[f, n])
}

/// `fun x => x * x / 2`
fn half_square(b: &mut AstBuilder) -> ExprId {
    let x1 = b.ident("x");
    let x2 = b.ident("x");
    let square = b.binary(BinaryOp::Mul, x1, x2);
    let two = b.int(2);
    let body = b.binary(BinaryOp::Div, square, two);
    b.lambda("x", body)
}

/// ```text
/// let run = fun n =>
///   let left = lists.generate (fun x => x) n in
///   let right = lists.generate (fun x => x * x / 2) n in
///   let prod = lists.map2 (fun a b => a * b) left right in
///   lists.foldl (fun a b => a + b) 0 prod
/// in run <n>
/// ```
fn run(b: &mut AstBuilder, n: i64) -> ExprId {
    let plus = operator(b, BinaryOp::Add);
    let zero = b.int(0);
    let prod = b.ident("prod");
    let foldl = member(b, "foldl");
    let fold = b.call(foldl, &[plus, zero, prod]);

    let times = operator(b, BinaryOp::Mul);
    let left = b.ident("left");
    let right = b.ident("right");
    let map2 = member(b, "map2");
    let zipped = b.call(map2, &[times, left, right]);
    let body = b.let_in("prod", zipped, fold);

    let generate = member(b, "generate");
    let f = half_square(b);
    let arg = b.ident("n");
    let rights = b.call(generate, &[f, arg]);
    let body = b.let_in("right", rights, body);

    let generate = member(b, "generate");
    let f = identity(b);
    let arg = b.ident("n");
    let lefts = b.call(generate, &[f, arg]);
    let body = b.let_in("left", lefts, body);

    let run = b.lambda("n", body);
    let n = b.int(n);
    let call = b.call_named("run", &[n]);
    b.let_in("run", run, call)
}

#[test]
fn test_generate() {
    let result = eval(|b| {
        let f = half_square(b);
        let body = generate(b, f, 4);
        with_prelude(b, body)
    });
    assert_eq!(ints(&result.unwrap()), vec![0, 0, 2, 4]);
}

#[test]
fn test_generate_zero_is_empty() {
    let result = eval(|b| {
        let f = identity(b);
        let body = generate(b, f, 0);
        with_prelude(b, body)
    });
    assert_eq!(ints(&result.unwrap()), Vec::<i64>::new());
}

#[test]
fn test_generate_rejects_negative_count() {
    let err = eval(|b| {
        let f = identity(b);
        let body = generate(b, f, -1);
        with_prelude(b, body)
    })
    .unwrap_err();
    assert!(
        matches!(err.kind, EvalErrorKind::DomainError { builtin: "range", .. }),
        "{err}"
    );
}

#[test]
fn test_generate_only_computes_demanded_elements() {
    // %elemAt% (lists.generate probe 3) 1
    let p = program(|b| {
        let f = b.ident("probe");
        let list = generate(b, f, 3);
        let index = b.int(1);
        let body = b.builtin(Builtin::ElemAt, &[list, index]);
        with_prelude(b, body)
    });
    let calls = Arc::new(AtomicUsize::new(0));
    let env = probe_env(&p, &calls);
    assert_eq!(p.eval_in(&env).unwrap(), Value::Int(1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // %length% never looks at the elements.
    let p = program(|b| {
        let f = b.ident("probe");
        let list = generate(b, f, 3);
        let body = b.builtin(Builtin::Length, &[list]);
        with_prelude(b, body)
    });
    let calls = Arc::new(AtomicUsize::new(0));
    let env = probe_env(&p, &calls);
    assert_eq!(p.eval_in(&env).unwrap(), Value::Int(3));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_map2_stops_at_shorter_list() {
    let result = eval(|b| {
        let plus = operator(b, BinaryOp::Add);
        let xs = int_list(b, &[1, 2, 3]);
        let ys = int_list(b, &[10, 20]);
        let map2 = member(b, "map2");
        let body = b.call(map2, &[plus, xs, ys]);
        with_prelude(b, body)
    });
    assert_eq!(ints(&result.unwrap()), vec![11, 22]);
}

#[test]
fn test_map_preserves_order() {
    let result = eval(|b| {
        let x = b.ident("x");
        let one = b.int(1);
        let body = b.binary(BinaryOp::Sub, x, one);
        let f = b.lambda("x", body);
        let xs = int_list(b, &[5, 3, 9]);
        let map = member(b, "map");
        let body = b.call(map, &[f, xs]);
        with_prelude(b, body)
    });
    assert_eq!(ints(&result.unwrap()), vec![4, 2, 8]);
}

#[test]
fn test_foldl_is_left_associative() {
    // foldl (-) 10 [1, 2, 3] = ((10 - 1) - 2) - 3
    let result = eval(|b| {
        let minus = operator(b, BinaryOp::Sub);
        let ten = b.int(10);
        let xs = int_list(b, &[1, 2, 3]);
        let foldl = member(b, "foldl");
        let body = b.call(foldl, &[minus, ten, xs]);
        with_prelude(b, body)
    });
    assert_eq!(result.unwrap(), Value::Int(4));
}

#[test]
fn test_run_end_to_end() {
    let result = eval(|b| {
        let body = run(b, 4);
        with_prelude(b, body)
    });
    assert_eq!(result.unwrap(), Value::Int(16));
}

#[test]
fn test_long_lists_run_in_constant_stack() {
    // lists.foldl (+) 0 (lists.generate (fun x => x) 100000)
    let result = eval(|b| {
        let f = identity(b);
        let xs = generate(b, f, 100_000);
        let plus = operator(b, BinaryOp::Add);
        let zero = b.int(0);
        let foldl = member(b, "foldl");
        let body = b.call(foldl, &[plus, zero, xs]);
        with_prelude(b, body)
    });
    assert_eq!(result.unwrap(), Value::Int(4_999_950_000));
}

#[test]
fn test_map2_long_lists_run_in_constant_stack() {
    // %length% (lists.map2 (+) (lists.generate id 300000) (lists.generate id 300000))
    let result = eval(|b| {
        let plus = operator(b, BinaryOp::Add);
        let f = identity(b);
        let xs = generate(b, f, 300_000);
        let f = identity(b);
        let ys = generate(b, f, 300_000);
        let map2 = member(b, "map2");
        let zipped = b.call(map2, &[plus, xs, ys]);
        let body = b.builtin(Builtin::Length, &[zipped]);
        with_prelude(b, body)
    });
    assert_eq!(result.unwrap(), Value::Int(300_000));

    let result = eval(|b| {
        let body = run(b, 30_000);
        with_prelude(b, body)
    });
    assert_eq!(result.unwrap(), Value::Int(101_243_250_000_000_000));
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    /// `fun x => x * 3 + 1`
    fn affine(b: &mut AstBuilder) -> ExprId {
        let x = b.ident("x");
        let three = b.int(3);
        let scaled = b.binary(BinaryOp::Mul, x, three);
        let one = b.int(1);
        let body = b.binary(BinaryOp::Add, scaled, one);
        b.lambda("x", body)
    }

    proptest! {
        #[test]
        fn generate_matches_direct_computation(n in 0i64..64) {
            let result = eval(|b| {
                let f = affine(b);
                let body = generate(b, f, n);
                with_prelude(b, body)
            });
            let expected: Vec<i64> = (0..n).map(|i| i * 3 + 1).collect();
            prop_assert_eq!(ints(&result.unwrap()), expected);
        }

        #[test]
        fn map2_length_is_shorter_length(
            xs in proptest::collection::vec(-100i64..100, 0..24),
            ys in proptest::collection::vec(-100i64..100, 0..24),
        ) {
            let result = eval(|b| {
                let times = operator(b, BinaryOp::Mul);
                let left = int_list(b, &xs);
                let right = int_list(b, &ys);
                let map2 = member(b, "map2");
                let body = b.call(map2, &[times, left, right]);
                with_prelude(b, body)
            });
            let expected: Vec<i64> = xs.iter().zip(&ys).map(|(x, y)| x * y).collect();
            prop_assert_eq!(ints(&result.unwrap()), expected);
        }
    }
}
