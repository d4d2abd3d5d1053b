#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use ncl_ir::{AstBuilder, BinaryOp, Builtin, ExprId};

use crate::errors::EvalErrorKind;
use crate::test_helpers::{eval, probe_env, program, strs};
use crate::{Env, Value};

/// `{ b = probe 1, a = 1 / 0, c = 3 }`: one counted field, one failing field.
fn guarded_record(b: &mut AstBuilder) -> ExprId {
    let one = b.int(1);
    let counted = b.call_named("probe", &[one]);
    let one = b.int(1);
    let zero = b.int(0);
    let failing = b.binary(BinaryOp::Div, one, zero);
    let three = b.int(3);
    b.record(&[("b", counted), ("a", failing), ("c", three)])
}

// Record reflection

#[test]
fn test_fields_of_is_sorted_and_lazy() {
    let p = program(|b| {
        let record = guarded_record(b);
        b.builtin(Builtin::FieldsOf, &[record])
    });
    let calls = Arc::new(AtomicUsize::new(0));
    let env = probe_env(&p, &calls);
    let names = p.eval_in(&env).unwrap();
    assert_eq!(strs(&names), vec!["a", "b", "c"]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_has_field_is_lazy() {
    for (name, expected) in [("a", true), ("b", true), ("missing", false)] {
        let p = program(|b| {
            let key = b.str(name);
            let record = guarded_record(b);
            b.builtin(Builtin::HasField, &[key, record])
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let env = probe_env(&p, &calls);
        assert_eq!(p.eval_in(&env).unwrap(), Value::Bool(expected));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn test_reflection_on_diverging_field() {
    // let r = { loop = (let spin = fun x => spin x in spin 0) } in %hasField% "loop" r
    let result = eval(|b| {
        let x = b.ident("x");
        let again = b.call_named("spin", &[x]);
        let spin = b.lambda("x", again);
        let zero = b.int(0);
        let start = b.call_named("spin", &[zero]);
        let diverge = b.let_in("spin", spin, start);
        let record = b.record(&[("loop", diverge)]);
        let key = b.str("loop");
        let r = b.ident("r");
        let query = b.builtin(Builtin::HasField, &[key, r]);
        b.let_in("r", record, query)
    });
    assert_eq!(result.unwrap(), Value::Bool(true));
}

#[test]
fn test_reflection_requires_a_record() {
    let err = eval(|b| {
        let list = b.list(&[]);
        b.builtin(Builtin::FieldsOf, &[list])
    })
    .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NotARecord {
            context: "fieldsOf",
            found: "List"
        }
    );

    let err = eval(|b| {
        let key = b.str("a");
        let n = b.int(1);
        b.builtin(Builtin::HasField, &[key, n])
    })
    .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NotARecord {
            context: "hasField",
            found: "Num"
        }
    );
}

#[test]
fn test_map_is_lazy_per_field() {
    // %map% (fun k v => probe v) { a = 1, b = 2 }
    let p = program(|b| {
        let v = b.ident("v");
        let body = b.call_named("probe", &[v]);
        let f = b.lambdas(&["k", "v"], body);
        let one = b.int(1);
        let two = b.int(2);
        let record = b.record(&[("a", one), ("b", two)]);
        b.builtin(Builtin::MapRec, &[f, record])
    });
    let calls = Arc::new(AtomicUsize::new(0));
    let env = probe_env(&p, &calls);
    let Value::Record(mapped) = p.eval_shallow_in(&env).unwrap() else {
        panic!("expected a record");
    };
    let names: Vec<&str> = mapped.names().map(|name| &**name).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let interp = p.interpreter();
    let a = interp.force(mapped.get("a").unwrap()).unwrap();
    assert_eq!(a, Value::Int(1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_map_passes_field_name() {
    // (%mapRec% (fun k v => k ++ "!") { x = 1 }).x
    let result = eval(|b| {
        let k = b.ident("k");
        let bang = b.str("!");
        let body = b.binary(BinaryOp::StrConcat, k, bang);
        let f = b.lambdas(&["k", "v"], body);
        let one = b.int(1);
        let record = b.record(&[("x", one)]);
        let mapped = b.builtin_named("mapRec", &[f, record]).unwrap();
        b.field(mapped, "x")
    });
    assert_eq!(result.unwrap(), Value::string("x!"));
}

// Lists

#[test]
fn test_head_and_tail() {
    let result = eval(|b| {
        let items: Vec<_> = (1..=3).map(|n| b.int(n)).collect();
        let list = b.list(&items);
        let rest = b.builtin(Builtin::Tail, &[list]);
        b.builtin(Builtin::Head, &[rest])
    });
    assert_eq!(result.unwrap(), Value::Int(2));
}

#[test]
fn test_empty_list_errors() {
    for op in [Builtin::Head, Builtin::Tail] {
        let err = eval(|b| {
            let list = b.list(&[]);
            b.builtin(op, &[list])
        })
        .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::EmptyList { builtin: op.name() });
    }
}

#[test]
fn test_length_does_not_force_elements() {
    let result = eval(|b| {
        let one = b.int(1);
        let zero = b.int(0);
        let boom = b.binary(BinaryOp::Div, one, zero);
        let two = b.int(2);
        let list = b.list(&[boom, two]);
        b.builtin(Builtin::Length, &[list])
    });
    assert_eq!(result.unwrap(), Value::Int(2));
}

#[test]
fn test_elem_at_bounds() {
    let err = eval(|b| {
        let n = b.int(3);
        let list = b.builtin(Builtin::Range, &[n]);
        let index = b.int(3);
        b.builtin(Builtin::ElemAt, &[list, index])
    })
    .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::IndexOutOfBounds {
            index: 3,
            length: 3
        }
    );

    let err = eval(|b| {
        let list = b.list(&[]);
        let index = b.int(-1);
        b.builtin(Builtin::ElemAt, &[list, index])
    })
    .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::IndexOutOfBounds {
            index: -1,
            length: 0
        }
    );
}

#[test]
fn test_range_domain() {
    for bad in [-1.0, 2.5] {
        let err = eval(|b| {
            let n = b.float(bad);
            b.builtin(Builtin::Range, &[n])
        })
        .unwrap_err();
        assert!(
            matches!(err.kind, EvalErrorKind::DomainError { builtin: "range", .. }),
            "{err}"
        );
    }

    let result = eval(|b| {
        let n = b.float(3.0);
        let list = b.builtin(Builtin::Range, &[n]);
        b.builtin(Builtin::Length, &[list])
    });
    assert_eq!(result.unwrap(), Value::Int(3));
}

#[test]
fn test_type_predicates() {
    let cases: [(Builtin, fn(&mut AstBuilder) -> ExprId, bool); 6] = [
        (Builtin::IsNum, |b| b.float(1.5), true),
        (Builtin::IsStr, |b| b.int(1), false),
        (Builtin::IsBool, |b| b.bool(true), true),
        (Builtin::IsList, |b| b.list(&[]), true),
        (Builtin::IsRecord, |b| b.record(&[]), true),
        (Builtin::IsFun, |b| {
            let x = b.ident("x");
            b.lambda("x", x)
        }, true),
    ];
    for (op, arg, expected) in cases {
        let result = eval(|b| {
            let arg = arg(b);
            b.builtin(op, &[arg])
        });
        assert_eq!(result.unwrap(), Value::Bool(expected), "{op}");
    }
}

#[test]
fn test_deep_seq_forces_nested_values() {
    // %deepSeq% { a = [1 / 0] } 1
    let err = eval(|b| {
        let one = b.int(1);
        let zero = b.int(0);
        let boom = b.binary(BinaryOp::Div, one, zero);
        let list = b.list(&[boom]);
        let record = b.record(&[("a", list)]);
        let one = b.int(1);
        b.builtin(Builtin::DeepSeq, &[record, one])
    })
    .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);

    // %seq% only reaches weak head normal form.
    let p = program(|b| {
        let one = b.int(1);
        let zero = b.int(0);
        let boom = b.binary(BinaryOp::Div, one, zero);
        let list = b.list(&[boom]);
        let one = b.int(1);
        b.builtin(Builtin::Seq, &[list, one])
    });
    assert_eq!(p.eval_shallow_in(&Env::new()).unwrap(), Value::Int(1));
}
