#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use ncl_ir::{AstBuilder, BinaryOp, Builtin, ExprId};

use super::TypePath;
use crate::errors::EvalErrorKind;
use crate::test_helpers::{eval, ints, program};
use crate::{Env, Value};

fn mismatch(expected: &str, found: &str, path: &str) -> EvalErrorKind {
    EvalErrorKind::TypeMismatch {
        expected: expected.to_owned(),
        found: found.to_owned(),
        path: path.to_owned(),
    }
}

/// ```text
/// typealias T1 = {foo : Num, bar : Str} in
/// typealias T2 = {rec : T1, foobool : Bool} in
/// typealias T3 = {recrec : T2, rec : T1, foo : Num} in body
/// ```
fn with_aliases(b: &mut AstBuilder, body: ExprId) -> ExprId {
    let num = b.ty_num();
    let string = b.ty_str();
    let t1 = b.ty_record(&[("foo", num), ("bar", string)]);

    let t1_ref = b.ty_alias("T1");
    let boolean = b.ty_bool();
    let t2 = b.ty_record(&[("rec", t1_ref), ("foobool", boolean)]);

    let t2_ref = b.ty_alias("T2");
    let t1_ref = b.ty_alias("T1");
    let num = b.ty_num();
    let t3 = b.ty_record(&[("recrec", t2_ref), ("rec", t1_ref), ("foo", num)]);

    let body = b.typealias("T3", t3, body);
    let body = b.typealias("T2", t2, body);
    b.typealias("T1", t1, body)
}

/// `{ foo = 1, bar = "b" }`, optionally without `bar`.
fn t1_value(b: &mut AstBuilder, with_bar: bool) -> ExprId {
    let foo = b.int(1);
    if with_bar {
        let bar = b.str("b");
        b.record(&[("foo", foo), ("bar", bar)])
    } else {
        b.record(&[("foo", foo)])
    }
}

fn t3_value(b: &mut AstBuilder, inner_bar: bool) -> ExprId {
    let inner = t1_value(b, inner_bar);
    let yes = b.bool(true);
    let recrec = b.record(&[("rec", inner), ("foobool", yes)]);
    let rec = t1_value(b, true);
    let foo = b.int(3);
    b.record(&[("recrec", recrec), ("rec", rec), ("foo", foo)])
}

#[test]
fn test_path_display() {
    let root = TypePath::root();
    assert_eq!(root.to_string(), "<value>");
    let path = root.field(&"recrec".into()).field(&"rec".into()).index(2);
    assert_eq!(path.to_string(), "recrec.rec[2]");
    assert!(!path.is_root());
}

#[test]
fn test_scalar_mismatch_at_root() {
    let err = eval(|b| {
        let one = b.int(1);
        let ty = b.ty_str();
        b.ascribe(one, ty)
    })
    .unwrap_err();
    assert_eq!(err.kind, mismatch("Str", "Num", "<value>"));
}

#[test]
fn test_nested_aliases_accept_conforming_value() {
    // let x : T3 = ... in x.recrec.rec.foo + x.foo
    let result = eval(|b| {
        let value = t3_value(b, true);
        let ty = b.ty_alias("T3");
        let x1 = b.ident("x");
        let deep = b.field_path(x1, &["recrec", "rec", "foo"]);
        let x2 = b.ident("x");
        let top = b.field(x2, "foo");
        let sum = b.binary(BinaryOp::Add, deep, top);
        let body = b.let_typed("x", ty, value, sum);
        with_aliases(b, body)
    });
    assert_eq!(result.unwrap(), Value::Int(4));
}

#[test]
fn test_nested_aliases_report_full_path() {
    let err = eval(|b| {
        let value = t3_value(b, false);
        let ty = b.ty_alias("T3");
        let body = b.ascribe(value, ty);
        with_aliases(b, body)
    })
    .unwrap_err();
    assert_eq!(err.kind, mismatch("Str", "missing field", "recrec.rec.bar"));
}

#[test]
fn test_unforced_fields_are_not_checked() {
    // (x : T3).rec.foo succeeds although recrec.rec lacks `bar`.
    let result = eval(|b| {
        let value = t3_value(b, false);
        let ty = b.ty_alias("T3");
        let checked = b.ascribe(value, ty);
        let body = b.field_path(checked, &["rec", "foo"]);
        with_aliases(b, body)
    });
    assert_eq!(result.unwrap(), Value::Int(1));
}

#[test]
fn test_unexpected_field() {
    let err = eval(|b| {
        let one = b.int(1);
        let two = b.int(2);
        let record = b.record(&[("foo", one), ("baz", two)]);
        let num = b.ty_num();
        let ty = b.ty_record(&[("foo", num)]);
        b.ascribe(record, ty)
    })
    .unwrap_err();
    assert_eq!(err.kind, mismatch("no such field", "unexpected field", "baz"));
}

#[test]
fn test_list_elements_checked_on_demand() {
    let p = program(|b| {
        let one = b.int(1);
        let word = b.str("a");
        let list = b.list(&[one, word]);
        let num = b.ty_num();
        let ty = b.ty_list(num);
        b.ascribe(list, ty)
    });
    let shallow = p.eval_shallow_in(&Env::new()).unwrap();
    assert_eq!(shallow.type_name(), "List");

    let err = p.eval().unwrap_err();
    assert_eq!(err.kind, mismatch("Num", "Str", "[1]"));
}

#[test]
fn test_checked_infinite_list() {
    // let ones = [1] @ ones in %elemAt% (ones : List Num) 3
    let result = eval(|b| {
        let one = b.int(1);
        let cell = b.list(&[one]);
        let rest = b.ident("ones");
        let ones = b.binary(BinaryOp::ListConcat, cell, rest);
        let num = b.ty_num();
        let ty = b.ty_list(num);
        let r = b.ident("ones");
        let checked = b.ascribe(r, ty);
        let index = b.int(3);
        let body = b.builtin(Builtin::ElemAt, &[checked, index]);
        b.let_in("ones", ones, body)
    });
    assert_eq!(result.unwrap(), Value::Int(1));
}

#[test]
fn test_checked_list_traversed_twice() {
    // let xs = [1, 2, 3] : List Num in %length% xs + %head% xs, then xs itself
    let p = program(|b| {
        let items: Vec<_> = (1..=3).map(|n| b.int(n)).collect();
        let list = b.list(&items);
        let num = b.ty_num();
        let ty = b.ty_list(num);
        let checked = b.ascribe(list, ty);
        let xs = b.ident("xs");
        let len = b.builtin(Builtin::Length, &[xs]);
        let xs = b.ident("xs");
        let both = b.builtin(Builtin::Seq, &[len, xs]);
        b.let_in("xs", checked, both)
    });
    assert_eq!(ints(&p.eval().unwrap()), vec![1, 2, 3]);
}

#[test]
fn test_forall_function_annotation() {
    // ((fun x => x) : forall a. a -> a) 5
    let result = eval(|b| {
        let x = b.ident("x");
        let id = b.lambda("x", x);
        let a = b.ty_var("a");
        let a2 = b.ty_var("a");
        let arrow = b.ty_fn(a, a2);
        let ty = b.ty_forall(&["a"], arrow);
        let checked = b.ascribe(id, ty);
        let five = b.int(5);
        b.apply(checked, five)
    });
    assert_eq!(result.unwrap(), Value::Int(5));

    let err = eval(|b| {
        let one = b.int(1);
        let a = b.ty_var("a");
        let a2 = b.ty_var("a");
        let arrow = b.ty_fn(a, a2);
        let ty = b.ty_forall(&["a"], arrow);
        b.ascribe(one, ty)
    })
    .unwrap_err();
    assert_eq!(err.kind, mismatch("a -> a", "Num", "<value>"));
}

#[test]
fn test_function_type_checks_only_callability() {
    // let f : Num -> Num = fun x => "s" in f 1
    let result = eval(|b| {
        let s = b.str("s");
        let f = b.lambda("x", s);
        let num = b.ty_num();
        let num2 = b.ty_num();
        let ty = b.ty_fn(num, num2);
        let one = b.int(1);
        let call = b.call_named("f", &[one]);
        b.let_typed("f", ty, f, call)
    });
    assert_eq!(result.unwrap(), Value::string("s"));
}

#[test]
fn test_builtins_satisfy_function_types() {
    let result = eval(|b| {
        let head = b.builtin(Builtin::Head, &[]);
        let elem = b.ty_var("a");
        let list = b.ty_list(elem);
        let ret = b.ty_var("a");
        let arrow = b.ty_fn(list, ret);
        let ty = b.ty_forall(&["a"], arrow);
        let checked = b.ascribe(head, ty);
        let seven = b.int(7);
        let arg = b.list(&[seven]);
        b.apply(checked, arg)
    });
    assert_eq!(result.unwrap(), Value::Int(7));
}

#[test]
fn test_dyn_accepts_anything() {
    let result = eval(|b| {
        let word = b.str("anything");
        let one = b.int(1);
        let list = b.list(&[word, one]);
        let ty = b.ty_dyn();
        let checked = b.ascribe(list, ty);
        b.builtin(Builtin::Length, &[checked])
    });
    assert_eq!(result.unwrap(), Value::Int(2));
}

#[test]
fn test_dict_checks_every_forced_field() {
    let p = program(|b| {
        let one = b.int(1);
        let word = b.str("x");
        let record = b.record(&[("a", one), ("b", word)]);
        let num = b.ty_num();
        let ty = b.ty_dict(num);
        b.ascribe(record, ty)
    });
    assert!(p.eval_shallow_in(&Env::new()).is_ok());
    assert_eq!(p.eval().unwrap_err().kind, mismatch("Num", "Str", "b"));
}

#[test]
fn test_annotated_record_field() {
    // { a : Num = "x", b = 1 }
    let build = |b: &mut AstBuilder, field: &str| {
        let word = b.str("x");
        let one = b.int(1);
        let num = b.ty_num();
        let record = b.record_typed(&[("a", Some(num), word), ("b", None, one)]);
        b.field(record, field)
    };
    assert_eq!(eval(|b| build(b, "b")).unwrap(), Value::Int(1));
    assert_eq!(
        eval(|b| build(b, "a")).unwrap_err().kind,
        mismatch("Num", "Str", "a")
    );
}

#[test]
fn test_annotated_binding_checked_when_used() {
    // let x : Num = "s" in body
    let build = |b: &mut AstBuilder, use_it: bool| {
        let word = b.str("s");
        let num = b.ty_num();
        let body = if use_it { b.ident("x") } else { b.int(0) };
        b.let_typed("x", num, word, body)
    };
    assert_eq!(eval(|b| build(b, false)).unwrap(), Value::Int(0));
    assert_eq!(
        eval(|b| build(b, true)).unwrap_err().kind,
        mismatch("Num", "Str", "<value>")
    );
}
