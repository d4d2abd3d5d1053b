//! Bundled example programs.
//!
//! Each demo is built through `AstBuilder`; the comment above each builder
//! shows the program in surface syntax.

use ncl_eval::prelude::with_prelude;
use ncl_ir::{AstBuilder, BinaryOp, Builtin, ExprId, ParsedTypeId};

use crate::Program;

/// A named program shipped with the driver.
pub struct Demo {
    pub name: &'static str,
    pub summary: &'static str,
    build: fn(&mut AstBuilder) -> ExprId,
}

impl Demo {
    pub fn program(&self) -> Program {
        Program::build(self.build)
    }
}

pub const DEMOS: &[Demo] = &[
    Demo {
        name: "generic-fold",
        summary: "generate, map2 and foldl over two generated lists",
        build: generic_fold,
    },
    Demo {
        name: "record-aliases",
        summary: "a record checked against nested recursive aliases",
        build: record_aliases,
    },
    Demo {
        name: "missing-field",
        summary: "a nested record lacking a field its alias requires",
        build: missing_field,
    },
    Demo {
        name: "record-reflection",
        summary: "fieldsOf, hasField and map on records",
        build: record_reflection,
    },
    Demo {
        name: "forall-map",
        summary: "generic function annotations and a dictionary type",
        build: forall_map,
    },
    Demo {
        name: "alias-scope-error",
        summary: "an alias used outside its typealias scope",
        build: alias_scope_error,
    },
];

pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|demo| demo.name == name)
}

/// `fun a b => a <op> b`
fn operator(b: &mut AstBuilder, op: BinaryOp) -> ExprId {
    let left = b.ident("a");
    let right = b.ident("b");
    let body = b.binary(op, left, right);
    b.lambdas(&["a", "b"], body)
}

/// `lists.<name> args...`
fn lists_call(b: &mut AstBuilder, name: &str, args: &[ExprId]) -> ExprId {
    let lists = b.ident(ncl_eval::prelude::PRELUDE_NAME);
    let func = b.field(lists, name);
    b.call(func, args)
}

/// `forall a b c. (a -> b -> c) -> List a -> List b -> List c`
fn zip_with_type(b: &mut AstBuilder) -> ParsedTypeId {
    let (a, bv, c) = (b.ty_var("a"), b.ty_var("b"), b.ty_var("c"));
    let combine = b.ty_fns(&[a, bv], c);
    let (a, bv, c) = (b.ty_var("a"), b.ty_var("b"), b.ty_var("c"));
    let (xs, ys, zs) = (b.ty_list(a), b.ty_list(bv), b.ty_list(c));
    let signature = b.ty_fns(&[combine, xs, ys], zs);
    b.ty_forall(&["a", "b", "c"], signature)
}

/// ```text
/// let zip : forall a b c. (a -> b -> c) -> List a -> List b -> List c = lists.map2 in
/// let run : Num -> Num = fun n =>
///   let left = lists.generate (fun x => x) n in
///   let right = lists.generate (fun x => x * x / 2) n in
///   let prod = zip (fun a b => a * b) left right in
///   lists.foldl (fun a b => a + b) 0 prod
/// in run 4
/// ```
fn generic_fold(b: &mut AstBuilder) -> ExprId {
    let plus = operator(b, BinaryOp::Add);
    let zero = b.int(0);
    let prod = b.ident("prod");
    let total = lists_call(b, "foldl", &[plus, zero, prod]);

    let times = operator(b, BinaryOp::Mul);
    let left = b.ident("left");
    let right = b.ident("right");
    let zipped = b.call_named("zip", &[times, left, right]);
    let body = b.let_in("prod", zipped, total);

    let x1 = b.ident("x");
    let x2 = b.ident("x");
    let square = b.binary(BinaryOp::Mul, x1, x2);
    let two = b.int(2);
    let half = b.binary(BinaryOp::Div, square, two);
    let half_square = b.lambda("x", half);
    let n = b.ident("n");
    let rights = lists_call(b, "generate", &[half_square, n]);
    let body = b.let_in("right", rights, body);

    let x = b.ident("x");
    let identity = b.lambda("x", x);
    let n = b.ident("n");
    let lefts = lists_call(b, "generate", &[identity, n]);
    let body = b.let_in("left", lefts, body);

    let run = b.lambda("n", body);
    let num = b.ty_num();
    let num2 = b.ty_num();
    let run_ty = b.ty_fn(num, num2);
    let four = b.int(4);
    let call = b.call_named("run", &[four]);
    let body = b.let_typed("run", run_ty, run, call);

    let zip_ty = zip_with_type(b);
    let lists = b.ident(ncl_eval::prelude::PRELUDE_NAME);
    let map2 = b.field(lists, "map2");
    let body = b.let_typed("zip", zip_ty, map2, body);
    with_prelude(b, body)
}

/// ```text
/// typealias T1 = {foo : Num, bar : Str} in
/// typealias T2 = {rec : T1, foobool : Bool} in
/// typealias T3 = {recrec : T2, rec : T1, foo : Num} in body
/// ```
fn with_record_aliases(b: &mut AstBuilder, body: ExprId) -> ExprId {
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

/// `{ foo = <foo>, bar = <bar> }`; `bar` is left out when `None`.
fn t1_record(b: &mut AstBuilder, foo: i64, bar: Option<&str>) -> ExprId {
    let foo = b.int(foo);
    match bar {
        Some(bar) => {
            let bar = b.str(bar);
            b.record(&[("foo", foo), ("bar", bar)])
        }
        None => b.record(&[("foo", foo)]),
    }
}

/// `let x : T3 = { recrec = { rec = <inner>, foobool = true }, rec = .., foo = 3 } in x`
fn annotated_t3(b: &mut AstBuilder, inner_bar: Option<&str>) -> ExprId {
    let inner = t1_record(b, 1, inner_bar);
    let yes = b.bool(true);
    let recrec = b.record(&[("rec", inner), ("foobool", yes)]);
    let rec = t1_record(b, 2, Some("outer"));
    let foo = b.int(3);
    let value = b.record(&[("recrec", recrec), ("rec", rec), ("foo", foo)]);
    let ty = b.ty_alias("T3");
    let x = b.ident("x");
    let body = b.let_typed("x", ty, value, x);
    with_record_aliases(b, body)
}

fn record_aliases(b: &mut AstBuilder) -> ExprId {
    annotated_t3(b, Some("inner"))
}

fn missing_field(b: &mut AstBuilder) -> ExprId {
    annotated_t3(b, None)
}

/// ```text
/// let r = { b = 2, a = 1, loop = (let spin = fun x => spin x in spin 0) } in
/// {
///   names = %fieldsOf% r,
///   hasA = %hasField% "a" r,
///   hasZ = %hasField% "z" r,
///   scaled = %map% (fun k v => v * 10) { x = 1, y = 2 },
/// }
/// ```
fn record_reflection(b: &mut AstBuilder) -> ExprId {
    let x = b.ident("x");
    let again = b.call_named("spin", &[x]);
    let spin = b.lambda("x", again);
    let zero = b.int(0);
    let start = b.call_named("spin", &[zero]);
    let diverge = b.let_in("spin", spin, start);
    let two = b.int(2);
    let one = b.int(1);
    let record = b.record(&[("b", two), ("a", one), ("loop", diverge)]);

    let r = b.ident("r");
    let names = b.builtin(Builtin::FieldsOf, &[r]);
    let key = b.str("a");
    let r = b.ident("r");
    let has_a = b.builtin(Builtin::HasField, &[key, r]);
    let key = b.str("z");
    let r = b.ident("r");
    let has_z = b.builtin(Builtin::HasField, &[key, r]);

    let v = b.ident("v");
    let ten = b.int(10);
    let times_ten = b.binary(BinaryOp::Mul, v, ten);
    let f = b.lambdas(&["k", "v"], times_ten);
    let one = b.int(1);
    let two = b.int(2);
    let source = b.record(&[("x", one), ("y", two)]);
    let scaled = b.builtin(Builtin::MapRec, &[f, source]);

    let result = b.record(&[
        ("names", names),
        ("hasA", has_a),
        ("hasZ", has_z),
        ("scaled", scaled),
    ]);
    b.let_in("r", record, result)
}

/// ```text
/// let apply : forall a b. (a -> b) -> a -> b = fun f x => f x in
/// let scores : {_ : Num} =
///   %mapRec% (fun k v => apply (fun n => n + 1) v) { alice = 1, bob = 2 }
/// in scores
/// ```
fn forall_map(b: &mut AstBuilder) -> ExprId {
    let n = b.ident("n");
    let one = b.int(1);
    let succ_body = b.binary(BinaryOp::Add, n, one);
    let succ = b.lambda("n", succ_body);
    let v = b.ident("v");
    let applied = b.call_named("apply", &[succ, v]);
    let f = b.lambdas(&["k", "v"], applied);
    let one = b.int(1);
    let two = b.int(2);
    let source = b.record(&[("alice", one), ("bob", two)]);
    let mapped = b.builtin(Builtin::MapRec, &[f, source]);
    let num = b.ty_num();
    let dict = b.ty_dict(num);
    let scores = b.ident("scores");
    let body = b.let_typed("scores", dict, mapped, scores);

    let f = b.ident("f");
    let x = b.ident("x");
    let call = b.apply(f, x);
    let apply = b.lambdas(&["f", "x"], call);
    let (a, bv) = (b.ty_var("a"), b.ty_var("b"));
    let arrow = b.ty_fn(a, bv);
    let (a, bv) = (b.ty_var("a"), b.ty_var("b"));
    let signature = b.ty_fns(&[arrow, a], bv);
    let apply_ty = b.ty_forall(&["a", "b"], signature);
    b.let_typed("apply", apply_ty, apply, body)
}

/// ```text
/// let x : T1 = { foo = 1, bar = "b" } in
/// typealias T1 = {foo : Num, bar : Str} in x
/// ```
fn alias_scope_error(b: &mut AstBuilder) -> ExprId {
    let num = b.ty_num();
    let string = b.ty_str();
    let t1 = b.ty_record(&[("foo", num), ("bar", string)]);
    let x = b.ident("x");
    let scoped = b.typealias("T1", t1, x);
    let value = t1_record(b, 1, Some("b"));
    let ty = b.ty_alias("T1");
    b.let_typed("x", ty, value, scoped)
}
