//! Generic list functions written in the language itself.
//!
//! ```text
//! let lists = {
//!   map      = fun f l => if l == [] then [] else [f (%head% l)] @ lists.map f (%tail% l),
//!   map2     = fun f l1 l2 =>
//!                if l1 == [] || l2 == [] then []
//!                else [f (%head% l1) (%head% l2)] @ lists.map2 f (%tail% l1) (%tail% l2),
//!   generate = fun f n => lists.map f (%range% n),
//!   foldl    = fun f acc l =>
//!                if l == [] then acc
//!                else let next = f acc (%head% l) in
//!                     %seq% next (lists.foldl f next (%tail% l)),
//! } in body
//! ```
//!
//! `map` and `map2` produce their results one cell at a time (the recursive
//! call sits behind `@`), `foldl` is tail recursive and strict in the
//! accumulator, so all of them run on long lists in constant native stack.

use ncl_ir::{AstBuilder, BinaryOp, Builtin, ExprId};

/// Name the prelude record is bound to.
pub const PRELUDE_NAME: &str = "lists";

/// Wrap `body` in `let lists = { ... } in body`.
pub fn with_prelude(b: &mut AstBuilder, body: ExprId) -> ExprId {
    let map = build_map(b);
    let map2 = build_map2(b);
    let generate = build_generate(b);
    let foldl = build_foldl(b);
    let record = b.record(&[
        ("map", map),
        ("map2", map2),
        ("generate", generate),
        ("foldl", foldl),
    ]);
    b.let_in(PRELUDE_NAME, record, body)
}

/// `lists.<name>`
fn member(b: &mut AstBuilder, name: &str) -> ExprId {
    let lists = b.ident(PRELUDE_NAME);
    b.field(lists, name)
}

fn is_empty(b: &mut AstBuilder, list: &str) -> ExprId {
    let list = b.ident(list);
    let nil = b.list(&[]);
    b.binary(BinaryOp::Eq, list, nil)
}

fn head_of(b: &mut AstBuilder, list: &str) -> ExprId {
    let list = b.ident(list);
    b.builtin(Builtin::Head, &[list])
}

fn tail_of(b: &mut AstBuilder, list: &str) -> ExprId {
    let list = b.ident(list);
    b.builtin(Builtin::Tail, &[list])
}

fn build_map(b: &mut AstBuilder) -> ExprId {
    let done = is_empty(b, "l");
    let nil = b.list(&[]);

    let head = head_of(b, "l");
    let mapped = b.call_named("f", &[head]);
    let cell = b.list(&[mapped]);
    let recurse = member(b, "map");
    let f = b.ident("f");
    let tail = tail_of(b, "l");
    let rest = b.call(recurse, &[f, tail]);
    let cons = b.binary(BinaryOp::ListConcat, cell, rest);

    let body = b.if_then_else(done, nil, cons);
    b.lambdas(&["f", "l"], body)
}

fn build_map2(b: &mut AstBuilder) -> ExprId {
    let left_done = is_empty(b, "l1");
    let right_done = is_empty(b, "l2");
    let done = b.binary(BinaryOp::Or, left_done, right_done);
    let nil = b.list(&[]);

    let x = head_of(b, "l1");
    let y = head_of(b, "l2");
    let combined = b.call_named("f", &[x, y]);
    let cell = b.list(&[combined]);
    let recurse = member(b, "map2");
    let f = b.ident("f");
    let xs = tail_of(b, "l1");
    let ys = tail_of(b, "l2");
    let rest = b.call(recurse, &[f, xs, ys]);
    let cons = b.binary(BinaryOp::ListConcat, cell, rest);

    let body = b.if_then_else(done, nil, cons);
    b.lambdas(&["f", "l1", "l2"], body)
}

fn build_generate(b: &mut AstBuilder) -> ExprId {
    let map = member(b, "map");
    let f = b.ident("f");
    let n = b.ident("n");
    let indices = b.builtin(Builtin::Range, &[n]);
    let body = b.call(map, &[f, indices]);
    b.lambdas(&["f", "n"], body)
}

fn build_foldl(b: &mut AstBuilder) -> ExprId {
    let done = is_empty(b, "l");
    let acc = b.ident("acc");

    let prev = b.ident("acc");
    let head = head_of(b, "l");
    let step = b.call_named("f", &[prev, head]);
    let recurse = member(b, "foldl");
    let f = b.ident("f");
    let next = b.ident("next");
    let tail = tail_of(b, "l");
    let rest = b.call(recurse, &[f, next, tail]);
    let forced = b.ident("next");
    let strict = b.builtin(Builtin::Seq, &[forced, rest]);
    let iterate = b.let_in("next", step, strict);

    let body = b.if_then_else(done, acc, iterate);
    b.lambdas(&["f", "acc", "l"], body)
}

#[cfg(test)]
mod tests;
