//! Lazy lists.
//!
//! A list is a tree of nodes whose right branches may be unevaluated:
//!
//! - `Elems`: a slice of element thunks (a suffix, after `tail`)
//! - `Range`: the integers `[next, end)`, generated on demand
//! - `Concat`: `left @ right`, where `right` is only forced once `left` is
//!   exhausted
//!
//! Because `right` stays suspended, a recursive definition such as
//! `[f x] @ map f xs` produces its elements one at a time and may be
//! infinite. Traversal goes through `ListCursor`, which keeps pending right
//! branches on an explicit stack so neither deep left nesting nor long
//! right spines consume native stack.

use std::sync::Arc;

use crate::errors::{not_a_list, EvalError};
use crate::{Interpreter, Thunk, Value};

enum ListNode {
    Elems { items: Arc<[Thunk]>, start: usize },
    Range { next: i64, end: i64 },
    Concat { left: ListValue, right: Thunk },
}

impl ListNode {
    /// Move the children of a `Concat` onto `stack`, leaving an empty node.
    fn detach_into(&mut self, stack: &mut Vec<ListValue>) {
        if !matches!(self, ListNode::Concat { .. }) {
            return;
        }
        if let ListNode::Concat { left, right } =
            std::mem::replace(self, ListNode::Range { next: 0, end: 0 })
        {
            stack.push(left);
            if let Some(list) = right.into_list() {
                stack.push(list);
            }
        }
    }
}

/// A lazy, immutable, shareable list.
#[derive(Clone)]
pub struct ListValue(Arc<ListNode>);

impl ListValue {
    fn node(node: ListNode) -> Self {
        ListValue(Arc::new(node))
    }

    pub fn empty() -> Self {
        Self::node(ListNode::Range { next: 0, end: 0 })
    }

    pub fn from_thunks(items: Vec<Thunk>) -> Self {
        Self::node(ListNode::Elems {
            items: items.into(),
            start: 0,
        })
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self::from_thunks(values.into_iter().map(Thunk::ready).collect())
    }

    /// The integers `0, 1, ..., end - 1`.
    pub fn range(end: i64) -> Self {
        Self::node(ListNode::Range { next: 0, end })
    }

    /// `left @ right`. `right` must evaluate to a list and is not forced here.
    pub fn concat(left: ListValue, right: Thunk) -> Self {
        Self::node(ListNode::Concat { left, right })
    }

    pub fn cursor(&self) -> ListCursor {
        ListCursor {
            pos: Position::Node(self.clone()),
            pending: Vec::new(),
        }
    }

    /// Split off the first element, forcing only as much spine as needed.
    pub fn uncons(
        &self,
        interp: &Interpreter<'_>,
    ) -> Result<Option<(Thunk, ListValue)>, EvalError> {
        let mut cursor = self.cursor();
        Ok(match cursor.next(interp)? {
            Some(head) => Some((head, cursor.into_rest())),
            None => None,
        })
    }

    pub fn is_empty(&self, interp: &Interpreter<'_>) -> Result<bool, EvalError> {
        Ok(self.cursor().next(interp)?.is_none())
    }

    /// Number of elements. Forces the whole spine but no element.
    pub fn length(&self, interp: &Interpreter<'_>) -> Result<usize, EvalError> {
        let mut cursor = self.cursor();
        let mut length = 0;
        while cursor.next(interp)?.is_some() {
            length += 1;
        }
        Ok(length)
    }

    /// Element at `index`, or `None` past the end.
    pub fn elem_at(
        &self,
        interp: &Interpreter<'_>,
        index: usize,
    ) -> Result<Option<Thunk>, EvalError> {
        let mut cursor = self.cursor();
        for _ in 0..index {
            if cursor.next(interp)?.is_none() {
                return Ok(None);
            }
        }
        cursor.next(interp)
    }

    /// All element thunks, unforced.
    pub fn to_thunks(&self, interp: &Interpreter<'_>) -> Result<Vec<Thunk>, EvalError> {
        let mut cursor = self.cursor();
        let mut items = Vec::new();
        while let Some(item) = cursor.next(interp)? {
            items.push(item);
        }
        Ok(items)
    }

    /// Elements reachable without evaluating anything, up to `limit`.
    ///
    /// The flag is `false` when an unforced right branch (or the limit)
    /// cut the walk short.
    pub(crate) fn peek_items(&self, limit: usize) -> (Vec<Thunk>, bool) {
        let mut items = Vec::new();
        // `None` marks a suffix that has not been evaluated yet.
        let mut stack = vec![Some(self.clone())];
        while let Some(entry) = stack.pop() {
            let Some(list) = entry else {
                return (items, false);
            };
            match &*list.0 {
                ListNode::Elems { items: elems, start } => {
                    for item in elems.iter().skip(*start) {
                        if items.len() >= limit {
                            return (items, false);
                        }
                        items.push(item.clone());
                    }
                }
                ListNode::Range { next, end } => {
                    for n in *next..*end {
                        if items.len() >= limit {
                            return (items, false);
                        }
                        items.push(Thunk::ready(Value::Int(n)));
                    }
                }
                ListNode::Concat { left, right } => {
                    match right.peek() {
                        Some(Value::List(right)) => stack.push(Some(right)),
                        _ => stack.push(None),
                    }
                    stack.push(Some(left.clone()));
                }
            }
        }
        (items, true)
    }
}

impl Drop for ListValue {
    // Long spines are chains of `Concat` nodes linked through forced thunks;
    // unlink them with an explicit stack instead of recursive drops.
    fn drop(&mut self) {
        let Some(node) = Arc::get_mut(&mut self.0) else {
            return;
        };
        if !matches!(node, ListNode::Concat { .. }) {
            return;
        }
        let mut stack = Vec::new();
        node.detach_into(&mut stack);
        while let Some(mut list) = stack.pop() {
            if let Some(node) = Arc::get_mut(&mut list.0) {
                node.detach_into(&mut stack);
            }
        }
    }
}

enum Position {
    Elems(Arc<[Thunk]>, usize),
    Range(i64, i64),
    Node(ListValue),
    Done,
}

/// Forward iterator over a lazy list.
///
/// Each step yields an element thunk without forcing it. Right branches
/// of `@` are forced (and cached) only when the cursor reaches them.
pub struct ListCursor {
    pos: Position,
    pending: Vec<Thunk>,
}

impl ListCursor {
    pub fn next(&mut self, interp: &Interpreter<'_>) -> Result<Option<Thunk>, EvalError> {
        loop {
            match &mut self.pos {
                Position::Elems(items, index) => {
                    if let Some(item) = items.get(*index) {
                        let item = item.clone();
                        *index += 1;
                        return Ok(Some(item));
                    }
                    self.pos = Position::Done;
                }
                Position::Range(next, end) => {
                    if *next < *end {
                        let n = *next;
                        *next += 1;
                        return Ok(Some(Thunk::ready(Value::Int(n))));
                    }
                    self.pos = Position::Done;
                }
                Position::Node(list) => {
                    let list = list.clone();
                    self.pos = match &*list.0 {
                        ListNode::Elems { items, start } => Position::Elems(items.clone(), *start),
                        ListNode::Range { next, end } => Position::Range(*next, *end),
                        ListNode::Concat { left, right } => {
                            self.pending.push(right.clone());
                            Position::Node(left.clone())
                        }
                    };
                }
                Position::Done => {
                    let Some(right) = self.pending.pop() else {
                        return Ok(None);
                    };
                    match interp.force(&right)? {
                        Value::List(list) => self.pos = Position::Node(list),
                        other => {
                            return Err(not_a_list("right operand of `@`", other.type_name()));
                        }
                    }
                }
            }
        }
    }

    /// The list of elements not yet yielded.
    pub fn into_rest(self) -> ListValue {
        let mut rest = match self.pos {
            Position::Elems(items, start) => ListValue::node(ListNode::Elems { items, start }),
            Position::Range(next, end) => ListValue::node(ListNode::Range { next, end }),
            Position::Node(list) => list,
            Position::Done => ListValue::empty(),
        };
        for right in self.pending.into_iter().rev() {
            rest = ListValue::concat(rest, right);
        }
        rest
    }
}
