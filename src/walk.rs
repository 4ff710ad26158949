//! Generic recursive extraction over [`Node`] trees.
//!
//! The walker knows nothing about images or metadata. It visits every scalar
//! and bytes element of a tree, hands it to a [`LeafVisitor`], and applies the
//! [`Action`] the visitor returns.
//!
//! ## Hint scoping
//!
//! A [`HintContext`] travels with the recursion:
//!
//! - At a message boundary the child gets a **copy** of the context as it is
//!   at that moment. Whatever the child learns stays inside its subtree, so a
//!   camera label found in one element of a repeated message never reaches
//!   the next element.
//! - Within one node, `UpdateHint` mutates the context in place. Fields
//!   declared later at the same level (and subtrees entered later) see it.
//!
//! Hints are therefore order dependent: a label only tags the bytes fields
//! that come after it.
//!
//! ## Result order
//!
//! Results of a node's own leaves come first, in field order, followed by
//! the results of each child subtree in traversal order. Walking the same
//! tree twice yields the same sequence.

use crate::node::{Cardinality, FieldKind, Node, Scalar, Value};
use std::collections::BTreeMap;

/// Nested-message depth beyond which subtrees are not entered.
pub const MAX_DEPTH: usize = 64;

/// Keys a visitor can set on the hint context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HintKey {
    Camera,
}

impl HintKey {
    pub fn as_str(self) -> &'static str {
        match self {
            HintKey::Camera => "camera",
        }
    }
}

/// Per-branch side channel carrying labels down the recursion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintContext {
    hints: BTreeMap<HintKey, String>,
}

impl HintContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: HintKey) -> Option<&str> {
        self.hints.get(&key).map(String::as_str)
    }

    pub fn set(&mut self, key: HintKey, value: String) {
        self.hints.insert(key, value);
    }
}

/// One scalar element handed to a visitor.
#[derive(Debug, Clone, Copy)]
pub struct Leaf<'a> {
    pub name: &'a str,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    pub value: Scalar<'a>,
}

/// What a visitor wants done with a leaf.
#[derive(Debug, PartialEq)]
pub enum Action<R> {
    Ignore,
    Record(R),
    UpdateHint(HintKey, String),
}

/// Per-leaf callback driving a walk.
///
/// Called once per scalar element: singular fields once, repeated fields once
/// per element in order.
pub trait LeafVisitor {
    type Output;

    fn visit(&mut self, leaf: &Leaf<'_>, hints: &HintContext) -> Action<Self::Output>;
}

impl<R, F> LeafVisitor for F
where
    F: FnMut(&Leaf<'_>, &HintContext) -> Action<R>,
{
    type Output = R;

    fn visit(&mut self, leaf: &Leaf<'_>, hints: &HintContext) -> Action<R> {
        self(leaf, hints)
    }
}

/// Walk `node` with a fresh hint context and collect every recorded result.
pub fn walk<V: LeafVisitor>(node: &dyn Node, visitor: &mut V) -> Vec<V::Output> {
    let mut out = Vec::new();
    walk_node(node, visitor, HintContext::new(), 0, &mut out);
    out
}

fn walk_node<V: LeafVisitor>(
    node: &dyn Node,
    visitor: &mut V,
    mut hints: HintContext,
    depth: usize,
    out: &mut Vec<V::Output>,
) {
    if depth > MAX_DEPTH {
        log::warn!("record tree deeper than {MAX_DEPTH} levels, skipping subtree");
        return;
    }

    let mut children = Vec::new();
    for (field, value) in node.entries() {
        let is_message = field.kind == FieldKind::Message;
        match value {
            Value::Message(child) if is_message => {
                walk_node(child, visitor, hints.clone(), depth + 1, &mut children);
            }
            Value::Messages(elements) if is_message => {
                for child in elements {
                    walk_node(child, visitor, hints.clone(), depth + 1, &mut children);
                }
            }
            Value::Scalar(value) if !is_message => {
                let leaf = Leaf {
                    name: &field.name,
                    kind: field.kind,
                    cardinality: field.cardinality,
                    value,
                };
                apply(visitor.visit(&leaf, &hints), &mut hints, out);
            }
            Value::Repeated(values) if !is_message => {
                for value in values {
                    let leaf = Leaf {
                        name: &field.name,
                        kind: field.kind,
                        cardinality: field.cardinality,
                        value,
                    };
                    apply(visitor.visit(&leaf, &hints), &mut hints, out);
                }
            }
            // Unset, or a value that disagrees with its descriptor.
            _ => {}
        }
    }
    out.extend(children);
}

fn apply<R>(action: Action<R>, hints: &mut HintContext, out: &mut Vec<R>) {
    match action {
        Action::Ignore => {}
        Action::Record(result) => out.push(result),
        Action::UpdateHint(key, value) => hints.set(key, value),
    }
}
