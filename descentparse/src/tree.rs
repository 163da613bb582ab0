use std::fmt::{Display, Formatter};
use std::ops::Index;

use itertools::Itertools;
use serde::Serialize;

/// An ordered, labeled tree.
///
/// A node without children is a leaf: either a literal token or a tag that was
/// never expanded. A node with children is a completed derivation of `value`
/// into the values of its children, in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Tree<S> {
    value: S,
    children: Vec<Tree<S>>,
}

impl<S> Tree<S> {
    /// Creates a leaf labeled `value`.
    pub fn new(value: S) -> Self {
        Tree {
            value,
            children: Vec::new(),
        }
    }

    pub(crate) fn from_children(value: S, children: Vec<Tree<S>>) -> Self {
        Tree { value, children }
    }

    /// The `tag -> token` pair produced when a token matches its part-of-speech.
    pub(crate) fn from_terminal(tag: S, token: S) -> Self {
        Tree::from_children(tag, vec![Tree::new(token)])
    }

    pub fn add_child(&mut self, child: Tree<S>) {
        self.children.push(child);
    }

    pub fn value(&self) -> &S {
        &self.value
    }

    pub fn children(&self) -> &[Tree<S>] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first, pre-order walk over every node, children in insertion order.
    /// The root is yielded at depth 0.
    pub fn preorder(&self) -> Preorder<'_, S> {
        Preorder {
            stack: vec![(0, self)],
        }
    }

    /// `(depth, label)` pairs in pre-order.
    pub fn labels(&self) -> impl Iterator<Item = (usize, &S)> + '_ {
        self.preorder().map(|(depth, node)| (depth, node.value()))
    }

    /// Leaf labels from left to right. For a parse tree these are the tokens.
    pub fn leaves(&self) -> impl Iterator<Item = &S> + '_ {
        self.preorder()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.value())
    }

    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

pub struct Preorder<'a, S> {
    stack: Vec<(usize, &'a Tree<S>)>,
}

impl<'a, S> Iterator for Preorder<'a, S> {
    type Item = (usize, &'a Tree<S>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

impl<S: Display> Display for Tree<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_leaf() {
            return write!(f, "{}", self.value);
        }
        let children = self.children.iter().map(|x| x.to_string()).join(" ");
        write!(f, "({} {})", self.value, children)
    }
}

impl<S> Index<&[usize]> for Tree<S> {
    type Output = Tree<S>;

    fn index(&self, index: &[usize]) -> &Self::Output {
        match index.split_first() {
            None => self,
            Some((first, rest)) => self.children[*first].index(rest),
        }
    }
}
