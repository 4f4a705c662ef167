//! Node shape and arena walks shared by `SplayTree` and `BinarySearchTree`.

use crate::arena::{Handle, TypedArena};
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// The side of its parent a node hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A tree node: one key and three links into the owning tree's arena.
///
/// The child links own their subtrees. The parent link is only a back-reference and always
/// agrees with the child link that points at this node.
#[derive(Debug)]
pub struct Node<T> {
    pub(crate) key: T,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<T> Node<T> {
    pub(crate) fn new(key: T, parent: Option<Handle>) -> Self {
        Node {
            key,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn key(&self) -> &T {
        &self.key
    }

    pub fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub fn left(&self) -> Option<Handle> {
        self.left
    }

    pub fn right(&self) -> Option<Handle> {
        self.right
    }

    pub fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

pub(crate) type Arena<T> = TypedArena<Node<T>>;

/// Which child slot of `parent` holds `child`.
pub(crate) fn side_of<T>(arena: &Arena<T>, parent: Handle, child: Handle) -> Side {
    if arena[parent].left == Some(child) {
        Side::Left
    } else {
        Side::Right
    }
}

/// Outcome of a plain BST descent for a key.
pub(crate) enum Search {
    Found(Handle),
    /// The key is absent; holds the last node visited and the empty slot under it where the key
    /// would go, or `None` for an empty tree.
    Missing(Option<(Handle, Side)>),
}

pub(crate) fn search<T: Ord>(arena: &Arena<T>, root: Option<Handle>, key: &T) -> Search {
    let mut last = None;
    let mut curr = root;
    while let Some(handle) = curr {
        let side = match key.cmp(&arena[handle].key) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return Search::Found(handle),
        };
        last = Some((handle, side));
        curr = arena[handle].child(side);
    }
    Search::Missing(last)
}

pub(crate) fn leftmost<T>(arena: &Arena<T>, mut handle: Handle) -> Handle {
    while let Some(left) = arena[handle].left {
        handle = left;
    }
    handle
}

/// Collects handles in key order without recursing, so a degenerate path-shaped tree cannot
/// exhaust the stack.
pub(crate) fn in_order<T>(arena: &Arena<T>, root: Option<Handle>) -> Vec<Handle> {
    let mut ret = Vec::new();
    let mut stack = Vec::new();
    let mut curr = root;
    loop {
        while let Some(handle) = curr {
            stack.push(handle);
            curr = arena[handle].left;
        }
        match stack.pop() {
            Some(handle) => {
                ret.push(handle);
                curr = arena[handle].right;
            },
            None => return ret,
        }
    }
}

/// Checks the link and ordering invariants of the tree rooted at `root` holding `len` nodes.
pub(crate) fn validate<T: Ord>(arena: &Arena<T>, root: Option<Handle>, len: usize) -> Result<()> {
    if let Some(root) = root {
        if arena[root].parent.is_some() {
            return Err(Error::RootHasParent(root));
        }
    }

    let handles = in_order(arena, root);
    for &handle in &handles {
        let node = &arena[handle];
        for child in node.left.iter().chain(node.right.iter()) {
            let actual = arena[*child].parent;
            if actual != Some(handle) {
                return Err(Error::ParentMismatch {
                    child: *child,
                    expected: handle,
                    actual,
                });
            }
        }
    }

    for pair in handles.windows(2) {
        if arena[pair[0]].key >= arena[pair[1]].key {
            return Err(Error::OrderViolation(pair[1]));
        }
    }

    if handles.len() != len {
        return Err(Error::LengthMismatch {
            expected: len,
            actual: handles.len(),
        });
    }
    Ok(())
}
