use crate::arena::{Handle, DEFAULT_CHUNK_SIZE};
use crate::error::Result;
use crate::node::{self, Arena, Node, Search, Side};
use log::debug;
use std::ops::Index;

/// An unbalanced binary search tree with parent links and successor queries.
///
/// The shape is fixed by insertion order: nothing is ever rotated, so inserting sorted keys
/// degrades every operation to `O(n)`.
///
/// # Examples
///
/// ```
/// use splay_collections::bst::BinarySearchTree;
///
/// let mut tree = BinarySearchTree::new();
/// for key in &[5, 3, 8] {
///     tree.insert(*key);
/// }
///
/// let min = tree.successor(None).unwrap();
/// assert_eq!(tree[min].key(), &3);
///
/// let five = tree.find(&5).unwrap();
/// let next = tree.successor(Some(five)).unwrap();
/// assert_eq!(tree[next].key(), &8);
/// assert_eq!(tree.successor(Some(next)), None);
/// ```
pub struct BinarySearchTree<T> {
    arena: Arena<T>,
    root: Option<Handle>,
}

impl<T> BinarySearchTree<T> {
    /// Constructs a new, empty `BinarySearchTree<T>`.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `BinarySearchTree<T>` whose arena allocates `chunk_size` nodes at
    /// a time.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        BinarySearchTree {
            arena: Arena::new(chunk_size),
            root: None,
        }
    }

    pub fn root(&self) -> Option<Handle> {
        self.root
    }

    pub fn get(&self, handle: Handle) -> Option<&Node<T>> {
        self.arena.get(handle)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Returns the keys in ascending order.
    pub fn traverse(&self) -> Vec<&T> {
        node::in_order(&self.arena, self.root)
            .into_iter()
            .map(|handle| &self.arena[handle].key)
            .collect()
    }

    /// Returns the node with the smallest key, or `None` if the tree is empty.
    pub fn min(&self) -> Option<Handle> {
        self.root.map(|root| node::leftmost(&self.arena, root))
    }

    /// Returns the node with the next greater key after `handle`, or `None` if `handle` holds the
    /// largest key. Passing `None` returns the node with the smallest key.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::bst::BinarySearchTree;
    ///
    /// let mut tree = BinarySearchTree::new();
    /// for key in &[2, 1, 4, 3] {
    ///     tree.insert(*key);
    /// }
    ///
    /// let mut keys = Vec::new();
    /// let mut curr = tree.successor(None);
    /// while let Some(handle) = curr {
    ///     keys.push(*tree[handle].key());
    ///     curr = tree.successor(curr);
    /// }
    /// assert_eq!(keys, vec![1, 2, 3, 4]);
    /// ```
    pub fn successor(&self, handle: Option<Handle>) -> Option<Handle> {
        let handle = match handle {
            Some(handle) => handle,
            None => return self.min(),
        };

        if let Some(right) = self.arena[handle].right {
            return Some(node::leftmost(&self.arena, right));
        }

        // The successor is the first ancestor reached from its left subtree.
        let mut curr = handle;
        while let Some(parent) = self.arena[curr].parent {
            if node::side_of(&self.arena, parent, curr) == Side::Left {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }
}

impl<T> BinarySearchTree<T>
where
    T: Ord,
{
    /// Inserts `key` as a new leaf. Returns `false` and does nothing if `key` is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::bst::BinarySearchTree;
    ///
    /// let mut tree = BinarySearchTree::new();
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        match node::search(&self.arena, self.root, &key) {
            Search::Found(_) => false,
            Search::Missing(None) => {
                self.root = Some(self.arena.allocate(Node::new(key, None)));
                true
            },
            Search::Missing(Some((parent, side))) => {
                let handle = self.arena.allocate(Node::new(key, Some(parent)));
                self.arena[parent].set_child(side, Some(handle));
                debug!("inserted {:?} under {:?}", handle, parent);
                true
            },
        }
    }

    /// Returns the node holding `key`, or `None` if it is absent.
    pub fn find(&self, key: &T) -> Option<Handle> {
        match node::search(&self.arena, self.root, key) {
            Search::Found(handle) => Some(handle),
            Search::Missing(_) => None,
        }
    }

    pub fn contains(&self, key: &T) -> bool {
        self.find(key).is_some()
    }

    /// Checks the parent links and key ordering of the whole tree.
    pub fn validate(&self) -> Result<()> {
        node::validate(&self.arena, self.root, self.len())
    }
}

impl<T> Default for BinarySearchTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for BinarySearchTree<T> {
    type Output = Node<T>;

    fn index(&self, handle: Handle) -> &Self::Output {
        &self.arena[handle]
    }
}
