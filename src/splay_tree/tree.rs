use crate::arena::{Handle, DEFAULT_CHUNK_SIZE};
use crate::error::Result;
use crate::node::{self, Arena, Node, Search};
use log::{debug, trace};
use std::mem;
use std::ops::Index;

/// The rotation pattern that moves a node up one or two levels during a splay.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SplayStep {
    /// The parent is the root. A single rotation of the node finishes the splay.
    Zig,
    /// The node and its parent hang from the same side of their parents. The parent is rotated
    /// first, then the node.
    ZigZig,
    /// The node and its parent hang from opposite sides. The node is rotated twice.
    ZigZag,
}

/// A self-adjusting binary search tree with parent links.
///
/// Every `lookup`, `insert` and `remove` finishes by splaying the node it touched (or the last
/// node visited on a miss) to the root, so recently accessed keys are cheap to reach again.
/// Operations run in amortized `O(log n)` time.
///
/// Nodes live in an arena and are addressed by `Handle`s. Removing a key that has two children
/// moves its in-order successor's key into the removed key's node, so the successor's handle
/// becomes stale while the removed key's handle now holds the successor's key.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplayTree;
///
/// let mut tree = SplayTree::new();
/// tree.insert(5);
/// tree.insert(3);
/// tree.insert(8);
///
/// let node = tree.lookup(&3).unwrap();
/// assert_eq!(tree.root(), Some(node));
/// assert_eq!(tree[node].key(), &3);
///
/// assert_eq!(tree.lookup(&4), None);
/// assert_eq!(tree.remove(&5), Some(5));
/// assert_eq!(tree.traverse(), vec![&3, &8]);
/// ```
pub struct SplayTree<T> {
    arena: Arena<T>,
    root: Option<Handle>,
}

impl<T> SplayTree<T> {
    /// Constructs a new, empty `SplayTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let tree: SplayTree<u32> = SplayTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `SplayTree<T>` whose arena allocates `chunk_size` nodes at a time.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let tree: SplayTree<u32> = SplayTree::with_chunk_size(64);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        SplayTree {
            arena: Arena::new(chunk_size),
            root: None,
        }
    }

    /// Returns the handle of the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns the node behind `handle`, or `None` if the handle is stale.
    pub fn get(&self, handle: Handle) -> Option<&Node<T>> {
        self.arena.get(handle)
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every key. Every outstanding handle becomes stale.
    pub fn clear(&mut self) {
        debug!("clearing splay tree of {} nodes", self.len());
        self.arena.clear();
        self.root = None;
    }

    /// Returns the keys in ascending order. The tree is not splayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// for key in &[3, 1, 2] {
    ///     tree.insert(*key);
    /// }
    /// assert_eq!(tree.traverse(), vec![&1, &2, &3]);
    /// ```
    pub fn traverse(&self) -> Vec<&T> {
        node::in_order(&self.arena, self.root)
            .into_iter()
            .map(|handle| &self.arena[handle].key)
            .collect()
    }

    /// Returns the pattern the next splay iteration would apply to `handle`, or `None` if it is
    /// already the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::{SplayStep, SplayTree};
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    /// let root = tree.root().unwrap();
    /// let child = tree[root].right().unwrap();
    ///
    /// assert_eq!(tree.splay_step(root), None);
    /// assert_eq!(tree.splay_step(child), Some(SplayStep::Zig));
    /// ```
    pub fn splay_step(&self, handle: Handle) -> Option<SplayStep> {
        let parent = self.arena[handle].parent?;
        let step = match self.arena[parent].parent {
            None => SplayStep::Zig,
            Some(grandparent) => {
                let node_side = node::side_of(&self.arena, parent, handle);
                let parent_side = node::side_of(&self.arena, grandparent, parent);
                if node_side == parent_side {
                    SplayStep::ZigZig
                } else {
                    SplayStep::ZigZag
                }
            },
        };
        Some(step)
    }

    /// Rotates `handle` above its parent, keeping the in-order sequence of keys. Rotating the
    /// root does nothing.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// let old_root = tree.root().unwrap();
    /// let child = tree[old_root].left().unwrap();
    ///
    /// tree.rotate(child);
    /// assert_eq!(tree.root(), Some(child));
    /// assert_eq!(tree[child].right(), Some(old_root));
    /// assert_eq!(tree[old_root].parent(), Some(child));
    /// ```
    pub fn rotate(&mut self, handle: Handle) {
        let parent = match self.arena[handle].parent {
            Some(parent) => parent,
            None => return,
        };
        let grandparent = self.arena[parent].parent;
        let side = node::side_of(&self.arena, parent, handle);
        trace!("rotating {:?} above {:?}", handle, parent);

        let inner = self.arena[handle].child(side.opposite());
        self.arena[parent].set_child(side, inner);
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(parent);
        }
        self.arena[handle].set_child(side.opposite(), Some(parent));

        match grandparent {
            Some(grandparent) => {
                let parent_side = node::side_of(&self.arena, grandparent, parent);
                self.arena[grandparent].set_child(parent_side, Some(handle));
            },
            None => self.root = Some(handle),
        }
        self.arena[handle].parent = grandparent;
        self.arena[parent].parent = Some(handle);
    }

    /// Rotates `handle` up until it becomes the root. Splaying `None` does nothing.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is stale.
    pub fn splay(&mut self, handle: Option<Handle>) {
        let handle = match handle {
            Some(handle) => handle,
            None => return,
        };
        while let Some(step) = self.splay_step(handle) {
            trace!("{:?} step on {:?}", step, handle);
            match step {
                SplayStep::Zig => self.rotate(handle),
                SplayStep::ZigZig => {
                    if let Some(parent) = self.arena[handle].parent {
                        self.rotate(parent);
                    }
                    self.rotate(handle);
                },
                SplayStep::ZigZag => {
                    self.rotate(handle);
                    self.rotate(handle);
                },
            }
        }
    }
}

impl<T> SplayTree<T>
where
    T: Ord,
{
    /// Finds the node holding `key` and splays it to the root. On a miss the last node visited is
    /// splayed instead and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    ///
    /// let node = tree.lookup(&1).unwrap();
    /// assert_eq!(tree.root(), Some(node));
    ///
    /// assert_eq!(tree.lookup(&2), None);
    /// assert!(tree.root().is_some());
    /// ```
    pub fn lookup(&mut self, key: &T) -> Option<Handle> {
        match node::search(&self.arena, self.root, key) {
            Search::Found(handle) => {
                self.splay(Some(handle));
                Some(handle)
            },
            Search::Missing(last) => {
                self.splay(last.map(|(handle, _)| handle));
                None
            },
        }
    }

    /// Returns `true` if `key` is in the tree. Like `lookup`, this splays the tree.
    pub fn contains(&mut self, key: &T) -> bool {
        self.lookup(key).is_some()
    }

    /// Inserts `key` and splays its node to the root. Returns `false` and leaves the key set
    /// unchanged if `key` was already present; its node is still splayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree[tree.root().unwrap()].key(), &1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        match node::search(&self.arena, self.root, &key) {
            Search::Found(handle) => {
                self.splay(Some(handle));
                false
            },
            Search::Missing(None) => {
                let handle = self.arena.allocate(Node::new(key, None));
                debug!("inserted {:?} as root of empty splay tree", handle);
                self.root = Some(handle);
                true
            },
            Search::Missing(Some((parent, side))) => {
                let handle = self.arena.allocate(Node::new(key, Some(parent)));
                self.arena[parent].set_child(side, Some(handle));
                debug!("inserted {:?} under {:?}", handle, parent);
                self.splay(Some(handle));
                true
            },
        }
    }

    /// Removes `key` from the tree and returns it, then splays the parent of the node that was
    /// unlinked. On a miss the last node visited is splayed and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.remove(&1), Some(1));
    /// assert_eq!(tree.remove(&1), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<T> {
        let target = match node::search(&self.arena, self.root, key) {
            Search::Found(handle) => handle,
            Search::Missing(last) => {
                self.splay(last.map(|(handle, _)| handle));
                return None;
            },
        };

        // A node with two children keeps its place and takes over its successor's key; the
        // successor, which has no left child, is unlinked instead.
        let unlinked = match (self.arena[target].left, self.arena[target].right) {
            (Some(_), Some(right)) => node::leftmost(&self.arena, right),
            _ => target,
        };

        let parent = self.arena[unlinked].parent;
        let replacement = self.arena[unlinked].left.or(self.arena[unlinked].right);
        match parent {
            Some(parent) => {
                let side = node::side_of(&self.arena, parent, unlinked);
                self.arena[parent].set_child(side, replacement);
            },
            None => self.root = replacement,
        }
        if let Some(replacement) = replacement {
            self.arena[replacement].parent = parent;
        }

        let removed = self.arena.free(unlinked);
        debug!("unlinked {:?}, {} nodes left", unlinked, self.len());
        let key = if unlinked == target {
            removed.key
        } else {
            mem::replace(&mut self.arena[target].key, removed.key)
        };

        self.splay(parent);
        Some(key)
    }

    /// Checks the parent links and key ordering of the whole tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        node::validate(&self.arena, self.root, self.len())
    }
}

impl<T> Default for SplayTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for SplayTree<T> {
    type Output = Node<T>;

    fn index(&self, handle: Handle) -> &Self::Output {
        &self.arena[handle]
    }
}

#[cfg(test)]
mod tests {
    use super::{SplayStep, SplayTree};
    use crate::arena::Handle;

    fn root_key(tree: &SplayTree<u32>) -> Option<u32> {
        tree.root().map(|root| *tree[root].key())
    }

    fn handle_of(tree: &SplayTree<u32>, key: u32) -> Handle {
        let mut curr = tree.root();
        while let Some(handle) = curr {
            let node = &tree[handle];
            if *node.key() == key {
                return handle;
            }
            curr = if key < *node.key() { node.left() } else { node.right() };
        }
        panic!("key {} is not in the tree", key);
    }

    // Inserting in ascending order leaves a left path: 4 at the root, 1 deepest.
    fn left_path() -> SplayTree<u32> {
        let mut tree = SplayTree::new();
        for key in 1..5 {
            tree.insert(key);
        }
        tree
    }

    #[test]
    fn test_len_empty() {
        let tree: SplayTree<u32> = SplayTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn test_ascending_insert_shape() {
        let tree = left_path();
        assert_eq!(root_key(&tree), Some(4));
        assert_eq!(tree.traverse(), vec![&1, &2, &3, &4]);
        let one = handle_of(&tree, 1);
        assert_eq!(tree[one].left(), None);
        assert_eq!(tree[one].right(), None);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_rotate_root_is_noop() {
        let mut tree = left_path();
        let root = tree.root().unwrap();
        tree.rotate(root);
        assert_eq!(tree.root(), Some(root));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_rotate_moves_inner_subtree() {
        //       4            3
        //      /            / \
        //     3     =>     2   4
        //    /            /
        //   2            1
        //  /
        // 1
        let mut tree = left_path();
        let four = handle_of(&tree, 4);
        let three = handle_of(&tree, 3);
        tree.rotate(three);

        assert_eq!(tree.root(), Some(three));
        assert_eq!(tree[three].parent(), None);
        assert_eq!(tree[three].right(), Some(four));
        assert_eq!(tree[four].parent(), Some(three));
        assert_eq!(tree[four].left(), None);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_rotate_reattaches_to_grandparent() {
        let mut tree = left_path();
        let four = handle_of(&tree, 4);
        let three = handle_of(&tree, 3);
        let two = handle_of(&tree, 2);
        tree.rotate(two);

        assert_eq!(tree.root(), Some(four));
        assert_eq!(tree[four].left(), Some(two));
        assert_eq!(tree[two].parent(), Some(four));
        assert_eq!(tree[two].right(), Some(three));
        assert_eq!(tree[three].parent(), Some(two));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_splay_step_classification() {
        let mut tree = left_path();
        assert_eq!(tree.splay_step(handle_of(&tree, 4)), None);
        assert_eq!(tree.splay_step(handle_of(&tree, 3)), Some(SplayStep::Zig));
        assert_eq!(tree.splay_step(handle_of(&tree, 2)), Some(SplayStep::ZigZig));

        //   4
        //  /
        // 2
        //  \
        //   3
        let two = handle_of(&tree, 2);
        tree.rotate(two);
        let three = handle_of(&tree, 3);
        assert_eq!(tree.splay_step(three), Some(SplayStep::ZigZag));
    }

    #[test]
    fn test_splay_zig_zig_rotates_parent_first() {
        //       4         1
        //      /           \
        //     3             4
        //    /       =>    /
        //   2             2
        //  /               \
        // 1                 3
        let mut tree = left_path();
        let one = handle_of(&tree, 1);
        tree.splay(Some(one));

        assert_eq!(tree.root(), Some(one));
        assert_eq!(tree[one].left(), None);
        let four = tree[one].right().unwrap();
        assert_eq!(tree[four].key(), &4);
        assert_eq!(tree[four].right(), None);
        let two = tree[four].left().unwrap();
        assert_eq!(tree[two].key(), &2);
        assert_eq!(tree[two].left(), None);
        let three = tree[two].right().unwrap();
        assert_eq!(tree[three].key(), &3);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_splay_zig_zag() {
        //   3          2
        //  /          / \
        // 1     =>   1   3
        //  \
        //   2
        let mut tree = SplayTree::new();
        tree.insert(2);
        tree.insert(1);
        tree.insert(3);
        tree.lookup(&3);
        let one = handle_of(&tree, 1);
        let two = handle_of(&tree, 2);
        tree.rotate(one);
        assert_eq!(tree.splay_step(two), Some(SplayStep::ZigZag));

        tree.splay(Some(two));
        assert_eq!(tree.root(), Some(two));
        assert_eq!(tree[two].left(), Some(one));
        assert_eq!(tree[tree[two].right().unwrap()].key(), &3);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_splay_none_is_noop() {
        let mut tree = left_path();
        let root = tree.root();
        tree.splay(None);
        assert_eq!(tree.root(), root);
    }

    #[test]
    fn test_lookup_splays_hit() {
        let mut tree = left_path();
        let node = tree.lookup(&2).unwrap();
        assert_eq!(tree.root(), Some(node));
        assert_eq!(tree[node].key(), &2);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_lookup_miss_splays_last_visited() {
        let mut tree = SplayTree::new();
        for key in &[10, 20, 30] {
            tree.insert(*key);
        }
        assert_eq!(tree.lookup(&15), None);
        let root = root_key(&tree).unwrap();
        assert!(root == 10 || root == 20);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_lookup_empty() {
        let mut tree: SplayTree<u32> = SplayTree::new();
        assert_eq!(tree.lookup(&1), None);
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn test_insert_duplicate_splays_existing() {
        let mut tree = left_path();
        let one = handle_of(&tree, 1);
        assert!(!tree.insert(1));
        assert_eq!(tree.root(), Some(one));
        assert_eq!(tree.len(), 4);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_leaf_splays_parent() {
        let mut tree = left_path();
        let two = handle_of(&tree, 2);
        assert_eq!(tree.remove(&1), Some(1));
        assert_eq!(tree.root(), Some(two));
        assert_eq!(tree.traverse(), vec![&2, &3, &4]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_root_with_one_child() {
        let mut tree = left_path();
        let three = handle_of(&tree, 3);
        assert_eq!(tree.remove(&4), Some(4));
        assert_eq!(tree.root(), Some(three));
        assert_eq!(tree[three].parent(), None);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_two_children_copies_successor_key() {
        let mut tree = SplayTree::new();
        tree.insert(1);
        tree.insert(3);
        tree.insert(2);
        let two = tree.root().unwrap();
        let three = handle_of(&tree, 3);

        assert_eq!(tree.remove(&2), Some(2));
        assert_eq!(tree[two].key(), &3);
        assert_eq!(tree.get(three).map(|node| *node.key()), None);
        assert_eq!(tree.root(), Some(two));
        assert_eq!(tree.traverse(), vec![&1, &3]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_miss_splays_last_visited() {
        let mut tree = left_path();
        assert_eq!(tree.remove(&0), None);
        assert_eq!(root_key(&tree), Some(1));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_clear() {
        let mut tree = left_path();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.insert(7));
        assert_eq!(root_key(&tree), Some(7));
    }
}
