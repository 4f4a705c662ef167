//! Plain binary search tree that supports successor queries by walking parent links.

mod tree;

pub use self::tree::BinarySearchTree;
