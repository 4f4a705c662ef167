//! Binary search trees whose nodes carry parent links, stored in a typed arena.
//!
//! - `splay_tree::SplayTree` splays every accessed node to the root.
//! - `bst::BinarySearchTree` never rebalances and answers successor queries.

pub mod arena;
pub mod bst;
pub mod error;
mod node;
pub mod splay_tree;

pub use crate::error::{Error, Result};
