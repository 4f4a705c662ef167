use crate::arena::Handle;
use std::result;
use thiserror::Error;

/// Structural defects reported by `validate` on the trees in this crate.
///
/// None of the tree operations return these: a tree that fails validation was corrupted by a bug,
/// not by a caller passing an absent key.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    #[error("root {0:?} has a parent link")]
    RootHasParent(Handle),
    #[error("node {child:?} is linked under {expected:?} but its parent link is {actual:?}")]
    ParentMismatch {
        child: Handle,
        expected: Handle,
        actual: Option<Handle>,
    },
    #[error("in-order keys are not strictly increasing at node {0:?}")]
    OrderViolation(Handle),
    #[error("tree records {expected} nodes but {actual} are reachable from the root")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T> = result::Result<T, Error>;
