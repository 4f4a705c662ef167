//! Self-adjusting binary search tree with the additional property that recently accessed keys are
//! quick to access again.

mod tree;

pub use self::tree::{SplayStep, SplayTree};
pub use crate::arena::Handle;
pub use crate::node::{Node, Side};
