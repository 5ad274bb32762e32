//! A pointer-based K-D tree that splits leaves as entries are inserted.

#![warn(missing_docs)]

mod node;

pub use node::{KDNode, DEFAULT_KDTREE_NODE_CAPACITY};
